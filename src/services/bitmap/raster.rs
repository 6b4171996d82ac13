use qrcode::{Color, EcLevel, QrCode};

use crate::error::{AppError, Result};

/// Background value of a rasterized symbol.
pub const LIGHT: u8 = 255;
/// Module value of a rasterized symbol.
pub const DARK: u8 = 0;

/// Square 8-bit raster where every pixel is either [`LIGHT`] or [`DARK`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    side: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// Wraps row-major pixels, rejecting anything that is not a perfect square.
    pub fn from_pixels(pixels: Vec<u8>) -> Result<Self> {
        let side = pixels.len().isqrt();
        if side * side != pixels.len() {
            return Err(AppError::NonSquareRaster(pixels.len()));
        }
        Ok(Self { side, pixels })
    }

    /// Renders `payload` as a high-redundancy QR symbol, `scale` pixels per
    /// module, surrounded by `quiet_zone` light modules.
    pub fn render_qr(payload: &str, scale: u32, quiet_zone: u32) -> Result<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)?;
        let modules = code.width();
        let colors = code.to_colors();

        let scale = scale.max(1) as usize;
        let quiet = quiet_zone as usize;
        let side = (modules + 2 * quiet) * scale;

        let mut pixels = Vec::with_capacity(side * side);
        for y in 0..side {
            let row = (y / scale).checked_sub(quiet).filter(|row| *row < modules);
            for x in 0..side {
                let column = (x / scale).checked_sub(quiet).filter(|col| *col < modules);
                let dark = match (row, column) {
                    (Some(row), Some(column)) => colors[row * modules + column] == Color::Dark,
                    _ => false,
                };
                pixels.push(if dark { DARK } else { LIGHT });
            }
        }

        Self::from_pixels(pixels)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Row-major "print this dot" flags: dark modules print, background does not.
    pub fn ink(&self) -> impl Iterator<Item = Result<bool>> + '_ {
        self.pixels.iter().map(|pixel| ink(*pixel))
    }
}

pub fn ink(pixel: u8) -> Result<bool> {
    match pixel {
        LIGHT => Ok(false),
        DARK => Ok(true),
        other => Err(AppError::UnexpectedPixelValue(other)),
    }
}
