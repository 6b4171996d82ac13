use crate::{config::BitmapConfig, error::Result};

pub mod packing;
pub mod preview;
pub mod raster;

pub use raster::Raster;

/// Packed monochrome bitmap, `side` dots square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub side: u32,
    pub data: Vec<u8>,
}

/// Turns URLs into printer-ready QR bitmaps.
#[derive(Debug, Clone)]
pub struct BitmapEncoder {
    scale: u32,
    quiet_zone: u32,
}

impl BitmapEncoder {
    pub fn new(config: &BitmapConfig) -> Self {
        Self {
            scale: config.scale,
            quiet_zone: config.quiet_zone,
        }
    }

    pub fn encode(&self, payload: &str) -> Result<Bitmap> {
        let raster = Raster::render_qr(payload, self.scale, self.quiet_zone)?;
        Self::encode_raster(&raster)
    }

    pub fn encode_raster(raster: &Raster) -> Result<Bitmap> {
        let ink = raster.ink().collect::<Result<Vec<bool>>>()?;
        let side = raster.side();

        Ok(Bitmap {
            side: side as u32,
            data: packing::pack(ink, side),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, services::bitmap::raster::LIGHT};

    fn encoder() -> BitmapEncoder {
        BitmapEncoder::new(&BitmapConfig {
            scale: 4,
            quiet_zone: 4,
        })
    }

    #[test]
    fn encoding_is_deterministic() {
        let first = encoder().encode("http://aftm.j51.eu/t/AB3dE9fghi").unwrap();
        let second = encoder().encode("http://aftm.j51.eu/t/AB3dE9fghi").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn side_matches_raster() {
        let raster = Raster::render_qr("http://aftm.j51.eu/t/SEED", 4, 4).unwrap();
        let bitmap = BitmapEncoder::encode_raster(&raster).unwrap();

        assert_eq!(bitmap.side as usize, raster.side());
        assert_eq!((bitmap.side as usize).pow(2), raster.pixels().len());
    }

    #[test]
    fn packed_bitmap_unpacks_to_inverted_raster() {
        let raster = Raster::render_qr("http://aftm.j51.eu/t/Zz987qwErt", 4, 4).unwrap();
        let bitmap = BitmapEncoder::encode_raster(&raster).unwrap();
        let side = bitmap.side as usize;

        let unpacked = packing::unpack(&bitmap.data, side, side).unwrap();
        let expected: Vec<bool> = raster.pixels().iter().map(|p| *p != LIGHT).collect();
        assert_eq!(unpacked, expected);
    }

    #[test]
    fn stray_gray_pixels_fail() {
        let mut pixels = vec![LIGHT; 16];
        pixels[5] = 0x80;
        let raster = Raster::from_pixels(pixels).unwrap();
        assert!(matches!(
            BitmapEncoder::encode_raster(&raster),
            Err(AppError::UnexpectedPixelValue(0x80))
        ));
    }
}
