use std::io::Cursor;

use png::{BitDepth, ColorType, Encoder};

use crate::error::{AppError, Result};

/// Encodes ink flags as a grayscale PNG, ink black on white.
pub fn encode_png(ink: &[bool], width: u32, height: u32) -> Result<Vec<u8>> {
    let expected = (width as usize) * (height as usize);
    if ink.len() != expected {
        return Err(AppError::BitmapTooShort {
            expected,
            actual: ink.len(),
        });
    }

    let gray: Vec<u8> = ink
        .iter()
        .map(|dot| if *dot { 0x00 } else { 0xff })
        .collect();

    let mut png_data = Vec::new();
    {
        let mut encoder = Encoder::new(Cursor::new(&mut png_data), width, height);
        encoder.set_color(ColorType::Grayscale);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&gray)?;
    }

    Ok(png_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_png_signature() {
        let png = encode_png(&[true, false, false, true], 2, 2).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        assert!(encode_png(&[true; 3], 2, 2).is_err());
    }
}
