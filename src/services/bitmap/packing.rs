use crate::error::{AppError, Result};

/// Packs row-major ink flags into the byte stream the receipt printer expects.
///
/// Bits are shifted in MSB-first. A byte is flushed when it holds 8 bits, or when
/// the running column count reaches `width` first; in that case the partial byte
/// is left-aligned and zero-padded and both counters restart. The column count is
/// *not* restarted on an 8-bit flush, so a row that ends exactly on a byte boundary
/// leaves it running past `width` for the rest of the image. Printers in the field
/// were calibrated against this exact layout.
pub fn pack(ink: impl IntoIterator<Item = bool>, width: usize) -> Vec<u8> {
    let mut packed = Vec::new();
    let mut byte = 0u8;
    let mut bits = 0u32;
    let mut column = 0usize;

    for dot in ink {
        byte = (byte << 1) | u8::from(dot);
        bits += 1;
        column += 1;

        if bits == 8 {
            packed.push(byte);
            byte = 0;
            bits = 0;
        } else if column == width {
            packed.push(byte << (8 - bits));
            byte = 0;
            bits = 0;
            column = 0;
        }
    }

    packed
}

/// Reverses [`pack`] for a `width` x `height` image using the same flush rule.
pub fn unpack(packed: &[u8], width: usize, height: usize) -> Result<Vec<bool>> {
    let expected = packed_len(width, height);
    if packed.len() < expected {
        return Err(AppError::BitmapTooShort {
            expected,
            actual: packed.len(),
        });
    }

    let mut ink = Vec::with_capacity(width * height);
    let mut index = 0usize;
    let mut bits = 0u32;
    let mut column = 0usize;

    for _ in 0..width * height {
        ink.push((packed[index] >> (7 - bits)) & 1 == 1);
        bits += 1;
        column += 1;

        if bits == 8 {
            index += 1;
            bits = 0;
        } else if column == width {
            index += 1;
            bits = 0;
            column = 0;
        }
    }

    Ok(ink)
}

/// Number of bytes [`pack`] produces for a `width` x `height` image.
pub fn packed_len(width: usize, height: usize) -> usize {
    let mut len = 0usize;
    let mut bits = 0u32;
    let mut column = 0usize;

    for _ in 0..width * height {
        bits += 1;
        column += 1;
        if bits == 8 {
            len += 1;
            bits = 0;
        } else if column == width {
            len += 1;
            bits = 0;
            column = 0;
        }
    }

    len
}
