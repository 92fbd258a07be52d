//! Minimum-width signed integer packing, and the canonical-width check the
//! parser applies on unpack.

use crate::error::{Error, Result};

/// Smallest width in {1, 2, 4, 8} whose signed range contains `value`.
pub const fn min_width(value: i64) -> usize {
    if value >= i8::MIN as i64 && value <= i8::MAX as i64 {
        1
    } else if value >= i16::MIN as i64 && value <= i16::MAX as i64 {
        2
    } else if value >= i32::MIN as i64 && value <= i32::MAX as i64 {
        4
    } else {
        8
    }
}

/// Little-endian two's-complement bytes of `value`, truncated to `width`.
/// `width` must be one of {1, 2, 4, 8}; the caller picks it via [`min_width`].
pub fn pack(value: i64, width: usize) -> [u8; 8] {
    let mut out = [0u8; 8];
    let bytes = value.to_le_bytes();
    out[..width].copy_from_slice(&bytes[..width]);
    out
}

/// Decode a little-endian two's-complement integer of the given `width`,
/// rejecting encodings that are not the canonical minimum width for the
/// value they represent.
pub fn unpack(bytes: &[u8], width: usize) -> Result<i64> {
    if bytes.len() < width {
        return Err(Error::EndOfBuffer);
    }
    let mut buf = [0u8; 8];
    buf[..width].copy_from_slice(&bytes[..width]);
    let sign_byte = bytes[width - 1];
    if sign_byte & 0x80 != 0 {
        for b in buf.iter_mut().skip(width) {
            *b = 0xFF;
        }
    }
    let value = i64::from_le_bytes(buf);
    if min_width(value) != width {
        return Err(Error::WrongType);
    }
    Ok(value)
}

/// IEEE-754 binary64 payload bytes, little-endian.
pub fn pack_double(value: f64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Decode an IEEE-754 binary64 from little-endian bytes.
pub fn unpack_double(bytes: &[u8]) -> Result<f64> {
    if bytes.len() < 8 {
        return Err(Error::EndOfBuffer);
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    Ok(f64::from_le_bytes(buf))
}
