//! Low-level binary parsing helpers for BIFF8 records.
//!
//! All multi-byte integers in BIFF8 are little-endian.

use crate::error::{XlsError, XlsResult};

fn take<'a>(data: &'a [u8], offset: &mut usize, len: usize) -> XlsResult<&'a [u8]> {
    let bytes = offset
        .checked_add(len)
        .and_then(|end| data.get(*offset..end))
        .ok_or_else(|| {
            XlsError::Parse(format!(
                "unexpected end of data at offset {}, need {} bytes",
                *offset, len
            ))
        })?;
    *offset += len;
    Ok(bytes)
}

/// Read a `u8` from a byte slice at `offset`, advancing `offset`.
#[inline]
pub fn read_u8(data: &[u8], offset: &mut usize) -> XlsResult<u8> {
    Ok(take(data, offset, 1)?[0])
}

/// Read a `u16` (little-endian) from a byte slice at `offset`, advancing `offset`.
#[inline]
pub fn read_u16(data: &[u8], offset: &mut usize) -> XlsResult<u16> {
    let b = take(data, offset, 2)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

/// Read a `u32` (little-endian) from a byte slice at `offset`, advancing `offset`.
#[inline]
pub fn read_u32(data: &[u8], offset: &mut usize) -> XlsResult<u32> {
    let b = take(data, offset, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Read an `f64` (IEEE 754 double, little-endian) from a byte slice.
#[inline]
pub fn read_f64(data: &[u8], offset: &mut usize) -> XlsResult<f64> {
    let b = take(data, offset, 8)?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(b);
    Ok(f64::from_le_bytes(bytes))
}

/// Decode an RK-encoded number.
///
/// RK encoding (4 bytes):
/// - Bit 0: if 1, the decoded number should be divided by 100
/// - Bit 1: if 1, bits 2..31 hold a signed 30-bit integer;
///   if 0, they are the upper 30 bits of an IEEE 754 double
#[inline]
pub fn decode_rk(rk: u32) -> f64 {
    let div100 = (rk & 0x01) != 0;
    let is_integer = (rk & 0x02) != 0;

    let value = if is_integer {
        ((rk as i32) >> 2) as f64
    } else {
        f64::from_bits(((rk & 0xFFFF_FFFC) as u64) << 32)
    };

    if div100 {
        value / 100.0
    } else {
        value
    }
}

/// Read an RK value from 4 bytes at `offset`.
#[inline]
pub fn read_rk(data: &[u8], offset: &mut usize) -> XlsResult<f64> {
    read_u32(data, offset).map(decode_rk)
}
