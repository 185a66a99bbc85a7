//! BIFF8 Unicode string decoding.
//!
//! BIFF8 strings have a header of char_count (2 bytes) + flags (1 byte):
//! - Flags bit 0 (`fHighByte`): 0 = compressed Latin-1, 1 = uncompressed UTF-16LE
//! - Flags bit 2 (`fExtSt`): a 4-byte extended data size follows (Asian phonetic)
//! - Flags bit 3 (`fRichSt`): a 2-byte rich text run count follows
//!
//! The character data comes next, then 4 bytes per rich text run, then the
//! extended data. When a string in the SST crosses into a CONTINUE record,
//! the continuation starts with a fresh flags byte that may switch between
//! compressed and uncompressed characters.

use tracing::warn;

use super::parser::{read_u16, read_u32, read_u8};
use crate::error::{XlsError, XlsResult};

const FLAG_WIDE: u8 = 0x01;
const FLAG_EXT: u8 = 0x04;
const FLAG_RICH: u8 = 0x08;

/// Read a BIFF8 "short" string (1-byte length prefix, used in BOUNDSHEET).
pub fn read_short_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    let char_count = read_u8(data, offset)? as usize;
    let flags = read_u8(data, offset)?;
    read_character_data(data, offset, char_count, flags, &[])
}

/// Read a BIFF8 Unicode string with a 2-byte length prefix (LABEL, STRING).
pub fn read_unicode_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    read_continued_string(data, offset, &[])
}

/// Read a 2-byte-prefixed string whose characters may cross the given
/// CONTINUE boundaries.
pub fn read_continued_string(
    data: &[u8],
    offset: &mut usize,
    boundaries: &[usize],
) -> XlsResult<String> {
    let char_count = read_u16(data, offset)? as usize;
    let flags = read_u8(data, offset)?;

    let run_count = if flags & FLAG_RICH != 0 {
        read_u16(data, offset)? as usize
    } else {
        0
    };
    let ext_size = if flags & FLAG_EXT != 0 {
        read_u32(data, offset)? as usize
    } else {
        0
    };

    let text = read_character_data(data, offset, char_count, flags, boundaries)?;

    // Rich text runs (char_pos u16 + font_idx u16) and phonetic data
    *offset += run_count * 4 + ext_size;
    Ok(text)
}

/// Read `char_count` characters, re-reading the flags byte at each
/// CONTINUE boundary the characters cross.
fn read_character_data(
    data: &[u8],
    offset: &mut usize,
    char_count: usize,
    mut flags: u8,
    boundaries: &[usize],
) -> XlsResult<String> {
    let mut units: Vec<u16> = Vec::with_capacity(char_count);

    loop {
        let width = if flags & FLAG_WIDE != 0 { 2 } else { 1 };
        let end = boundaries
            .iter()
            .copied()
            .find(|&b| b > *offset)
            .unwrap_or(data.len())
            .min(data.len());
        let available = end.saturating_sub(*offset) / width;
        let count = available.min(char_count - units.len());
        let bytes = &data[*offset..*offset + count * width];

        if width == 2 {
            units.extend(bytes.chunks_exact(2).map(|p| u16::from_le_bytes([p[0], p[1]])));
        } else {
            units.extend(bytes.iter().map(|&b| u16::from(b)));
        }
        *offset += count * width;

        if units.len() == char_count {
            break;
        }
        if *offset != end || end == data.len() {
            return Err(XlsError::Parse(format!(
                "string data too short: {} of {} characters before offset {}",
                units.len(),
                char_count,
                *offset
            )));
        }
        flags = read_u8(data, offset)?;
    }

    String::from_utf16(&units).map_err(|e| XlsError::Parse(format!("invalid UTF-16 string: {e}")))
}

/// Parse the Shared String Table from an SST body with its CONTINUE
/// bodies joined.
///
/// The body starts with the total reference count and the unique string
/// count (4 bytes each), followed by the unique strings.
pub fn parse_sst(data: &[u8], boundaries: &[usize]) -> XlsResult<Vec<String>> {
    let mut offset = 0;

    let _total_strings = read_u32(data, &mut offset)?;
    let unique_count = read_u32(data, &mut offset)? as usize;

    let mut strings = Vec::with_capacity(unique_count.min(data.len()));

    for i in 0..unique_count {
        match read_continued_string(data, &mut offset, boundaries) {
            Ok(s) => strings.push(s),
            Err(e) => {
                // Some writers pad or truncate the table
                warn!("SST parse error at string {i}/{unique_count}: {e}");
                break;
            }
        }
    }

    Ok(strings)
}
