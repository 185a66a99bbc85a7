//! XLS (BIFF8) reader.
//!
//! Opens a Compound File Binary (CFB/OLE2) container, reads the `Workbook`
//! stream, parses BIFF8 records, and loads the first worksheet into a
//! formcheck `Sheet`.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use tracing::debug;

use formcheck_core::{CellValue, Sheet};

use crate::biff::parser::{read_f64, read_rk, read_u16, read_u32, read_u8};
use crate::biff::records;
use crate::biff::strings::{parse_sst, read_short_string, read_unicode_string};
use crate::biff::{self, BiffRecord};
use crate::error::{XlsError, XlsResult};

type Cells = BTreeMap<u32, BTreeMap<u16, CellValue>>;

/// XLS file reader.
pub struct XlsReader;

/// Metadata for a sheet parsed from the BOUNDSHEET record.
#[derive(Debug)]
struct SheetInfo {
    /// Absolute byte offset of the sheet's BOF in the Workbook stream.
    offset: u32,
    /// Sheet type: 0 = worksheet, 2 = chart, 6 = macro/VBA.
    sheet_type: u8,
    name: String,
}

/// Records between a substream's BOF and its EOF.
struct Substream<'a> {
    bof_offset: u64,
    records: Vec<&'a BiffRecord>,
}

impl XlsReader {
    /// Read the first worksheet of an XLS file.
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsResult<Sheet> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read(file)
    }

    /// Read the first worksheet from any `Read + Seek` source.
    ///
    /// The first non-empty row becomes the header row.
    pub fn read<R: Read + Seek>(reader: R) -> XlsResult<Sheet> {
        let mut cfb = cfb::CompoundFile::open(reader)?;

        // BIFF5 files name the stream "Book"
        let stream_path = if cfb.exists("/Workbook") {
            "/Workbook"
        } else if cfb.exists("/Book") {
            "/Book"
        } else {
            return Err(XlsError::InvalidFormat(
                "no Workbook or Book stream found in CFB".into(),
            ));
        };

        let mut stream_data = Vec::new();
        {
            let mut stream = cfb.open_stream(stream_path)?;
            stream.read_to_end(&mut stream_data)?;
        }

        let all_records = biff::read_all_records(&mut Cursor::new(&stream_data))?;

        // Workbook globals run from the first BOF to its EOF
        let mut sst: Vec<String> = Vec::new();
        let mut sheets: Vec<SheetInfo> = Vec::new();
        let mut in_globals = false;
        let mut globals_end = None;

        for (idx, rec) in all_records.iter().enumerate() {
            match rec.record_type {
                records::BOF if !in_globals => {
                    let (version, dt) = biff::parse_bof(&rec.data)?;
                    if dt != records::BOF_WORKBOOK_GLOBALS {
                        return Err(XlsError::InvalidFormat(format!(
                            "stream starts with substream type 0x{dt:04X}, not workbook globals"
                        )));
                    }
                    if version != records::BIFF8_VERSION {
                        return Err(XlsError::UnsupportedVersion(format!(
                            "expected BIFF8 (0x0600), got 0x{version:04X}"
                        )));
                    }
                    in_globals = true;
                }
                records::EOF if in_globals => {
                    globals_end = Some(idx);
                    break;
                }
                records::SST if in_globals => {
                    sst = parse_sst(&rec.data, &rec.continuations)?;
                }
                records::BOUNDSHEET if in_globals => {
                    sheets.push(Self::parse_boundsheet(&rec.data)?);
                }
                _ => {}
            }
        }

        let globals_end = globals_end
            .ok_or_else(|| XlsError::InvalidFormat("no workbook globals found".into()))?;

        let (position, info) = sheets
            .iter()
            .enumerate()
            .find(|(_, info)| info.sheet_type == records::SHEET_TYPE_WORKSHEET)
            .ok_or_else(|| XlsError::InvalidFormat("workbook contains no worksheet".into()))?;

        // Substreams follow the globals in BOUNDSHEET order; the recorded
        // offset wins when it matches a BOF.
        let substreams = Self::split_substreams(&all_records[globals_end + 1..]);
        let substream = substreams
            .iter()
            .find(|s| s.bof_offset == u64::from(info.offset))
            .or_else(|| substreams.get(position))
            .ok_or_else(|| {
                XlsError::InvalidFormat(format!("substream of sheet '{}' not found", info.name))
            })?;

        debug!(sheet = %info.name, records = substream.records.len(), "reading worksheet");
        let cells = Self::read_cells(&substream.records, &sst)?;
        Ok(Sheet::from_cells(info.name.clone(), cells))
    }

    /// Parse a BOUNDSHEET record body.
    fn parse_boundsheet(data: &[u8]) -> XlsResult<SheetInfo> {
        let mut offset = 0;
        let abs_offset = read_u32(data, &mut offset)?;
        let _visibility = read_u8(data, &mut offset)?;
        let sheet_type = read_u8(data, &mut offset)?;
        let name = read_short_string(data, &mut offset)?;

        Ok(SheetInfo {
            offset: abs_offset,
            sheet_type,
            name,
        })
    }

    /// Split records into BOF..EOF substreams; nested substreams stay in
    /// their parent.
    fn split_substreams(records: &[BiffRecord]) -> Vec<Substream<'_>> {
        let mut groups = Vec::new();
        let mut current: Option<Substream<'_>> = None;
        let mut depth = 0usize;

        for rec in records {
            match rec.record_type {
                records::BOF => {
                    if depth == 0 {
                        current = Some(Substream {
                            bof_offset: rec.stream_offset,
                            records: Vec::new(),
                        });
                    }
                    depth += 1;
                }
                records::EOF if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        groups.extend(current.take());
                    }
                }
                _ => {
                    if let Some(group) = current.as_mut() {
                        group.records.push(rec);
                    }
                }
            }
        }

        groups
    }

    /// Collect the cell values of one worksheet substream.
    fn read_cells(records: &[&BiffRecord], sst: &[String]) -> XlsResult<Cells> {
        let mut cells = Cells::new();
        // A FORMULA with a string result is followed by its STRING record
        let mut pending_formula_cell: Option<(u32, u16)> = None;

        for rec in records {
            let data = rec.data.as_slice();
            match rec.record_type {
                records::LABELSST => {
                    let (row, col, mut off) = Self::cell_header(data)?;
                    let sst_idx = read_u32(data, &mut off)? as usize;
                    let text = sst.get(sst_idx).ok_or_else(|| {
                        XlsError::Parse(format!("shared string index {sst_idx} out of bounds"))
                    })?;
                    Self::store(&mut cells, row, col, CellValue::string(text.as_str()));
                }
                records::LABEL | records::RSTRING => {
                    let (row, col, mut off) = Self::cell_header(data)?;
                    let text = read_unicode_string(data, &mut off)?;
                    Self::store(&mut cells, row, col, CellValue::string(text));
                }
                records::NUMBER => {
                    let (row, col, mut off) = Self::cell_header(data)?;
                    let value = read_f64(data, &mut off)?;
                    Self::store(&mut cells, row, col, CellValue::Number(value));
                }
                records::RK => {
                    let (row, col, mut off) = Self::cell_header(data)?;
                    let value = read_rk(data, &mut off)?;
                    Self::store(&mut cells, row, col, CellValue::Number(value));
                }
                records::MULRK => Self::parse_mulrk(data, &mut cells)?,
                records::BOOLERR => {
                    let (row, col, off) = Self::cell_header(data)?;
                    let value = data.get(off).copied().unwrap_or(0);
                    let is_error = data.get(off + 1).copied().unwrap_or(0) != 0;
                    let cell = if is_error {
                        CellValue::string(error_text(value))
                    } else {
                        CellValue::Boolean(value != 0)
                    };
                    Self::store(&mut cells, row, col, cell);
                }
                records::FORMULA => {
                    pending_formula_cell = Self::parse_formula(data, &mut cells)?;
                    continue;
                }
                records::STRING => {
                    if let Some((row, col)) = pending_formula_cell.take() {
                        let text = read_unicode_string(data, &mut 0)?;
                        Self::store(&mut cells, row, col, CellValue::string(text));
                    }
                    continue;
                }
                _ => continue,
            }
            pending_formula_cell = None;
        }

        Ok(cells)
    }

    /// Shared prefix of cell records: row(2) + col(2) + xf(2)
    fn cell_header(data: &[u8]) -> XlsResult<(u32, u16, usize)> {
        let mut off = 0;
        let row = u32::from(read_u16(data, &mut off)?);
        let col = read_u16(data, &mut off)?;
        let _xf = read_u16(data, &mut off)?;
        Ok((row, col, off))
    }

    fn store(cells: &mut Cells, row: u32, col: u16, value: CellValue) {
        cells.entry(row).or_default().insert(col, value);
    }

    /// MULRK: row(2) + first_col(2) + [xf(2) + rk(4)]* + last_col(2)
    fn parse_mulrk(data: &[u8], cells: &mut Cells) -> XlsResult<()> {
        if data.len() < 6 {
            return Err(XlsError::Parse("MULRK record too short".into()));
        }
        let mut off = 0;
        let row = u32::from(read_u16(data, &mut off)?);
        let first_col = read_u16(data, &mut off)?;
        let last_col = u16::from_le_bytes([data[data.len() - 2], data[data.len() - 1]]);
        let rk_data_end = data.len() - 2;

        let mut col = first_col;
        while off + 6 <= rk_data_end && col <= last_col {
            let _xf = read_u16(data, &mut off)?;
            let value = read_rk(data, &mut off)?;
            Self::store(cells, row, col, CellValue::Number(value));
            col = col.saturating_add(1);
        }

        Ok(())
    }

    /// FORMULA: row(2) + col(2) + xf(2) + result(8) + options(2) + ...
    ///
    /// Only the cached result is kept. Returns the cell when the result is
    /// a string, which arrives in the following STRING record.
    fn parse_formula(data: &[u8], cells: &mut Cells) -> XlsResult<Option<(u32, u16)>> {
        let (row, col, off) = Self::cell_header(data)?;
        let result = data
            .get(off..off + 8)
            .ok_or_else(|| XlsError::Parse("FORMULA record too short".into()))?;

        // Bytes 6-7 == 0xFFFF mark a non-numeric result
        if result[6] != 0xFF || result[7] != 0xFF {
            let value = read_f64(result, &mut 0)?;
            Self::store(cells, row, col, CellValue::Number(value));
            return Ok(None);
        }

        match result[0] {
            0x00 => return Ok(Some((row, col))),
            0x01 => Self::store(cells, row, col, CellValue::Boolean(result[2] != 0)),
            0x02 => Self::store(cells, row, col, CellValue::string(error_text(result[2]))),
            // Empty string result
            _ => {}
        }
        Ok(None)
    }
}

/// Display text of a BIFF8 error code
fn error_text(code: u8) -> &'static str {
    match code {
        0x00 => "#NULL!",
        0x07 => "#DIV/0!",
        0x17 => "#REF!",
        0x1D => "#NAME?",
        0x24 => "#NUM!",
        0x2A => "#N/A",
        _ => "#VALUE!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const CHART_SHEET: u8 = 0x02;

    fn record(record_type: u16, body: &[u8]) -> Vec<u8> {
        let mut out = record_type.to_le_bytes().to_vec();
        out.extend_from_slice(&(body.len() as u16).to_le_bytes());
        out.extend_from_slice(body);
        out
    }

    fn bof(version: u16, dt: u16) -> Vec<u8> {
        let mut body = version.to_le_bytes().to_vec();
        body.extend_from_slice(&dt.to_le_bytes());
        body.extend_from_slice(&[0; 12]);
        record(records::BOF, &body)
    }

    fn xl_string(text: &str) -> Vec<u8> {
        let mut out = (text.len() as u16).to_le_bytes().to_vec();
        out.push(0x00);
        out.extend_from_slice(text.as_bytes());
        out
    }

    fn cell(record_type: u16, row: u16, col: u16, payload: &[u8]) -> Vec<u8> {
        let mut body = row.to_le_bytes().to_vec();
        body.extend_from_slice(&col.to_le_bytes());
        body.extend_from_slice(&[0x0F, 0x00]);
        body.extend_from_slice(payload);
        record(record_type, &body)
    }

    fn rk(value: i32) -> [u8; 4] {
        (((value << 2) as u32) | 0x02).to_le_bytes()
    }

    fn sst(strings: &[&str]) -> Vec<u8> {
        let mut body = (strings.len() as u32).to_le_bytes().to_vec();
        body.extend_from_slice(&(strings.len() as u32).to_le_bytes());
        for s in strings {
            body.extend(xl_string(s));
        }
        record(records::SST, &body)
    }

    fn formula(row: u16, col: u16, result: [u8; 8]) -> Vec<u8> {
        let mut payload = result.to_vec();
        payload.extend_from_slice(&[0; 8]);
        cell(records::FORMULA, row, col, &payload)
    }

    /// Assemble a Workbook stream: globals, then one substream per sheet
    fn workbook_stream(version: u16, globals: &[u8], sheets: &[(u8, &str, Vec<u8>)]) -> Vec<u8> {
        let build_globals = |offsets: &[u32]| {
            let mut out = bof(version, records::BOF_WORKBOOK_GLOBALS);
            out.extend_from_slice(globals);
            for ((sheet_type, name, _), offset) in sheets.iter().zip(offsets) {
                let mut body = offset.to_le_bytes().to_vec();
                body.extend_from_slice(&[0x00, *sheet_type, name.len() as u8, 0x00]);
                body.extend_from_slice(name.as_bytes());
                out.extend(record(records::BOUNDSHEET, &body));
            }
            out.extend(record(records::EOF, &[]));
            out
        };

        let mut position = build_globals(&vec![0; sheets.len()]).len() as u32;
        let mut offsets = Vec::new();
        let mut substreams = Vec::new();
        for (_, _, cells) in sheets {
            offsets.push(position);
            let mut sub = bof(version, records::BOF_WORKSHEET);
            sub.extend_from_slice(cells);
            sub.extend(record(records::EOF, &[]));
            position += sub.len() as u32;
            substreams.extend(sub);
        }

        let mut stream = build_globals(&offsets);
        stream.extend(substreams);
        stream
    }

    fn container(stream_name: &str, stream: &[u8]) -> Vec<u8> {
        let mut compound = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        {
            let mut out = compound.create_stream(stream_name).unwrap();
            out.write_all(stream).unwrap();
        }
        compound.flush().unwrap();
        compound.into_inner().into_inner()
    }

    fn plan_cells() -> Vec<u8> {
        let mut cells = Vec::new();
        cells.extend(cell(records::LABELSST, 0, 0, &0u32.to_le_bytes()));
        cells.extend(cell(records::LABELSST, 0, 1, &1u32.to_le_bytes()));
        cells.extend(cell(records::LABEL, 0, 2, &xl_string("FORMULA_FIELD_1")));
        cells.extend(cell(records::LABEL, 0, 3, &xl_string("UP_TOL_LMT")));

        cells.extend(cell(records::RK, 1, 0, &rk(10)));
        cells.extend(cell(records::LABELSST, 1, 1, &2u32.to_le_bytes()));
        cells.extend(cell(records::BOOLERR, 1, 3, &[0x01, 0x00]));

        // MULRK: 20 and 1250 / 100 in columns A and B of row 3
        let mut mulrk = 2u16.to_le_bytes().to_vec();
        mulrk.extend_from_slice(&0u16.to_le_bytes());
        mulrk.extend_from_slice(&[0x0F, 0x00]);
        mulrk.extend_from_slice(&rk(20));
        mulrk.extend_from_slice(&[0x0F, 0x00]);
        mulrk.extend_from_slice(&(((1250u32) << 2) | 0x03).to_le_bytes());
        mulrk.extend_from_slice(&1u16.to_le_bytes());
        cells.extend(record(records::MULRK, &mulrk));

        cells.extend(formula(2, 2, [0x00, 0, 0, 0, 0, 0, 0xFF, 0xFF]));
        cells.extend(record(records::STRING, &xl_string("C0010-C0020")));
        cells.extend(formula(2, 3, 8.5f64.to_le_bytes()));

        // Row 4 stays empty
        cells.extend(cell(records::NUMBER, 4, 0, &2.5f64.to_le_bytes()));
        cells.extend(cell(records::BOOLERR, 4, 3, &[0x07, 0x01]));
        cells
    }

    fn plan_workbook() -> Vec<u8> {
        let stream = workbook_stream(
            records::BIFF8_VERSION,
            &sst(&["INSPCHAR", "MSTR_CHAR", "KM G/G"]),
            &[
                (CHART_SHEET, "Chart", cell(records::NUMBER, 0, 0, &1f64.to_le_bytes())),
                (records::SHEET_TYPE_WORKSHEET, "Plan", plan_cells()),
                (
                    records::SHEET_TYPE_WORKSHEET,
                    "Other",
                    cell(records::NUMBER, 0, 0, &99f64.to_le_bytes()),
                ),
            ],
        );
        container("/Workbook", &stream)
    }

    #[test]
    fn test_reads_first_worksheet() {
        let sheet = XlsReader::read(Cursor::new(plan_workbook())).unwrap();

        assert_eq!(sheet.name(), "Plan");
        assert_eq!(
            sheet.headers(),
            &["INSPCHAR", "MSTR_CHAR", "FORMULA_FIELD_1", "UP_TOL_LMT"]
        );
        assert_eq!(sheet.row_count(), 4);

        assert_eq!(sheet.value(0, 0), &CellValue::Number(10.0));
        assert_eq!(sheet.value(0, 1), &CellValue::string("KM G/G"));
        assert_eq!(sheet.value(0, 2), &CellValue::Empty);
        assert_eq!(sheet.value(0, 3), &CellValue::Boolean(true));

        assert_eq!(sheet.value(1, 0), &CellValue::Number(20.0));
        assert_eq!(sheet.value(1, 1), &CellValue::Number(12.5));
        assert_eq!(sheet.value(1, 2), &CellValue::string("C0010-C0020"));
        assert_eq!(sheet.value(1, 3), &CellValue::Number(8.5));

        assert!(sheet.rows()[2].is_empty());
        assert_eq!(sheet.value(3, 0), &CellValue::Number(2.5));
        assert_eq!(sheet.value(3, 3), &CellValue::string("#DIV/0!"));
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("plan.xls");
        std::fs::write(&path, plan_workbook()).unwrap();

        let sheet = XlsReader::read_file(&path).unwrap();
        assert_eq!(sheet.column_index("MSTR_CHAR"), Some(1));
        assert!(XlsReader::read_file(dir.path().join("missing.xls")).is_err());
    }

    #[test]
    fn test_rejects_biff5_book_stream() {
        let stream = workbook_stream(0x0500, &[], &[(0, "Plan", Vec::new())]);
        let result = XlsReader::read(Cursor::new(container("/Book", &stream)));
        assert!(matches!(result, Err(XlsError::UnsupportedVersion(_))));
    }

    #[test]
    fn test_missing_workbook_stream() {
        let stream = workbook_stream(records::BIFF8_VERSION, &[], &[(0, "Plan", Vec::new())]);
        let result = XlsReader::read(Cursor::new(container("/Data", &stream)));
        assert!(matches!(result, Err(XlsError::InvalidFormat(_))));
    }

    #[test]
    fn test_not_a_compound_file() {
        let csv = b"INSPCHAR,MSTR_CHAR\n10,KM G/G\n".to_vec();
        assert!(matches!(XlsReader::read(Cursor::new(csv)), Err(XlsError::Io(_))));
    }

    #[test]
    fn test_workbook_without_worksheet() {
        let chart = cell(records::NUMBER, 0, 0, &1f64.to_le_bytes());
        let stream = workbook_stream(records::BIFF8_VERSION, &[], &[(CHART_SHEET, "C", chart)]);
        let result = XlsReader::read(Cursor::new(container("/Workbook", &stream)));
        assert!(matches!(result, Err(XlsError::InvalidFormat(_))));
    }

    #[test]
    fn test_shared_string_out_of_bounds() {
        let cells = cell(records::LABELSST, 0, 0, &5u32.to_le_bytes());
        let stream = workbook_stream(
            records::BIFF8_VERSION,
            &sst(&["INSPCHAR"]),
            &[(records::SHEET_TYPE_WORKSHEET, "Plan", cells)],
        );
        let result = XlsReader::read(Cursor::new(container("/Workbook", &stream)));
        assert!(matches!(result, Err(XlsError::Parse(_))));
    }
}
