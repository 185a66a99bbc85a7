//! XLSX reader

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::debug;

use crate::error::{XlsxError, XlsxResult};
use formcheck_core::{CellAddress, CellValue, Sheet};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("_x") {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// Read an attribute value as an owned string
fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

/// State of the `<c>` element being read
#[derive(Default)]
struct PendingCell {
    reference: Option<String>,
    cell_type: Option<String>,
    value: Option<String>,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read the first worksheet of a file
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Sheet> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read the first worksheet from a reader
    ///
    /// The first non-empty row becomes the header row.
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Sheet> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let (name, path) = sheet_info
            .into_iter()
            .find_map(|(name, r_id)| sheet_paths.get(&r_id).map(|path| (name, path.clone())))
            .ok_or_else(|| XlsxError::InvalidFormat("Workbook contains no worksheet".into()))?;

        debug!(sheet = %name, part = %path, "reading worksheet");
        let cells = Self::read_worksheet(&mut archive, &path, &shared_strings)?;
        Ok(Sheet::from_cells(name, cells))
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        // Rich-text runs keep their surrounding spaces
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs repeat the text in another script
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => strings.push(String::new()),
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds, in tab order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    if let (Some(name), Some(r_id)) =
                        (attr_value(&e, b"name"), attr_value(&e, b"r:id"))
                    {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get worksheet part paths by relationship id
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read the non-empty cell values of a worksheet
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        shared_strings: &[String],
    ) -> XlsxResult<BTreeMap<u32, BTreeMap<u16, CellValue>>> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut cells: BTreeMap<u32, BTreeMap<u16, CellValue>> = BTreeMap::new();

        // Position used when a row or cell omits its `r` attribute
        let mut row_idx: u32 = 0;
        let mut next_col: u16 = 0;
        let mut seen_row = false;

        let mut cell = PendingCell::default();
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        row_idx = Self::row_position(&e, row_idx, seen_row);
                        seen_row = true;
                        next_col = 0;
                    }
                    b"c" => {
                        in_cell = true;
                        cell = PendingCell {
                            reference: attr_value(&e, b"r"),
                            cell_type: attr_value(&e, b"t"),
                            value: None,
                        };
                    }
                    b"v" if in_cell => in_value = true,
                    b"is" if in_cell => in_inline_str = true,
                    b"t" if in_inline_str => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        row_idx = Self::row_position(&e, row_idx, seen_row);
                        seen_row = true;
                        next_col = 0;
                    }
                    // Self-closing <c/> holds no value but still takes a column
                    b"c" => {
                        next_col = match attr_value(&e, b"r") {
                            Some(r) => CellAddress::parse(&r)?.col.saturating_add(1),
                            None => next_col.saturating_add(1),
                        };
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        let addr = match cell.reference.as_deref() {
                            Some(r) => CellAddress::parse(r)?,
                            None => CellAddress::new(row_idx, next_col),
                        };
                        next_col = addr.col.saturating_add(1);

                        let value = Self::cell_value(
                            cell.cell_type.as_deref(),
                            cell.value.as_deref(),
                            shared_strings,
                        )?;
                        if !matches!(value, CellValue::Empty) {
                            cells.entry(addr.row).or_default().insert(addr.col, value);
                        }
                        in_cell = false;
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"t" if in_inline_str => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if in_value {
                        cell.value = Some(e.unescape()?.into_owned());
                    } else if in_inline_text {
                        // Rich inline strings arrive as several runs
                        let text = e.unescape()?;
                        cell.value.get_or_insert_with(String::new).push_str(&text);
                        cell.cell_type = Some("inlineStr".to_string());
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(cells)
    }

    fn row_position(e: &BytesStart<'_>, previous: u32, seen_row: bool) -> u32 {
        attr_value(e, b"r")
            .and_then(|r| r.parse::<u32>().ok())
            .map(|r| r.saturating_sub(1)) // 1-based to 0-based
            .unwrap_or(if seen_row { previous + 1 } else { 0 })
    }

    /// Convert a raw `<c>` value according to its type attribute
    fn cell_value(
        cell_type: Option<&str>,
        value: Option<&str>,
        shared_strings: &[String],
    ) -> XlsxResult<CellValue> {
        let Some(value) = value else {
            return Ok(CellValue::Empty);
        };

        let cell_value = match cell_type {
            // Shared string
            Some("s") => {
                let idx: usize = value.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", value))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::string(s.as_str())
            }

            // Boolean
            Some("b") => CellValue::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),

            // Inline string or formula string result
            Some("inlineStr") | Some("str") => CellValue::string(decode_excel_escapes(value)),

            // Number (default type or explicit "n")
            None | Some("n") => match value.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::string(value),
            },

            // Errors and unknown types keep their text
            Some(_) => CellValue::string(value),
        };

        Ok(cell_value)
    }
}
