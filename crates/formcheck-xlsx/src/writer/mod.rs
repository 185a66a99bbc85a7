//! XLSX writer

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use crate::error::XlsxResult;
use formcheck_core::{CellAddress, CellValue, Sheet};

/// Characters Excel rejects in worksheet names
const INVALID_SHEET_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a sheet to a file path
    pub fn write_file<P: AsRef<Path>>(sheet: &Sheet, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(sheet, file)
    }

    /// Write a sheet as a single-worksheet workbook
    ///
    /// The header row is written first; strings are stored inline.
    pub fn write<W: Write + Seek>(sheet: &Sheet, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);

        Self::write_content_types(&mut zip)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, sheet)?;
        Self::write_workbook_rels(&mut zip)?;
        Self::write_worksheet(&mut zip, sheet)?;

        zip.finish()?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &Sheet,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>
        <sheet name="{}" sheetId="1" r:id="rId1"/>
    </sheets>
</workbook>"#,
            Self::escape_xml(&Self::sheet_title(sheet.name()))
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &Sheet,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/worksheets/sheet1.xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <sheetData>"#,
        );

        let header: Vec<CellValue> = sheet.headers().iter().map(CellValue::string).collect();
        let rows = std::iter::once(header).chain(sheet.padded_rows());

        for (row, values) in rows.enumerate() {
            let row = row as u32;
            content.push_str(&format!("\n        <row r=\"{}\">", row + 1));

            for (col, value) in values.iter().enumerate() {
                let cell_ref = CellAddress::new(row, col as u16).to_a1_string();
                match value {
                    CellValue::Number(n) => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"><v>{}</v></c>",
                            cell_ref, n
                        ));
                    }
                    CellValue::String(s) if s.is_empty() => {}
                    CellValue::String(s) => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                            cell_ref,
                            Self::escape_xml(s)
                        ));
                    }
                    CellValue::Boolean(b) => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\" t=\"b\"><v>{}</v></c>",
                            cell_ref,
                            if *b { 1 } else { 0 }
                        ));
                    }
                    CellValue::Empty => {}
                }
            }

            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>\n</worksheet>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Worksheet name Excel accepts: no reserved characters, at most 31 chars
    fn sheet_title(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| if INVALID_SHEET_NAME_CHARS.contains(&c) { '_' } else { c })
            .take(31)
            .collect();
        if cleaned.trim().is_empty() {
            "Sheet1".to_string()
        } else {
            cleaned
        }
    }

    fn escape_xml(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XlsxReader;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_sheet_title() {
        assert_eq!(XlsxWriter::sheet_title("plan"), "plan");
        assert_eq!(XlsxWriter::sheet_title("a/b:c"), "a_b_c");
        assert_eq!(XlsxWriter::sheet_title(""), "Sheet1");
        assert_eq!(XlsxWriter::sheet_title(&"x".repeat(40)).len(), 31);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(XlsxWriter::escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_write_then_read() {
        let mut sheet =
            Sheet::with_headers("Sonuç", vec!["INSPCHAR".into(), "KURAL5_NOTE".into()]);
        sheet.push_row(vec![CellValue::Number(10.0), CellValue::string("a < b & c")]);
        sheet.push_row(vec![CellValue::Number(2.5), CellValue::Boolean(false)]);

        let mut buf = Cursor::new(Vec::new());
        XlsxWriter::write(&sheet, &mut buf).unwrap();
        buf.set_position(0);

        let read = XlsxReader::read(buf).unwrap();
        assert_eq!(read, sheet);
    }
}
