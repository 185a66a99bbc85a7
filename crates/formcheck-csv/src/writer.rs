//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use formcheck_core::Sheet;

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a sheet to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        sheet: &Sheet,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(sheet, file, options)
    }

    /// Write a sheet to a writer
    ///
    /// Rows are padded to the header width; cells use their text rendering.
    pub fn write<W: Write>(sheet: &Sheet, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .flexible(true)
            .from_writer(writer);

        if options.write_header {
            csv_writer.write_record(sheet.headers())?;
        }

        for row in sheet.padded_rows() {
            let record: Vec<String> = row.iter().map(ToString::to_string).collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcheck_core::CellValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_lf() {
        let mut sheet = Sheet::with_headers("Sheet1", vec!["A".into(), "B".into()]);
        sheet.push_row(vec![CellValue::Number(10.0), CellValue::string("x, y")]);
        sheet.push_row(vec![CellValue::Number(2.5)]);

        let options = CsvWriteOptions {
            line_terminator: LineTerminator::LF,
            ..Default::default()
        };
        let mut out = Vec::new();
        CsvWriter::write(&sheet, &mut out, &options).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "A,B\n10,\"x, y\"\n2.5,\n");
    }

    #[test]
    fn test_write_without_header() {
        let mut sheet = Sheet::with_headers("Sheet1", vec!["A".into()]);
        sheet.push_row(vec![CellValue::Boolean(true)]);

        let options = CsvWriteOptions {
            write_header: false,
            ..Default::default()
        };
        let mut out = Vec::new();
        CsvWriter::write(&sheet, &mut out, &options).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "TRUE\r\n");
    }
}
