//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;
use formcheck_core::{CellValue, Sheet};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a sheet named after the file stem
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Sheet> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sheet1".to_string());
        let file = File::open(path)?;
        Self::read_named(file, name, options)
    }

    /// Read CSV from a reader into a sheet named `Sheet1`
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Sheet> {
        Self::read_named(reader, "Sheet1", options)
    }

    fn read_named<R: Read, S: Into<String>>(
        reader: R,
        name: S,
        options: &CsvReadOptions,
    ) -> CsvResult<Sheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut grid: Vec<Vec<CellValue>> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let row = record
                .iter()
                .map(|field| {
                    if options.auto_detect_types {
                        Self::detect_type(field)
                    } else {
                        Self::text_value(field)
                    }
                })
                .collect();
            grid.push(row);
        }

        if options.has_header {
            if grid.is_empty() {
                return Err(CsvError::MissingHeader);
            }
            return Ok(Sheet::from_grid(name, grid));
        }

        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let headers = (1..=width).map(|i| format!("Column{}", i)).collect();
        let mut sheet = Sheet::with_headers(name, headers);
        for row in grid {
            sheet.push_row(row);
        }
        Ok(sheet)
    }

    fn text_value(field: &str) -> CellValue {
        if field.is_empty() {
            CellValue::Empty
        } else {
            CellValue::string(field)
        }
    }

    /// Detect the type of a field value
    fn detect_type(field: &str) -> CellValue {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::string(field),
        }
    }
}
