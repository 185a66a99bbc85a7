//! Tabular sheet: a header row plus data rows

use std::collections::BTreeMap;

use crate::cell::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// A single table of cells with named columns
///
/// This is the shape ingestion hands to the validator and export receives
/// back. Rows may be ragged; missing trailing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create an empty sheet with the given column headers
    pub fn with_headers<S: Into<String>>(name: S, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a sheet from a raw grid, taking the first row as headers
    ///
    /// Header cells are trimmed. An empty grid gives a sheet without columns.
    pub fn from_grid<S: Into<String>>(name: S, grid: Vec<Vec<CellValue>>) -> Self {
        let mut rows = grid.into_iter();
        let headers = rows
            .next()
            .map(|header| header.iter().map(CellValue::to_text).collect())
            .unwrap_or_default();

        Self {
            name: name.into(),
            headers,
            rows: rows.collect(),
        }
    }

    /// Build a sheet from sparse cells keyed by zero-based row, then column
    ///
    /// Leading empty rows are dropped; the first stored row becomes the
    /// header row. Gaps between rows stay as empty rows.
    pub fn from_cells<S: Into<String>>(
        name: S,
        cells: BTreeMap<u32, BTreeMap<u16, CellValue>>,
    ) -> Self {
        let (Some(first), Some(last)) = (
            cells.keys().next().copied(),
            cells.keys().next_back().copied(),
        ) else {
            return Self::from_grid(name, Vec::new());
        };

        let mut grid = vec![Vec::new(); (last - first + 1) as usize];
        for (row, values) in cells {
            let width = values.keys().next_back().map_or(0, |c| *c as usize + 1);
            let mut dense = vec![CellValue::Empty; width];
            for (col, value) in values {
                dense[col as usize] = value;
            }
            grid[(row - first) as usize] = dense;
        }
        Self::from_grid(name, grid)
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column headers in order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows (excluding the header row)
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Find a column by its exact header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get a cell value; out-of-range cells read as empty
    pub fn value(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Append a data row
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Append a column header; existing rows read the new column as empty
    pub fn push_column<S: Into<String>>(&mut self, header: S) -> usize {
        self.headers.push(header.into());
        self.headers.len() - 1
    }

    /// Iterate rows padded to the header width
    pub fn padded_rows(&self) -> impl Iterator<Item = Vec<CellValue>> + '_ {
        let width = self.column_count();
        self.rows.iter().map(move |row| {
            let mut row = row.clone();
            if row.len() < width {
                row.resize(width, CellValue::Empty);
            }
            row
        })
    }
}
