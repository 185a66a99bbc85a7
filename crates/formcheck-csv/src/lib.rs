//! # formcheck-csv
//!
//! CSV reader and writer for formcheck sheets.

mod reader;
mod writer;
mod options;
mod error;

pub use reader::CsvReader;
pub use writer::CsvWriter;
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use error::{CsvError, CsvResult};
