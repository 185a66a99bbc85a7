//! # formcheck-xlsx
//!
//! XLSX (Office Open XML) reader and writer for formcheck sheets.
//!
//! Only cell values are handled: the reader loads the first worksheet
//! (shared strings, inline strings, numbers, booleans and cached formula
//! results) and the writer emits a single worksheet without styles.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
