//! # formcheck-xls
//!
//! Reader for the legacy Excel binary format (.xls, BIFF8).
//!
//! Only cell values of the first worksheet are loaded: shared and inline
//! strings, numbers, booleans and cached formula results. Styles, charts
//! and other sheets are skipped.

pub mod biff;
pub mod error;
pub mod reader;

pub use error::{XlsError, XlsResult};
pub use reader::XlsReader;
