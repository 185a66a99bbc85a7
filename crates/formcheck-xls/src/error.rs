//! XLS error types

use thiserror::Error;

/// Result type for XLS operations
pub type XlsResult<T> = std::result::Result<T, XlsError>;

/// Errors that can occur while reading an XLS file
#[derive(Debug, Error)]
pub enum XlsError {
    /// IO error (also covers CFB errors which use std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The container or stream is not an xls workbook
    #[error("Invalid XLS format: {0}")]
    InvalidFormat(String),

    /// BIFF versions other than BIFF8
    #[error("Unsupported XLS version: {0}")]
    UnsupportedVersion(String),

    /// A record body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}
