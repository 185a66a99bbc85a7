//! Error types for formcheck-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or loading formcheck data
#[derive(Debug, Error)]
pub enum Error {
    /// Required input columns are absent
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Ordinal position cell cannot be read as a non-negative integer
    #[error("Invalid ordinal position in data row {row}: '{value}'")]
    InvalidOrdinal { row: usize, value: String },

    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// File extension not handled by any reader/writer
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Formula specification document could not be decoded
    #[error("Invalid formula specification: {0}")]
    Spec(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
