//! Errors raised while reading or writing xlsx packages

use thiserror::Error;

/// Result alias for the xlsx reader and writer
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The package is readable but not a workbook we understand
    #[error("not a usable xlsx workbook: {0}")]
    InvalidFormat(String),

    /// A part referenced by the package is absent
    #[error("xlsx part not found: {0}")]
    MissingPart(String),

    /// A cell or index value could not be decoded
    #[error("invalid cell data: {0}")]
    Parse(String),

    /// Cell reference errors from the core types
    #[error(transparent)]
    Core(#[from] formcheck_core::Error),
}
