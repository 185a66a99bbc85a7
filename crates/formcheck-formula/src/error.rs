//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during reference parsing or expression evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Expression contains a character outside the arithmetic allow-list
    #[error("Invalid expression: disallowed character '{0}'")]
    InvalidExpression(char),

    /// Expression uses only allowed characters but does not parse
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    /// Expression parses but cannot be computed (division by zero, overflow)
    #[error("Arithmetic error: {0}")]
    ArithmeticError(String),

    /// Text is not a `C0ddd` reference code
    #[error("Invalid reference code: {0}")]
    InvalidReference(String),
}
