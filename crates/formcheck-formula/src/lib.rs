//! # formcheck-formula
//!
//! Formula handling for formcheck.
//!
//! This crate provides:
//! - Reference extraction (`C0ddd` codes) and malformed-token detection
//! - Whole-token substitution of reference codes by numeric values
//! - A restricted arithmetic parser and evaluator (`+ - * /`, parentheses,
//!   decimal literals; nothing else)
//!
//! ## Example
//!
//! ```rust
//! use formcheck_formula::{evaluate_expression, extract_references, substitute_reference};
//!
//! let refs = extract_references("C0010-C0020");
//! assert_eq!(refs.len(), 2);
//!
//! let expr = substitute_reference("C0010-C0020", &refs[0], 5.0);
//! let expr = substitute_reference(&expr, &refs[1], 1.0);
//! assert_eq!(evaluate_expression(&expr).unwrap(), 4.0);
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod reference;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_expression};
pub use parser::{parse_expression, MAX_DEPTH, MAX_OPERATORS};
pub use reference::{extract_references, has_malformed_token, substitute_reference, ReferenceCode};
