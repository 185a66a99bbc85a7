//! # formcheck-core
//!
//! Core data structures for the formcheck inspection-plan validator.
//!
//! This crate provides the fundamental types used throughout formcheck:
//! - [`CellValue`] and [`Sheet`] - The tabular form that ingestion and export exchange
//! - [`InspectionRecord`] and [`GroupKey`] - One row of an inspection plan and its group
//! - [`FormulaSpec`] - The per-site table of required formula inputs
//! - [`RuleVerdict`] - The per-record outcome of the five rules
//! - [`ValidationOptions`] - Run configuration (site, column names, locale, output order)
//!
//! ## Example
//!
//! ```rust
//! use formcheck_core::{FormulaSpec, SiteCode};
//!
//! let spec = FormulaSpec::builtin();
//! let site = spec.site(&SiteCode::new("3101")).unwrap();
//! assert_eq!(
//!     site.required_inputs("KMT"),
//!     Some(&["TUZ".to_string(), "KM G/G".to_string()][..])
//! );
//! ```

pub mod cell;
pub mod error;
pub mod options;
pub mod record;
pub mod sheet;
pub mod spec;
pub mod verdict;

// Re-exports for convenience
pub use cell::{CellAddress, CellValue};
pub use error::{Error, Result};
pub use options::{ColumnNames, OutputOrder, ValidationOptions};
pub use record::{GroupKey, InspectionRecord, ToleranceLimits, TOLERANCE_EPSILON};
pub use sheet::Sheet;
pub use spec::{FormulaSpec, SiteCode, SiteFormulas};
pub use verdict::{
    BoundaryCheck, BoundaryNote, CaseVerdict, CompletenessReport, Locale, OrderingVerdict,
    RuleVerdict, StepVerdict, StructuralVerdict, VERDICT_COLUMNS,
};

/// Spacing between consecutive ordinal positions in a well-numbered group
pub const ORDINAL_STEP: u32 = 10;
