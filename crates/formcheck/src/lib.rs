//! # formcheck
//!
//! Validates the formula definitions attached to the characteristics of an
//! inspection plan.
//!
//! Each characteristic of an operation may carry a formula such as
//! `C0010-C0020`, where `C0ddd` points at the characteristic with ordinal
//! position `ddd` in the same (plan group, operation) group. Five rules are
//! checked per row:
//!
//! - **KURAL1** references are well formed and match the required inputs
//! - **KURAL2** references only point backwards in the inspection sequence
//! - **KURAL3** no required input is missing, none is extra, order matches
//! - **KURAL4** ordinal positions follow 10, 20, 30, ...
//! - **KURAL5** two-input formulas stay within the computed characteristic's
//!   tolerance limits at all four boundary combinations of their inputs
//!
//! ## Example
//!
//! ```rust
//! use formcheck::prelude::*;
//!
//! let headers = ["PLAN_GROUP", "OPER_NUM", "OPER_DESC", "INSPCHAR", "MSTR_CHAR",
//!                "FORMULA_FIELD_1", "LW_TOL_LMT", "UP_TOL_LMT"];
//! let mut sheet = Sheet::with_headers("plan", headers.iter().map(|h| h.to_string()).collect());
//! sheet.push_row(vec!["5000".into(), "0010".into(), "Mix".into(), 10.into(), "KM G/G".into(),
//!                     "".into(), 10.0.into(), 12.0.into()]);
//! sheet.push_row(vec!["5000".into(), "0010".into(), "Mix".into(), 20.into(), "YAG G/G".into(),
//!                     "".into(), 3.0.into(), 4.0.into()]);
//! sheet.push_row(vec!["5000".into(), "0010".into(), "Mix".into(), 30.into(), "YKM G/G".into(),
//!                     "C0010-C0020".into(), 6.0.into(), 9.0.into()]);
//!
//! let spec = FormulaSpec::builtin();
//! let options = ValidationOptions::for_site(SiteCode::new("3101"));
//! let report = sheet.validation_report(&spec, &options).unwrap();
//!
//! let derived = &report.outcomes[2].verdict;
//! assert_eq!(derived.structural, Some(StructuralVerdict::Correct));
//! assert!(derived.boundary.as_ref().unwrap().all_favorable());
//! ```

pub mod export;
pub mod index;
pub mod ingest;
pub mod prelude;
pub mod rules;
pub mod validation;

pub use export::export_sheet;
pub use index::CharacteristicIndex;
pub use ingest::{records_from_sheet, template_sheet};
pub use rules::{
    check_boundaries, check_completeness, check_ordering, check_structure, evaluate_record,
    step_verdicts,
};
pub use validation::{
    validate_records, RecordOutcome, SheetValidationExt, ValidationReport, ValidationStats,
};

// Re-export core types
pub use formcheck_core::{
    BoundaryCheck, BoundaryNote, CaseVerdict, CellAddress, CellValue, ColumnNames,
    CompletenessReport, Error, FormulaSpec, GroupKey, InspectionRecord, Locale, OrderingVerdict,
    OutputOrder, Result, RuleVerdict, Sheet, SiteCode, SiteFormulas, StepVerdict,
    StructuralVerdict, ToleranceLimits, ValidationOptions, ORDINAL_STEP, TOLERANCE_EPSILON,
    VERDICT_COLUMNS,
};

// Re-export formula types
pub use formcheck_formula::{
    evaluate_expression, extract_references, has_malformed_token, substitute_reference,
    FormulaError, FormulaResult, ReferenceCode,
};

// Re-export I/O types
#[cfg(feature = "csv")]
pub use formcheck_csv::{CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
#[cfg(feature = "xls")]
pub use formcheck_xls::{XlsError, XlsReader};
#[cfg(feature = "xlsx")]
pub use formcheck_xlsx::{XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// Extension trait for Sheet to add file I/O
pub trait SheetExt: Sized {
    /// Open a sheet from a file, choosing the reader by extension
    ///
    /// `.xls` is read-only; saving to it is an unsupported format.
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Save the sheet to a file, choosing the writer by extension
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

impl SheetExt for Sheet {
    fn open<P: AsRef<Path>>(path: P) -> Result<Sheet> {
        let path = path.as_ref();

        match extension_of(path).as_deref() {
            #[cfg(feature = "xlsx")]
            Some("xlsx") | Some("xlsm") => {
                XlsxReader::read_file(path).map_err(|e| Error::other(e.to_string()))
            }
            #[cfg(feature = "xls")]
            Some("xls") => XlsReader::read_file(path).map_err(|e| Error::other(e.to_string())),
            #[cfg(feature = "csv")]
            Some("csv") => CsvReader::read_file(path, &CsvReadOptions::default())
                .map_err(|e| Error::other(e.to_string())),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        match extension_of(path).as_deref() {
            #[cfg(feature = "xlsx")]
            Some("xlsx") => {
                XlsxWriter::write_file(self, path).map_err(|e| Error::other(e.to_string()))
            }
            #[cfg(feature = "csv")]
            Some("csv") => CsvWriter::write_file(self, path, &CsvWriteOptions::default())
                .map_err(|e| Error::other(e.to_string())),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}
