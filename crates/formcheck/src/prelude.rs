//! Prelude module - common imports for formcheck users
//!
//! ```rust
//! use formcheck::prelude::*;
//! ```

pub use crate::{
    // Verdict types
    BoundaryCheck,
    CaseVerdict,
    // Input types
    CellValue,
    ColumnNames,
    CompletenessReport,

    // Error types
    Error,
    FormulaSpec,
    InspectionRecord,
    Locale,
    OrderingVerdict,
    OutputOrder,
    Result,
    RuleVerdict,
    Sheet,
    // Extension traits
    SheetExt,
    SheetValidationExt,

    SiteCode,
    StepVerdict,
    StructuralVerdict,
    ValidationOptions,
    ValidationReport,
};
