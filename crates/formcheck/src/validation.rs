//! Run orchestration: grouping, per-group indexing and rule evaluation
//!
//! # Example
//!
//! ```rust
//! use formcheck::prelude::*;
//! use formcheck::validate_records;
//!
//! let records: Vec<InspectionRecord> = Vec::new();
//! let report = validate_records(&records, &FormulaSpec::builtin(), &ValidationOptions::default());
//! assert_eq!(report.stats.records, 0);
//! ```

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::export::export_sheet;
use crate::index::CharacteristicIndex;
use crate::ingest::records_from_sheet;
use crate::rules::{evaluate_record, step_verdicts};
use formcheck_core::{
    CaseVerdict, FormulaSpec, GroupKey, InspectionRecord, OrderingVerdict, OutputOrder, Result,
    RuleVerdict, Sheet, StepVerdict, StructuralVerdict, ValidationOptions,
};

/// Statistics from a validation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationStats {
    /// Number of records validated
    pub records: usize,
    /// Number of (plan group, operation) groups
    pub groups: usize,
    /// Records whose characteristic has a specification entry
    pub checked: usize,
    /// KURAL1 failures
    pub structural_errors: usize,
    /// KURAL2 failures
    pub ordering_violations: usize,
    /// KURAL3 reports other than correct
    pub completeness_issues: usize,
    /// KURAL4 failures
    pub step_errors: usize,
    /// KURAL5 cases outside the computed characteristic's limits
    pub unfavorable_cases: usize,
    /// KURAL5 cases that could not be evaluated
    pub missing_data_cases: usize,
}

impl ValidationStats {
    fn count(&mut self, verdict: &RuleVerdict) {
        if verdict.structural.is_some() {
            self.checked += 1;
        }
        if matches!(
            verdict.structural,
            Some(StructuralVerdict::MalformedReference | StructuralVerdict::Expected(_))
        ) {
            self.structural_errors += 1;
        }
        if verdict.ordering == Some(OrderingVerdict::NonCompliant) {
            self.ordering_violations += 1;
        }
        if verdict.completeness.as_ref().is_some_and(|c| !c.is_correct()) {
            self.completeness_issues += 1;
        }
        if verdict.step == StepVerdict::IncorrectStep {
            self.step_errors += 1;
        }
        if let Some(boundary) = &verdict.boundary {
            for case in &boundary.cases {
                match case {
                    CaseVerdict::Unfavorable => self.unfavorable_cases += 1,
                    CaseVerdict::MissingData => self.missing_data_cases += 1,
                    _ => {}
                }
            }
        }
    }
}

/// Verdict for one input record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    /// Source data row of the record
    pub row: usize,
    pub group: GroupKey,
    pub verdict: RuleVerdict,
}

/// Result of a validation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// One outcome per record, in the requested [`OutputOrder`]
    pub outcomes: Vec<RecordOutcome>,
    pub stats: ValidationStats,
}

/// Validate records against the site's formula specification
///
/// Records are grouped by (plan group, operation); each group is
/// stable-sorted by ordinal and gets its own [`CharacteristicIndex`]. An
/// unknown site is not an error: every record then only gets its step
/// verdict.
pub fn validate_records(
    records: &[InspectionRecord],
    spec: &FormulaSpec,
    options: &ValidationOptions,
) -> ValidationReport {
    let site = spec.site(&options.site);
    if site.is_none() {
        warn!(site = %options.site, "unknown site code, only KURAL4 is checked");
    }

    let mut groups: BTreeMap<GroupKey, Vec<&InspectionRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.group_key()).or_default().push(record);
    }

    let mut stats = ValidationStats {
        records: records.len(),
        groups: groups.len(),
        ..Default::default()
    };
    let mut outcomes = Vec::with_capacity(records.len());

    for (key, mut group) in groups {
        group.sort_by_key(|record| record.ordinal);

        let ordinals: Vec<u32> = group.iter().map(|record| record.ordinal).collect();
        let steps = step_verdicts(&ordinals);
        let index = CharacteristicIndex::build(&group);
        debug!(
            group = %key,
            records = group.len(),
            positions = index.len(),
            "validating group"
        );

        for (record, step) in group.iter().zip(steps) {
            let required =
                site.and_then(|formulas| formulas.required_inputs(&record.characteristic));
            let verdict = evaluate_record(record, step, required, &index);
            stats.count(&verdict);
            outcomes.push(RecordOutcome {
                row: record.row,
                group: key.clone(),
                verdict,
            });
        }
    }

    if options.output_order == OutputOrder::Input {
        outcomes.sort_by_key(|outcome| outcome.row);
    }

    info!(
        site = %options.site,
        records = stats.records,
        groups = stats.groups,
        checked = stats.checked,
        structural_errors = stats.structural_errors,
        ordering_violations = stats.ordering_violations,
        completeness_issues = stats.completeness_issues,
        step_errors = stats.step_errors,
        unfavorable_cases = stats.unfavorable_cases,
        missing_data_cases = stats.missing_data_cases,
        "validation finished"
    );

    ValidationReport { outcomes, stats }
}

/// Extension trait for Sheet to add validation methods
pub trait SheetValidationExt {
    /// Read the sheet's records and validate them
    fn validation_report(&self, spec: &FormulaSpec, options: &ValidationOptions)
        -> Result<ValidationReport>;

    /// Validate the sheet and return it with the verdict columns appended
    fn validate(&self, spec: &FormulaSpec, options: &ValidationOptions) -> Result<Sheet>;
}

impl SheetValidationExt for Sheet {
    fn validation_report(
        &self,
        spec: &FormulaSpec,
        options: &ValidationOptions,
    ) -> Result<ValidationReport> {
        let records = records_from_sheet(self, &options.columns)?;
        Ok(validate_records(&records, spec, options))
    }

    fn validate(&self, spec: &FormulaSpec, options: &ValidationOptions) -> Result<Sheet> {
        let report = self.validation_report(spec, options)?;
        Ok(export_sheet(self, &report, options.locale))
    }
}
