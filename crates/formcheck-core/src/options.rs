//! Validation run options

use crate::spec::SiteCode;
use crate::verdict::Locale;

/// Names of the input columns the validator reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub plan_group: String,
    pub operation: String,
    pub operation_description: String,
    pub ordinal: String,
    pub characteristic: String,
    pub formula: String,
    /// Optional column holding the lower tolerance limit
    pub lower_limit: String,
    /// Optional column holding the upper tolerance limit
    pub upper_limit: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            plan_group: "PLAN_GROUP".into(),
            operation: "OPER_NUM".into(),
            operation_description: "OPER_DESC".into(),
            ordinal: "INSPCHAR".into(),
            characteristic: "MSTR_CHAR".into(),
            formula: "FORMULA_FIELD_1".into(),
            lower_limit: "LW_TOL_LMT".into(),
            upper_limit: "UP_TOL_LMT".into(),
        }
    }
}

impl ColumnNames {
    /// Columns that must be present for a run to start
    pub fn required(&self) -> [&str; 6] {
        [
            &self.plan_group,
            &self.operation,
            &self.operation_description,
            &self.ordinal,
            &self.characteristic,
            &self.formula,
        ]
    }

    /// Every column, in input template order
    pub fn all(&self) -> [&str; 8] {
        let [a, b, c, d, e, f] = self.required();
        [a, b, c, d, e, f, &self.lower_limit, &self.upper_limit]
    }
}

/// Order of the rows in the result table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputOrder {
    /// Same order as the input rows
    #[default]
    Input,
    /// Group by (plan group, operation) in ascending key order, each group
    /// sorted by ordinal position
    Grouped,
}

/// Options for a validation run
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Site whose formula specification applies
    pub site: SiteCode,
    /// Input column names
    pub columns: ColumnNames,
    /// Language of verdict strings in the output
    pub locale: Locale,
    /// Row order of the output
    pub output_order: OutputOrder,
}

impl ValidationOptions {
    /// Options for a site with every other setting at its default
    pub fn for_site(site: SiteCode) -> Self {
        Self {
            site,
            ..Default::default()
        }
    }
}
