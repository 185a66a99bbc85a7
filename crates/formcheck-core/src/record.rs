//! Inspection plan records

use std::fmt;

/// Tolerance used when comparing a computed value against a limit
pub const TOLERANCE_EPSILON: f64 = 1e-9;

/// Identity of an inspection group: plan group id plus operation number
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub plan_group: String,
    pub operation: String,
}

impl GroupKey {
    pub fn new<P: Into<String>, O: Into<String>>(plan_group: P, operation: O) -> Self {
        Self {
            plan_group: plan_group.into(),
            operation: operation.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.plan_group, self.operation)
    }
}

/// Declared lower and upper tolerance limits of a characteristic
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToleranceLimits {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl ToleranceLimits {
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    /// True when neither bound is declared
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Test a value against the declared bounds with [`TOLERANCE_EPSILON`] slack
    ///
    /// Only the bounds that are present are enforced. Returns `None` when
    /// no bound is declared, since the test has nothing to check.
    pub fn contains(&self, value: f64) -> Option<bool> {
        match (self.lower, self.upper) {
            (None, None) => None,
            (Some(low), Some(up)) => {
                Some(value >= low - TOLERANCE_EPSILON && value <= up + TOLERANCE_EPSILON)
            }
            (Some(low), None) => Some(value >= low - TOLERANCE_EPSILON),
            (None, Some(up)) => Some(value <= up + TOLERANCE_EPSILON),
        }
    }
}

/// One row of an inspection plan
///
/// Records are built once from the input sheet and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionRecord {
    /// Index of the source data row (0-based, header excluded)
    pub row: usize,
    pub plan_group: String,
    pub operation: String,
    pub operation_description: String,
    /// Ordinal position within the group (inspection sequence number)
    pub ordinal: u32,
    /// Characteristic name, the key used by the formula specification
    pub characteristic: String,
    /// Formula text, trimmed; empty when the characteristic is not computed
    pub formula: String,
    pub limits: ToleranceLimits,
}

impl InspectionRecord {
    /// Key of the group this record belongs to
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(self.plan_group.clone(), self.operation.clone())
    }

    /// True when the record carries a formula
    pub fn has_formula(&self) -> bool {
        !self.formula.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_both_bounds() {
        let limits = ToleranceLimits::new(Some(3.0), Some(9.0));
        assert_eq!(limits.contains(3.0), Some(true));
        assert_eq!(limits.contains(9.0), Some(true));
        assert_eq!(limits.contains(9.0 + 1e-10), Some(true));
        assert_eq!(limits.contains(9.1), Some(false));
        assert_eq!(limits.contains(2.9), Some(false));
    }

    #[test]
    fn test_contains_single_bound() {
        let lower_only = ToleranceLimits::new(Some(1.0), None);
        assert_eq!(lower_only.contains(1000.0), Some(true));
        assert_eq!(lower_only.contains(0.5), Some(false));

        let upper_only = ToleranceLimits::new(None, Some(1.0));
        assert_eq!(upper_only.contains(-1000.0), Some(true));
        assert_eq!(upper_only.contains(1.5), Some(false));
    }

    #[test]
    fn test_contains_unbounded() {
        let limits = ToleranceLimits::default();
        assert!(limits.is_unbounded());
        assert_eq!(limits.contains(0.0), None);
    }

    #[test]
    fn test_group_key_ordering() {
        let a = GroupKey::new("5000", "0010");
        let b = GroupKey::new("5000", "0020");
        assert!(a < b);
        assert_eq!(a.to_string(), "5000/0010");
    }
}
