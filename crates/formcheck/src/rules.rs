//! The five formula rules
//!
//! Each rule looks at one record in the context of its group. The group is
//! represented by its [`CharacteristicIndex`]; the formula specification
//! contributes the required input names of the record's characteristic.

use ahash::AHashSet;
use tracing::trace;

use crate::index::CharacteristicIndex;
use formcheck_core::{
    BoundaryCheck, BoundaryNote, CaseVerdict, CompletenessReport, InspectionRecord,
    OrderingVerdict, RuleVerdict, StepVerdict, StructuralVerdict, ToleranceLimits, ORDINAL_STEP,
};
use formcheck_formula::{
    evaluate_expression, extract_references, has_malformed_token, substitute_reference,
    ReferenceCode,
};

/// Run every rule for one record
///
/// `required` is the specification entry for the record's characteristic.
/// Without one, only the step verdict (computed over the whole group by
/// [`step_verdicts`]) is reported.
pub fn evaluate_record(
    record: &InspectionRecord,
    step: StepVerdict,
    required: Option<&[String]>,
    index: &CharacteristicIndex<'_>,
) -> RuleVerdict {
    let Some(required) = required else {
        return RuleVerdict::step_only(step);
    };

    RuleVerdict {
        structural: Some(check_structure(&record.formula, required, index)),
        ordering: Some(check_ordering(&record.formula, record.ordinal)),
        completeness: Some(check_completeness(&record.formula, required, index)),
        step,
        boundary: check_boundaries(record, index),
    }
}

/// KURAL1: references are well formed and match the required inputs
///
/// Required names missing from the group are left out of the expectation.
/// References match when they form the same set with the same count.
pub fn check_structure(
    formula: &str,
    required: &[String],
    index: &CharacteristicIndex<'_>,
) -> StructuralVerdict {
    if has_malformed_token(formula) {
        return StructuralVerdict::MalformedReference;
    }

    let expected: Vec<ReferenceCode> = required
        .iter()
        .filter_map(|name| index.name_to_ordinal(name))
        .map(ReferenceCode::from_ordinal)
        .collect();
    let found = extract_references(formula);

    let found_set: AHashSet<&ReferenceCode> = found.iter().collect();
    let expected_set: AHashSet<&ReferenceCode> = expected.iter().collect();
    let same_set = found_set.len() == expected_set.len() && found_set.is_subset(&expected_set);
    if same_set && found.len() == expected.len() {
        StructuralVerdict::Correct
    } else {
        StructuralVerdict::Expected(expected.iter().map(ToString::to_string).collect())
    }
}

/// KURAL2: no reference points past the record's own ordinal position
pub fn check_ordering(formula: &str, ordinal: u32) -> OrderingVerdict {
    let latest = extract_references(formula)
        .iter()
        .map(ReferenceCode::ordinal)
        .max();

    match latest {
        Some(latest) if latest > ordinal => OrderingVerdict::NonCompliant,
        _ => OrderingVerdict::Compliant,
    }
}

/// KURAL3: referenced characteristics against the required ones
///
/// References are resolved to names through the index; unresolved ones
/// become empty names that never count as extra but still take part in the
/// sequence comparison.
pub fn check_completeness(
    formula: &str,
    required: &[String],
    index: &CharacteristicIndex<'_>,
) -> CompletenessReport {
    let resolved: Vec<&str> = extract_references(formula)
        .iter()
        .map(|code| index.ordinal_to_name(code.ordinal()).unwrap_or(""))
        .collect();

    let missing = required
        .iter()
        .filter(|name| !resolved.contains(&name.as_str()))
        .cloned()
        .collect();
    let extra = resolved
        .iter()
        .filter(|name| !name.is_empty() && !required.iter().any(|r| r == *name))
        .map(|name| name.to_string())
        .collect();
    let sequence_error = !resolved.is_empty()
        && (resolved.len() != required.len()
            || resolved.iter().zip(required).any(|(got, want)| *got != want.as_str()));

    CompletenessReport {
        missing,
        extra,
        sequence_error,
    }
}

/// KURAL4: step verdicts for a group's ordinals in sorted order
///
/// The i-th ordinal (0-based) must equal `10 * (i + 1)`.
pub fn step_verdicts(ordinals: &[u32]) -> Vec<StepVerdict> {
    ordinals
        .iter()
        .enumerate()
        .map(|(i, &ordinal)| {
            let expected = u64::from(ORDINAL_STEP) * (i as u64 + 1);
            if u64::from(ordinal) == expected {
                StepVerdict::Correct
            } else {
                StepVerdict::IncorrectStep
            }
        })
        .collect()
}

/// KURAL5: tolerance consistency of a two-input formula
///
/// Returns `None` for records without a formula. Otherwise the formula is
/// evaluated with its inputs at each combination of their lower and upper
/// limits, and each result is tested against the record's own limits.
pub fn check_boundaries(
    record: &InspectionRecord,
    index: &CharacteristicIndex<'_>,
) -> Option<BoundaryCheck> {
    if !record.has_formula() {
        return None;
    }

    let refs = extract_references(&record.formula);
    let [a, b] = refs.as_slice() else {
        let found = refs.len();
        return Some(BoundaryCheck::uniform(
            CaseVerdict::Unsupported { found },
            Some(BoundaryNote::Unsupported { found }),
        ));
    };

    let own = record.limits;
    if own.is_unbounded() {
        return Some(BoundaryCheck::uniform(CaseVerdict::NoToleranceLimit, None));
    }

    let (Some(a_name), Some(b_name)) = (
        index.ordinal_to_name(a.ordinal()),
        index.ordinal_to_name(b.ordinal()),
    ) else {
        return Some(BoundaryCheck::uniform(
            CaseVerdict::MissingData,
            Some(BoundaryNote::CharacteristicNotFound),
        ));
    };

    let a_limits = index.limits(a_name);
    let b_limits = index.limits(b_name);
    let combinations = [
        (a_limits.lower, b_limits.lower),
        (a_limits.lower, b_limits.upper),
        (a_limits.upper, b_limits.lower),
        (a_limits.upper, b_limits.upper),
    ];

    let cases = combinations
        .map(|(a_value, b_value)| boundary_case(&record.formula, (a, a_value), (b, b_value), own));

    Some(BoundaryCheck { cases, note: None })
}

fn boundary_case(
    formula: &str,
    (a, a_value): (&ReferenceCode, Option<f64>),
    (b, b_value): (&ReferenceCode, Option<f64>),
    own: ToleranceLimits,
) -> CaseVerdict {
    let (Some(a_value), Some(b_value)) = (a_value, b_value) else {
        return CaseVerdict::MissingData;
    };

    let expression = substitute_reference(formula, a, a_value);
    let expression = substitute_reference(&expression, b, b_value);
    if !extract_references(&expression).is_empty() {
        return CaseVerdict::MissingData;
    }

    match evaluate_expression(&expression) {
        Ok(value) => match own.contains(value) {
            Some(true) => CaseVerdict::Favorable,
            Some(false) => CaseVerdict::Unfavorable,
            None => CaseVerdict::NoToleranceLimit,
        },
        Err(err) => {
            trace!(%expression, error = %err, "boundary expression not evaluable");
            CaseVerdict::MissingData
        }
    }
}
