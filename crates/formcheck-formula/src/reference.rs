//! Reference codes: `C0ddd` tokens that point at a characteristic's ordinal position
//!
//! Formulas mix reference codes with arithmetic. A code is a capital `C`, a
//! literal `0` and three ASCII digits; the digits are the ordinal position of
//! the referenced characteristic within its inspection group. Five-character
//! words that start with `C` but do not follow that grammar are malformed.

use std::fmt;
use std::str::FromStr;

use lazy_regex::regex;
use regex::Captures;

use crate::error::{FormulaError, FormulaResult};

/// A `C0ddd` reference to the characteristic at ordinal position `ddd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceCode {
    ordinal: u32,
}

impl ReferenceCode {
    /// Reference to the characteristic at the given ordinal position
    ///
    /// Ordinals above 999 format as `C1000` and up, which is outside the
    /// reference grammar; such codes can be expected but never extracted.
    pub fn from_ordinal(ordinal: u32) -> Self {
        Self { ordinal }
    }

    /// Parse a complete `C0ddd` token
    pub fn parse(text: &str) -> FormulaResult<Self> {
        if !is_reference_code(text) {
            return Err(FormulaError::InvalidReference(text.to_string()));
        }
        Ok(Self::from_digits(&text[2..]))
    }

    /// Ordinal position encoded by the code
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    // Caller guarantees ASCII digits only
    fn from_digits(digits: &str) -> Self {
        let ordinal = digits
            .bytes()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
        Self { ordinal }
    }
}

impl fmt::Display for ReferenceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{:04}", self.ordinal)
    }
}

impl FromStr for ReferenceCode {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// True when `text` is exactly one well-formed reference code
fn is_reference_code(text: &str) -> bool {
    regex!(r"^C0[0-9]{3}$").is_match(text)
}

/// Extract every reference code from a formula, left to right
///
/// Duplicates are preserved. Matches do not overlap, and a code may sit
/// directly against other text (`C0010C0020` yields two codes).
pub fn extract_references(formula: &str) -> Vec<ReferenceCode> {
    regex!(r"C0[0-9]{3}")
        .find_iter(formula)
        .map(|m| ReferenceCode::from_digits(&m.as_str()[2..]))
        .collect()
}

/// True when the formula holds a reference-shaped token that is not a valid code
///
/// A reference-shaped token is `C` followed by four word characters. Text
/// that never takes that shape (`KM G/G`, `C12`) is ignored.
pub fn has_malformed_token(formula: &str) -> bool {
    regex!(r"C\w{4}")
        .find_iter(formula)
        .any(|m| !is_reference_code(m.as_str()))
}

/// Replace whole-token occurrences of `code` by the decimal rendering of `value`
///
/// Occurrences glued to other word characters (`C00100`, `XC0010`) are left
/// untouched, as are other codes.
pub fn substitute_reference(formula: &str, code: &ReferenceCode, value: f64) -> String {
    let target = code.to_string();
    let replacement = value.to_string();

    regex!(r"\bC0[0-9]{3}\b")
        .replace_all(formula, |caps: &Captures| {
            if caps[0] == target {
                replacement.clone()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
