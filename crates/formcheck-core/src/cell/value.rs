//! Cell value types

use std::fmt;

/// Represents the value stored in one cell of an input or output sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value
    Number(f64),

    /// String value
    String(String),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the cell is empty
    ///
    /// Whitespace-only strings count as empty, the way spreadsheet
    /// exports leave padded blank cells behind.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Boolean(true) => Some(1.0),
            CellValue::Boolean(false) => Some(0.0),
            _ => None,
        }
    }

    /// Coerce the value to a finite number, parsing numeric text
    ///
    /// Returns `None` for empty cells, non-numeric text and NaN/infinite values.
    pub fn coerce_number(&self) -> Option<f64> {
        let n = match self {
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            other => other.as_number()?,
        };
        n.is_finite().then_some(n)
    }

    /// Coerce the value to a non-negative integer
    ///
    /// Accepts integral numbers and text holding an integral number.
    pub fn coerce_integer(&self) -> Option<u32> {
        let n = match self {
            CellValue::Boolean(_) | CellValue::Empty => return None,
            other => other.coerce_number()?,
        };
        if n.fract() != 0.0 || n < 0.0 || n > u32::MAX as f64 {
            return None;
        }
        Some(n as u32)
    }

    /// Get the value as trimmed display text (empty cells give an empty string)
    pub fn to_text(&self) -> String {
        self.to_string().trim().to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(n: Option<f64>) -> Self {
        n.map_or(CellValue::Empty, CellValue::Number)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_conversions() {
        assert_eq!(CellValue::from(42), CellValue::Number(42.0));
        assert_eq!(CellValue::from(3.5), CellValue::Number(3.5));
        assert_eq!(CellValue::from(true), CellValue::Boolean(true));
        assert_eq!(CellValue::from(None::<f64>), CellValue::Empty);

        assert_eq!(CellValue::from("hello"), CellValue::String("hello".into()));
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(CellValue::Number(4.5).coerce_number(), Some(4.5));
        assert_eq!(CellValue::string(" 2.25 ").coerce_number(), Some(2.25));
        assert_eq!(CellValue::string("abc").coerce_number(), None);
        assert_eq!(CellValue::string("NaN").coerce_number(), None);
        assert_eq!(CellValue::Number(f64::NAN).coerce_number(), None);
        assert_eq!(CellValue::Empty.coerce_number(), None);
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(CellValue::Number(10.0).coerce_integer(), Some(10));
        assert_eq!(CellValue::string("30").coerce_integer(), Some(30));
        assert_eq!(CellValue::string("20.0").coerce_integer(), Some(20));
        assert_eq!(CellValue::Number(10.5).coerce_integer(), None);
        assert_eq!(CellValue::Number(-10.0).coerce_integer(), None);
        assert_eq!(CellValue::Boolean(true).coerce_integer(), None);
        assert_eq!(CellValue::Empty.coerce_integer(), None);
    }

    #[test]
    fn test_display_integral_numbers() {
        assert_eq!(CellValue::Number(3101.0).to_string(), "3101");
        assert_eq!(CellValue::Number(0.25).to_string(), "0.25");
        assert_eq!(CellValue::string("  KM G/G ").to_text(), "KM G/G");
        assert!(CellValue::string("   ").is_empty());
    }
}
