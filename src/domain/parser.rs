//! Commit parsing: turning an edit buffer into cell content.
//!
//! The rules, in order:
//!
//! 1. A buffer starting with `=` is a formula. It is stored verbatim as both
//!    the formula and the value; nothing is evaluated.
//! 2. A buffer whose trimmed text parses completely as a finite number is
//!    stored as that number.
//! 3. Anything else, including the empty buffer, is stored as text.

use super::models::CellValue;

/// Parsed content ready to be written into a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellContent {
    pub value: CellValue,
    pub formula: Option<String>,
}

impl CellContent {
    /// Applies the commit rule to a buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridentry::domain::{CellContent, CellValue};
    ///
    /// assert_eq!(CellContent::parse("42").value, CellValue::Number(42.0));
    /// assert_eq!(CellContent::parse("42a").value, CellValue::Text("42a".into()));
    ///
    /// let formula = CellContent::parse("=A1+B1");
    /// assert_eq!(formula.formula.as_deref(), Some("=A1+B1"));
    /// assert_eq!(formula.value, CellValue::Text("=A1+B1".into()));
    /// ```
    pub fn parse(buffer: &str) -> Self {
        if buffer.starts_with('=') {
            return Self {
                value: CellValue::Text(buffer.to_string()),
                formula: Some(buffer.to_string()),
            };
        }

        match parse_number(buffer) {
            Some(n) => Self {
                value: CellValue::Number(n),
                formula: None,
            },
            None => Self {
                value: CellValue::Text(buffer.to_string()),
                formula: None,
            },
        }
    }
}

/// Accepts the same literals as a full-string `parseFloat`: optional sign,
/// digits with an optional fraction, an optional exponent. Rejects the
/// `inf`/`nan` spellings that `f64::from_str` would otherwise let through.
fn parse_number(buffer: &str) -> Option<f64> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() || trimmed.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
