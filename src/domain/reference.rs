//! A1-style cell addressing.
//!
//! Columns use bijective base-26 letters (`A`..`Z`, `AA`..`ZZ`, `AAA`, ...)
//! and rows are printed one-based, so the zero-based address `(0, 0)` is
//! `A1` and `(11, 26)` is `AA12`.

use super::errors::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A zero-based (row, column) position in a grid.
///
/// # Examples
///
/// ```
/// use gridentry::domain::Address;
///
/// let addr = Address::new(5, 0);
/// assert_eq!(addr.to_reference(), "A6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub row: usize,
    pub col: usize,
}

impl Address {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the spreadsheet-style reference for this address.
    pub fn to_reference(&self) -> String {
        format!("{}{}", column_label(self.col), self.row + 1)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_label(self.col), self.row + 1)
    }
}

/// Encodes a zero-based column index as spreadsheet column letters.
///
/// This is not ordinary base-26: there is no zero digit, so every carry
/// subtracts one. Index 26 is `AA`, not `BA`.
///
/// # Examples
///
/// ```
/// use gridentry::domain::column_label;
///
/// assert_eq!(column_label(0), "A");
/// assert_eq!(column_label(26), "AA");
/// assert_eq!(column_label(702), "AAA");
/// ```
pub fn column_label(col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col;
    loop {
        letters.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().map(|&b| char::from(b)).collect()
}

/// Shorthand for `Address::new(row, col).to_reference()`.
pub fn to_reference(row: usize, col: usize) -> String {
    Address::new(row, col).to_reference()
}

/// Parses a reference such as `"B3"` or `"aa12"` back into an address.
///
/// Exact inverse of [`Address::to_reference`]. Letters are case-insensitive;
/// the row part must be a positive decimal number with nothing after it.
///
/// # Errors
///
/// Returns [`GridError::InvalidReference`] for anything that is not
/// `<letters><digits>` with a row of at least 1.
pub fn parse_reference(reference: &str) -> GridResult<Address> {
    let invalid = || GridError::InvalidReference(reference.to_string());

    let split = reference
        .find(|c: char| !c.is_ascii_alphabetic())
        .ok_or_else(invalid)?;
    let (letters, digits) = reference.split_at(split);

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let col = column_index(letters).ok_or_else(invalid)?;
    let row = digits
        .parse::<usize>()
        .ok()
        .and_then(|r| r.checked_sub(1))
        .ok_or_else(invalid)?;

    Ok(Address::new(row, col))
}

fn column_index(letters: &str) -> Option<usize> {
    let mut index: usize = 0;
    for b in letters.bytes() {
        let digit = (b.to_ascii_uppercase() - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    index.checked_sub(1)
}
