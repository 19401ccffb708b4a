//! A single COO entry

use crate::error::{HercmError, Result};
use crate::format::field::FieldValue;

/// One `(row, col, val)` triple of a coordinate-list matrix
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    pub row: usize,
    pub col: usize,
    pub val: f64,
}

impl Element {
    pub const fn new(row: usize, col: usize, val: f64) -> Self {
        Self { row, col, val }
    }

    pub const fn coordinates(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub const fn is_diagonal(&self) -> bool {
        self.row == self.col
    }

    /// Strictly above the main diagonal
    pub const fn is_upper(&self) -> bool {
        self.row < self.col
    }

    /// Strictly below the main diagonal
    pub const fn is_lower(&self) -> bool {
        self.row > self.col
    }

    /// The same value at the mirrored coordinate
    pub const fn transposed(self) -> Self {
        Self::new(self.col, self.row, self.val)
    }
}

impl From<(usize, usize, f64)> for Element {
    fn from((row, col, val): (usize, usize, f64)) -> Self {
        Self::new(row, col, val)
    }
}

impl From<Element> for (usize, usize, f64) {
    fn from(e: Element) -> Self {
        (e.row, e.col, e.val)
    }
}

/// Build an element from loosely typed values, e.g. parsed from user input
///
/// Exactly three values are required: two non-negative integers followed by
/// a number. Anything else is a validation error.
impl TryFrom<&[FieldValue]> for Element {
    type Error = HercmError;

    fn try_from(values: &[FieldValue]) -> Result<Self> {
        let [row, col, val] = values else {
            return Err(HercmError::validation(alloc::format!(
                "element must contain three values, got {}",
                values.len()
            )));
        };

        let index = |value: &FieldValue, name: &str| -> Result<usize> {
            value
                .as_i64()
                .and_then(|v| usize::try_from(v).ok())
                .ok_or_else(|| {
                    HercmError::validation(alloc::format!(
                        "{name} \"{value}\" is not a non-negative integer"
                    ))
                })
        };

        let row = index(row, "row")?;
        let col = index(col, "col")?;
        let val = val.as_f64().ok_or_else(|| {
            HercmError::validation(alloc::format!("val \"{val}\" is not numeric"))
        })?;

        Ok(Self::new(row, col, val))
    }
}
