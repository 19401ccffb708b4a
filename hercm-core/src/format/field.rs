//! Typed field values for the HERCM text format
//!
//! A field block carries a list of tokens of a single [`FieldType`]. This
//! module turns tokens into typed values and back; it knows nothing about
//! which field names exist or what they mean.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Write;
use core::str::FromStr;

use crate::format::constants::{TYPE_FLOAT, TYPE_INT, TYPE_STRING};

/// Primitive value type of a field block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldType {
    Int,
    Float,
    String,
}

impl FieldType {
    /// Wire token for this type
    pub const fn token(self) -> &'static str {
        match self {
            FieldType::Int => TYPE_INT,
            FieldType::Float => TYPE_FLOAT,
            FieldType::String => TYPE_STRING,
        }
    }

    /// Parse a single data token as this type
    ///
    /// Returns a short human-readable reason on failure; callers attach the
    /// field name and line number.
    pub fn parse_token(self, token: &str) -> Result<FieldValue, String> {
        match self {
            FieldType::Int => token
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| format!("bad INT token \"{token}\"")),
            FieldType::Float => token
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|_| format!("bad FLOAT token \"{token}\"")),
            FieldType::String => Ok(FieldValue::Str(token.to_string())),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TYPE_INT => Ok(FieldType::Int),
            TYPE_FLOAT => Ok(FieldType::Float),
            TYPE_STRING => Ok(FieldType::String),
            other => Err(format!("unknown field type \"{other}\"")),
        }
    }
}

impl core::fmt::Display for FieldType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.token())
    }
}

/// A single typed value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Str(_) => FieldType::String,
        }
    }

    /// Numeric view of the value, `None` for strings
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Str(_) => None,
        }
    }

    /// Integer view of the value
    ///
    /// Floats convert only when they hold an exact integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Float(v) => {
                let truncated = *v as i64;
                if truncated as f64 == *v {
                    Some(truncated)
                } else {
                    None
                }
            }
            FieldValue::Str(_) => None,
        }
    }
}

impl core::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write_float(f, *v),
            FieldValue::Str(s) => f.write_str(s),
        }
    }
}

/// Write a float in the shortest form that parses back to the same bits
///
/// `Debug` for `f64` switches to exponent notation for very large or very
/// small magnitudes, which keeps huge values from expanding into hundreds of
/// digits the way `Display` does.
pub fn write_float<W: Write>(out: &mut W, value: f64) -> core::fmt::Result {
    write!(out, "{value:?}")
}

/// A typed list of values, the payload of one field block
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldData {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Str(Vec<String>),
}

impl FieldData {
    /// Empty list of the given type
    pub fn empty(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Int => FieldData::Int(Vec::new()),
            FieldType::Float => FieldData::Float(Vec::new()),
            FieldType::String => FieldData::Str(Vec::new()),
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldData::Int(_) => FieldType::Int,
            FieldData::Float(_) => FieldType::Float,
            FieldData::Str(_) => FieldType::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FieldData::Int(v) => v.len(),
            FieldData::Float(v) => v.len(),
            FieldData::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse every whitespace-separated token on `line` and append it
    pub fn extend_from_line(&mut self, line: &str) -> Result<(), String> {
        let field_type = self.field_type();
        for token in line.split_whitespace() {
            let value = field_type.parse_token(token)?;
            match (&mut *self, value) {
                (FieldData::Int(v), FieldValue::Int(x)) => v.push(x),
                (FieldData::Float(v), FieldValue::Float(x)) => v.push(x),
                (FieldData::Str(v), FieldValue::Str(x)) => v.push(x),
                // parse_token always yields the list's own type
                _ => return Err(format!("token \"{token}\" does not match {field_type}")),
            }
        }
        Ok(())
    }

    /// Value at `index` as a [`FieldValue`]
    pub fn get(&self, index: usize) -> Option<FieldValue> {
        match self {
            FieldData::Int(v) => v.get(index).copied().map(FieldValue::Int),
            FieldData::Float(v) => v.get(index).copied().map(FieldValue::Float),
            FieldData::Str(v) => v.get(index).cloned().map(FieldValue::Str),
        }
    }

    /// Render the values as data lines of at most `tokens_per_line` tokens
    ///
    /// Tokens are joined by single spaces and each line ends with `\n`. An
    /// empty list renders no lines at all.
    pub fn write_lines<W: Write>(&self, out: &mut W, tokens_per_line: usize) -> core::fmt::Result {
        let per_line = tokens_per_line.max(1);
        for start in (0..self.len()).step_by(per_line) {
            let end = (start + per_line).min(self.len());
            for index in start..end {
                if index > start {
                    out.write_char(' ')?;
                }
                match self {
                    FieldData::Int(v) => write!(out, "{}", v[index])?,
                    FieldData::Float(v) => write_float(out, v[index])?,
                    FieldData::Str(v) => out.write_str(&v[index])?,
                }
            }
            out.write_char('\n')?;
        }
        Ok(())
    }
}
