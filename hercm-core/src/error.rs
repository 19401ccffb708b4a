//! Error types for HERCM operations

use alloc::string::String;

/// Errors that can occur during HERCM operations
///
/// None of these are transient: they describe a programming error or bad
/// data, so nothing in this crate retries on failure.
#[derive(Debug, Clone, PartialEq)]
pub enum HercmError {
    /// Coordinate outside the declared matrix dimensions
    OutOfBounds {
        row: i64,
        col: i64,
        height: usize,
        width: usize,
    },
    /// Checksum mismatch, stale verification, or content inconsistent with
    /// the matrix attributes
    Validation(String),
    /// Malformed file header
    Header { line: usize, reason: String },
    /// Unterminated or mis-typed field block
    FieldParse {
        field: String,
        line: usize,
        reason: String,
    },
    /// A required field block is absent
    MissingField(&'static str),
    /// Unknown transform policy name
    Policy(String),
}

impl HercmError {
    pub(crate) fn out_of_bounds(row: usize, col: usize, height: usize, width: usize) -> Self {
        HercmError::OutOfBounds {
            row: row as i64,
            col: col as i64,
            height,
            width,
        }
    }

    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        HercmError::Validation(reason.into())
    }

    pub(crate) fn field(field: &str, line: usize, reason: impl Into<String>) -> Self {
        HercmError::FieldParse {
            field: field.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Broad category of the error, useful for diagnostics in host tools
    pub fn category(&self) -> ErrorCategory {
        match self {
            HercmError::OutOfBounds { .. } => ErrorCategory::Bounds,
            HercmError::Validation(_) => ErrorCategory::Validation,
            HercmError::Header { .. }
            | HercmError::FieldParse { .. }
            | HercmError::MissingField(_) => ErrorCategory::Format,
            HercmError::Policy(_) => ErrorCategory::Usage,
        }
    }
}

/// Coarse grouping of [`HercmError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Bounds,
    Validation,
    Format,
    Usage,
}

impl core::fmt::Display for HercmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HercmError::OutOfBounds {
                row,
                col,
                height,
                width,
            } => write!(
                f,
                "Coordinate ({row}, {col}) out of bounds for {height}x{width} matrix"
            ),
            HercmError::Validation(reason) => write!(f, "Validation failed: {reason}"),
            HercmError::Header { line, reason } => {
                write!(f, "Invalid header at line {line}: {reason}")
            }
            HercmError::FieldParse {
                field,
                line,
                reason,
            } => write!(f, "Failed to parse field {field} at line {line}: {reason}"),
            HercmError::MissingField(field) => write!(f, "Required field {field} is missing"),
            HercmError::Policy(name) => write!(
                f,
                "Unknown transform policy \"{name}\", expected one of: truncate, merge, reconcile"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HercmError {}

/// Result type for HERCM operations
pub type Result<T> = core::result::Result<T, HercmError>;
