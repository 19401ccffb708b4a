//! Errors raised by file-level HERCM operations

use std::path::PathBuf;

use hercm_core::HercmError;
use thiserror::Error;

/// Failure while loading, saving or inspecting a HERCM file
#[derive(Debug, Error)]
pub enum Error {
    /// The content itself is malformed, inconsistent or out of bounds
    #[error(transparent)]
    Core(#[from] HercmError),

    /// The file system refused a read, write or rename
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// The underlying format or content error, if this is one
    pub fn as_core(&self) -> Option<&HercmError> {
        match self {
            Error::Core(err) => Some(err),
            Error::Io { .. } => None,
        }
    }
}

/// Result type for file-level HERCM operations
pub type Result<T> = std::result::Result<T, Error>;
