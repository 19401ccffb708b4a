//! HERCM - sparse matrix files
//!
//! This library loads and saves sparse matrices in the HERCM text format,
//! adding file handling, logging and configuration on top of `hercm-core`.
//!
//! ## Architecture
//!
//! - **hercm-core**: matrix store, symmetry transforms, checksum and text codec (no I/O)
//! - **hercm**: files, atomic writes, structured logging and the `hercm` inspection tool
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hercm::{CodecConfig, Matrix, TransformPolicy};
//!
//! fn example() -> hercm::Result<()> {
//!     let mut matrix = hercm::load("stiffness.hercm")?;
//!     matrix.make_symmetrical(TransformPolicy::Merge)?;
//!     matrix.refresh_verification();
//!
//!     let config = CodecConfig::default().with_tokens_per_line(12);
//!     hercm::save_with(&matrix, "stiffness-sym.hercm", &config)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Events are emitted through `tracing`; install any subscriber to see
//! them. Loads and saves log at `info`, per-field parse progress at `debug`,
//! and coalesced duplicate coordinates at `warn`.

// Re-export core abstractions and format definitions
pub use hercm_core::{
    // Matrix store
    CompressedColumn, CompressedRow, Element, Matrix,
    // Traits
    MatrixOperations, SparseMatrix,
    // Symmetry
    Symmetry, TransformPolicy,
    // Format definitions
    HercmHeader, Magic,
    // Core errors
    ErrorCategory, HercmError,
};
pub use hercm_core::checksum;

pub mod config;
pub mod error;
pub mod file_io;

pub use config::CodecConfig;
pub use error::{Error, Result};
pub use file_io::{load, load_with, read_from, save, save_with, write_to, HercmFile};
