#![no_std]

//! HERCM Core - sparse matrix store and HERCM text format
//!
//! This crate holds the in-memory coordinate-list matrix, the transforms
//! between symmetric and asymmetric storage, the verification checksum and
//! the text codec. It performs no I/O; see the `hercm` crate for files.
//!
//! ```
//! use hercm_core::{Matrix, TransformPolicy};
//!
//! let mut m = Matrix::new(3, 3).unwrap();
//! m.set_value(0, 1, 4.0).unwrap();
//! m.set_value(1, 0, 4.0).unwrap();
//! m.make_symmetrical(TransformPolicy::Truncate).unwrap();
//! assert_eq!(m.nzentries(), 1);
//! assert_eq!(m.get_value(0, 1), Ok(4.0));
//! ```

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod checksum;
pub mod error;
pub mod format;
pub mod matrix;
pub mod symmetry;
pub mod traits;

pub use error::*;
pub use format::{Document, FieldData, FieldType, FieldValue, HercmHeader, Magic};
pub use matrix::{CompressedColumn, CompressedRow, Element, Matrix};
pub use symmetry::{Symmetry, TransformPolicy};
pub use traits::{MatrixOperations, SparseMatrix};
