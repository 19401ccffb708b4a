//! Collaborator-facing interfaces
//!
//! Adapters to third-party sparse/dense tooling and visualization code work
//! against these traits rather than a concrete store.

pub mod matrix;

pub use matrix::{MatrixOperations, SparseMatrix};
