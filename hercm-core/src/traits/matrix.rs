//! Core matrix abstraction traits
//!
//! Implemented by the COO [`Matrix`](crate::Matrix) and by its compressed
//! views, so read-only consumers need not care which representation they get.

use alloc::vec::Vec;

/// Format-agnostic read access to a sparse matrix
pub trait SparseMatrix {
    /// Get the value at the specified position
    ///
    /// Returns `None` if the value is zero (not stored) or if the position
    /// is out of bounds.
    fn get_element(&self, row: usize, col: usize) -> Option<f64>;

    /// Get matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize);

    /// Get number of stored entries
    fn nnz(&self) -> usize;
}

/// Row and column slices
pub trait MatrixOperations: SparseMatrix {
    /// All non-zero `(col, val)` pairs in a row, in column order
    fn get_row(&self, row_index: usize) -> Vec<(usize, f64)>;

    /// All non-zero `(row, val)` pairs in a column, in row order
    fn get_col(&self, col_index: usize) -> Vec<(usize, f64)>;
}
