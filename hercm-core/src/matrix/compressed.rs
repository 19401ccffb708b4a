//! Compressed-row and compressed-column views
//!
//! Both views are plain three-array snapshots (values, secondary indices,
//! primary-axis offsets) derived from a row-major element list. They hold the
//! stored entries only; for a symmetric matrix that is the lower triangle.

use alloc::vec;
use alloc::vec::Vec;

use super::element::Element;

/// Compressed sparse row snapshot
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompressedRow {
    nrows: usize,
    ncols: usize,
    values: Vec<f64>,
    col_indices: Vec<usize>,
    row_offsets: Vec<usize>,
}

impl CompressedRow {
    /// Build from entries already sorted by `(row, col)`
    pub(crate) fn from_row_major(nrows: usize, ncols: usize, elements: &[Element]) -> Self {
        let mut row_offsets = vec![0usize; nrows + 1];
        for e in elements {
            row_offsets[e.row + 1] += 1;
        }
        for row in 0..nrows {
            row_offsets[row + 1] += row_offsets[row];
        }

        Self {
            nrows,
            ncols,
            values: elements.iter().map(|e| e.val).collect(),
            col_indices: elements.iter().map(|e| e.col).collect(),
            row_offsets,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Start offset of each row, with one trailing entry equal to `nnz`
    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    /// `(col, val)` pairs of one row
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = if row < self.nrows {
            self.row_offsets[row]..self.row_offsets[row + 1]
        } else {
            0..0
        };
        range.map(move |i| (self.col_indices[i], self.values[i]))
    }

    /// Split into `(values, col_indices, row_offsets)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<usize>, Vec<usize>) {
        (self.values, self.col_indices, self.row_offsets)
    }
}

/// Compressed sparse column snapshot
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompressedColumn {
    nrows: usize,
    ncols: usize,
    values: Vec<f64>,
    row_indices: Vec<usize>,
    col_offsets: Vec<usize>,
}

impl CompressedColumn {
    /// Build from entries already sorted by `(row, col)`
    ///
    /// A counting sort by column keeps the row order, so row indices come out
    /// ascending within every column.
    pub(crate) fn from_row_major(nrows: usize, ncols: usize, elements: &[Element]) -> Self {
        let mut col_offsets = vec![0usize; ncols + 1];
        for e in elements {
            col_offsets[e.col + 1] += 1;
        }
        for col in 0..ncols {
            col_offsets[col + 1] += col_offsets[col];
        }

        let mut next = col_offsets.clone();
        let mut values = vec![0.0; elements.len()];
        let mut row_indices = vec![0usize; elements.len()];
        for e in elements {
            let slot = next[e.col];
            values[slot] = e.val;
            row_indices[slot] = e.row;
            next[e.col] += 1;
        }

        Self {
            nrows,
            ncols,
            values,
            row_indices,
            col_offsets,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Start offset of each column, with one trailing entry equal to `nnz`
    pub fn col_offsets(&self) -> &[usize] {
        &self.col_offsets
    }

    /// `(row, val)` pairs of one column
    pub fn col_entries(&self, col: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = if col < self.ncols {
            self.col_offsets[col]..self.col_offsets[col + 1]
        } else {
            0..0
        };
        range.map(move |i| (self.row_indices[i], self.values[i]))
    }

    /// Split into `(values, row_indices, col_offsets)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<usize>, Vec<usize>) {
        (self.values, self.row_indices, self.col_offsets)
    }
}

impl crate::traits::SparseMatrix for CompressedRow {
    fn get_element(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        let start = self.row_offsets[row];
        let end = self.row_offsets[row + 1];
        self.col_indices[start..end]
            .binary_search(&col)
            .ok()
            .map(|i| self.values[start + i])
            .filter(|v| *v != 0.0)
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    fn nnz(&self) -> usize {
        self.values.len()
    }
}

impl crate::traits::MatrixOperations for CompressedRow {
    fn get_row(&self, row_index: usize) -> Vec<(usize, f64)> {
        self.row_entries(row_index).collect()
    }

    fn get_col(&self, col_index: usize) -> Vec<(usize, f64)> {
        (0..self.nrows)
            .filter_map(|row| {
                crate::traits::SparseMatrix::get_element(self, row, col_index).map(|v| (row, v))
            })
            .collect()
    }
}

impl crate::traits::SparseMatrix for CompressedColumn {
    fn get_element(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        let start = self.col_offsets[col];
        let end = self.col_offsets[col + 1];
        self.row_indices[start..end]
            .binary_search(&row)
            .ok()
            .map(|i| self.values[start + i])
            .filter(|v| *v != 0.0)
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    fn nnz(&self) -> usize {
        self.values.len()
    }
}

impl crate::traits::MatrixOperations for CompressedColumn {
    fn get_row(&self, row_index: usize) -> Vec<(usize, f64)> {
        (0..self.ncols)
            .filter_map(|col| {
                crate::traits::SparseMatrix::get_element(self, row_index, col).map(|v| (col, v))
            })
            .collect()
    }

    fn get_col(&self, col_index: usize) -> Vec<(usize, f64)> {
        self.col_entries(col_index).collect()
    }
}
