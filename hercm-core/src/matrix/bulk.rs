//! Bulk queries and bulk edits over a [`Matrix`]
//!
//! Slices and ranges report logical values, so symmetric matrices are
//! extrapolated across the diagonal. Paint operations index the stored
//! coordinates once up front instead of scanning per cell.

use alloc::format;
use alloc::vec::Vec;
use hashbrown::HashMap;

use super::{Element, Matrix};
use crate::error::{HercmError, Result};
use crate::symmetry::Symmetry;
use crate::traits::{MatrixOperations, SparseMatrix};

impl Matrix {
    /// Logical entries stored or mirrored into `(row, col)` space
    fn logical_entries(&self) -> impl Iterator<Item = Element> + '_ {
        let mirror = self.symmetry == Symmetry::Symmetric;
        self.elements.iter().flat_map(move |e| {
            let reflected = if mirror && !e.is_diagonal() {
                Some(e.transposed())
            } else {
                None
            };
            core::iter::once(*e).chain(reflected)
        })
    }

    /// Non-zero `(col, val)` pairs of one row, sorted by column
    pub fn row(&self, row: usize) -> Result<Vec<(usize, f64)>> {
        self.check_bounds(row, 0)?;
        let mut entries: Vec<(usize, f64)> = self
            .logical_entries()
            .filter(|e| e.row == row && e.val != 0.0)
            .map(|e| (e.col, e.val))
            .collect();
        entries.sort_by_key(|&(col, _)| col);
        Ok(entries)
    }

    /// Non-zero `(row, val)` pairs of one column, sorted by row
    pub fn col(&self, col: usize) -> Result<Vec<(usize, f64)>> {
        self.check_bounds(0, col)?;
        let mut entries: Vec<(usize, f64)> = self
            .logical_entries()
            .filter(|e| e.col == col && e.val != 0.0)
            .map(|e| (e.row, e.val))
            .collect();
        entries.sort_by_key(|&(row, _)| row);
        Ok(entries)
    }

    /// Validate an inclusive rectangle given by its corners
    fn check_rect(&self, row1: usize, row2: usize, col1: usize, col2: usize) -> Result<()> {
        self.check_bounds(row1, col1)?;
        self.check_bounds(row2, col2)?;
        if row1 > row2 || col1 > col2 {
            return Err(HercmError::validation(format!(
                "rectangle corners ({row1}, {col1}) and ({row2}, {col2}) are reversed"
            )));
        }
        Ok(())
    }

    /// Copy the inclusive rectangle `[row1, row2] x [col1, col2]` into a new
    /// asymmetric matrix whose origin is `(row1, col1)`
    pub fn range(&self, row1: usize, row2: usize, col1: usize, col2: usize) -> Result<Matrix> {
        self.check_rect(row1, row2, col1, col2)?;

        let mut sub = Matrix::new(row2 - row1 + 1, col2 - col1 + 1)?;
        sub.elements = self
            .logical_entries()
            .filter(|e| (row1..=row2).contains(&e.row) && (col1..=col2).contains(&e.col))
            .map(|e| Element::new(e.row - row1, e.col - col1, e.val))
            .collect();
        sub.make_row_major();
        Ok(sub)
    }

    /// Set every cell of a batch of logical coordinates to `val`
    ///
    /// Returns the number of cells visited.
    fn paint_cells(&mut self, cells: impl Iterator<Item = (usize, usize)>, val: f64) -> usize {
        let mut index: HashMap<(usize, usize), usize> = HashMap::with_capacity(self.elements.len());
        for (i, e) in self.elements.iter().enumerate() {
            index.entry(e.coordinates()).or_insert(i);
        }

        let mut visited = 0;
        for (row, col) in cells {
            visited += 1;
            let key = self.stored_coordinates(row, col);
            match index.get(&key) {
                Some(&i) => self.elements[i].val = val,
                None if val != 0.0 => {
                    index.insert(key, self.elements.len());
                    self.elements.push(Element::new(key.0, key.1, val));
                }
                None => {}
            }
        }

        self.mark_modified();
        if val == 0.0 {
            self.remove_zeros();
        }
        visited
    }

    /// Set every cell of the inclusive rectangle `[row1, row2] x [col1, col2]`
    /// to `val`
    ///
    /// Painting zero clears the rectangle.
    pub fn paint(&mut self, row1: usize, row2: usize, col1: usize, col2: usize, val: f64) -> Result<()> {
        self.check_rect(row1, row2, col1, col2)?;
        let cells = (row1..=row2).flat_map(move |row| (col1..=col2).map(move |col| (row, col)));
        self.paint_cells(cells, val);
        Ok(())
    }

    /// Paint a band along the diagonal
    ///
    /// For every row `i` in `begin..end`, columns `i + offset - spread` through
    /// `i + offset + spread` are set to `val`. A spread of zero paints a single
    /// diagonal; a positive offset shifts the band to the right. Cells that
    /// fall outside the matrix are skipped. Returns the number of cells set.
    pub fn paint_diagonal(&mut self, begin: usize, end: usize, spread: usize, val: f64, offset: i64) -> Result<usize> {
        if begin > end {
            return Err(HercmError::validation(format!(
                "diagonal begins at row {begin} after it ends at row {end}"
            )));
        }

        // i128 holds any usize plus or minus any i64 without overflow
        let last_col = self.width as i128 - 1;
        let (spread, offset) = (spread as i128, i128::from(offset));
        let cells: Vec<(usize, usize)> = (begin..end.min(self.height))
            .flat_map(|row| {
                let center = row as i128 + offset;
                let first = (center - spread).max(0);
                let last = (center + spread).min(last_col);
                let cols = if first <= last {
                    first as usize..=last as usize
                } else {
                    1..=0
                };
                cols.map(move |col| (row, col))
            })
            .collect();

        Ok(self.paint_cells(cells.into_iter(), val))
    }
}

impl SparseMatrix for Matrix {
    fn get_element(&self, row: usize, col: usize) -> Option<f64> {
        self.get_value(row, col).ok().filter(|v| *v != 0.0)
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    fn nnz(&self) -> usize {
        self.nzentries()
    }
}

impl MatrixOperations for Matrix {
    fn get_row(&self, row_index: usize) -> Vec<(usize, f64)> {
        self.row(row_index).unwrap_or_default()
    }

    fn get_col(&self, col_index: usize) -> Vec<(usize, f64)> {
        self.col(col_index).unwrap_or_default()
    }
}
