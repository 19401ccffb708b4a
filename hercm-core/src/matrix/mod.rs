//! In-memory coordinate-list (COO) sparse matrix store
//!
//! [`Matrix`] keeps an unordered list of `(row, col, val)` triples together
//! with the header attributes of the HERCM format. Symmetric matrices store
//! only the lower triangle (`row >= col`, diagonal included); every access
//! aimed at the upper triangle is transparently mirrored.
//!
//! Normalization is explicit. Point and bulk mutations never sort or compact
//! the element list on their own (with the single exception of
//! [`Matrix::set_value`] with a zero value); call [`Matrix::make_row_major`]
//! and [`Matrix::remove_zeros`] when an ordered, zero-free list is required.

pub mod bulk;
pub mod compressed;
pub mod element;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::checksum;
use crate::error::{HercmError, Result};
use crate::symmetry::Symmetry;

pub use compressed::{CompressedColumn, CompressedRow};
pub use element::Element;

/// Sparse matrix in coordinate-list form
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "MatrixParts"))]
pub struct Matrix {
    height: usize,
    width: usize,
    symmetry: Symmetry,
    elements: Vec<Element>,
    remarks: Vec<String>,
    verification: Option<f64>,
    verification_fresh: bool,
}

/// Unchecked serialized form of [`Matrix`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct MatrixParts {
    height: usize,
    width: usize,
    symmetry: Symmetry,
    elements: Vec<Element>,
    remarks: Vec<String>,
    verification: Option<f64>,
    verification_fresh: bool,
}

/// Deserialized matrices go through the same checks as
/// [`Matrix::with_symmetry`] and [`Matrix::replace_contents`]. A recorded
/// verification only counts as fresh if it still matches the content.
#[cfg(feature = "serde")]
impl TryFrom<MatrixParts> for Matrix {
    type Error = HercmError;

    fn try_from(parts: MatrixParts) -> Result<Self> {
        let mut matrix = Self::with_symmetry(parts.height, parts.width, parts.symmetry)?;
        matrix.replace_contents(parts.elements)?;
        matrix.remarks = parts.remarks;
        matrix.verification = parts.verification;
        matrix.verification_fresh = parts.verification_fresh
            && parts.verification == Some(checksum::generate_verification_sum(&matrix.elements));
        Ok(matrix)
    }
}

impl Matrix {
    /// Create an empty asymmetric matrix
    pub fn new(height: usize, width: usize) -> Result<Self> {
        Self::with_symmetry(height, width, Symmetry::Asymmetric)
    }

    /// Create an empty matrix with the given symmetry attribute
    ///
    /// Symmetric matrices must be square.
    pub fn with_symmetry(height: usize, width: usize, symmetry: Symmetry) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(HercmError::validation(format!(
                "matrix dimensions must be positive, got {height}x{width}"
            )));
        }
        if symmetry == Symmetry::Symmetric && height != width {
            return Err(HercmError::validation(format!(
                "symmetric matrix must be square, got {height}x{width}"
            )));
        }

        Ok(Self {
            height,
            width,
            symmetry,
            elements: Vec::new(),
            remarks: Vec::new(),
            verification: None,
            verification_fresh: false,
        })
    }

    /// Create an asymmetric matrix with every cell set to `val`
    ///
    /// A zero fill produces an empty matrix, since zeros are never stored.
    pub fn filled(height: usize, width: usize, val: f64) -> Result<Self> {
        let mut matrix = Self::new(height, width)?;
        if val != 0.0 {
            matrix.elements.reserve(height.saturating_mul(width));
            for row in 0..height {
                for col in 0..width {
                    matrix.elements.push(Element::new(row, col, val));
                }
            }
        }
        Ok(matrix)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Dimensions as (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Number of stored entries
    ///
    /// Always equal to the element list length; explicit zeros and duplicate
    /// coordinates count until they are eliminated.
    pub fn nzentries(&self) -> usize {
        self.elements.len()
    }

    /// Stored entries in their current order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn remarks(&self) -> &[String] {
        &self.remarks
    }

    /// Append a free-form remark; remarks never affect verification
    pub fn add_remark(&mut self, remark: impl Into<String>) {
        self.remarks.push(remark.into());
    }

    pub fn clear_remarks(&mut self) {
        self.remarks.clear();
    }

    /// Last verification value, if one was loaded or computed
    pub fn verification(&self) -> Option<f64> {
        self.verification
    }

    /// True when the verification value reflects the current content
    pub fn is_verification_fresh(&self) -> bool {
        self.verification_fresh && self.verification.is_some()
    }

    /// Recompute and store the verification value, returning it
    pub fn refresh_verification(&mut self) -> f64 {
        let sum = checksum::generate_verification_sum(&self.elements);
        self.verification = Some(sum);
        self.verification_fresh = true;
        sum
    }

    /// Record a verification value read from a file
    pub(crate) fn set_loaded_verification(&mut self, verification: f64) {
        self.verification = Some(verification);
        self.verification_fresh = true;
    }

    pub(crate) fn mark_modified(&mut self) {
        self.verification_fresh = false;
    }

    pub(crate) fn set_symmetry_attribute(&mut self, symmetry: Symmetry) {
        self.symmetry = symmetry;
    }

    /// Move the element list out, leaving the matrix empty
    pub(crate) fn take_elements(&mut self) -> Vec<Element> {
        core::mem::take(&mut self.elements)
    }

    /// Install an element list produced from [`Matrix::take_elements`]
    ///
    /// Unlike [`Matrix::replace_contents`] nothing is checked; the caller
    /// guarantees bounds and the triangle convention.
    pub(crate) fn put_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.mark_modified();
    }

    /// Fail with `OutOfBounds` unless `(row, col)` lies inside the matrix
    pub fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.height || col >= self.width {
            return Err(HercmError::out_of_bounds(
                row,
                col,
                self.height,
                self.width,
            ));
        }
        Ok(())
    }

    /// Coordinates under which `(row, col)` is physically stored
    pub fn stored_coordinates(&self, row: usize, col: usize) -> (usize, usize) {
        if self.symmetry == Symmetry::Symmetric && row < col {
            (col, row)
        } else {
            (row, col)
        }
    }

    fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        self.elements
            .iter()
            .position(|e| e.row == row && e.col == col)
    }

    /// Append an entry without looking for an existing one at the same
    /// coordinate
    ///
    /// Callers that need unique coordinates must coalesce afterwards, see
    /// [`Matrix::coalesce_duplicates`].
    pub fn add_element(&mut self, row: usize, col: usize, val: f64) -> Result<()> {
        self.check_bounds(row, col)?;
        let (row, col) = self.stored_coordinates(row, col);
        self.elements.push(Element::new(row, col, val));
        self.mark_modified();
        Ok(())
    }

    /// Value at `(row, col)`, zero when nothing is stored there
    pub fn get_value(&self, row: usize, col: usize) -> Result<f64> {
        self.check_bounds(row, col)?;
        let (row, col) = self.stored_coordinates(row, col);
        Ok(self
            .index_of(row, col)
            .map(|i| self.elements[i].val)
            .unwrap_or(0.0))
    }

    /// Overwrite the value at `(row, col)`, appending an entry if none exists
    ///
    /// Setting zero removes the entry: zero elimination runs afterwards so an
    /// explicit zero is never retained.
    pub fn set_value(&mut self, row: usize, col: usize, val: f64) -> Result<()> {
        self.check_bounds(row, col)?;
        let (row, col) = self.stored_coordinates(row, col);
        match self.index_of(row, col) {
            Some(i) => self.elements[i].val = val,
            None => self.elements.push(Element::new(row, col, val)),
        }
        self.mark_modified();

        if val == 0.0 {
            self.remove_zeros();
        }
        Ok(())
    }

    /// Drop every entry whose value is exactly zero
    ///
    /// Returns the number of entries removed.
    pub fn remove_zeros(&mut self) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| e.val != 0.0);
        let removed = before - self.elements.len();
        if removed > 0 {
            self.mark_modified();
        }
        removed
    }

    /// Stable sort of the entries by `(row, col)`
    ///
    /// The verification sum does not depend on order, so this never makes
    /// the verification stale.
    pub fn make_row_major(&mut self) {
        self.elements
            .sort_by(|a, b| a.row.cmp(&b.row).then(a.col.cmp(&b.col)));
    }

    /// True when the entries are ordered by `(row, col)`
    pub fn is_row_major(&self) -> bool {
        self.elements
            .windows(2)
            .all(|w| (w[0].row, w[0].col) <= (w[1].row, w[1].col))
    }

    /// Swap in a whole new element list
    ///
    /// Every element is bounds-checked before anything changes, so a failure
    /// leaves the matrix untouched. Symmetric matrices fold upper-triangle
    /// entries onto their stored mirror coordinate.
    pub fn replace_contents(&mut self, new_elements: Vec<Element>) -> Result<()> {
        if let Some(bad) = new_elements
            .iter()
            .find(|e| e.row >= self.height || e.col >= self.width)
        {
            return Err(HercmError::out_of_bounds(
                bad.row,
                bad.col,
                self.height,
                self.width,
            ));
        }

        self.elements = new_elements;
        if self.symmetry == Symmetry::Symmetric {
            for e in self.elements.iter_mut().filter(|e| e.is_upper()) {
                *e = e.transposed();
            }
        }
        self.mark_modified();
        Ok(())
    }

    /// Sum entries that share a coordinate into the first of them
    ///
    /// The surviving entry keeps the position of the first occurrence.
    /// Returns the number of entries merged away.
    pub fn coalesce_duplicates(&mut self) -> usize {
        let mut first_seen: HashMap<(usize, usize), usize> =
            HashMap::with_capacity(self.elements.len());
        let mut merged: Vec<Element> = Vec::with_capacity(self.elements.len());

        for e in &self.elements {
            match first_seen.get(&e.coordinates()) {
                Some(&i) => merged[i].val += e.val,
                None => {
                    first_seen.insert(e.coordinates(), merged.len());
                    merged.push(*e);
                }
            }
        }

        let removed = self.elements.len() - merged.len();
        if removed > 0 {
            self.elements = merged;
            self.mark_modified();
        }
        removed
    }

    /// Change the dimensions, discarding entries that no longer fit
    ///
    /// Returns the number of entries discarded.
    pub fn resize(&mut self, height: usize, width: usize) -> Result<usize> {
        if height == 0 || width == 0 {
            return Err(HercmError::validation(format!(
                "matrix dimensions must be positive, got {height}x{width}"
            )));
        }
        if self.symmetry == Symmetry::Symmetric && height != width {
            return Err(HercmError::validation(format!(
                "symmetric matrix must stay square, got {height}x{width}"
            )));
        }

        let before = self.elements.len();
        self.elements.retain(|e| e.row < height && e.col < width);
        self.height = height;
        self.width = width;

        let removed = before - self.elements.len();
        if removed > 0 {
            self.mark_modified();
        }
        Ok(removed)
    }

    /// Transpose in place, swapping the dimensions
    ///
    /// A symmetric matrix equals its own transpose, so its stored triangle
    /// is left as is.
    pub fn transpose(&mut self) {
        if self.symmetry == Symmetry::Symmetric {
            return;
        }
        for e in &mut self.elements {
            *e = e.transposed();
        }
        core::mem::swap(&mut self.height, &mut self.width);
        self.mark_modified();
    }

    /// Compressed-row view of the stored entries
    ///
    /// Requires row-major order.
    pub fn to_compressed_row(&self) -> Result<CompressedRow> {
        self.require_row_major()?;
        Ok(CompressedRow::from_row_major(
            self.height,
            self.width,
            &self.elements,
        ))
    }

    /// Compressed-column view of the stored entries
    ///
    /// Requires row-major order; within each column the row indices come out
    /// ascending.
    pub fn to_compressed_column(&self) -> Result<CompressedColumn> {
        self.require_row_major()?;
        Ok(CompressedColumn::from_row_major(
            self.height,
            self.width,
            &self.elements,
        ))
    }

    fn require_row_major(&self) -> Result<()> {
        if !self.is_row_major() {
            return Err(HercmError::validation(
                "element list is not row-major, call make_row_major first",
            ));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Matrix {
    type Item = &'a Element;
    type IntoIter = core::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn asym_3x3() -> Matrix {
        let mut m = Matrix::new(3, 3).unwrap();
        m.add_element(2, 0, 1.0).unwrap();
        m.add_element(0, 1, 2.0).unwrap();
        m.add_element(1, 1, 3.0).unwrap();
        m
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(Matrix::new(0, 3), Err(HercmError::Validation(_))));
        assert!(matches!(
            Matrix::with_symmetry(2, 3, Symmetry::Symmetric),
            Err(HercmError::Validation(_))
        ));
    }

    #[test]
    fn test_filled() {
        let m = Matrix::filled(2, 3, 1.5).unwrap();
        assert_eq!(m.nzentries(), 6);
        assert!(m.is_row_major());
        assert_eq!(m.get_value(1, 2), Ok(1.5));

        let empty = Matrix::filled(4, 4, 0.0).unwrap();
        assert_eq!(empty.nzentries(), 0);
    }

    #[test]
    fn test_set_and_get_value() {
        let mut m = Matrix::new(5, 5).unwrap();
        m.set_value(2, 2, 7.5).unwrap();
        assert_eq!(m.nzentries(), 1);
        assert_eq!(m.get_value(2, 2), Ok(7.5));
        assert_eq!(m.get_value(0, 0), Ok(0.0));

        m.set_value(2, 2, 1.0).unwrap();
        assert_eq!(m.nzentries(), 1);
        assert_eq!(m.get_value(2, 2), Ok(1.0));

        m.set_value(2, 2, 0.0).unwrap();
        assert_eq!(m.nzentries(), 0);
    }

    #[test]
    fn test_bounds_are_enforced() {
        let mut m = Matrix::new(3, 4).unwrap();
        assert!(matches!(
            m.get_value(3, 0),
            Err(HercmError::OutOfBounds { row: 3, col: 0, .. })
        ));
        assert!(matches!(
            m.set_value(0, 4, 1.0),
            Err(HercmError::OutOfBounds { .. })
        ));
        assert!(matches!(
            m.add_element(7, 7, 1.0),
            Err(HercmError::OutOfBounds { .. })
        ));
        assert_eq!(m.nzentries(), 0);
    }

    #[test]
    fn test_symmetric_storage_uses_lower_triangle() {
        let mut m = Matrix::with_symmetry(3, 3, Symmetry::Symmetric).unwrap();
        m.add_element(0, 2, 4.0).unwrap();
        assert_eq!(m.elements(), &[Element::new(2, 0, 4.0)]);

        m.set_value(1, 2, 5.0).unwrap();
        assert_eq!(m.get_value(2, 1), Ok(5.0));
        assert_eq!(m.get_value(1, 2), Ok(5.0));
        assert!(m.elements().iter().all(|e| e.row >= e.col));

        m.set_value(2, 1, 6.0).unwrap();
        assert_eq!(m.nzentries(), 2);
        assert_eq!(m.get_value(1, 2), Ok(6.0));
    }

    #[test]
    fn test_remove_zeros_is_idempotent() {
        let mut m = asym_3x3();
        m.add_element(0, 0, 0.0).unwrap();
        m.add_element(2, 2, 0.0).unwrap();
        assert_eq!(m.remove_zeros(), 2);
        let once = m.elements().to_vec();
        assert_eq!(m.remove_zeros(), 0);
        assert_eq!(m.elements(), &once[..]);
        assert_eq!(m.nzentries(), 3);
    }

    #[test]
    fn test_make_row_major_is_stable() {
        let mut m = asym_3x3();
        m.add_element(0, 1, 9.0).unwrap();
        m.make_row_major();
        assert!(m.is_row_major());
        assert_eq!(
            m.elements(),
            &[
                Element::new(0, 1, 2.0),
                Element::new(0, 1, 9.0),
                Element::new(1, 1, 3.0),
                Element::new(2, 0, 1.0),
            ]
        );
    }

    #[test]
    fn test_replace_contents_is_all_or_nothing() {
        let mut m = asym_3x3();
        let err = m.replace_contents(vec![
            Element::new(0, 0, 1.0),
            Element::new(3, 0, 1.0),
        ]);
        assert!(matches!(err, Err(HercmError::OutOfBounds { .. })));
        assert_eq!(m.nzentries(), 3);

        m.replace_contents(vec![Element::new(1, 2, 8.0)]).unwrap();
        assert_eq!(m.nzentries(), 1);
        assert_eq!(m.get_value(1, 2), Ok(8.0));
    }

    #[test]
    fn test_coalesce_duplicates_sums() {
        let mut m = asym_3x3();
        m.add_element(0, 1, 0.5).unwrap();
        m.add_element(2, 0, 1.0).unwrap();
        assert_eq!(m.coalesce_duplicates(), 2);
        assert_eq!(m.nzentries(), 3);
        assert_eq!(m.get_value(0, 1), Ok(2.5));
        assert_eq!(m.get_value(2, 0), Ok(2.0));
        assert_eq!(m.coalesce_duplicates(), 0);
    }

    #[test]
    fn test_resize_drops_outside_entries() {
        let mut m = asym_3x3();
        assert_eq!(m.resize(2, 3), Ok(1));
        assert_eq!(m.dimensions(), (2, 3));
        assert_eq!(m.get_value(0, 1), Ok(2.0));
        assert!(m.resize(0, 1).is_err());
    }

    #[test]
    fn test_transpose() {
        let mut m = Matrix::new(2, 3).unwrap();
        m.add_element(0, 2, 1.0).unwrap();
        m.transpose();
        assert_eq!(m.dimensions(), (3, 2));
        assert_eq!(m.get_value(2, 0), Ok(1.0));
    }

    #[test]
    fn test_verification_freshness() {
        let mut m = asym_3x3();
        assert!(!m.is_verification_fresh());
        m.refresh_verification();
        assert!(m.is_verification_fresh());

        m.make_row_major();
        assert!(m.is_verification_fresh());

        m.set_value(1, 2, 4.0).unwrap();
        assert!(!m.is_verification_fresh());

        m.refresh_verification();
        m.add_remark("notes");
        assert!(m.is_verification_fresh());
    }

    #[test]
    fn test_compressed_views_require_row_major() {
        let mut m = asym_3x3();
        assert!(matches!(
            m.to_compressed_row(),
            Err(HercmError::Validation(_))
        ));
        m.make_row_major();
        let csr = m.to_compressed_row().unwrap();
        assert_eq!(csr.row_offsets(), &[0, 1, 2, 3]);
    }
}
