//! Verification sum of a matrix's numeric content
//!
//! The sum adds every value, then every column index, then every row index,
//! and reduces the total modulo the element count (floored, so the result
//! lies in `[0, n)`). This matches what HERCM files have always carried in
//! their header.
//!
//! It is a staleness and accidental-corruption detector only. It is not
//! collision resistant: any two matrices whose totals differ by a multiple of
//! the element count share a verification value, e.g. a single entry whose
//! value changes by a whole number. Do not rely on it for integrity.

use alloc::vec::Vec;

use crate::error::{HercmError, Result};
use crate::matrix::{Element, Matrix};

/// Reduce already-ordered columns of a coordinate list to a verification sum
fn reduce<V, C, R>(vals: V, cols: C, rows: R, count: usize) -> f64
where
    V: IntoIterator<Item = f64>,
    C: IntoIterator<Item = f64>,
    R: IntoIterator<Item = f64>,
{
    if count == 0 {
        return 0.0;
    }

    let mut sum = 0.0;
    for v in vals {
        sum += v;
    }
    for c in cols {
        sum += c;
    }
    for r in rows {
        sum += r;
    }

    let n = count as f64;
    let rem = sum % n;
    if rem < 0.0 {
        rem + n
    } else {
        rem
    }
}

/// Verification sum of a set of elements
///
/// Elements are summed in `(row, col, val)` order, so the result does not
/// depend on how the list happens to be ordered. An empty list sums to zero.
pub fn generate_verification_sum(elements: &[Element]) -> f64 {
    let mut ordered: Vec<&Element> = elements.iter().collect();
    ordered.sort_by(|a, b| {
        a.row
            .cmp(&b.row)
            .then(a.col.cmp(&b.col))
            .then(a.val.total_cmp(&b.val))
    });

    reduce(
        ordered.iter().map(|e| e.val),
        ordered.iter().map(|e| e.col as f64),
        ordered.iter().map(|e| e.row as f64),
        ordered.len(),
    )
}

/// Verification sum of raw field columns, in the order given
///
/// Used on freshly parsed files, whose writer may have summed in file order.
/// The three slices are expected to have equal length; the count is taken
/// from `vals`.
pub fn sum_fields(vals: &[f64], rows: &[i64], cols: &[i64]) -> f64 {
    reduce(
        vals.iter().copied(),
        cols.iter().map(|&c| c as f64),
        rows.iter().map(|&r| r as f64),
        vals.len(),
    )
}

/// Compare a matrix's recorded verification with its content
///
/// A mismatch is `Ok(false)`. The only error is a matrix that carries no
/// verification value at all.
pub fn verify(matrix: &Matrix) -> Result<bool> {
    let recorded = matrix.verification().ok_or_else(|| {
        HercmError::validation("matrix has no verification value, call refresh_verification first")
    })?;
    Ok(recorded == generate_verification_sum(matrix.elements()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_single_entry_sum() {
        // 7.5 + 2 + 2 = 11.5, mod 1
        let sum = generate_verification_sum(&[Element::new(2, 2, 7.5)]);
        assert_eq!(sum, 0.5);
    }

    #[test]
    fn test_empty_sum_is_zero() {
        assert_eq!(generate_verification_sum(&[]), 0.0);
        assert_eq!(sum_fields(&[], &[], &[]), 0.0);
    }

    #[test]
    fn test_floored_modulo_for_negative_totals() {
        // -9 + 0 + 0 + 1 + 0 = -8, mod 3 -> 1
        let sum = generate_verification_sum(&[
            Element::new(0, 0, -4.0),
            Element::new(1, 0, -5.0),
            Element::new(0, 0, 0.0),
        ]);
        assert_eq!(sum, 1.0);
    }

    #[test]
    fn test_order_independent() {
        let a = vec![
            Element::new(0, 0, 0.1),
            Element::new(3, 1, 0.2),
            Element::new(1, 2, 0.3),
        ];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(
            generate_verification_sum(&a).to_bits(),
            generate_verification_sum(&b).to_bits()
        );
    }

    #[test]
    fn test_matches_raw_fields_in_row_major_order() {
        let elements = [Element::new(0, 1, 1.25), Element::new(2, 0, 3.5)];
        let raw = sum_fields(&[1.25, 3.5], &[0, 2], &[1, 0]);
        assert_eq!(generate_verification_sum(&elements), raw);
    }

    #[test]
    fn test_sensitivity_and_documented_collision() {
        let mut m = Matrix::new(2, 2).unwrap();
        m.set_value(0, 0, 1.0).unwrap();
        m.set_value(1, 1, 2.0).unwrap();
        let base = m.refresh_verification();

        m.set_value(1, 1, 2.5).unwrap();
        assert_ne!(generate_verification_sum(m.elements()), base);

        // total moves by exactly the element count
        m.set_value(1, 1, 4.0).unwrap();
        assert_eq!(generate_verification_sum(m.elements()), base);
    }

    #[test]
    fn test_verify() {
        let mut m = Matrix::new(3, 3).unwrap();
        m.set_value(1, 2, 5.0).unwrap();
        assert!(verify(&m).is_err());

        m.refresh_verification();
        assert_eq!(verify(&m), Ok(true));

        m.set_value(1, 2, 5.5).unwrap();
        assert_eq!(verify(&m), Ok(false));
    }
}
