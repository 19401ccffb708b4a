//! Symmetric and asymmetric storage, and the transforms between them
//!
//! A symmetric matrix stores the lower triangle only (`row >= col`). Moving
//! between the two storage modes has to decide what happens to entries of the
//! triangle being given up; [`TransformPolicy`] selects that behaviour.
//!
//! | policy      | entry being given up                                  |
//! |-------------|-------------------------------------------------------|
//! | `Truncate`  | dropped                                               |
//! | `Merge`     | added onto its mirror                                 |
//! | `Reconcile` | moved onto its mirror only if the mirror is empty     |
//!
//! For `Merge`, a mirror pair holding the same value already describes a
//! symmetric cell and is kept once rather than doubled. Diagonal entries are
//! never touched.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::str::FromStr;
use hashbrown::HashMap;

use crate::error::{HercmError, Result};
use crate::format::constants::{ASYMMETRIC, SYMMETRIC};
use crate::matrix::{Element, Matrix};

/// Storage mode of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symmetry {
    /// Lower triangle stored, upper triangle extrapolated
    Symmetric,
    /// Every entry stored as is
    #[default]
    Asymmetric,
}

impl Symmetry {
    /// Header token, `SYM` or `ASYM`
    pub const fn token(self) -> &'static str {
        match self {
            Symmetry::Symmetric => SYMMETRIC,
            Symmetry::Asymmetric => ASYMMETRIC,
        }
    }

    /// Strict parse of a header token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            SYMMETRIC => Some(Symmetry::Symmetric),
            ASYMMETRIC => Some(Symmetry::Asymmetric),
            _ => None,
        }
    }
}

/// Lenient, case-insensitive parse for user input: accepts the header tokens
/// as well as `symmetric`, `symmetrical`, `asymmetric` and `asymmetrical`
impl FromStr for Symmetry {
    type Err = HercmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sym" | "symmetric" | "symmetrical" => Ok(Symmetry::Symmetric),
            "asym" | "asymmetric" | "asymmetrical" => Ok(Symmetry::Asymmetric),
            _ => Err(HercmError::validation(format!(
                "\"{s}\" is not a symmetry, expected SYM or ASYM"
            ))),
        }
    }
}

impl core::fmt::Display for Symmetry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.token())
    }
}

/// Conflict resolution applied when switching storage modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransformPolicy {
    /// Drop the entry being given up
    #[default]
    Truncate,
    /// Add the entry onto its mirror
    ///
    /// A mirror pair holding exactly equal values is kept once, so an
    /// already mirrored matrix folds to the same triangle as under
    /// `Truncate`. Any other pair is summed. The result is discontinuous in
    /// the values: `1.0`/`1.0` folds to `1.0`, while `1.0`/`1.0000001`
    /// folds to `2.0000001`.
    Merge,
    /// Move the entry onto its mirror only if the mirror is absent or zero
    Reconcile,
}

impl TransformPolicy {
    pub const ALL: [TransformPolicy; 3] = [
        TransformPolicy::Truncate,
        TransformPolicy::Merge,
        TransformPolicy::Reconcile,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            TransformPolicy::Truncate => "truncate",
            TransformPolicy::Merge => "merge",
            TransformPolicy::Reconcile => "reconcile",
        }
    }
}

/// Case-insensitive; `add` and `smart` are accepted as older names of
/// `merge` and `reconcile`
impl FromStr for TransformPolicy {
    type Err = HercmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "truncate" => Ok(TransformPolicy::Truncate),
            "merge" | "add" => Ok(TransformPolicy::Merge),
            "reconcile" | "smart" => Ok(TransformPolicy::Reconcile),
            _ => Err(HercmError::Policy(String::from(s))),
        }
    }
}

impl core::fmt::Display for TransformPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Index of the first entry at every coordinate
fn index_by_coordinates(elements: &[Element]) -> HashMap<(usize, usize), usize> {
    let mut index = HashMap::with_capacity(elements.len());
    for (i, e) in elements.iter().enumerate() {
        index.entry(e.coordinates()).or_insert(i);
    }
    index
}

/// Move each `source` entry onto its mirrored coordinate inside `kept`
fn mirror_into(kept: &mut Vec<Element>, source: Vec<Element>, policy: TransformPolicy) {
    if policy == TransformPolicy::Truncate {
        kept.extend(source.into_iter().map(Element::transposed));
        return;
    }

    let mut index = index_by_coordinates(kept);
    for e in source {
        let target = e.transposed();
        match (index.get(&target.coordinates()), policy) {
            (None, _) => {
                index.insert(target.coordinates(), kept.len());
                kept.push(target);
            }
            (Some(&i), TransformPolicy::Merge) => {
                if kept[i].val != target.val {
                    kept[i].val += target.val;
                }
            }
            (Some(&i), TransformPolicy::Reconcile) => {
                if kept[i].val == 0.0 {
                    kept[i].val = target.val;
                }
            }
            (Some(_), TransformPolicy::Truncate) => {}
        }
    }
}

/// Fold strictly-upper entries into the lower triangle
///
/// The returned list holds no entry with `row < col`.
pub fn fold_upper_into_lower(elements: Vec<Element>, policy: TransformPolicy) -> Vec<Element> {
    let (upper, mut kept): (Vec<Element>, Vec<Element>) =
        elements.into_iter().partition(Element::is_upper);

    if policy != TransformPolicy::Truncate {
        mirror_into(&mut kept, upper, policy);
    }
    kept
}

/// Populate the upper triangle from the strictly-lower entries
///
/// Lower and diagonal entries are kept. Existing upper entries are dropped
/// under `Truncate`, otherwise they resolve against the mirrored lower entry
/// like any other conflict.
pub fn mirror_lower_into_upper(elements: Vec<Element>, policy: TransformPolicy) -> Vec<Element> {
    let mut full = elements;
    if policy == TransformPolicy::Truncate {
        full.retain(|e| !e.is_upper());
    }

    let lower: Vec<Element> = full.iter().copied().filter(Element::is_lower).collect();
    mirror_into(&mut full, lower, policy);
    full
}

impl Matrix {
    /// Switch to symmetric storage
    ///
    /// Upper-triangle entries are resolved against their lower mirror under
    /// `policy`. The matrix must be square. Afterwards the entries are
    /// row-major and zero-free. Already symmetric matrices are left alone.
    pub fn make_symmetrical(&mut self, policy: TransformPolicy) -> Result<()> {
        if self.symmetry() == Symmetry::Symmetric {
            return Ok(());
        }
        let (height, width) = self.dimensions();
        if height != width {
            return Err(HercmError::validation(format!(
                "only square matrices can be symmetric, got {height}x{width}"
            )));
        }

        let elements = self.take_elements();
        self.put_elements(fold_upper_into_lower(elements, policy));
        self.finish_transform(Symmetry::Symmetric);
        Ok(())
    }

    /// Switch to asymmetric storage, materializing the upper triangle
    ///
    /// Afterwards the entries are row-major and zero-free. Already
    /// asymmetric matrices are left alone.
    pub fn make_asymmetrical(&mut self, policy: TransformPolicy) -> Result<()> {
        if self.symmetry() == Symmetry::Asymmetric {
            return Ok(());
        }

        let elements = self.take_elements();
        self.put_elements(mirror_lower_into_upper(elements, policy));
        self.finish_transform(Symmetry::Asymmetric);
        Ok(())
    }

    /// Transform toward `target`, doing nothing if it is already held
    pub fn set_symmetry(&mut self, target: Symmetry, policy: TransformPolicy) -> Result<()> {
        match target {
            Symmetry::Symmetric => self.make_symmetrical(policy),
            Symmetry::Asymmetric => self.make_asymmetrical(policy),
        }
    }

    fn finish_transform(&mut self, symmetry: Symmetry) {
        self.set_symmetry_attribute(symmetry);
        self.mark_modified();
        self.make_row_major();
        self.remove_zeros();
    }

    /// True if the upper triangle, which symmetric storage gives up, holds
    /// no nonzero entry
    ///
    /// Checks content only; the declared symmetry is ignored.
    pub fn check_symmetry(&self) -> bool {
        self.check_upper_triangle()
    }

    /// True if no nonzero entry lies strictly above the diagonal
    pub fn check_upper_triangle(&self) -> bool {
        !self.iter().any(|e| e.is_upper() && e.val != 0.0)
    }

    /// True if no nonzero entry lies strictly below the diagonal
    pub fn check_lower_triangle(&self) -> bool {
        !self.iter().any(|e| e.is_lower() && e.val != 0.0)
    }

    /// True if the logical matrix equals its transpose
    ///
    /// Symmetric storage is symmetric by construction. Otherwise every
    /// off-diagonal nonzero must have an equal mirror; duplicate coordinates
    /// are summed first.
    pub fn is_mirror_symmetric(&self) -> bool {
        if self.symmetry() == Symmetry::Symmetric {
            return true;
        }
        if self.height() != self.width() {
            return false;
        }

        let mut values: HashMap<(usize, usize), f64> = HashMap::with_capacity(self.nzentries());
        for e in self.iter().filter(|e| !e.is_diagonal()) {
            *values.entry(e.coordinates()).or_insert(0.0) += e.val;
        }

        values.iter().all(|(&(row, col), &val)| {
            let mirror = values.get(&(col, row)).copied().unwrap_or(0.0);
            val == mirror
        })
    }
}
