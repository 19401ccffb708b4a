//! Header line of a HERCM file
//!
//! ```text
//! <MAGIC> <width> <height> <nzentries> <SYM|ASYM> <verification>
//! ```

use alloc::format;
use alloc::string::String;

use crate::error::{HercmError, Result};
use crate::format::constants::{HEADER_TOKENS, MAGIC_BXF, MAGIC_HERCM};
use crate::format::field::write_float;
use crate::symmetry::Symmetry;

/// Magic token opening the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Magic {
    #[default]
    Hercm,
    Bxf,
}

impl Magic {
    pub const fn token(self) -> &'static str {
        match self {
            Magic::Hercm => MAGIC_HERCM,
            Magic::Bxf => MAGIC_BXF,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            MAGIC_HERCM => Some(Magic::Hercm),
            MAGIC_BXF => Some(Magic::Bxf),
            _ => None,
        }
    }
}

impl core::fmt::Display for Magic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.token())
    }
}

/// Parsed header line
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HercmHeader {
    pub magic: Magic,
    pub width: usize,
    pub height: usize,
    pub nzentries: usize,
    pub symmetry: Symmetry,
    pub verification: f64,
}

impl HercmHeader {
    /// Parse a header line; `line` is the 1-based line number used in errors
    pub fn parse(text: &str, line: usize) -> Result<Self> {
        let header_err = |reason: String| HercmError::Header { line, reason };

        let tokens: alloc::vec::Vec<&str> = text.split_whitespace().collect();
        let [magic, width, height, nzentries, symmetry, verification] = tokens[..] else {
            return Err(header_err(format!(
                "expected {HEADER_TOKENS} tokens, found {}",
                tokens.len()
            )));
        };

        let magic = Magic::from_token(magic)
            .ok_or_else(|| header_err(format!("unknown magic \"{magic}\"")))?;
        let dimension = |token: &str, name: &str| -> Result<usize> {
            token
                .parse::<usize>()
                .map_err(|_| header_err(format!("{name} \"{token}\" is not a non-negative integer")))
        };
        let width = dimension(width, "width")?;
        let height = dimension(height, "height")?;
        let nzentries = dimension(nzentries, "nzentries")?;
        let symmetry = Symmetry::from_token(symmetry).ok_or_else(|| {
            header_err(format!("symmetry \"{symmetry}\" is neither SYM nor ASYM"))
        })?;
        let verification = verification
            .parse::<f64>()
            .map_err(|_| header_err(format!("verification \"{verification}\" is not a number")))?;

        let header = Self {
            magic,
            width,
            height,
            nzentries,
            symmetry,
            verification,
        };
        header.validate().map_err(header_err)?;
        Ok(header)
    }

    /// Check the attributes for internal consistency
    fn validate(&self) -> core::result::Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "dimensions must be positive, got {}x{}",
                self.height, self.width
            ));
        }
        if self.symmetry == Symmetry::Symmetric && self.width != self.height {
            return Err(format!(
                "symmetric matrix must be square, got {}x{}",
                self.height, self.width
            ));
        }
        // nnz can never exceed the number of cells
        match self.height.checked_mul(self.width) {
            Some(cells) if self.nzentries <= cells => Ok(()),
            Some(cells) => Err(format!(
                "nzentries {} exceeds the {cells} cells of the matrix",
                self.nzentries
            )),
            None => Err(format!(
                "dimensions {}x{} overflow",
                self.height, self.width
            )),
        }
    }
}

impl core::fmt::Display for HercmHeader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} {} {} {} ",
            self.magic, self.width, self.height, self.nzentries, self.symmetry
        )?;
        write_float(f, self.verification)
    }
}
