//! Reading and writing HERCM files
//!
//! Loading reads the whole file, parses it with the core codec and verifies
//! the checksum before a matrix is handed out; a failed load never returns a
//! partial matrix. Saving renders the complete document in memory, writes it
//! to a temporary file next to the target and renames it into place, so an
//! interrupted save leaves either the old file or the new one.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use hercm_core::format::codec;
use hercm_core::{HercmError, HercmHeader, Matrix};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::CodecConfig;
use crate::error::{Error, Result};

/// Header of a HERCM file on disk, read without loading the entries
#[derive(Debug, Clone)]
pub struct HercmFile {
    pub header: HercmHeader,
    pub path: PathBuf,
}

impl HercmFile {
    /// Open a file and parse its header line
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let reader = BufReader::new(file);

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::io(path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let header = HercmHeader::parse(&line, index + 1)?;
            return Ok(Self {
                header,
                path: path.to_path_buf(),
            });
        }

        Err(HercmError::Header {
            line: 1,
            reason: "input is empty".to_string(),
        }
        .into())
    }

    /// Load the full matrix this header belongs to
    pub fn read_matrix(&self, config: &CodecConfig) -> Result<Matrix> {
        load_with(&self.path, config)
    }
}

/// Load a matrix with the default configuration
pub fn load<P: AsRef<Path>>(path: P) -> Result<Matrix> {
    load_with(path, &CodecConfig::default())
}

/// Load a matrix from `path`
pub fn load_with<P: AsRef<Path>>(path: P, config: &CodecConfig) -> Result<Matrix> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let matrix = read_from(BufReader::new(file), config).map_err(|err| match err {
        Error::Io { source, .. } => Error::io(path, source),
        other => other,
    })?;

    info!(
        path = %path.display(),
        height = matrix.height(),
        width = matrix.width(),
        nzentries = matrix.nzentries(),
        symmetry = %matrix.symmetry(),
        "loaded matrix"
    );
    Ok(matrix)
}

/// Parse a matrix from any buffered reader
///
/// I/O failures are reported against the placeholder path `<reader>`.
pub fn read_from<R: BufRead>(mut reader: R, config: &CodecConfig) -> Result<Matrix> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .map_err(|e| Error::io("<reader>", e))?;

    let document = codec::parse_document(&input)?;
    for block in &document.fields {
        debug!(
            field = %block.name,
            line = block.line,
            field_type = %block.data.field_type(),
            values = block.data.len(),
            "parsed field block"
        );
    }

    let decoded = document.into_matrix(config.coalesce_on_load)?;
    for name in &decoded.ignored_fields {
        debug!(field = %name, "ignoring unknown field");
    }
    if decoded.coalesced > 0 {
        warn!(
            merged = decoded.coalesced,
            "input repeated coordinates, duplicate entries were summed"
        );
    }
    Ok(decoded.matrix)
}

/// Save a matrix with the default configuration
pub fn save<P: AsRef<Path>>(matrix: &Matrix, path: P) -> Result<()> {
    save_with(matrix, path, &CodecConfig::default())
}

/// Save a matrix to `path`, replacing any existing file atomically
///
/// Fails without touching the file system if the matrix verification is
/// stale or a remark cannot be written.
pub fn save_with<P: AsRef<Path>>(matrix: &Matrix, path: P, config: &CodecConfig) -> Result<()> {
    let path = path.as_ref();
    let text = codec::render(matrix, config.magic, config.tokens_per_line)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    temp.write_all(text.as_bytes())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| Error::io(temp.path(), e))?;
    temp.persist(path).map_err(|e| Error::io(path, e.error))?;

    info!(
        path = %path.display(),
        nzentries = matrix.nzentries(),
        symmetry = %matrix.symmetry(),
        bytes = text.len(),
        "saved matrix"
    );
    Ok(())
}

/// Write a matrix to any writer
///
/// No temporary file is involved; the caller owns atomicity.
pub fn write_to<W: Write>(matrix: &Matrix, mut writer: W, config: &CodecConfig) -> Result<()> {
    let text = codec::render(matrix, config.magic, config.tokens_per_line)?;
    writer
        .write_all(text.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io("<writer>", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hercm_core::{Magic, Symmetry};

    fn sample() -> Matrix {
        let mut m = Matrix::new(4, 3).unwrap();
        m.set_value(0, 2, 1.5).unwrap();
        m.set_value(3, 0, -2.0).unwrap();
        m.add_remark("sample");
        m.refresh_verification();
        m
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.hercm");
        let m = sample();
        save(&m, &path).unwrap();

        let back = load(&path).unwrap();
        assert_eq!(back.dimensions(), (4, 3));
        assert_eq!(back.get_value(3, 0), Ok(-2.0));
        assert_eq!(back.remarks(), m.remarks());
    }

    #[test]
    fn test_open_reads_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.bxf");
        let config = CodecConfig::default().with_magic(Magic::Bxf);
        save_with(&sample(), &path, &config).unwrap();

        let file = HercmFile::open(&path).unwrap();
        assert_eq!(file.header.magic, Magic::Bxf);
        assert_eq!(file.header.nzentries, 2);
        assert_eq!(file.header.symmetry, Symmetry::Asymmetric);
        assert_eq!(file.read_matrix(&config).unwrap().nzentries(), 2);
    }

    #[test]
    fn test_stale_save_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stale.hercm");
        let mut m = sample();
        m.set_value(1, 1, 3.0).unwrap();

        let err = save(&m, &path).unwrap_err();
        assert!(matches!(err, Error::Core(HercmError::Validation(_))));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.hercm");
        match load(&path) {
            Err(Error::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_write_to_and_read_from_buffers() {
        let mut buffer = Vec::new();
        write_to(&sample(), &mut buffer, &CodecConfig::default()).unwrap();
        let back = read_from(buffer.as_slice(), &CodecConfig::default()).unwrap();
        assert_eq!(back.nzentries(), 2);
    }
}
