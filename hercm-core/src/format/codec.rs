//! Text codec for whole HERCM documents
//!
//! A document is a header line followed by field blocks:
//!
//! ```text
//! HERCM 3 3 2 ASYM 0.5
//! REMARKS STRING
//! generated-by-solver
//! ENDFIELD
//! VAL FLOAT
//! 1.0 2.5
//! ENDFIELD
//! ROW INT
//! 0 2
//! ENDFIELD
//! COL INT
//! 1 0
//! ENDFIELD
//! ```
//!
//! Decoding runs in two steps so that callers can inspect the raw blocks
//! (for logging, or to read fields this crate does not know about) before
//! the matrix is assembled: [`parse_document`] then [`Document::into_matrix`].

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Write;

use crate::checksum;
use crate::error::{HercmError, Result};
use crate::format::constants::{
    fields, CONTAINER_LIST, CONTAINER_SINGLE, DEFAULT_TOKENS_PER_LINE, END_FIELD,
};
use crate::format::field::{FieldData, FieldType};
use crate::format::header::{HercmHeader, Magic};
use crate::matrix::Matrix;

/// One parsed field block
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBlock {
    pub name: String,
    /// Line of the block's header, 1-based
    pub line: usize,
    pub data: FieldData,
}

/// Header and field blocks of a document, not yet assembled into a matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub header: HercmHeader,
    pub fields: Vec<FieldBlock>,
}

/// Result of assembling a [`Document`]
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub matrix: Matrix,
    /// Entries merged away because they repeated a coordinate
    pub coalesced: usize,
    /// Names of blocks that were parsed but carry no meaning here
    pub ignored_fields: Vec<String>,
}

/// Parse the header of a field block: `<NAME> <TYPE>` or the older
/// `<NAME> LIST|SINGLE <TYPE>`
///
/// Returns the name, the type and whether exactly one value is expected.
fn parse_block_header(text: &str, line: usize) -> Result<(String, FieldType, bool)> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (name, container, type_token) = match tokens[..] {
        [name, ty] => (name, None, ty),
        [name, container, ty] => (name, Some(container), ty),
        _ => {
            let name = tokens.first().copied().unwrap_or("?");
            return Err(HercmError::field(
                name,
                line,
                format!("expected \"<NAME> <TYPE>\", found \"{}\"", text.trim()),
            ));
        }
    };

    let single = match container {
        None | Some(CONTAINER_LIST) => false,
        Some(CONTAINER_SINGLE) => true,
        Some(other) => {
            return Err(HercmError::field(
                name,
                line,
                format!("unknown container \"{other}\""),
            ))
        }
    };
    let field_type = type_token
        .parse::<FieldType>()
        .map_err(|reason| HercmError::field(name, line, reason))?;

    Ok((name.to_string(), field_type, single))
}

/// Split a document into its header and raw field blocks
///
/// Blank lines outside blocks are skipped. A block that reaches the end of
/// input without `ENDFIELD`, a token that does not parse as the block's type,
/// or a second block with the same name is a [`HercmError::FieldParse`].
pub fn parse_document(input: &str) -> Result<Document> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, text))
        .filter(|(_, text)| !text.trim().is_empty());

    let (header_line, header_text) = lines.next().ok_or_else(|| HercmError::Header {
        line: 1,
        reason: "input is empty".to_string(),
    })?;
    let header = HercmHeader::parse(header_text, header_line)?;

    let mut fields: Vec<FieldBlock> = Vec::new();
    while let Some((line, text)) = lines.next() {
        let (name, field_type, single) = parse_block_header(text, line)?;
        if fields.iter().any(|f| f.name == name) {
            return Err(HercmError::field(&name, line, "duplicate field block"));
        }

        let mut data = FieldData::empty(field_type);
        let mut terminated = false;
        for (data_line, data_text) in lines.by_ref() {
            if data_text.trim() == END_FIELD {
                terminated = true;
                break;
            }
            data.extend_from_line(data_text)
                .map_err(|reason| HercmError::field(&name, data_line, reason))?;
        }
        if !terminated {
            return Err(HercmError::field(
                &name,
                line,
                format!("input ended before {END_FIELD}"),
            ));
        }
        if single && data.len() != 1 {
            return Err(HercmError::field(
                &name,
                line,
                format!("SINGLE block holds {} values", data.len()),
            ));
        }

        fields.push(FieldBlock { name, line, data });
    }

    Ok(Document { header, fields })
}

impl Document {
    /// Block with the given name, if present
    pub fn field(&self, name: &str) -> Option<&FieldBlock> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn take_field(&mut self, name: &'static str, expected: FieldType) -> Result<FieldData> {
        let index = self
            .fields
            .iter()
            .position(|f| f.name == name)
            .ok_or(HercmError::MissingField(name))?;
        let block = self.fields.remove(index);
        if block.data.field_type() != expected {
            return Err(HercmError::field(
                name,
                block.line,
                format!("expected {expected}, found {}", block.data.field_type()),
            ));
        }
        Ok(block.data)
    }

    /// Assemble the matrix described by this document
    ///
    /// The header's verification must match the sum of the raw `ROW`, `COL`
    /// and `VAL` columns, taken either in file order or in canonical order.
    /// With `coalesce` set, entries repeating a coordinate are summed after
    /// verification and the verification is refreshed if anything merged.
    pub fn into_matrix(mut self, coalesce: bool) -> Result<Decoded> {
        let header = self.header;

        let FieldData::Str(remarks) = self.take_field(fields::REMARKS, FieldType::String)? else {
            return Err(HercmError::MissingField(fields::REMARKS));
        };
        let FieldData::Float(vals) = self.take_field(fields::VAL, FieldType::Float)? else {
            return Err(HercmError::MissingField(fields::VAL));
        };
        let FieldData::Int(rows) = self.take_field(fields::ROW, FieldType::Int)? else {
            return Err(HercmError::MissingField(fields::ROW));
        };
        let FieldData::Int(cols) = self.take_field(fields::COL, FieldType::Int)? else {
            return Err(HercmError::MissingField(fields::COL));
        };

        if rows.len() != vals.len() || cols.len() != vals.len() {
            return Err(HercmError::validation(format!(
                "ROW, COL and VAL differ in length: {}, {}, {}",
                rows.len(),
                cols.len(),
                vals.len()
            )));
        }
        if vals.len() != header.nzentries {
            return Err(HercmError::validation(format!(
                "header declares {} entries but the fields hold {}",
                header.nzentries,
                vals.len()
            )));
        }

        let mut matrix = Matrix::with_symmetry(header.height, header.width, header.symmetry)?;
        for ((&row, &col), &val) in rows.iter().zip(&cols).zip(&vals) {
            let in_bounds = |index: i64, limit: usize| usize::try_from(index).ok().filter(|&i| i < limit);
            match (in_bounds(row, header.height), in_bounds(col, header.width)) {
                (Some(row), Some(col)) => matrix.add_element(row, col, val)?,
                _ => {
                    return Err(HercmError::OutOfBounds {
                        row,
                        col,
                        height: header.height,
                        width: header.width,
                    })
                }
            }
        }

        let file_order = checksum::sum_fields(&vals, &rows, &cols);
        let canonical = checksum::generate_verification_sum(matrix.elements());
        if header.verification != file_order && header.verification != canonical {
            return Err(HercmError::validation(format!(
                "verification mismatch: header has {}, content sums to {canonical}",
                header.verification
            )));
        }
        if header.verification == canonical {
            matrix.set_loaded_verification(header.verification);
        } else {
            // matched the file-order sum only; keep the value a later save writes
            matrix.refresh_verification();
        }

        for remark in remarks {
            matrix.add_remark(remark);
        }

        let coalesced = if coalesce {
            matrix.coalesce_duplicates()
        } else {
            0
        };
        if coalesced > 0 {
            matrix.refresh_verification();
        }

        Ok(Decoded {
            matrix,
            coalesced,
            ignored_fields: self.fields.into_iter().map(|f| f.name).collect(),
        })
    }
}

/// Parse a complete document into a matrix, coalescing duplicate coordinates
pub fn parse_str(input: &str) -> Result<Matrix> {
    Ok(parse_document(input)?.into_matrix(true)?.matrix)
}

fn write_document(
    out: &mut String,
    header: &HercmHeader,
    blocks: &[(&str, FieldData)],
    tokens_per_line: usize,
) -> core::fmt::Result {
    writeln!(out, "{header}")?;
    for (name, data) in blocks {
        writeln!(out, "{name} {}", data.field_type())?;
        data.write_lines(out, tokens_per_line)?;
        writeln!(out, "{END_FIELD}")?;
    }
    Ok(())
}

/// Render a matrix as a document
///
/// The verification must be fresh and every remark must be a single
/// non-empty token, otherwise this is a [`HercmError::Validation`]. Entries
/// are written in row-major order; a symmetric matrix writes only its
/// stored triangle.
pub fn render(matrix: &Matrix, magic: Magic, tokens_per_line: usize) -> Result<String> {
    let verification = match matrix.verification() {
        Some(v) if matrix.is_verification_fresh() => v,
        _ => {
            return Err(HercmError::validation(
                "verification is stale, call refresh_verification before writing",
            ))
        }
    };
    if let Some(bad) = matrix
        .remarks()
        .iter()
        .find(|r| r.is_empty() || r.chars().any(char::is_whitespace))
    {
        return Err(HercmError::validation(format!(
            "remark \"{bad}\" must be a single non-empty token"
        )));
    }

    let mut elements = matrix.elements().to_vec();
    elements.sort_by(|a, b| a.row.cmp(&b.row).then(a.col.cmp(&b.col)));

    let header = HercmHeader {
        magic,
        width: matrix.width(),
        height: matrix.height(),
        nzentries: elements.len(),
        symmetry: matrix.symmetry(),
        verification,
    };
    let blocks = [
        (fields::REMARKS, FieldData::Str(matrix.remarks().to_vec())),
        (
            fields::VAL,
            FieldData::Float(elements.iter().map(|e| e.val).collect()),
        ),
        (
            fields::ROW,
            FieldData::Int(elements.iter().map(|e| e.row as i64).collect()),
        ),
        (
            fields::COL,
            FieldData::Int(elements.iter().map(|e| e.col as i64).collect()),
        ),
    ];

    let mut out = String::new();
    write_document(&mut out, &header, &blocks, tokens_per_line)
        .map_err(|_| HercmError::validation("failed to format document"))?;
    Ok(out)
}

/// [`render`] with the default magic and line width
pub fn to_string(matrix: &Matrix) -> Result<String> {
    render(matrix, Magic::default(), DEFAULT_TOKENS_PER_LINE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Element;
    use crate::symmetry::Symmetry;
    use alloc::vec;

    const SAMPLE: &str = "\
HERCM 3 3 2 ASYM 0.5
REMARKS STRING
ENDFIELD
VAL FLOAT
1.0 2.5
ENDFIELD
ROW INT
0 2
ENDFIELD
COL INT
1 0
ENDFIELD
";

    #[test]
    fn test_parse_sample() {
        // 3.5 + 1 + 2 = 6.5, mod 2
        let m = parse_str(SAMPLE).unwrap();
        assert_eq!(m.dimensions(), (3, 3));
        assert_eq!(m.nzentries(), 2);
        assert_eq!(m.get_value(0, 1), Ok(1.0));
        assert_eq!(m.get_value(2, 0), Ok(2.5));
        assert_eq!(m.verification(), Some(0.5));
        assert!(m.is_verification_fresh());
    }

    #[test]
    fn test_render_then_parse() {
        let mut m = Matrix::with_symmetry(5, 5, Symmetry::Symmetric).unwrap();
        m.set_value(2, 2, 7.5).unwrap();
        m.set_value(0, 3, -0.1).unwrap();
        m.add_remark("scenario");
        m.refresh_verification();

        let text = to_string(&m).unwrap();
        assert!(text.starts_with("HERCM 5 5 2 SYM "));

        let back = parse_str(&text).unwrap();
        assert_eq!(back.symmetry(), Symmetry::Symmetric);
        assert_eq!(back.remarks(), &["scenario".to_string()]);
        assert_eq!(
            back.elements(),
            &[Element::new(2, 2, 7.5), Element::new(3, 0, -0.1)]
        );
    }

    #[test]
    fn test_render_wraps_tokens() {
        let mut m = Matrix::filled(2, 3, 1.0).unwrap();
        m.refresh_verification();
        let text = render(&m, Magic::Bxf, 4).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("BXF 3 2 6 ASYM "));
        assert_eq!(lines[1], "REMARKS STRING");
        assert_eq!(lines[2], "ENDFIELD");
        assert_eq!(lines[3], "VAL FLOAT");
        assert_eq!(lines[4], "1.0 1.0 1.0 1.0");
        assert_eq!(lines[5], "1.0 1.0");
        assert_eq!(lines[6], "ENDFIELD");
        assert_eq!(lines[8], "0 0 0 1");
    }

    #[test]
    fn test_render_refuses_stale_verification() {
        let mut m = Matrix::new(2, 2).unwrap();
        m.set_value(0, 0, 1.0).unwrap();
        assert!(matches!(to_string(&m), Err(HercmError::Validation(_))));

        m.refresh_verification();
        m.set_value(1, 1, 1.0).unwrap();
        assert!(matches!(to_string(&m), Err(HercmError::Validation(_))));
    }

    #[test]
    fn test_render_refuses_unwritable_remark() {
        let mut m = Matrix::new(2, 2).unwrap();
        m.add_remark("two words");
        m.refresh_verification();
        assert!(matches!(to_string(&m), Err(HercmError::Validation(_))));
    }

    #[test]
    fn test_legacy_block_headers() {
        let text = SAMPLE
            .replace("REMARKS STRING", "REMARKS LIST STRING")
            .replace("VAL FLOAT", "VAL LIST FLOAT");
        assert_eq!(parse_str(&text).unwrap().nzentries(), 2);

        let single = SAMPLE.replace("ROW INT", "ROW SINGLE INT");
        assert!(matches!(
            parse_str(&single),
            Err(HercmError::FieldParse { .. })
        ));
    }

    #[test]
    fn test_blank_lines_and_unknown_fields() {
        let text = SAMPLE.replace(
            "VAL FLOAT",
            "\nSOURCE STRING\nsolver\nENDFIELD\n\nVAL FLOAT",
        );
        let decoded = parse_document(&text).unwrap().into_matrix(true).unwrap();
        assert_eq!(decoded.ignored_fields, vec!["SOURCE".to_string()]);
        assert_eq!(decoded.matrix.nzentries(), 2);
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(parse_str(""), Err(HercmError::Header { line: 1, .. })));

        let unterminated = SAMPLE.trim_end().trim_end_matches("ENDFIELD");
        assert!(matches!(
            parse_str(unterminated),
            Err(HercmError::FieldParse { .. })
        ));

        let mistyped = SAMPLE.replace("0 2\n", "0 two\n");
        assert!(matches!(
            parse_str(&mistyped),
            Err(HercmError::FieldParse { line: 8, .. })
        ));

        let duplicated = format!("{SAMPLE}COL INT\n1 0\nENDFIELD\n");
        assert!(matches!(
            parse_str(&duplicated),
            Err(HercmError::FieldParse { .. })
        ));

        let wrong_type = SAMPLE.replace("ROW INT\n0 2", "ROW FLOAT\n0 2");
        assert!(matches!(
            parse_str(&wrong_type),
            Err(HercmError::FieldParse { .. })
        ));

        let missing = SAMPLE.replace("REMARKS STRING\nENDFIELD\n", "");
        assert_eq!(
            parse_str(&missing),
            Err(HercmError::MissingField("REMARKS"))
        );
    }

    #[test]
    fn test_content_errors() {
        let short = SAMPLE.replace("1 0\n", "1\n");
        assert!(matches!(parse_str(&short), Err(HercmError::Validation(_))));

        let miscounted = SAMPLE.replace(" 3 2 ", " 3 1 ");
        assert!(matches!(parse_str(&miscounted), Err(HercmError::Validation(_))));

        let negative = SAMPLE.replace("0 2\n", "-1 2\n");
        assert!(matches!(
            parse_str(&negative),
            Err(HercmError::OutOfBounds { row: -1, .. })
        ));

        let corrupted = SAMPLE.replace("2.5", "2.25");
        assert!(matches!(parse_str(&corrupted), Err(HercmError::Validation(_))));
    }

    #[test]
    fn test_duplicates_are_summed_on_load() {
        // vals 3, cols 2, rows 2 -> 7 mod 3 = 1
        let text = "\
HERCM 2 2 3 ASYM 1.0
REMARKS STRING
ENDFIELD
VAL FLOAT
1.0 1.0 1.0
ENDFIELD
ROW INT
1 1 0
ENDFIELD
COL INT
0 0 2
ENDFIELD
";
        // column 2 is outside a 2x2 matrix
        assert!(matches!(parse_str(text), Err(HercmError::OutOfBounds { .. })));

        let text = text.replace("0 0 2", "0 0 1");
        // vals 3, cols 1, rows 2 -> 6 mod 3 = 0
        let text = text.replace("ASYM 1.0", "ASYM 0.0");
        let decoded = parse_document(&text).unwrap().into_matrix(true).unwrap();
        assert_eq!(decoded.coalesced, 1);
        assert_eq!(decoded.matrix.get_value(1, 0), Ok(2.0));
        assert!(decoded.matrix.is_verification_fresh());

        let raw = parse_document(&text).unwrap().into_matrix(false).unwrap();
        assert_eq!(raw.coalesced, 0);
        assert_eq!(raw.matrix.nzentries(), 3);
    }

    #[test]
    fn test_symmetric_file_with_upper_entries_self_corrects() {
        // 4.0 + 1 + 0 = 5 mod 1 = 0
        let text = "\
HERCM 2 2 1 SYM 0.0
REMARKS STRING
ENDFIELD
VAL FLOAT
4.0
ENDFIELD
ROW INT
0
ENDFIELD
COL INT
1
ENDFIELD
";
        let m = parse_str(text).unwrap();
        assert_eq!(m.elements(), &[Element::new(1, 0, 4.0)]);
        assert_eq!(m.get_value(0, 1), Ok(4.0));
    }

    #[test]
    fn test_file_order_checksum_is_replaced_on_load() {
        // file order: 1 + 1e16 loses the 1, so vals 0, cols 0, rows 3 -> 0
        // row-major:  1e16 - 1e16 + 1 = 1, plus rows 3 -> 4 mod 3 = 1
        let text = "\
BXF 1 3 3 ASYM 0
REMARKS STRING
ENDFIELD
VAL FLOAT
1.0 1e16 -1e16
ENDFIELD
ROW INT
2 0 1
ENDFIELD
COL INT
0 0 0
ENDFIELD
";
        let m = parse_str(text).unwrap();
        assert!(m.is_verification_fresh());
        assert_eq!(m.verification(), Some(1.0));
        assert_eq!(crate::checksum::verify(&m), Ok(true));

        let rendered = to_string(&m).unwrap();
        let back = parse_str(&rendered).unwrap();
        assert_eq!(back.verification(), Some(1.0));
        assert_eq!(back.get_value(2, 0), Ok(1.0));
    }
}
