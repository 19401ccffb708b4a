//! HERCM text format
//!
//! Wire vocabulary, typed field values, the header line and the document
//! codec. Everything here works on `&str` and `String`; reading and writing
//! files is left to the host crate.

pub mod codec;
pub mod constants;
pub mod field;
pub mod header;

pub use codec::{parse_document, parse_str, render, to_string, Decoded, Document, FieldBlock};
pub use field::{FieldData, FieldType, FieldValue};
pub use header::{HercmHeader, Magic};
