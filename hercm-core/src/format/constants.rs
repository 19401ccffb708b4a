//! Wire vocabulary of the HERCM text format

/// Header magic written by default
pub const MAGIC_HERCM: &str = "HERCM";

/// Alternate header magic used by BXF-era writers
pub const MAGIC_BXF: &str = "BXF";

/// Symmetry tokens in the header
pub const SYMMETRIC: &str = "SYM";
pub const ASYMMETRIC: &str = "ASYM";

/// Terminator line of every field block
pub const END_FIELD: &str = "ENDFIELD";

/// Field value type tokens
pub const TYPE_INT: &str = "INT";
pub const TYPE_FLOAT: &str = "FLOAT";
pub const TYPE_STRING: &str = "STRING";

/// Legacy container tokens accepted between field name and type
pub const CONTAINER_LIST: &str = "LIST";
pub const CONTAINER_SINGLE: &str = "SINGLE";

/// Required field names
pub mod fields {
    pub const REMARKS: &str = "REMARKS";
    pub const VAL: &str = "VAL";
    pub const ROW: &str = "ROW";
    pub const COL: &str = "COL";
}

/// Number of whitespace-separated tokens in a header line
pub const HEADER_TOKENS: usize = 6;

/// Default number of data tokens per line in a field block
pub const DEFAULT_TOKENS_PER_LINE: usize = 9;
