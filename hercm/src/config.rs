//! Codec settings for reading and writing HERCM files

use hercm_core::format::constants::DEFAULT_TOKENS_PER_LINE;
use hercm_core::Magic;

/// How matrices are written to and read from disk
///
/// Readers accept either magic whatever `magic` is set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecConfig {
    /// Header magic written on save
    pub magic: Magic,
    /// Data tokens per line inside a field block
    pub tokens_per_line: usize,
    /// Sum entries that share a coordinate right after loading
    pub coalesce_on_load: bool,
}

impl CodecConfig {
    /// Set the header magic written on save
    pub fn with_magic(mut self, magic: Magic) -> Self {
        self.magic = magic;
        self
    }

    /// Set the number of data tokens per line, at least one
    pub fn with_tokens_per_line(mut self, tokens_per_line: usize) -> Self {
        self.tokens_per_line = tokens_per_line.max(1);
        self
    }

    /// Keep or merge duplicate coordinates on load
    pub fn with_coalesce_on_load(mut self, coalesce: bool) -> Self {
        self.coalesce_on_load = coalesce;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            magic: Magic::Hercm,
            tokens_per_line: DEFAULT_TOKENS_PER_LINE,
            coalesce_on_load: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = CodecConfig::default()
            .with_magic(Magic::Bxf)
            .with_tokens_per_line(0)
            .with_coalesce_on_load(false);
        assert_eq!(config.magic, Magic::Bxf);
        assert_eq!(config.tokens_per_line, 1);
        assert!(!config.coalesce_on_load);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let config = CodecConfig::default().with_tokens_per_line(4);
        let json = serde_json::to_string(&config).unwrap();
        let back: CodecConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
