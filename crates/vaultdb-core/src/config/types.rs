//! Configuration type definitions

use serde::{Deserialize, Serialize};

/// Default number of rows per multi-row INSERT
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Extra hashtag characters accepted beyond ASCII word characters (Hangul syllables)
pub const DEFAULT_TAG_CHARS: &str = "가-힣";

/// Indexing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// File extensions to index (without the dot); empty indexes every file
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Skip dot-files and dot-directories such as `.obsidian/`
    #[serde(default = "default_skip_hidden")]
    pub skip_hidden: bool,

    /// Rows per chunk for batched inserts
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character-class content appended to `[0-9A-Za-z_` in the hashtag pattern
    #[serde(default = "default_tag_chars")]
    pub tag_chars: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            skip_hidden: default_skip_hidden(),
            chunk_size: default_chunk_size(),
            tag_chars: default_tag_chars(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "mdx".to_string()]
}

fn default_skip_hidden() -> bool {
    true
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_tag_chars() -> String {
    DEFAULT_TAG_CHARS.to_string()
}
