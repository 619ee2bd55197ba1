//! Record types shared by the parser, graph assembler and store

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VaultError;
use crate::metadata::Metadata;

/// Kind of edge between two files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    #[default]
    Normal,
    Embed,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Normal => "normal",
            LinkType::Embed => "embed",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(LinkType::Normal),
            "embed" => Ok(LinkType::Embed),
            other => Err(VaultError::invalid_value("link type", other)),
        }
    }
}

/// A parsed file, before the store assigns it an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_path: String,
    pub url_path: String,
    pub file_type: String,
    pub metadata: Metadata,
}

/// A persisted file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: i64,
    pub file_path: String,
    pub url_path: String,
    pub file_type: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Association row between a file and a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileTag {
    pub file_id: i64,
    pub tag_id: i64,
}

/// One file-tag association with the tag's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTagRow {
    pub file_id: i64,
    pub tag_id: i64,
    pub name: String,
}

/// A link as extracted from a document: both ends are url paths
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawLink {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
}

/// A resolved link ready for insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewLink {
    pub source_file_id: i64,
    pub target_file_id: i64,
    pub link_type: LinkType,
}

/// A persisted link with both endpoints' url paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub source_file_id: i64,
    pub target_file_id: i64,
    pub source: String,
    pub target: String,
    pub link_type: LinkType,
}
