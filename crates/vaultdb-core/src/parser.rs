//! File parser: raw text to a [`FileRecord`] plus its raw links

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::bail_usage;
use crate::config::{IndexConfig, DEFAULT_TAG_CHARS};
use crate::error::{Result, VaultError};
use crate::extract::{default_extractors, LinkExtractor};
use crate::markdown::{Document, NodeKind, NodeType, TreePlugin, WikiLinkPlugin};
use crate::metadata::{extract_metadata, split_metadata, HashtagMatcher, Metadata};
use crate::paths::{encode_file_path, fix_path, split_file_path};
use crate::records::{FileRecord, LinkType, RawLink};

/// One parsed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedFile {
    pub file: FileRecord,
    pub links: Vec<RawLink>,
    /// Wiki-links whose target matched no permalink
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<RawLink>,
}

pub struct Parser {
    wiki: WikiLinkPlugin,
    plugins: Vec<Box<dyn TreePlugin>>,
    custom_extractors: Vec<Box<dyn LinkExtractor>>,
    builtin_extractors: Vec<Box<dyn LinkExtractor>>,
    hashtags: HashtagMatcher,
}

impl Parser {
    /// Parser resolving wiki-links against `permalinks`, with default hashtag
    /// characters
    pub fn new(permalinks: Vec<String>) -> Result<Self> {
        Self::with_tag_chars(permalinks, DEFAULT_TAG_CHARS)
    }

    pub fn with_tag_chars(permalinks: Vec<String>, tag_chars: &str) -> Result<Self> {
        Ok(Self {
            wiki: WikiLinkPlugin::new(permalinks)?,
            plugins: Vec::new(),
            custom_extractors: Vec::new(),
            builtin_extractors: default_extractors(),
            hashtags: HashtagMatcher::new(tag_chars)?,
        })
    }

    pub fn from_config(permalinks: Vec<String>, config: &IndexConfig) -> Result<Self> {
        Self::with_tag_chars(permalinks, &config.tag_chars)
    }

    /// Add a tree plugin; plugins run in insertion order
    pub fn plugin(mut self, plugin: Box<dyn TreePlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Add an extractor; custom extractors run before the built-ins
    pub fn extractor(mut self, extractor: Box<dyn LinkExtractor>) -> Self {
        self.custom_extractors.push(extractor);
        self
    }

    fn extractors(&self) -> impl Iterator<Item = &dyn LinkExtractor> {
        self.custom_extractors
            .iter()
            .chain(self.builtin_extractors.iter())
            .map(|e| e.as_ref())
    }

    /// Build the document tree for a markdown body
    pub fn parse_tree(&self, body: &str) -> Document {
        Document::build(body, &self.wiki, &self.plugins)
    }

    pub fn parse_metadata(&self, content: &str) -> Metadata {
        extract_metadata(content, &self.hashtags)
    }

    /// Run every extractor over `doc`.
    ///
    /// A `(target, link_type)` pair is emitted once per document no matter how
    /// often it occurs or how many extractors find it.
    pub fn parse_links(&self, doc: &Document, source: &str) -> Vec<RawLink> {
        let mut seen: HashSet<(String, Option<LinkType>)> = HashSet::new();
        let mut links = Vec::new();

        for extractor in self.extractors() {
            let link_type = extractor.link_type();
            for target in extractor.extract(doc) {
                if !seen.insert((target.clone(), link_type)) {
                    continue;
                }
                links.push(RawLink {
                    source: source.to_string(),
                    target,
                    link_type,
                });
            }
        }
        links
    }

    /// Wiki-links in `doc` that matched no permalink, once per
    /// `(target, link_type)`. The extractors skip these; they are kept so the
    /// pipeline can report them as dangling.
    pub fn unresolved_links(&self, doc: &Document, source: &str) -> Vec<RawLink> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();
        doc.visit(NodeType::WikiLink, |node| {
            let NodeKind::WikiLink(link) = &node.kind else {
                return;
            };
            if link.exists || link.permalink.is_empty() {
                return;
            }
            let link_type = if link.is_embed {
                LinkType::Embed
            } else {
                LinkType::Normal
            };
            let target = fix_path(&link.permalink);
            if seen.insert((target.clone(), link_type)) {
                links.push(RawLink {
                    source: source.to_string(),
                    target,
                    link_type: Some(link_type),
                });
            }
        });
        links
    }

    /// Parse already-read file content. `file_path` and `root` only determine
    /// the record's url path and file type.
    pub fn parse_content(&self, content: &str, file_path: &str, root: &str) -> ParsedFile {
        let (metadata, body) = split_metadata(content, &self.hashtags);
        let doc = self.parse_tree(body);
        let (url_path, file_type) = split_file_path(file_path, root);
        let links = self.parse_links(&doc, &url_path);
        let unresolved = self.unresolved_links(&doc, &url_path);

        ParsedFile {
            file: FileRecord {
                file_path: encode_file_path(file_path),
                url_path,
                file_type,
                metadata,
            },
            links,
            unresolved,
        }
    }

    /// Read and parse one file of the vault rooted at `root`
    pub fn parse_file(&self, path: &Path, root: &Path) -> Result<ParsedFile> {
        let bytes =
            fs::read(path).map_err(|e| VaultError::io_operation("read", path.display(), e))?;
        let content = String::from_utf8_lossy(&bytes);

        let canonical_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let canonical_root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        if !canonical_path.starts_with(&canonical_root) {
            bail_usage!(format!(
                "{} is not inside vault {}",
                path.display(),
                root.display()
            ));
        }

        let mut parsed = self.parse_content(
            &content,
            &canonical_path.to_string_lossy(),
            &canonical_root.to_string_lossy(),
        );
        parsed.file.file_path = encode_file_path(&path.to_string_lossy());
        Ok(parsed)
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field(
                "plugins",
                &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("custom_extractors", &self.custom_extractors.len())
            .finish_non_exhaustive()
    }
}
