//! Indexing pipeline
//!
//! walk → parse every file → recreate schema → insert files and tags →
//! project `(id, url_path)` → resolve links → insert links.
//!
//! Files must be persisted before links can reference them, so resolution only
//! ever sees the post-insert projection.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::config::IndexConfig;
use crate::db::Database;
use crate::error::Result;
use crate::extract::LinkExtractor;
use crate::graph::{resolve_links, unresolved_dangling, DanglingLink, UrlPathIndex};
use crate::markdown::TreePlugin;
use crate::parser::{ParsedFile, Parser};
use crate::paths::{encode_file_path, list_all_files, permalink_for, split_file_path};
use crate::trace_time;

/// Outcome of one indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub files: usize,
    pub tags: usize,
    pub file_tags: usize,
    pub links: usize,
    /// Files that could not be read
    pub skipped: Vec<String>,
    pub dangling: Vec<DanglingLink>,
}

/// Builder for an indexing run over one vault
pub struct VaultIndexer {
    root: PathBuf,
    config: IndexConfig,
    permalinks: Option<Vec<String>>,
    plugins: Vec<Box<dyn TreePlugin>>,
    extractors: Vec<Box<dyn LinkExtractor>>,
}

impl VaultIndexer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: IndexConfig::default(),
            permalinks: None,
            plugins: Vec::new(),
            extractors: Vec::new(),
        }
    }

    pub fn config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Use these permalinks instead of the ones derived from the walk
    pub fn permalinks(mut self, permalinks: Vec<String>) -> Self {
        self.permalinks = Some(permalinks);
        self
    }

    pub fn plugin(mut self, plugin: Box<dyn TreePlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn extractor(mut self, extractor: Box<dyn LinkExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Validate the configuration and prepare the parser
    pub fn build(self) -> Result<VaultIndex> {
        self.config.validate()?;
        Ok(VaultIndex {
            root: self.root,
            config: self.config,
            permalinks: self.permalinks,
            plugins: self.plugins,
            extractors: self.extractors,
        })
    }
}

/// A configured indexing run
pub struct VaultIndex {
    root: PathBuf,
    config: IndexConfig,
    permalinks: Option<Vec<String>>,
    plugins: Vec<Box<dyn TreePlugin>>,
    extractors: Vec<Box<dyn LinkExtractor>>,
}

impl VaultIndex {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Index the vault into `db`, replacing whatever it held.
    ///
    /// Drops every table first: nothing else may use `db` while this runs.
    #[tracing::instrument(skip(self, db), fields(root = %self.root.display()))]
    pub fn index_into(self, db: &Database) -> Result<IndexReport> {
        let start = Instant::now();
        let root_str = encode_file_path(&self.root.to_string_lossy());

        let paths = list_all_files(&self.root, &self.config.walk_options())?;
        trace_time!(start, "walk", files = paths.len());

        let permalinks = match self.permalinks {
            Some(permalinks) => permalinks,
            None => paths
                .iter()
                .map(|p| permalink_for(&split_file_path(p, &root_str).0))
                .collect(),
        };

        let mut parser = Parser::from_config(permalinks, &self.config)?;
        for plugin in self.plugins {
            parser = parser.plugin(plugin);
        }
        for extractor in self.extractors {
            parser = parser.extractor(extractor);
        }

        let mut parsed: Vec<ParsedFile> = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();
        for path in &paths {
            match parser.parse_file(Path::new(path), &self.root) {
                Ok(file) => parsed.push(file),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Skipping unreadable file");
                    skipped.push(path.clone());
                }
            }
        }
        trace_time!(start, "parse", files = parsed.len());

        let mut records = Vec::with_capacity(parsed.len());
        let mut raw_links = Vec::new();
        let mut unresolved = Vec::new();
        for file in parsed {
            records.push(file.file);
            raw_links.extend(file.links);
            unresolved.extend(file.unresolved);
        }

        db.recreate_schema()?;
        let inserted = db.insert_files(&records, self.config.chunk_size)?;
        trace_time!(start, "insert_files", files = inserted.files);

        let index = UrlPathIndex::from_projection(db.url_path_projection()?);
        let mut resolution = resolve_links(&raw_links, &index);
        resolution.dangling.extend(unresolved_dangling(&unresolved));
        let links = db.insert_links(&resolution.links, self.config.chunk_size)?;
        trace_time!(start, "insert_links", links = links);

        db.set_meta("vault_root", &root_str)?;

        tracing::info!(
            files = inserted.files,
            tags = inserted.tags,
            links,
            dangling = resolution.dangling.len(),
            "indexed vault"
        );

        Ok(IndexReport {
            files: inserted.files,
            tags: inserted.tags,
            file_tags: inserted.file_tags,
            links,
            skipped,
            dangling: resolution.dangling,
        })
    }
}

/// Index `root` into `db` with `config` and the built-in extractors
pub fn index_directory(db: &Database, root: &Path, config: IndexConfig) -> Result<IndexReport> {
    VaultIndexer::new(root).config(config).build()?.index_into(db)
}
