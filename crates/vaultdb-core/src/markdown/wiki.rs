//! Wiki-link syntax: `[[target]]`, `[[target|alias]]`, `[[target#heading]]`
//! and embeds `![[target]]`.

use std::collections::HashSet;

use regex::Regex;

use super::{Node, NodeKind, TreePlugin};
use crate::error::{Result, VaultError};
use crate::paths::ROOT_URL_PATH;

const WIKI_LINK_PATTERN: &str = r"(!?)\[\[([^\[\]]+?)\]\]";

/// Markdown file extensions dropped from wiki-link targets before matching
const NOTE_EXTENSIONS: [&str; 2] = [".md", ".mdx"];

/// A wiki-link and its resolution against the vault's permalinks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    /// Target exactly as written, without alias or heading
    pub target: String,
    pub alias: Option<String>,
    pub heading: Option<String>,
    pub is_embed: bool,
    /// Whether the target matched a known permalink
    pub exists: bool,
    /// Matched permalink, or the normalised target when unresolved
    pub permalink: String,
}

impl WikiLink {
    /// Visible text: the alias if given, otherwise the raw target
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.target)
    }
}

/// Lifts wiki-link syntax out of text nodes and resolves each target
#[derive(Debug, Clone)]
pub struct WikiLinkPlugin {
    re: Regex,
    permalinks: Vec<String>,
    known: HashSet<String>,
}

impl WikiLinkPlugin {
    pub fn new(permalinks: Vec<String>) -> Result<Self> {
        let re = Regex::new(WIKI_LINK_PATTERN)
            .map_err(|e| VaultError::Other(format!("failed to compile wiki link regex: {}", e)))?;
        let known = permalinks.iter().cloned().collect();
        Ok(Self {
            re,
            permalinks,
            known,
        })
    }

    /// Parse the inside of `[[...]]`
    pub fn parse_link(&self, inner: &str, is_embed: bool) -> WikiLink {
        let (reference, alias) = match inner.split_once('|') {
            Some((reference, alias)) => (reference, Some(alias.trim().to_string())),
            None => (inner, None),
        };
        let (target, heading) = match reference.split_once('#') {
            Some((target, heading)) => (target, Some(heading.trim().to_string())),
            None => (reference, None),
        };
        let target = target.trim().to_string();
        let (exists, permalink) = self.resolve(&target);

        WikiLink {
            target,
            alias,
            heading,
            is_embed,
            exists,
            permalink,
        }
    }

    /// Resolve a target to `(exists, permalink)`.
    ///
    /// `index` and `/` name the vault root. Otherwise an exact permalink
    /// wins, then the shortest permalink whose trailing segments equal the
    /// target, so `[[C]]` finds `/dep1a/C`. Permalinks carry no extension, so
    /// a target such as `logo.png` that matches nothing is retried as `logo`.
    pub fn resolve(&self, target: &str) -> (bool, String) {
        if target.is_empty() {
            return (false, String::new());
        }

        let normalised = normalise_target(target);
        if normalised.is_empty() {
            return (self.known.contains(ROOT_URL_PATH), ROOT_URL_PATH.to_string());
        }

        let found = self
            .lookup(&normalised)
            .or_else(|| strip_extension(&normalised).and_then(|stem| self.lookup(stem)));
        match found {
            Some(permalink) => (true, permalink),
            None => (false, normalised),
        }
    }

    fn lookup(&self, normalised: &str) -> Option<String> {
        let wanted = format!("/{}", normalised);
        if self.known.contains(&wanted) {
            return Some(wanted);
        }
        self.permalinks
            .iter()
            .filter(|p| p.ends_with(&wanted))
            .min_by_key(|p| p.len())
            .cloned()
    }

    fn split_text(&self, text: &str) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut last = 0;
        for cap in self.re.captures_iter(text) {
            let Some(whole) = cap.get(0) else { continue };
            if whole.start() > last {
                nodes.push(Node::new(NodeKind::Text(text[last..whole.start()].to_string())));
            }
            let is_embed = !cap[1].is_empty();
            nodes.push(Node::new(NodeKind::WikiLink(self.parse_link(&cap[2], is_embed))));
            last = whole.end();
        }
        if last < text.len() {
            nodes.push(Node::new(NodeKind::Text(text[last..].to_string())));
        }
        nodes
    }
}

/// Slash-normalise, drop the leading `/`, a note extension and a trailing
/// `index` segment. An empty result means the vault root.
fn normalise_target(target: &str) -> String {
    let mut t = target.replace('\\', "/");
    t = t.trim_start_matches('/').to_string();
    for ext in NOTE_EXTENSIONS {
        if let Some(stripped) = t.strip_suffix(ext) {
            t = stripped.to_string();
            break;
        }
    }
    if t == "index" {
        return String::new();
    }
    if let Some(dir) = t.strip_suffix("/index") {
        t = dir.to_string();
    }
    t.trim_end_matches('/').to_string()
}

/// `path` without the extension of its last segment. Only extensions with at
/// least one ASCII letter count, so `v1.2` keeps its dot.
fn strip_extension(path: &str) -> Option<&str> {
    let name_start = path.rfind('/').map_or(0, |pos| pos + 1);
    let dot = path[name_start..].rfind('.')? + name_start;
    let ext = &path[dot + 1..];
    let is_extension = dot > name_start
        && !ext.is_empty()
        && ext.chars().all(|c| c.is_ascii_alphanumeric())
        && ext.chars().any(|c| c.is_ascii_alphabetic());
    is_extension.then(|| &path[..dot])
}

fn is_opaque(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::CodeBlock { .. }
            | NodeKind::HtmlBlock
            | NodeKind::Code(_)
            | NodeKind::Html(_)
            | NodeKind::Link { .. }
            | NodeKind::Image { .. }
            | NodeKind::WikiLink(_)
    )
}

impl TreePlugin for WikiLinkPlugin {
    fn name(&self) -> &str {
        "wiki-link"
    }

    fn apply(&self, root: &mut Node) {
        if is_opaque(&root.kind) {
            return;
        }
        let children = std::mem::take(&mut root.children);
        for mut child in children {
            if let NodeKind::Text(text) = &child.kind {
                if text.contains("[[") {
                    root.children.extend(self.split_text(text));
                    continue;
                }
            } else {
                self.apply(&mut child);
            }
            root.children.push(child);
        }
    }
}
