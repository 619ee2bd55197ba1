//! Link extractors
//!
//! Each extractor selects one node type from a [`Document`] and decides per
//! node whether it yields a link target. Targets are normalised with
//! [`fix_path`] before they leave the extractor.

use crate::markdown::{Document, Node, NodeKind, NodeType};
use crate::paths::fix_path;
use crate::records::LinkType;

pub trait LinkExtractor: Send + Sync {
    /// Node type this extractor visits
    fn node_type(&self) -> NodeType;

    /// Type recorded on emitted links; `None` lets the assembler default it
    fn link_type(&self) -> Option<LinkType> {
        None
    }

    /// Target for one eligible node, or `None` to skip it
    fn extract_target(&self, node: &Node) -> Option<String>;

    /// Every normalised target in document order
    fn extract(&self, doc: &Document) -> Vec<String> {
        let mut targets = Vec::new();
        doc.visit(self.node_type(), |node| {
            if let Some(target) = self.extract_target(node).filter(|t| !t.is_empty()) {
                targets.push(fix_path(&target));
            }
        });
        targets
    }
}

/// Standard markdown links; emits the URL as written
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownLinkExtractor;

impl LinkExtractor for MarkdownLinkExtractor {
    fn node_type(&self) -> NodeType {
        NodeType::Link
    }

    fn extract_target(&self, node: &Node) -> Option<String> {
        match &node.kind {
            NodeKind::Link { url, .. } => Some(url.clone()),
            _ => None,
        }
    }
}

/// Resolved, non-embed wiki-links
#[derive(Debug, Clone, Copy, Default)]
pub struct WikiLinkExtractor;

impl LinkExtractor for WikiLinkExtractor {
    fn node_type(&self) -> NodeType {
        NodeType::WikiLink
    }

    fn link_type(&self) -> Option<LinkType> {
        Some(LinkType::Normal)
    }

    fn extract_target(&self, node: &Node) -> Option<String> {
        match &node.kind {
            NodeKind::WikiLink(link) if link.exists && !link.is_embed => {
                Some(link.permalink.clone())
            }
            _ => None,
        }
    }
}

/// Resolved `![[...]]` embeds
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbedWikiLinkExtractor;

impl LinkExtractor for EmbedWikiLinkExtractor {
    fn node_type(&self) -> NodeType {
        NodeType::WikiLink
    }

    fn link_type(&self) -> Option<LinkType> {
        Some(LinkType::Embed)
    }

    fn extract_target(&self, node: &Node) -> Option<String> {
        match &node.kind {
            NodeKind::WikiLink(link) if link.exists && link.is_embed => {
                Some(link.permalink.clone())
            }
            _ => None,
        }
    }
}

/// Extractor backed by a closure, for caller-defined strategies
pub struct NodeExtractor<F> {
    node_type: NodeType,
    link_type: Option<LinkType>,
    select: F,
}

impl<F> NodeExtractor<F>
where
    F: Fn(&Node) -> Option<String> + Send + Sync,
{
    pub fn new(node_type: NodeType, select: F) -> Self {
        Self {
            node_type,
            link_type: None,
            select,
        }
    }

    pub fn with_link_type(mut self, link_type: LinkType) -> Self {
        self.link_type = Some(link_type);
        self
    }
}

impl<F> LinkExtractor for NodeExtractor<F>
where
    F: Fn(&Node) -> Option<String> + Send + Sync,
{
    fn node_type(&self) -> NodeType {
        self.node_type
    }

    fn link_type(&self) -> Option<LinkType> {
        self.link_type
    }

    fn extract_target(&self, node: &Node) -> Option<String> {
        (self.select)(node)
    }
}

/// Built-in extractors in run order
pub fn default_extractors() -> Vec<Box<dyn LinkExtractor>> {
    vec![
        Box::new(MarkdownLinkExtractor),
        Box::new(WikiLinkExtractor),
        Box::new(EmbedWikiLinkExtractor),
    ]
}
