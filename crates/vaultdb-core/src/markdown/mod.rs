//! Markdown document tree
//!
//! Documents are built from `pulldown-cmark` events into an owned tree that
//! plugins can rewrite and extractors can walk. Wiki-link syntax is not part
//! of CommonMark, so it arrives as plain text and is lifted into
//! [`NodeKind::WikiLink`] nodes by [`WikiLinkPlugin`].

mod wiki;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser as CmarkParser, Tag};

pub use wiki::{WikiLink, WikiLinkPlugin};

/// A node in a parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

/// Node payloads
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading { level: u8 },
    BlockQuote,
    CodeBlock { lang: Option<String> },
    HtmlBlock,
    List { ordered: bool },
    Item,
    Table,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: String },
    Image { url: String, title: String },
    WikiLink(WikiLink),
    Text(String),
    Code(String),
    Html(String),
    Break,
    Rule,
    Other,
}

/// Payload-free discriminant of [`NodeKind`], used to select nodes by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Paragraph,
    Heading,
    BlockQuote,
    CodeBlock,
    HtmlBlock,
    List,
    Item,
    Table,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Image,
    WikiLink,
    Text,
    Code,
    Html,
    Break,
    Rule,
    Other,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Root => NodeType::Root,
            NodeKind::Paragraph => NodeType::Paragraph,
            NodeKind::Heading { .. } => NodeType::Heading,
            NodeKind::BlockQuote => NodeType::BlockQuote,
            NodeKind::CodeBlock { .. } => NodeType::CodeBlock,
            NodeKind::HtmlBlock => NodeType::HtmlBlock,
            NodeKind::List { .. } => NodeType::List,
            NodeKind::Item => NodeType::Item,
            NodeKind::Table => NodeType::Table,
            NodeKind::TableRow => NodeType::TableRow,
            NodeKind::TableCell => NodeType::TableCell,
            NodeKind::Emphasis => NodeType::Emphasis,
            NodeKind::Strong => NodeType::Strong,
            NodeKind::Strikethrough => NodeType::Strikethrough,
            NodeKind::Link { .. } => NodeType::Link,
            NodeKind::Image { .. } => NodeType::Image,
            NodeKind::WikiLink(_) => NodeType::WikiLink,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Code(_) => NodeType::Code,
            NodeKind::Html(_) => NodeType::Html,
            NodeKind::Break => NodeType::Break,
            NodeKind::Rule => NodeType::Rule,
            NodeKind::Other => NodeType::Other,
        }
    }
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Pre-order traversal calling `f` on every node of type `node_type`
    pub fn visit<'a>(&'a self, node_type: NodeType, f: &mut impl FnMut(&'a Node)) {
        if self.node_type() == node_type {
            f(self);
        }
        for child in &self.children {
            child.visit(node_type, f);
        }
    }

    /// Concatenated text of this node's descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::Code(text) => out.push_str(text),
            NodeKind::WikiLink(link) => out.push_str(link.label()),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Append a child, merging adjacent text
    fn push_child(&mut self, child: Node) {
        if let NodeKind::Text(next) = &child.kind {
            if let Some(Node {
                kind: NodeKind::Text(prev),
                ..
            }) = self.children.last_mut()
            {
                prev.push_str(next);
                return;
            }
        }
        self.children.push(child);
    }
}

/// A tree rewrite applied after parsing
pub trait TreePlugin: Send + Sync {
    /// Identifier used in diagnostics
    fn name(&self) -> &str;

    fn apply(&self, root: &mut Node);
}

/// A parsed markdown document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
}

impl Document {
    /// Parse `text` and run the wiki-link plugin followed by `plugins`
    pub fn build(text: &str, wiki: &WikiLinkPlugin, plugins: &[Box<dyn TreePlugin>]) -> Self {
        let mut root = parse_tree(text);
        wiki.apply(&mut root);
        for plugin in plugins {
            tracing::trace!(plugin = plugin.name(), "applying tree plugin");
            plugin.apply(&mut root);
        }
        Self { root }
    }

    /// Parse `text` without any plugins; wiki-link syntax stays plain text
    pub fn parse(text: &str) -> Self {
        Self {
            root: parse_tree(text),
        }
    }

    pub fn visit<'a>(&'a self, node_type: NodeType, mut f: impl FnMut(&'a Node)) {
        self.root.visit(node_type, &mut f);
    }

    /// Every node of the given type, in document order
    pub fn nodes(&self, node_type: NodeType) -> Vec<&Node> {
        let mut out = Vec::new();
        self.visit(node_type, |node| out.push(node));
        out
    }
}

fn cmark_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn container_kind(tag: Tag<'_>) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading {
            level: heading_level_to_u8(level),
        },
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(kind) => NodeKind::CodeBlock {
            lang: match kind {
                CodeBlockKind::Fenced(info) if !info.is_empty() => Some(info.to_string()),
                _ => None,
            },
        },
        Tag::HtmlBlock => NodeKind::HtmlBlock,
        Tag::List(start) => NodeKind::List {
            ordered: start.is_some(),
        },
        Tag::Item => NodeKind::Item,
        Tag::Table(_) => NodeKind::Table,
        Tag::TableHead | Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Link {
            dest_url, title, ..
        } => NodeKind::Link {
            url: dest_url.to_string(),
            title: title.to_string(),
        },
        Tag::Image {
            dest_url, title, ..
        } => NodeKind::Image {
            url: dest_url.to_string(),
            title: title.to_string(),
        },
        _ => NodeKind::Other,
    }
}

/// Build the raw tree from CommonMark events. Malformed input never fails;
/// unmatched syntax simply arrives as text.
fn parse_tree(text: &str) -> Node {
    let mut stack = vec![Node::new(NodeKind::Root)];

    for event in CmarkParser::new_ext(text, cmark_options()) {
        let leaf = match event {
            Event::Start(tag) => {
                stack.push(Node::new(container_kind(tag)));
                continue;
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    if let Some(node) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.push_child(node);
                        }
                    }
                }
                continue;
            }
            Event::Text(t) => NodeKind::Text(t.to_string()),
            Event::SoftBreak => NodeKind::Text("\n".to_string()),
            Event::Code(c) => NodeKind::Code(c.to_string()),
            Event::Html(h) | Event::InlineHtml(h) => NodeKind::Html(h.to_string()),
            Event::HardBreak => NodeKind::Break,
            Event::Rule => NodeKind::Rule,
            _ => NodeKind::Other,
        };
        if let Some(parent) = stack.last_mut() {
            parent.push_child(Node::new(leaf));
        }
    }

    // Unbalanced events are folded into their parents
    while stack.len() > 1 {
        if let Some(node) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.push_child(node);
            }
        }
    }
    stack.pop().unwrap_or_else(|| Node::new(NodeKind::Root))
}
