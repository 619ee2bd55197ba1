//! Graph assembly: raw url-path links to file-id links

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::records::{LinkType, NewLink, RawLink};

/// Lookup from url path to persisted file id
#[derive(Debug, Clone, Default)]
pub struct UrlPathIndex {
    ids: HashMap<String, i64>,
}

impl UrlPathIndex {
    /// Build from the `(id, url_path)` projection of the files table. When
    /// two files share a url path the first id wins.
    pub fn from_projection(rows: impl IntoIterator<Item = (i64, String)>) -> Self {
        let mut ids = HashMap::new();
        for (id, url_path) in rows {
            ids.entry(url_path).or_insert(id);
        }
        Self { ids }
    }

    pub fn get(&self, url_path: &str) -> Option<i64> {
        self.ids.get(url_path).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Which end of a link failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingEnd {
    Source,
    Target,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingLink {
    pub source: String,
    pub target: String,
    pub missing: MissingEnd,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub links: Vec<NewLink>,
    pub dangling: Vec<DanglingLink>,
}

/// Resolve raw links against the url path index.
///
/// Links with an unknown endpoint are dropped, logged and returned in
/// `dangling`. Untyped links become [`LinkType::Normal`]. Links that resolve
/// to the same `(source, target, type)` are kept once.
#[tracing::instrument(skip_all, fields(raw = raw_links.len()))]
pub fn resolve_links(raw_links: &[RawLink], index: &UrlPathIndex) -> Resolution {
    let mut resolution = Resolution::default();
    let mut seen = HashSet::new();

    for raw in raw_links {
        let source = index.get(&raw.source);
        let target = index.get(&raw.target);

        let (source_file_id, target_file_id) = match (source, target) {
            (Some(s), Some(t)) => (s, t),
            (s, t) => {
                let missing = match (s, t) {
                    (None, None) => MissingEnd::Both,
                    (None, _) => MissingEnd::Source,
                    _ => MissingEnd::Target,
                };
                tracing::warn!(
                    source = %raw.source,
                    target = %raw.target,
                    ?missing,
                    "Dropping dangling link"
                );
                resolution.dangling.push(DanglingLink {
                    source: raw.source.clone(),
                    target: raw.target.clone(),
                    missing,
                });
                continue;
            }
        };

        let link = NewLink {
            source_file_id,
            target_file_id,
            link_type: raw.link_type.unwrap_or_default(),
        };
        if seen.insert(link) {
            resolution.links.push(link);
        }
    }

    tracing::debug!(
        resolved = resolution.links.len(),
        dangling = resolution.dangling.len(),
        "resolved links"
    );
    resolution
}

/// Report wiki-links that never resolved to a file. Their target is missing
/// by construction; each is logged the same way as a dangling link.
pub fn unresolved_dangling(unresolved: &[RawLink]) -> Vec<DanglingLink> {
    unresolved
        .iter()
        .map(|raw| {
            tracing::warn!(
                source = %raw.source,
                target = %raw.target,
                missing = ?MissingEnd::Target,
                "Dropping dangling link"
            );
            DanglingLink {
                source: raw.source.clone(),
                target: raw.target.clone(),
                missing: MissingEnd::Target,
            }
        })
        .collect()
}
