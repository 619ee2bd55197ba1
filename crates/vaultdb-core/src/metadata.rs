//! Front matter and inline hashtag extraction

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{Result, VaultError};

const FRONT_MATTER_DELIMITER: &str = "---";

/// Metadata stored alongside every indexed file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Front matter tags followed by inline hashtags, duplicates kept
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Metadata {
    /// Tags with duplicates removed, first occurrence order kept
    pub fn distinct_tags(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|t| seen.insert(*t))
            .collect()
    }
}

/// Split raw text into its front matter block (if any) and body.
///
/// The block opens with a line that is exactly `---` at the very start of the
/// text and closes at the next line beginning with `---`. Anything after that
/// closing marker, including the rest of its line, is body.
pub fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let trimmed = content.trim_start_matches('\u{feff}');
    let Some(after_open) = trimmed.strip_prefix(FRONT_MATTER_DELIMITER) else {
        return (None, content);
    };
    if !(after_open.starts_with('\n') || after_open.starts_with("\r\n")) {
        return (None, content);
    }

    let Some(end_pos) = after_open.find("\n---") else {
        return (None, content);
    };

    let yaml = &after_open[..end_pos];
    let body = &after_open[end_pos + 1 + FRONT_MATTER_DELIMITER.len()..];
    (Some(yaml), body)
}

/// Inline hashtag scanner: `#` followed by ASCII word characters plus a
/// configurable extra alphabet.
#[derive(Debug, Clone)]
pub struct HashtagMatcher {
    re: Regex,
}

impl HashtagMatcher {
    /// `extra_chars` is spliced into a regex character class, so ranges such
    /// as `가-힣` or `À-ÿ` are allowed.
    pub fn new(extra_chars: &str) -> Result<Self> {
        let pattern = format!(r"#([0-9A-Za-z_{}]+)", extra_chars);
        let re = Regex::new(&pattern).map_err(|e| {
            VaultError::invalid_value("tag_chars", format!("{:?} ({})", extra_chars, e))
        })?;
        Ok(Self { re })
    }

    /// Every hashtag in `text`, in order, without the leading `#`
    pub fn find_tags(&self, text: &str) -> Vec<String> {
        self.re
            .captures_iter(text)
            .map(|cap| cap[1].to_string())
            .collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn front_matter_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Parse the front matter block into a mapping. An empty block is an empty
/// mapping; anything else that is not a mapping yields `None`.
fn parse_front_matter(yaml: &str) -> Option<serde_yaml::Mapping> {
    if yaml.trim().is_empty() {
        return Some(serde_yaml::Mapping::new());
    }
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(map)) => Some(map),
        Ok(Value::Null) => Some(serde_yaml::Mapping::new()),
        Ok(_) => {
            tracing::debug!("Front matter block is not a mapping, keeping it as body");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed front matter");
            None
        }
    }
}

/// Extract [`Metadata`] and return it with the body that follows the front
/// matter. A block that does not parse as a YAML mapping stays part of the
/// body, so a leading `---` thematic break loses nothing.
pub fn split_metadata<'a>(content: &'a str, hashtags: &HashtagMatcher) -> (Metadata, &'a str) {
    let (map, body) = match split_front_matter(content) {
        (Some(yaml), body) => match parse_front_matter(yaml) {
            Some(map) => (map, body),
            None => (serde_yaml::Mapping::new(), content),
        },
        (None, body) => (serde_yaml::Mapping::new(), body),
    };

    let mut tags = front_matter_tags(map.get("tags"));
    tags.extend(hashtags.find_tags(body));

    let metadata = Metadata {
        title: map.get("title").and_then(scalar_to_string),
        date: map.get("date").and_then(scalar_to_string),
        tags,
    };
    (metadata, body)
}

/// Extract [`Metadata`] from raw file text
pub fn extract_metadata(content: &str, hashtags: &HashtagMatcher) -> Metadata {
    split_metadata(content, hashtags).0
}
