//! File query conditions

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Conditions for file queries. Present fields are ANDed together; a file
/// matches `tag_names` when it carries at least one of the listed tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    pub id: Option<i64>,
    pub file_path: Option<String>,
    pub url_path: Option<String>,
    pub file_type: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub tag_names: Vec<String>,
    /// Row cap; not a condition
    pub limit: Option<usize>,
}

impl FileFilter {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn by_url_path(url_path: impl Into<String>) -> Self {
        Self {
            url_path: Some(url_path.into()),
            ..Default::default()
        }
    }

    pub fn by_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tag_names: tags.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// True when no condition is set (`limit` does not count)
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.file_path.is_none()
            && self.url_path.is_none()
            && self.file_type.is_none()
            && self.title.is_none()
            && self.date.is_none()
            && self.tag_names.is_empty()
    }

    /// WHERE clause (empty when unconstrained) and its bound values
    pub(crate) fn to_sql(&self) -> (String, Vec<Value>) {
        let mut clauses = Vec::new();
        let mut values = Vec::new();

        if let Some(id) = self.id {
            clauses.push("f.id = ?".to_string());
            values.push(Value::Integer(id));
        }
        let text_columns = [
            ("f.file_path", &self.file_path),
            ("f.url_path", &self.url_path),
            ("f.file_type", &self.file_type),
            ("json_extract(f.metadata, '$.title')", &self.title),
            ("json_extract(f.metadata, '$.date')", &self.date),
        ];
        for (column, value) in text_columns {
            if let Some(value) = value {
                clauses.push(format!("{} = ?", column));
                values.push(Value::Text(value.clone()));
            }
        }
        if !self.tag_names.is_empty() {
            let placeholders = vec!["?"; self.tag_names.len()].join(", ");
            clauses.push(format!(
                "f.id IN (SELECT ft.file_id FROM file_tags ft \
                 JOIN tags t ON t.id = ft.tag_id WHERE t.name IN ({}))",
                placeholders
            ));
            values.extend(self.tag_names.iter().cloned().map(Value::Text));
        }

        let sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        (sql, values)
    }
}
