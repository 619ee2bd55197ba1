//! File and tag persistence and queries

use std::collections::{HashMap, HashSet};

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Row};
use serde::Serialize;

use crate::error::{Result, VaultError};
use crate::map_db_err;
use crate::metadata::Metadata;
use crate::records::{File, FileRecord, FileTag, FileTagRow, Tag};

use super::batch::{batch_insert, TagName};
use super::{Database, FileFilter};

/// Row counts written by [`Database::insert_files`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertedFiles {
    pub files: usize,
    pub tags: usize,
    pub file_tags: usize,
}

const FILE_COLUMNS: &str = "f.id, f.file_path, f.url_path, f.file_type, f.metadata";

fn file_from_row(row: &Row<'_>) -> rusqlite::Result<(i64, String, String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_file(raw: (i64, String, String, String, String)) -> Result<File> {
    let (id, file_path, url_path, file_type, metadata) = raw;
    let metadata: Metadata = serde_json::from_str(&metadata)
        .map_err(|e| VaultError::field_extraction("metadata", e))?;
    Ok(File {
        id,
        file_path,
        url_path,
        file_type,
        metadata,
    })
}

impl Database {
    /// Insert files, then every tag name not yet stored, then one
    /// association per distinct `(file, tag)` pair.
    ///
    /// Each of the three steps is its own transaction.
    #[tracing::instrument(skip_all, fields(files = files.len()))]
    pub fn insert_files(&self, files: &[FileRecord], chunk_size: usize) -> Result<InsertedFiles> {
        let inserted_files = batch_insert(&self.conn, files, chunk_size)?;

        let existing: HashSet<String> = self.find_tags_all()?.into_iter().map(|t| t.name).collect();
        let mut pending = HashSet::new();
        let mut new_tags = Vec::new();
        for file in files {
            for name in file.metadata.distinct_tags() {
                if !existing.contains(name) && pending.insert(name) {
                    new_tags.push(TagName(name.to_string()));
                }
            }
        }
        let inserted_tags = batch_insert(&self.conn, &new_tags, chunk_size)?;

        let tag_ids: HashMap<String, i64> = self
            .find_tags_all()?
            .into_iter()
            .map(|t| (t.name, t.id))
            .collect();
        let file_ids = self.file_path_ids()?;

        let mut file_tags = Vec::new();
        for file in files {
            let Some(&file_id) = file_ids.get(&file.file_path) else {
                continue;
            };
            for name in file.metadata.distinct_tags() {
                if let Some(&tag_id) = tag_ids.get(name) {
                    file_tags.push(FileTag { file_id, tag_id });
                }
            }
        }
        let inserted_file_tags = batch_insert(&self.conn, &file_tags, chunk_size)?;

        Ok(InsertedFiles {
            files: inserted_files,
            tags: inserted_tags,
            file_tags: inserted_file_tags,
        })
    }

    fn file_path_ids(&self) -> Result<HashMap<String, i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, file_path FROM files")
            .map_err(|e| map_db_err!("prepare file path query", e))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i64>(0)?)))
            .map_err(|e| map_db_err!("query file paths", e))?;
        rows.collect::<rusqlite::Result<_>>()
            .map_err(|e| VaultError::field_extraction("file path", e))
    }

    /// `(id, url_path)` of every file, in id order
    pub fn url_path_projection(&self) -> Result<Vec<(i64, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, url_path FROM files ORDER BY id")
            .map_err(|e| map_db_err!("prepare projection query", e))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| map_db_err!("query url paths", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| VaultError::field_extraction("url path", e))
    }

    /// Files matching `filter`, in id order
    pub fn find_files(&self, filter: &FileFilter) -> Result<Vec<File>> {
        let (where_sql, mut values) = filter.to_sql();
        let mut sql = format!("SELECT {} FROM files f{} ORDER BY f.id", FILE_COLUMNS, where_sql);
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            values.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| map_db_err!("prepare file query", e))?;
        let rows = stmt
            .query_map(params_from_iter(values), file_from_row)
            .map_err(|e| map_db_err!("query files", e))?;

        let mut files = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| VaultError::field_extraction("file", e))?;
            files.push(into_file(raw)?);
        }
        Ok(files)
    }

    /// First file matching `filter`. An unconstrained filter is rejected
    /// before any query runs.
    pub fn find_file_where(&self, filter: &FileFilter) -> Result<Option<File>> {
        if filter.is_empty() {
            return Err(VaultError::missing_condition("find file"));
        }
        let single = FileFilter {
            limit: Some(1),
            ..filter.clone()
        };
        Ok(self.find_files(&single)?.into_iter().next())
    }

    pub fn find_tags_all(&self) -> Result<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags ORDER BY id")
            .map_err(|e| map_db_err!("prepare tag query", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .map_err(|e| map_db_err!("query tags", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| VaultError::field_extraction("tag", e))
    }

    /// One row per file-tag association of the given files
    pub fn find_tags_by_file_ids(&self, file_ids: &[i64]) -> Result<Vec<FileTagRow>> {
        if file_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; file_ids.len()].join(", ");
        let sql = format!(
            "SELECT ft.file_id, ft.tag_id, t.name FROM file_tags ft \
             JOIN tags t ON t.id = ft.tag_id \
             WHERE ft.file_id IN ({}) ORDER BY ft.file_id, ft.id",
            placeholders
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| map_db_err!("prepare file tag query", e))?;
        let rows = stmt
            .query_map(params_from_iter(file_ids.iter()), |row| {
                Ok(FileTagRow {
                    file_id: row.get(0)?,
                    tag_id: row.get(1)?,
                    name: row.get(2)?,
                })
            })
            .map_err(|e| map_db_err!("query file tags", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| VaultError::field_extraction("file tag", e))
    }
}
