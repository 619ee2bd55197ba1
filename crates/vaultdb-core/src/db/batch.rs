//! Chunked multi-row inserts

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use crate::bail_invalid;
use crate::error::{Result, VaultError};
use crate::map_db_err;
use crate::records::{FileRecord, FileTag, NewLink};

use super::Database;

/// Bound parameters SQLite accepts per statement
pub const MAX_BIND_PARAMETERS: usize = 32766;

/// A row type that can be bulk inserted
pub trait InsertRecord {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Column values, in `COLUMNS` order
    fn values(&self) -> Result<Vec<Value>>;
}

impl InsertRecord for FileRecord {
    const TABLE: &'static str = "files";
    const COLUMNS: &'static [&'static str] = &["file_path", "url_path", "file_type", "metadata"];

    fn values(&self) -> Result<Vec<Value>> {
        Ok(vec![
            Value::Text(self.file_path.clone()),
            Value::Text(self.url_path.clone()),
            Value::Text(self.file_type.clone()),
            Value::Text(serde_json::to_string(&self.metadata)?),
        ])
    }
}

/// A tag name awaiting insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagName(pub String);

impl InsertRecord for TagName {
    const TABLE: &'static str = "tags";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn values(&self) -> Result<Vec<Value>> {
        Ok(vec![Value::Text(self.0.clone())])
    }
}

impl InsertRecord for FileTag {
    const TABLE: &'static str = "file_tags";
    const COLUMNS: &'static [&'static str] = &["file_id", "tag_id"];

    fn values(&self) -> Result<Vec<Value>> {
        Ok(vec![Value::Integer(self.file_id), Value::Integer(self.tag_id)])
    }
}

impl InsertRecord for NewLink {
    const TABLE: &'static str = "links";
    const COLUMNS: &'static [&'static str] = &["source_file_id", "target_file_id", "type"];

    fn values(&self) -> Result<Vec<Value>> {
        Ok(vec![
            Value::Integer(self.source_file_id),
            Value::Integer(self.target_file_id),
            Value::Text(self.link_type.as_str().to_string()),
        ])
    }
}

fn insert_sql(table: &str, columns: &[&str], rows: usize) -> String {
    let placeholders = format!("({})", vec!["?"; columns.len()].join(", "));
    format!(
        "INSERT INTO {} ({}) VALUES {}",
        table,
        columns.join(", "),
        vec![placeholders; rows].join(", ")
    )
}

/// Insert `records` in chunks of `chunk_size` rows, all inside one
/// transaction. Any failing chunk rolls the whole call back.
///
/// Chunks larger than SQLite's parameter limit are split further.
pub(crate) fn batch_insert<T: InsertRecord>(
    conn: &Connection,
    records: &[T],
    chunk_size: usize,
) -> Result<usize> {
    if chunk_size == 0 {
        bail_invalid!("chunk_size", "0 (must be at least 1)");
    }
    if records.is_empty() {
        return Ok(0);
    }

    let max_rows = (MAX_BIND_PARAMETERS / T::COLUMNS.len()).max(1);
    let rows_per_statement = chunk_size.min(max_rows);
    if rows_per_statement < chunk_size {
        tracing::debug!(
            table = T::TABLE,
            chunk_size,
            rows_per_statement,
            "chunk size capped by parameter limit"
        );
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| VaultError::transaction("start", e))?;

    let mut inserted = 0;
    for chunk in records.chunks(rows_per_statement) {
        let mut values = Vec::with_capacity(chunk.len() * T::COLUMNS.len());
        for record in chunk {
            values.extend(record.values()?);
        }
        let sql = insert_sql(T::TABLE, T::COLUMNS, chunk.len());
        inserted += tx
            .execute(&sql, params_from_iter(values))
            .map_err(|e| map_db_err!(&format!("insert into {}", T::TABLE), e))?;
    }

    tx.commit()
        .map_err(|e| VaultError::transaction("commit", e))?;

    tracing::debug!(table = T::TABLE, rows = inserted, "batch inserted");
    Ok(inserted)
}

impl Database {
    /// Insert any [`InsertRecord`] rows in chunks
    pub fn batch_insert<T: InsertRecord>(&self, records: &[T], chunk_size: usize) -> Result<usize> {
        batch_insert(&self.conn, records, chunk_size)
    }
}
