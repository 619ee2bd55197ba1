//! SQLite store for indexed vaults
//!
//! Reindexing drops and recreates every table, so a reindex must never run
//! while another operation (read or write) uses the same store.

mod batch;
mod files;
mod filter;
mod links;
mod schema;

use std::path::Path;

use rusqlite::Connection;

use crate::error::{Result, VaultError};
use crate::map_db_err;

pub use batch::{InsertRecord, MAX_BIND_PARAMETERS};
pub use files::InsertedFiles;
pub use filter::FileFilter;
pub use schema::CURRENT_SCHEMA_VERSION;

/// SQLite database for vaultdb
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            VaultError::Other(format!(
                "failed to open database at {}: {}",
                path.display(),
                e
            ))
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| VaultError::Other(format!("failed to enable WAL mode: {}", e)))?;

        Self::init(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| VaultError::Other(format!("failed to open in-memory database: {}", e)))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| VaultError::Other(format!("failed to enable foreign keys: {}", e)))?;

        schema::create_schema(&conn)
            .map_err(|e| VaultError::Other(format!("failed to create database schema: {}", e)))?;

        Ok(Database { conn })
    }

    /// Drop every table and create an empty schema
    pub fn recreate_schema(&self) -> Result<()> {
        schema::recreate_schema(&self.conn).map_err(|e| map_db_err!("recreate schema", e))
    }

    pub fn count_files(&self) -> Result<i64> {
        self.count("files")
    }

    pub fn count_tags(&self) -> Result<i64> {
        self.count("tags")
    }

    pub fn count_file_tags(&self) -> Result<i64> {
        self.count("file_tags")
    }

    pub fn count_links(&self) -> Result<i64> {
        self.count("links")
    }

    fn count(&self, table: &str) -> Result<i64> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .map_err(|e| VaultError::Other(format!("failed to count {}: {}", table, e)))
    }

    pub fn get_schema_version(&self) -> Result<i32> {
        self.get_meta("schema_version")?
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| VaultError::not_found("index metadata", "schema_version"))
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM index_meta WHERE key = ?1")
            .map_err(|e| map_db_err!("prepare meta query", e))?;
        let mut rows = stmt
            .query([key])
            .map_err(|e| map_db_err!("query index meta", e))?;
        match rows.next().map_err(|e| map_db_err!("read index meta", e))? {
            Some(row) => row
                .get(0)
                .map_err(|e| VaultError::field_extraction("meta value", e)),
            None => Ok(None),
        }
    }

    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO index_meta (key, value) VALUES (?1, ?2)",
                [key, value],
            )
            .map_err(|e| map_db_err!("write index meta", e))?;
        Ok(())
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Fold the WAL back so the next connection sees every commit
        let _ = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
    }
}

#[cfg(test)]
mod tests;
