//! SQLite schema for vaultdb

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

const SCHEMA_SQL: &str = r#"
-- Indexed files; metadata holds the front matter and tags as JSON
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_path TEXT NOT NULL UNIQUE,
    url_path TEXT NOT NULL,
    file_type TEXT NOT NULL,
    metadata TEXT NOT NULL DEFAULT '{}'
);
CREATE INDEX IF NOT EXISTS idx_files_url_path ON files(url_path);

-- Tag names, unique across the vault
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS file_tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    UNIQUE (file_id, tag_id)
);
CREATE INDEX IF NOT EXISTS idx_file_tags_tag ON file_tags(tag_id);

-- Directed edges between files
CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_file_id INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    target_file_id INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    type TEXT NOT NULL DEFAULT 'normal' CHECK (type IN ('normal', 'embed')),
    UNIQUE (source_file_id, target_file_id, type)
);
CREATE INDEX IF NOT EXISTS idx_links_target ON links(target_file_id);

-- Index metadata
CREATE TABLE IF NOT EXISTS index_meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

/// Drop every table, children before parents
pub fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute("DROP TABLE IF EXISTS links", [])?;
    conn.execute("DROP TABLE IF EXISTS file_tags", [])?;
    conn.execute("DROP TABLE IF EXISTS tags", [])?;
    conn.execute("DROP TABLE IF EXISTS files", [])?;
    conn.execute("DROP TABLE IF EXISTS index_meta", [])?;
    Ok(())
}

fn create_fresh(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR REPLACE INTO index_meta (key, value) VALUES ('schema_version', ?1)",
        [&CURRENT_SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

/// Create the schema if missing. A store written by another schema version
/// is dropped and recreated empty.
pub fn create_schema(conn: &Connection) -> Result<()> {
    let current_version: Option<i32> = conn
        .query_row(
            "SELECT value FROM index_meta WHERE key = 'schema_version'",
            [],
            |r| r.get::<_, String>(0).map(|s| s.parse().unwrap_or(0)),
        )
        .ok();

    match current_version {
        Some(v) if v == CURRENT_SCHEMA_VERSION => Ok(()),
        Some(v) => {
            tracing::info!(
                "Database schema version {} does not match {}, recreating",
                v,
                CURRENT_SCHEMA_VERSION
            );
            drop_all_tables(conn)?;
            create_fresh(conn)
        }
        None => create_fresh(conn),
    }
}

/// Drop and recreate every table
pub fn recreate_schema(conn: &Connection) -> Result<()> {
    drop_all_tables(conn)?;
    create_fresh(conn)
}
