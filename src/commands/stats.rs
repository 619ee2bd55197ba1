//! `vaultdb stats` - row counts and index metadata

use serde::Serialize;

use super::dispatch::CommandContext;
use super::print_json;
use vaultdb_core::db::Database;
use vaultdb_core::error::Result;

#[derive(Debug, Serialize)]
struct Stats {
    files: i64,
    tags: i64,
    file_tags: i64,
    links: i64,
    schema_version: i32,
    vault_root: Option<String>,
}

impl Stats {
    fn collect(db: &Database) -> Result<Self> {
        Ok(Self {
            files: db.count_files()?,
            tags: db.count_tags()?,
            file_tags: db.count_file_tags()?,
            links: db.count_links()?,
            schema_version: db.get_schema_version()?,
            vault_root: db.get_meta("vault_root")?,
        })
    }
}

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let db = ctx.open_database()?;
    let stats = Stats::collect(&db)?;

    if ctx.is_json() {
        return print_json(&stats);
    }
    println!("files: {}", stats.files);
    println!("tags: {}", stats.tags);
    println!("file_tags: {}", stats.file_tags);
    println!("links: {}", stats.links);
    println!("schema_version: {}", stats.schema_version);
    if let Some(root) = &stats.vault_root {
        println!("vault_root: {}", root);
    }
    Ok(())
}
