//! `vaultdb tags` - list tags

use super::dispatch::CommandContext;
use super::print_json;
use vaultdb_core::error::Result;

pub fn execute(ctx: &CommandContext, file_ids: &[i64]) -> Result<()> {
    let db = ctx.open_database()?;

    if file_ids.is_empty() {
        let tags = db.find_tags_all()?;
        if ctx.is_json() {
            return print_json(&tags);
        }
        for tag in &tags {
            println!("{}\t{}", tag.id, tag.name);
        }
        return Ok(());
    }

    let rows = db.find_tags_by_file_ids(file_ids)?;
    if ctx.is_json() {
        return print_json(&rows);
    }
    for row in &rows {
        println!("{}\t{}", row.file_id, row.name);
    }
    Ok(())
}
