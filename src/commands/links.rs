//! `vaultdb links` - list resolved links

use super::dispatch::CommandContext;
use super::print_json;
use vaultdb_core::error::Result;

pub fn execute(ctx: &CommandContext, forward: Option<i64>, backward: Option<i64>) -> Result<()> {
    let db = ctx.open_database()?;
    let links = match (forward, backward) {
        (Some(id), _) => db.find_links_forward(id)?,
        (None, Some(id)) => db.find_links_backward(id)?,
        (None, None) => db.find_links_all()?,
    };

    if ctx.is_json() {
        return print_json(&links);
    }
    for link in &links {
        println!("{} -> {} ({})", link.source, link.target, link.link_type);
    }
    Ok(())
}
