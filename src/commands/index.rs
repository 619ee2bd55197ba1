//! `vaultdb index` - rebuild the database from a vault directory

use std::path::Path;

use tracing::debug;

use super::dispatch::CommandContext;
use super::print_json;
use vaultdb_core::config::IndexConfig;
use vaultdb_core::error::{Result, VaultError};
use vaultdb_core::graph::MissingEnd;
use vaultdb_core::vault::{index_directory, IndexReport};

pub fn execute(ctx: &CommandContext, root: &Path, chunk_size: Option<usize>) -> Result<()> {
    if !root.is_dir() {
        return Err(VaultError::VaultNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut config = IndexConfig::discover(ctx.cli.config.as_deref(), root)?;
    if let Some(chunk_size) = chunk_size {
        config.chunk_size = chunk_size;
    }
    config.validate()?;

    let db = ctx.open_database()?;
    let report = index_directory(&db, root, config)?;
    debug!(elapsed = ?ctx.start.elapsed(), "index");

    if ctx.is_json() {
        print_json(&report)
    } else {
        if !ctx.cli.quiet {
            print_report(&report);
        }
        Ok(())
    }
}

fn print_report(report: &IndexReport) {
    println!(
        "Indexed {} files ({} tags, {} tag links, {} links)",
        report.files, report.tags, report.file_tags, report.links
    );
    for path in &report.skipped {
        println!("  skipped: {}", path);
    }
    for link in &report.dangling {
        let missing = match link.missing {
            MissingEnd::Source => "source",
            MissingEnd::Target => "target",
            MissingEnd::Both => "source and target",
        };
        println!("  dangling: {} -> {} ({} missing)", link.source, link.target, missing);
    }
}
