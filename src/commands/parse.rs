//! `vaultdb parse` - show what indexing would extract from one file

use std::path::Path;

use super::dispatch::CommandContext;
use super::print_json;
use vaultdb_core::config::IndexConfig;
use vaultdb_core::error::{Result, VaultError};
use vaultdb_core::parser::{ParsedFile, Parser};
use vaultdb_core::paths::find_permalinks_all;

pub fn execute(ctx: &CommandContext, file: &Path, root: Option<&Path>) -> Result<()> {
    if !file.is_file() {
        return Err(VaultError::not_found("file", file.display()));
    }
    let root = match root {
        Some(root) => root,
        None => file.parent().unwrap_or_else(|| Path::new(".")),
    };
    // `Path::parent` of a bare file name is the empty path
    let root = if root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        root
    };

    let config = IndexConfig::discover(ctx.cli.config.as_deref(), root)?;
    let permalinks = find_permalinks_all(root, &config.walk_options())?;
    let parser = Parser::from_config(permalinks, &config)?;
    let parsed = parser.parse_file(file, root)?;

    if ctx.is_json() {
        print_json(&parsed)
    } else {
        print_parsed(&parsed);
        Ok(())
    }
}

fn print_parsed(parsed: &ParsedFile) {
    let file = &parsed.file;
    println!("{} ({})", file.url_path, file.file_type);
    println!("  path: {}", file.file_path);
    if let Some(title) = &file.metadata.title {
        println!("  title: {}", title);
    }
    if let Some(date) = &file.metadata.date {
        println!("  date: {}", date);
    }
    if !file.metadata.tags.is_empty() {
        println!("  tags: {}", file.metadata.distinct_tags().join(", "));
    }
    for link in &parsed.links {
        match link.link_type {
            Some(link_type) => println!("  -> {} ({})", link.target, link_type),
            None => println!("  -> {}", link.target),
        }
    }
    for link in &parsed.unresolved {
        println!("  -> {} (unresolved)", link.target);
    }
}
