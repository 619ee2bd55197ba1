//! `vaultdb files` and `vaultdb file` - query indexed files

use super::dispatch::CommandContext;
use super::print_json;
use vaultdb_core::db::FileFilter;
use vaultdb_core::error::{Result, VaultError};
use vaultdb_core::records::File;

/// List every file matching `filter`; no conditions lists them all
pub fn execute_list(ctx: &CommandContext, filter: &FileFilter) -> Result<()> {
    let db = ctx.open_database()?;
    let files = db.find_files(filter)?;

    if ctx.is_json() {
        return print_json(&files);
    }
    for file in &files {
        println!("{}", summary_line(file));
    }
    if files.is_empty() && !ctx.cli.quiet {
        eprintln!("No files found");
    }
    Ok(())
}

/// Show the first file matching `filter`
pub fn execute_find(ctx: &CommandContext, filter: &FileFilter) -> Result<()> {
    let db = ctx.open_database()?;
    let file = db
        .find_file_where(filter)?
        .ok_or_else(|| VaultError::not_found("file", describe(filter)))?;

    if ctx.is_json() {
        return print_json(&file);
    }
    println!("{}", summary_line(&file));
    println!("  path: {}", file.file_path);
    println!("  type: {}", file.file_type);
    if let Some(date) = &file.metadata.date {
        println!("  date: {}", date);
    }
    if !file.metadata.tags.is_empty() {
        println!("  tags: {}", file.metadata.distinct_tags().join(", "));
    }
    Ok(())
}

fn summary_line(file: &File) -> String {
    match &file.metadata.title {
        Some(title) => format!("{}\t{}\t{}", file.id, file.url_path, title),
        None => format!("{}\t{}", file.id, file.url_path),
    }
}

fn describe(filter: &FileFilter) -> String {
    let mut parts = Vec::new();
    if let Some(id) = filter.id {
        parts.push(format!("id={}", id));
    }
    let text = [
        ("path", &filter.file_path),
        ("url_path", &filter.url_path),
        ("type", &filter.file_type),
        ("title", &filter.title),
        ("date", &filter.date),
    ];
    for (name, value) in text {
        if let Some(value) = value {
            parts.push(format!("{}={}", name, value));
        }
    }
    if !filter.tag_names.is_empty() {
        parts.push(format!("tag={}", filter.tag_names.join("|")));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_lists_conditions() {
        let filter = FileFilter {
            url_path: Some("notes/A".into()),
            tag_names: vec!["x".into(), "y".into()],
            ..Default::default()
        };
        assert_eq!(describe(&filter), "url_path=notes/A tag=x|y");
    }

    #[test]
    fn test_summary_line_includes_title() {
        let mut file = File {
            id: 3,
            file_path: "/v/A.md".into(),
            url_path: "A".into(),
            file_type: "md".into(),
            metadata: Default::default(),
        };
        assert_eq!(summary_line(&file), "3\tA");
        file.metadata.title = Some("Alpha".into());
        assert_eq!(summary_line(&file), "3\tA\tAlpha");
    }
}
