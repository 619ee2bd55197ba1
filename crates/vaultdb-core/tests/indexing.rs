//! End-to-end indexing of small vaults into an in-memory database

use std::fs;
use std::path::Path;

use tempfile::{tempdir, TempDir};
use vaultdb_core::config::IndexConfig;
use vaultdb_core::db::{Database, FileFilter};
use vaultdb_core::graph::{DanglingLink, MissingEnd};
use vaultdb_core::paths::ROOT_URL_PATH;
use vaultdb_core::records::LinkType;
use vaultdb_core::vault::{index_directory, IndexReport};

fn vault(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (rel, content) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn index(root: &Path) -> (Database, IndexReport) {
    let db = Database::open_in_memory().unwrap();
    let report = index_directory(&db, root, IndexConfig::default()).unwrap();
    (db, report)
}

fn file_id(db: &Database, url_path: &str) -> i64 {
    db.find_file_where(&FileFilter::by_url_path(url_path))
        .unwrap()
        .unwrap_or_else(|| panic!("no file at {}", url_path))
        .id
}

#[test]
fn test_wiki_link_between_two_notes() {
    let dir = vault(&[("A.md", "See [[B]]."), ("B.md", "# B\n")]);
    let (db, report) = index(dir.path());

    assert_eq!(report.files, 2);
    assert_eq!(db.count_files().unwrap(), 2);

    let links = db.find_links_all().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].source, "A");
    assert_eq!(links[0].target, "B");
    assert_eq!(links[0].link_type, LinkType::Normal);
    assert_eq!(links[0].source_file_id, file_id(&db, "A"));
    assert_eq!(links[0].target_file_id, file_id(&db, "B"));
}

#[test]
fn test_link_to_missing_note_reported_as_dangling() {
    let dir = vault(&[("A.md", "[[Nonexistent]]")]);
    let (db, report) = index(dir.path());

    assert_eq!(report.files, 1);
    assert_eq!(report.links, 0);
    assert_eq!(db.count_links().unwrap(), 0);
    assert_eq!(
        report.dangling,
        vec![DanglingLink {
            source: "A".to_string(),
            target: "Nonexistent".to_string(),
            missing: MissingEnd::Target,
        }]
    );
}

#[test]
fn test_image_embed_resolves_to_attachment() {
    let dir = vault(&[("A.md", "![[logo.png]]"), ("assets/logo.png", "PNG")]);
    let db = Database::open_in_memory().unwrap();
    let config = IndexConfig {
        extensions: vec![],
        ..Default::default()
    };
    let report = index_directory(&db, dir.path(), config).unwrap();

    assert_eq!(report.files, 2);
    assert_eq!(report.links, 1);
    assert!(report.dangling.is_empty());

    let links = db.find_links_all().unwrap();
    assert_eq!(links[0].link_type, LinkType::Embed);
    assert_eq!(links[0].target, "assets/logo");

    let logo = file_id(&db, "assets/logo");
    let image = db.find_file_where(&FileFilter::by_id(logo)).unwrap().unwrap();
    assert_eq!(image.file_type, "png");
}

#[test]
fn test_front_matter_and_hashtags_merge_into_distinct_tags() {
    let dir = vault(&[("A.md", "---\ntags: [x]\n---\n#y and again #y\n")]);
    let (db, _) = index(dir.path());

    let names: Vec<String> = db
        .find_tags_all()
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["x", "y"]);

    let a = file_id(&db, "A");
    let rows = db.find_tags_by_file_ids(&[a]).unwrap();
    let mut attached: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    attached.sort_unstable();
    assert_eq!(attached, vec!["x", "y"]);
}

#[test]
fn test_leading_thematic_break_is_not_front_matter() {
    let dir = vault(&[("A.md", "---\nSee [[B]] #kept\n---\n"), ("B.md", "")]);
    let (db, report) = index(dir.path());

    assert_eq!(report.links, 1);
    let a = db.find_file_where(&FileFilter::by_url_path("A")).unwrap().unwrap();
    assert_eq!(a.metadata.tags, vec!["kept"]);
}

#[test]
fn test_shared_tags_stored_once() {
    let dir = vault(&[
        ("A.md", "#shared #a"),
        ("B.md", "---\ntags: [shared]\n---\n"),
    ]);
    let (db, report) = index(dir.path());

    assert_eq!(report.tags, 2);
    assert_eq!(report.file_tags, 3);

    let tagged = db.find_files(&FileFilter::by_tags(["shared"])).unwrap();
    assert_eq!(tagged.len(), 2);
}

#[test]
fn test_forward_and_backward_traversal() {
    let dir = vault(&[
        ("A.md", "[[B]] [[C]]"),
        ("B.md", "[[C]]"),
        ("C.md", "![[A]]"),
    ]);
    let (db, report) = index(dir.path());
    assert_eq!(report.links, 4);

    let a = file_id(&db, "A");
    let c = file_id(&db, "C");

    let forward: Vec<String> = db
        .find_links_forward(a)
        .unwrap()
        .into_iter()
        .map(|l| l.target)
        .collect();
    assert_eq!(forward, vec!["B", "C"]);

    let backward = db.find_links_backward(c).unwrap();
    assert_eq!(backward.len(), 2);
    assert!(backward.iter().all(|l| l.target_file_id == c));

    let embeds = db.find_links_backward(a).unwrap();
    assert_eq!(embeds.len(), 1);
    assert_eq!(embeds[0].link_type, LinkType::Embed);
}

#[test]
fn test_markdown_links_resolve_like_wiki_links() {
    let dir = vault(&[
        ("notes/A.md", "[to b](/notes/B) and [away](https://example.com)"),
        ("notes/B.md", ""),
    ]);
    let (db, _) = index(dir.path());

    let links = db.find_links_all().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!((links[0].source.as_str(), links[0].target.as_str()), ("notes/A", "notes/B"));
}

#[test]
fn test_url_paths_are_root_relative_without_extension() {
    let dir = vault(&[
        ("index.md", ""),
        ("daily/2024-01-01.md", ""),
        ("projects/index.md", ""),
        (".obsidian/app.md", ""),
    ]);
    let (db, _) = index(dir.path());

    let all = db.find_files(&FileFilter::default()).unwrap();
    let mut url_paths: Vec<&str> = all.iter().map(|f| f.url_path.as_str()).collect();
    url_paths.sort_unstable();
    assert_eq!(url_paths, vec![ROOT_URL_PATH, "daily/2024-01-01", "projects"]);

    for file in &all {
        assert_eq!(file.file_type, "md");
        assert!(!file.url_path.ends_with(".md"));
        assert!(file.url_path == ROOT_URL_PATH || !file.url_path.starts_with('/'));
    }
}

#[test]
fn test_metadata_queries() {
    let dir = vault(&[
        ("A.md", "---\ntitle: Alpha\ndate: 2024-03-01\n---\n"),
        ("B.md", "---\ntitle: Beta\n---\n"),
    ]);
    let (db, _) = index(dir.path());

    let by_title = db
        .find_file_where(&FileFilter {
            title: Some("Beta".into()),
            ..Default::default()
        })
        .unwrap()
        .unwrap();
    assert_eq!(by_title.url_path, "B");

    let by_date = db
        .find_files(&FileFilter {
            date: Some("2024-03-01".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_date.len(), 1);
    assert_eq!(by_date[0].metadata.title.as_deref(), Some("Alpha"));
}

#[test]
fn test_small_chunks_store_everything() {
    let files: Vec<(String, String)> = (0..25)
        .map(|i| (format!("n{:02}.md", i), format!("[[n{:02}]] #t{}", (i + 1) % 25, i % 3)))
        .collect();
    let refs: Vec<(&str, &str)> = files.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect();
    let dir = vault(&refs);

    let db = Database::open_in_memory().unwrap();
    let config = IndexConfig {
        chunk_size: 4,
        ..Default::default()
    };
    let report = index_directory(&db, dir.path(), config).unwrap();

    assert_eq!(report.files, 25);
    assert_eq!(report.tags, 3);
    assert_eq!(report.file_tags, 25);
    assert_eq!(report.links, 25);
    assert_eq!(db.count_links().unwrap(), 25);
}
