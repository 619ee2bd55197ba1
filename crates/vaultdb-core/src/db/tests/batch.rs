use super::numbered_files;
use crate::db::Database;
use crate::error::VaultError;
use crate::metadata::Metadata;
use crate::records::{FileRecord, LinkType, NewLink};

fn row_counts(chunk_size: usize) -> (i64, i64, i64) {
    let db = Database::open_in_memory().unwrap();
    db.insert_files(&numbered_files(10), chunk_size).unwrap();
    (
        db.count_files().unwrap(),
        db.count_tags().unwrap(),
        db.count_file_tags().unwrap(),
    )
}

#[test]
fn test_insert_files_with_tags() {
    let db = Database::open_in_memory().unwrap();
    let inserted = db.insert_files(&numbered_files(10), 1000).unwrap();

    assert_eq!(inserted.files, 10);
    assert_eq!(inserted.tags, 11);
    assert_eq!(inserted.file_tags, 20);
    assert_eq!(db.count_files().unwrap(), 10);
    assert_eq!(db.count_tags().unwrap(), 10 + 1);
    assert_eq!(db.count_file_tags().unwrap(), 10 * 2);
}

#[test]
fn test_chunk_size_does_not_change_end_state() {
    let len = 10;
    let expected = row_counts(len);
    for chunk_size in [1, len - 1, len, len + 1] {
        assert_eq!(row_counts(chunk_size), expected, "chunk size {}", chunk_size);
    }
}

#[test]
fn test_zero_chunk_size_rejected() {
    let db = Database::open_in_memory().unwrap();
    let err = db.insert_files(&numbered_files(1), 0).unwrap_err();
    assert!(matches!(err, VaultError::InvalidValue { .. }));
    assert_eq!(db.count_files().unwrap(), 0);
}

#[test]
fn test_empty_batch_is_noop() {
    let db = Database::open_in_memory().unwrap();
    let inserted = db.insert_files(&[], 10).unwrap();
    assert_eq!(inserted.files, 0);
    assert_eq!(db.insert_links(&[], 10).unwrap(), 0);
}

#[test]
fn test_duplicate_tags_stored_once() {
    let db = Database::open_in_memory().unwrap();
    let file = FileRecord {
        file_path: "/v/A.md".to_string(),
        url_path: "A".to_string(),
        file_type: "md".to_string(),
        metadata: Metadata {
            title: None,
            date: None,
            tags: vec!["x".into(), "y".into(), "y".into(), "x".into()],
        },
    };
    let inserted = db.insert_files(&[file], 1000).unwrap();

    assert_eq!(inserted.tags, 2);
    assert_eq!(inserted.file_tags, 2);
    let names: Vec<_> = db.find_tags_all().unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["x", "y"]);
}

#[test]
fn test_existing_tags_reused_across_batches() {
    let db = Database::open_in_memory().unwrap();
    let files = numbered_files(4);
    db.insert_files(&files[..2], 10).unwrap();
    let second = db.insert_files(&files[2..], 10).unwrap();

    // tag2 already exists from the first batch
    assert_eq!(second.tags, 2);
    assert_eq!(db.count_tags().unwrap(), 5);
    assert_eq!(db.count_file_tags().unwrap(), 8);
}

#[test]
fn test_failed_chunk_rolls_back_call() {
    let db = Database::open_in_memory().unwrap();
    let mut files = numbered_files(5);
    files[4].file_path = files[0].file_path.clone();

    assert!(db.insert_files(&files, 2).is_err());
    assert_eq!(db.count_files().unwrap(), 0);
}

#[test]
fn test_links_unique_per_type() {
    let db = super::seeded_db(2);
    let normal = NewLink {
        source_file_id: 1,
        target_file_id: 2,
        link_type: LinkType::Normal,
    };
    let embed = NewLink {
        link_type: LinkType::Embed,
        ..normal
    };

    assert_eq!(db.insert_links(&[normal, embed], 1).unwrap(), 2);
    assert!(db.insert_links(&[normal], 1).is_err());
    assert_eq!(db.count_links().unwrap(), 2);
}

#[test]
fn test_links_to_missing_files_rejected() {
    let db = super::seeded_db(1);
    let link = NewLink {
        source_file_id: 1,
        target_file_id: 99,
        link_type: LinkType::Normal,
    };
    assert!(db.insert_links(&[link], 10).is_err());
    assert_eq!(db.count_links().unwrap(), 0);
}

#[test]
fn test_large_chunk_is_capped_by_parameter_limit() {
    let db = Database::open_in_memory().unwrap();
    let files = numbered_files(20);
    let inserted = db.batch_insert(&files, usize::MAX).unwrap();
    assert_eq!(inserted, 20);
}
