use super::seeded_db;
use crate::db::FileFilter;
use crate::error::VaultError;
use crate::records::{LinkType, NewLink};

fn link(source: i64, target: i64) -> NewLink {
    NewLink {
        source_file_id: source,
        target_file_id: target,
        link_type: LinkType::Normal,
    }
}

#[test]
fn test_find_files_unfiltered() {
    let db = seeded_db(10);
    let files = db.find_files(&FileFilter::default()).unwrap();
    assert_eq!(files.len(), 10);
    assert_eq!(files[0].file_path, "file0.md");
    assert_eq!(files[0].metadata.tags, vec!["tag0", "tag1"]);
}

#[test]
fn test_find_files_by_columns() {
    let db = seeded_db(10);

    let by_path = db
        .find_files(&FileFilter {
            file_path: Some("file1.md".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_path.len(), 1);
    assert_eq!(by_path[0].url_path, "file1");

    let by_url = db.find_files(&FileFilter::by_url_path("file2")).unwrap();
    assert_eq!(by_url[0].file_path, "file2.md");

    let by_type = db
        .find_files(&FileFilter {
            file_type: Some("md".into()),
            limit: Some(3),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_type.len(), 3);
}

#[test]
fn test_find_files_by_metadata() {
    let db = seeded_db(10);
    let by_title = db
        .find_files(&FileFilter {
            title: Some("file3".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].metadata.title.as_deref(), Some("file3"));

    let by_date = db
        .find_files(&FileFilter {
            date: Some("2021-01-01".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_date.len(), 10);
}

#[test]
fn test_conditions_are_conjunctive() {
    let db = seeded_db(10);
    let files = db
        .find_files(&FileFilter {
            url_path: Some("file1".into()),
            title: Some("file2".into()),
            ..Default::default()
        })
        .unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_tag_filter_is_any_of() {
    let db = seeded_db(10);

    let one = db.find_files(&FileFilter::by_tags(["tag1"])).unwrap();
    let paths: Vec<_> = one.iter().map(|f| f.file_path.as_str()).collect();
    assert_eq!(paths, vec!["file0.md", "file1.md"]);

    // file1 carries both tags but is returned once
    let either = db.find_files(&FileFilter::by_tags(["tag1", "tag2"])).unwrap();
    let paths: Vec<_> = either.iter().map(|f| f.file_path.as_str()).collect();
    assert_eq!(paths, vec!["file0.md", "file1.md", "file2.md"]);

    let none = db.find_files(&FileFilter::by_tags(["nope"])).unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_tag_filter_is_case_sensitive() {
    let db = seeded_db(3);
    assert!(db.find_files(&FileFilter::by_tags(["TAG1"])).unwrap().is_empty());
}

#[test]
fn test_find_file_where() {
    let db = seeded_db(10);
    let file = db
        .find_file_where(&FileFilter {
            file_path: Some("file1.md".into()),
            ..Default::default()
        })
        .unwrap()
        .unwrap();
    assert_eq!(file.file_path, "file1.md");

    let missing = db.find_file_where(&FileFilter::by_url_path("zzz")).unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_find_file_where_requires_condition() {
    let db = seeded_db(1);
    let err = db
        .find_file_where(&FileFilter {
            limit: Some(1),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, VaultError::MissingCondition { .. }));
}

#[test]
fn test_find_tags_by_file_ids() {
    let db = seeded_db(10);
    let rows = db.find_tags_by_file_ids(&[1, 2]).unwrap();
    let pairs: Vec<_> = rows.iter().map(|r| (r.file_id, r.name.as_str())).collect();
    assert_eq!(
        pairs,
        vec![(1, "tag0"), (1, "tag1"), (2, "tag1"), (2, "tag2")]
    );
    assert!(db.find_tags_by_file_ids(&[]).unwrap().is_empty());
}

#[test]
fn test_url_path_projection() {
    let db = seeded_db(3);
    assert_eq!(
        db.url_path_projection().unwrap(),
        vec![
            (1, "file0".to_string()),
            (2, "file1".to_string()),
            (3, "file2".to_string())
        ]
    );
}

#[test]
fn test_forward_and_backward_links() {
    let db = seeded_db(4);
    db.insert_links(&[link(1, 2), link(1, 3), link(2, 1), link(3, 2)], 2)
        .unwrap();

    let forward = db.find_links_forward(1).unwrap();
    assert_eq!(forward.len(), 2);
    assert!(forward.iter().all(|l| l.source_file_id == 1));
    assert_eq!(forward[0].source, "file0");
    assert_eq!(forward[0].target, "file1");

    let backward = db.find_links_backward(2).unwrap();
    let sources: Vec<_> = backward.iter().map(|l| l.source_file_id).collect();
    assert_eq!(sources, vec![1, 3]);
    assert!(backward.iter().all(|l| l.target_file_id == 2));

    assert!(db.find_links_forward(4).unwrap().is_empty());
    assert_eq!(db.find_links_all().unwrap().len(), 4);
}

#[test]
fn test_links_materialise_type() {
    let db = seeded_db(2);
    db.insert_links(
        &[NewLink {
            link_type: LinkType::Embed,
            ..link(2, 1)
        }],
        10,
    )
    .unwrap();
    let all = db.find_links_all().unwrap();
    assert_eq!(all[0].link_type, LinkType::Embed);
    assert_eq!(all[0].source, "file1");
}
