use crate::db::Database;
use crate::metadata::Metadata;
use crate::records::FileRecord;

mod batch;
mod queries;

/// `file{i}.md` with title `file{i}`, date `2021-01-01` and tags
/// `tag{i}`, `tag{i+1}`
fn numbered_files(count: usize) -> Vec<FileRecord> {
    (0..count)
        .map(|i| FileRecord {
            file_path: format!("file{}.md", i),
            url_path: format!("file{}", i),
            file_type: "md".to_string(),
            metadata: Metadata {
                title: Some(format!("file{}", i)),
                date: Some("2021-01-01".to_string()),
                tags: vec![format!("tag{}", i), format!("tag{}", i + 1)],
            },
        })
        .collect()
}

fn seeded_db(count: usize) -> Database {
    let db = Database::open_in_memory().unwrap();
    db.insert_files(&numbered_files(count), 1000).unwrap();
    db
}
