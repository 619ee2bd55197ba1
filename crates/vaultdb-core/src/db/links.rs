//! Link persistence and traversal

use rusqlite::{params_from_iter, Row};

use crate::error::{Result, VaultError};
use crate::map_db_err;
use crate::records::{Link, LinkType, NewLink};

use super::batch::batch_insert;
use super::Database;

const LINK_SELECT: &str = "SELECT l.id, l.source_file_id, l.target_file_id, \
     s.url_path, t.url_path, l.type FROM links l \
     JOIN files s ON s.id = l.source_file_id \
     JOIN files t ON t.id = l.target_file_id";

type LinkRow = (i64, i64, i64, String, String, String);

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<LinkRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

impl Database {
    #[tracing::instrument(skip_all, fields(links = links.len()))]
    pub fn insert_links(&self, links: &[NewLink], chunk_size: usize) -> Result<usize> {
        batch_insert(&self.conn, links, chunk_size)
    }

    /// Every link with both endpoints' url paths
    pub fn find_links_all(&self) -> Result<Vec<Link>> {
        self.query_links("", None)
    }

    /// Links whose source is `file_id`
    pub fn find_links_forward(&self, file_id: i64) -> Result<Vec<Link>> {
        self.query_links(" WHERE l.source_file_id = ?", Some(file_id))
    }

    /// Links whose target is `file_id`
    pub fn find_links_backward(&self, file_id: i64) -> Result<Vec<Link>> {
        self.query_links(" WHERE l.target_file_id = ?", Some(file_id))
    }

    fn query_links(&self, where_sql: &str, file_id: Option<i64>) -> Result<Vec<Link>> {
        let sql = format!("{}{} ORDER BY l.id", LINK_SELECT, where_sql);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| map_db_err!("prepare link query", e))?;
        let rows = stmt
            .query_map(params_from_iter(file_id), link_from_row)
            .map_err(|e| map_db_err!("query links", e))?;

        let mut links = Vec::new();
        for row in rows {
            let (id, source_file_id, target_file_id, source, target, link_type) =
                row.map_err(|e| VaultError::field_extraction("link", e))?;
            links.push(Link {
                id,
                source_file_id,
                target_file_id,
                source,
                target,
                link_type: link_type.parse::<LinkType>()?,
            });
        }
        Ok(links)
    }
}
