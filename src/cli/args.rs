use clap::Args;

use vaultdb_core::db::FileFilter;

/// File query conditions shared by `files` and `file`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// File id
    #[arg(long)]
    pub id: Option<i64>,

    /// Full file path as stored
    #[arg(long)]
    pub path: Option<String>,

    /// Url path (root-relative, no extension)
    #[arg(long)]
    pub url_path: Option<String>,

    /// File type (extension without the dot)
    #[arg(long = "type")]
    pub file_type: Option<String>,

    /// Front matter title
    #[arg(long)]
    pub title: Option<String>,

    /// Front matter date
    #[arg(long)]
    pub date: Option<String>,

    /// Tag name; repeat to match files carrying any of them
    #[arg(long = "tag", action = clap::ArgAction::Append)]
    pub tags: Vec<String>,

    /// Maximum number of files to return
    #[arg(long)]
    pub limit: Option<usize>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> FileFilter {
        FileFilter {
            id: self.id,
            file_path: self.path.clone(),
            url_path: self.url_path.clone(),
            file_type: self.file_type.clone(),
            title: self.title.clone(),
            date: self.date.clone(),
            tag_names: self.tags.clone(),
            limit: self.limit,
        }
    }
}
