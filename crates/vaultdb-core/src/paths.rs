//! Vault file discovery and path normalisation
//!
//! Every path handed to the rest of the pipeline uses forward slashes. A file's
//! `url_path` is its vault-relative path without extension; it doubles as the
//! join key between raw links and persisted files.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, VaultError};

/// The url path of the vault's root `index` file
pub const ROOT_URL_PATH: &str = "/";

const INDEX_STEM: &str = "index";

/// Options for [`list_all_files`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Extensions to keep (without the dot, case-insensitive); empty keeps all
    pub extensions: Vec<String>,
    /// Skip entries whose name starts with `.`
    pub skip_hidden: bool,
}

impl WalkOptions {
    fn accepts_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Convert backslashes to forward slashes
pub fn encode_file_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalise an extracted link target.
///
/// Backslashes become `/` and the leading slash is dropped, except for the root
/// path `/`. Repeated leading slashes collapse too, so the result is stable
/// under a second application.
pub fn fix_path(path: &str) -> String {
    let encoded = encode_file_path(path);
    if !encoded.starts_with('/') {
        return encoded;
    }
    match encoded.trim_start_matches('/') {
        "" => ROOT_URL_PATH.to_string(),
        rest => rest.to_string(),
    }
}

/// List every file under `root`, depth-first and in lexical order per directory.
#[tracing::instrument(skip(options), fields(root = %root.display()))]
pub fn list_all_files(root: &Path, options: &WalkOptions) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(VaultError::VaultNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(options.skip_hidden && is_hidden(e)));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable vault entry");
                continue;
            }
        };

        if !entry.file_type().is_file() || !options.accepts_extension(entry.path()) {
            continue;
        }

        files.push(encode_file_path(&entry.path().to_string_lossy()));
    }

    tracing::debug!(count = files.len(), "discovered vault files");
    Ok(files)
}

/// Split a file path into `(url_path, file_type)` relative to `root`.
///
/// The extension of the final segment is the file type; the url path is the
/// remaining vault-relative path. `index` files stand for their directory and
/// the root index becomes `/`. Paths outside `root` keep their full form.
pub fn split_file_path(file_path: &str, root: &str) -> (String, String) {
    let file_path = encode_file_path(file_path);
    let root = encode_file_path(root);
    let root = root.trim_end_matches('/');

    let relative = if root.is_empty() {
        file_path.as_str()
    } else {
        file_path
            .strip_prefix(root)
            .filter(|rest| rest.starts_with('/'))
            .unwrap_or(file_path.as_str())
    };
    let relative = relative.trim_start_matches("./").trim_start_matches('/');

    let (dir, name) = match relative.rfind('/') {
        Some(pos) => (&relative[..pos], &relative[pos + 1..]),
        None => ("", relative),
    };

    let (stem, file_type) = match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], &name[pos + 1..]),
        _ => (name, ""),
    };

    let url_path = if stem == INDEX_STEM {
        if dir.is_empty() {
            ROOT_URL_PATH.to_string()
        } else {
            dir.to_string()
        }
    } else if dir.is_empty() {
        stem.to_string()
    } else {
        format!("{}/{}", dir, stem)
    };

    (url_path, file_type.to_string())
}

/// The permalink form of a url path: `/` for the root, `/<url_path>` otherwise
pub fn permalink_for(url_path: &str) -> String {
    if url_path == ROOT_URL_PATH {
        ROOT_URL_PATH.to_string()
    } else {
        format!("/{}", url_path.trim_start_matches('/'))
    }
}

/// Permalinks of every file under `root`, in walk order
pub fn find_permalinks_all(root: &Path, options: &WalkOptions) -> Result<Vec<String>> {
    let root_str = encode_file_path(&root.to_string_lossy());
    Ok(list_all_files(root, options)?
        .iter()
        .map(|path| permalink_for(&split_file_path(path, &root_str).0))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn mock_vault() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for file in [
            "A.md",
            "B.md",
            "dep1a/C.mdx",
            "dep1a/D.md",
            "dep1a/dep2a/F.md",
            "dep1b/E.md",
            "dep1b/index.md",
            "index.md",
            ".obsidian/app.json",
            "assets/logo.png",
        ] {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    fn relative(files: &[String], root: &Path) -> Vec<String> {
        let prefix = format!("{}/", encode_file_path(&root.to_string_lossy()));
        files
            .iter()
            .map(|f| f.strip_prefix(&prefix).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_list_all_files_depth_first_lexical() {
        let dir = mock_vault();
        let options = WalkOptions {
            extensions: vec!["md".into(), "mdx".into()],
            skip_hidden: true,
        };
        let files = list_all_files(dir.path(), &options).unwrap();
        assert_eq!(
            relative(&files, dir.path()),
            vec![
                "A.md",
                "B.md",
                "dep1a/C.mdx",
                "dep1a/D.md",
                "dep1a/dep2a/F.md",
                "dep1b/E.md",
                "dep1b/index.md",
                "index.md",
            ]
        );
    }

    #[test]
    fn test_list_all_files_extension_filter() {
        let dir = mock_vault();
        let options = WalkOptions {
            extensions: vec!["MDX".into()],
            skip_hidden: true,
        };
        let files = list_all_files(dir.path(), &options).unwrap();
        assert_eq!(relative(&files, dir.path()), vec!["dep1a/C.mdx"]);
    }

    #[test]
    fn test_list_all_files_hidden_entries() {
        let dir = mock_vault();
        let visible = list_all_files(
            dir.path(),
            &WalkOptions {
                extensions: vec![],
                skip_hidden: true,
            },
        )
        .unwrap();
        assert!(!visible.iter().any(|f| f.contains(".obsidian")));
        assert!(visible.iter().any(|f| f.ends_with("assets/logo.png")));

        let all = list_all_files(
            dir.path(),
            &WalkOptions {
                extensions: vec![],
                skip_hidden: false,
            },
        )
        .unwrap();
        assert!(all.iter().any(|f| f.ends_with(".obsidian/app.json")));
    }

    #[test]
    fn test_list_all_files_missing_root() {
        let dir = tempdir().unwrap();
        let err = list_all_files(&dir.path().join("nope"), &WalkOptions::default()).unwrap_err();
        assert!(matches!(err, VaultError::VaultNotFound { .. }));
    }

    #[test]
    fn test_fix_path() {
        assert_eq!(fix_path("/dep1a/C"), "dep1a/C");
        assert_eq!(fix_path("dep1a/C"), "dep1a/C");
        assert_eq!(fix_path("\\dep1a\\C"), "dep1a/C");
        assert_eq!(fix_path("/"), "/");
        assert_eq!(fix_path("\\"), "/");
        assert_eq!(fix_path("//x"), "x");
        assert_eq!(fix_path("///"), "/");
    }

    #[test]
    fn test_fix_path_idempotent() {
        for input in ["/", "\\", "/a/b", "a\\b", "//x", "///", "", "https://x.y/z"] {
            let once = fix_path(input);
            assert_eq!(fix_path(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_split_file_path() {
        assert_eq!(
            split_file_path("/vault/dep1a/C.mdx", "/vault"),
            ("dep1a/C".to_string(), "mdx".to_string())
        );
        assert_eq!(
            split_file_path("/vault/A.md", "/vault/"),
            ("A".to_string(), "md".to_string())
        );
        assert_eq!(
            split_file_path("C:\\vault\\notes\\x.y.md", "C:\\vault"),
            ("notes/x.y".to_string(), "md".to_string())
        );
        assert_eq!(
            split_file_path("/vault/README", "/vault"),
            ("README".to_string(), String::new())
        );
    }

    #[test]
    fn test_split_file_path_index_files() {
        assert_eq!(split_file_path("/vault/index.md", "/vault").0, "/");
        assert_eq!(split_file_path("/vault/dep1b/index.md", "/vault").0, "dep1b");
    }

    #[test]
    fn test_url_path_has_no_extension_or_backslash() {
        for (path, root) in [
            ("a\\b\\c.md", "a"),
            ("/v/x/y.mdx", "/v"),
            ("/v/.hidden.md", "/v"),
            ("/v/z", "/v"),
        ] {
            let (url_path, file_type) = split_file_path(path, root);
            assert!(!url_path.contains('\\'));
            if !file_type.is_empty() {
                assert!(!url_path.ends_with(&format!(".{}", file_type)));
            }
        }
    }

    #[test]
    fn test_find_permalinks_all() {
        let dir = mock_vault();
        let permalinks = find_permalinks_all(
            dir.path(),
            &WalkOptions {
                extensions: vec!["md".into(), "mdx".into()],
                skip_hidden: true,
            },
        )
        .unwrap();
        assert_eq!(
            permalinks,
            vec![
                "/A",
                "/B",
                "/dep1a/C",
                "/dep1a/D",
                "/dep1a/dep2a/F",
                "/dep1b/E",
                "/dep1b",
                "/",
            ]
        );
    }
}
