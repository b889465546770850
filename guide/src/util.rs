use std::path::{Path, PathBuf};

use saltaire::err;
use saltaire::error::Result;

/// Returns `root/path` if it is a directory. A missing path is an error only
/// when `must_exist`.
#[track_caller]
pub fn dircheck<P: AsRef<Path>>(root: &Path, path: P, must_exist: bool) -> Result<Option<PathBuf>> {
    let path = root.join(path);
    match (path.metadata(), must_exist) {
        (Ok(meta), _) if meta.is_dir() => Ok(Some(path)),
        (Ok(_) | Err(_), false) => Ok(None),
        (Ok(_), true) => err! {
            format!("{} path must point to a directory", path.display()),
            "path is not a directory" => path.display(),
        },
        (Err(e), true) => err! {
            format!("{} must point to an existing directory", path.display()),
            "path does not exist" => path.display(),
            e,
        },
    }
}

/// Files under `dir`, depth-first in file-name order. Hidden entries are
/// skipped.
pub fn files(dir: &Path) -> impl Iterator<Item = PathBuf> {
    jwalk::WalkDir::new(dir)
        .follow_links(true)
        .sort(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
}

pub fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn dircheck_distinguishes_missing_and_files() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("content")).unwrap();
        fs::write(root.path().join("config.toml"), "").unwrap();

        assert!(dircheck(root.path(), "content", true).unwrap().is_some());
        assert!(dircheck(root.path(), "assets", false).unwrap().is_none());
        assert!(dircheck(root.path(), "assets", true).is_err());
        assert!(dircheck(root.path(), "config.toml", true).is_err());
    }

    #[test]
    fn files_are_sorted_and_hidden_skipped() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("b")).unwrap();
        fs::write(root.path().join("b/z.md"), "").unwrap();
        fs::write(root.path().join("a.md"), "").unwrap();
        fs::write(root.path().join(".draft.md"), "").unwrap();

        let names: Vec<_> = files(root.path())
            .map(|p| p.strip_prefix(root.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(names, [PathBuf::from("a.md"), PathBuf::from("b/z.md")]);
    }
}
