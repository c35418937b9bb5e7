//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;

/// Directory names never descended into when looking for manifests.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &["node_modules", ".git"];

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Find files named `file_name` below `root`, at most `max_depth` levels deep.
///
/// Directories whose name is in `ignore` are pruned. Results are sorted by
/// path. Symlinks are not followed.
pub fn find_files_named(
    root: &Path,
    file_name: &str,
    max_depth: usize,
    ignore: &[&str],
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("not a directory: {}", root.display());
    }

    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !ignore.iter().any(|name| entry.file_name() == *name)
        });

    let mut results = Vec::new();
    for entry in walker {
        let entry =
            entry.with_context(|| format!("failed to walk directory: {}", root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == file_name {
            results.push(entry.into_path());
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_files_named() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        for dir in ["a", "b/nested", "a/node_modules/dep", ".git", "c/d/e/f"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        for file in [
            "a/package.json",
            "b/nested/package.json",
            "a/node_modules/dep/package.json",
            ".git/package.json",
            "c/d/e/f/package.json",
            "b/readme.md",
        ] {
            fs::write(root.join(file), "{}").unwrap();
        }

        let files = find_files_named(root, "package.json", 3, DEFAULT_IGNORED_DIRS).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![PathBuf::from("a/package.json"), PathBuf::from("b/nested/package.json")]
        );
    }

    #[test]
    fn test_find_files_named_missing_root() {
        let tmp = TempDir::new().unwrap();
        assert!(find_files_named(&tmp.path().join("nope"), "package.json", 3, &[]).is_err());
    }
}
