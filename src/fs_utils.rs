//! Filesystem helpers for corpus directories.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default document extension.
pub const TXT_EXTENSION: &str = ".txt";

/// Ordering applied by [`list_filepaths_with_sizes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileSizeOrder {
    /// Listing order (sorted by path).
    Unordered,
    /// Smallest first.
    Ascending,
    /// Largest first.
    #[default]
    Descending,
}

/// Lists files in `base` whose name ends with `extension`.
///
/// With `include_subdirs` the whole tree is walked. With `only_empty` only
/// zero-byte files are returned. Results are sorted by path.
pub fn list_filepaths(
    base: impl AsRef<Path>,
    extension: &str,
    include_subdirs: bool,
    only_empty: bool,
) -> Result<Vec<PathBuf>> {
    let base = base.as_ref();
    let max_depth = if include_subdirs { usize::MAX } else { 1 };

    let mut paths = Vec::new();
    for entry in WalkDir::new(base)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().ends_with(extension) {
            continue;
        }
        if only_empty && entry.metadata()?.len() != 0 {
            continue;
        }
        paths.push(entry.into_path());
    }
    Ok(paths)
}

/// Lists files with their size in bytes, ordered by `order`.
///
/// Sorting is stable, so files of equal size keep path order.
pub fn list_filepaths_with_sizes(
    base: impl AsRef<Path>,
    extension: &str,
    include_subdirs: bool,
    order: FileSizeOrder,
) -> Result<Vec<(PathBuf, u64)>> {
    let mut entries = list_filepaths(base, extension, include_subdirs, false)?
        .into_iter()
        .map(|path| {
            let size = fs::metadata(&path)?.len();
            Ok((path, size))
        })
        .collect::<Result<Vec<_>>>()?;

    match order {
        FileSizeOrder::Unordered => {}
        FileSizeOrder::Ascending => entries.sort_by_key(|(_, size)| *size),
        FileSizeOrder::Descending => entries.sort_by(|a, b| b.1.cmp(&a.1)),
    }
    Ok(entries)
}

/// Lists the immediate subdirectories of `base`, sorted by name.
pub fn list_subdirectories(base: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(base.as_ref())
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// Moves `path` into `dest_dir`, keeping its file name. Returns the new path.
pub fn move_file(path: impl AsRef<Path>, dest_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .ok_or_else(|| Error::InvalidData(format!("not a file path: {}", path.display())))?;
    let target = dest_dir.as_ref().join(name);

    if fs::rename(path, &target).is_err() {
        // Cross-device moves cannot be renamed.
        fs::copy(path, &target)?;
        fs::remove_file(path)?;
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "bbbbbb").unwrap();
        fs::write(dir.path().join("a.txt"), "aaa").unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "skip").unwrap();
        fs::create_dir(dir.path().join("Kafka")).unwrap();
        fs::write(dir.path().join("Kafka").join("c.txt"), "cccccccccc").unwrap();
        dir
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_list_top_level() {
        let dir = corpus();
        let paths = list_filepaths(dir.path(), TXT_EXTENSION, false, false).unwrap();
        assert_eq!(names(&paths), vec!["a.txt", "b.txt", "empty.txt"]);
    }

    #[test]
    fn test_list_recursive() {
        let dir = corpus();
        let paths = list_filepaths(dir.path(), TXT_EXTENSION, true, false).unwrap();
        assert_eq!(paths.len(), 4);
        assert!(paths.contains(&dir.path().join("Kafka").join("c.txt")));
    }

    #[test]
    fn test_list_only_empty() {
        let dir = corpus();
        let paths = list_filepaths(dir.path(), TXT_EXTENSION, true, true).unwrap();
        assert_eq!(names(&paths), vec!["empty.txt"]);
    }

    #[test]
    fn test_sizes_ordering() {
        let dir = corpus();
        let desc =
            list_filepaths_with_sizes(dir.path(), TXT_EXTENSION, true, FileSizeOrder::Descending)
                .unwrap();
        let sizes: Vec<u64> = desc.iter().map(|(_, s)| *s).collect();
        assert_eq!(sizes, vec![10, 6, 3, 0]);

        let asc =
            list_filepaths_with_sizes(dir.path(), TXT_EXTENSION, true, FileSizeOrder::Ascending)
                .unwrap();
        let sizes: Vec<u64> = asc.iter().map(|(_, s)| *s).collect();
        assert_eq!(sizes, vec![0, 3, 6, 10]);
    }

    #[test]
    fn test_subdirectories() {
        let dir = corpus();
        let dirs = list_subdirectories(dir.path()).unwrap();
        assert_eq!(dirs, vec![dir.path().join("Kafka")]);
    }

    #[test]
    fn test_move_file() {
        let dir = corpus();
        let target = move_file(dir.path().join("a.txt"), dir.path().join("Kafka")).unwrap();
        assert_eq!(target, dir.path().join("Kafka").join("a.txt"));
        assert!(target.exists());
        assert!(!dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_missing_base_is_error() {
        let result = list_filepaths("/nonexistent/corpus", TXT_EXTENSION, false, false);
        assert!(matches!(result, Err(Error::Walk(_))));
    }
}
