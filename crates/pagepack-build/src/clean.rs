//! Removal of superseded source files after an in-place pack.

use std::fs;
use std::path::{Path, PathBuf};

/// Delete the given files, skipping directories and ignoring failures.
///
/// Returns the number of files actually removed.
pub fn remove_files<P: AsRef<Path>>(paths: &[P]) -> usize {
    let mut removed = 0;

    for path in paths {
        let path = path.as_ref();
        if path.is_file() && fs::remove_file(path).is_ok() {
            removed += 1;
        }
    }

    removed
}

/// Remove `dir` if empty, then walk upward removing each parent that
/// the removal left empty. Stops at the first directory that cannot be
/// removed.
pub fn remove_empty_dirs(dir: &Path) {
    let mut current = Some(dir);

    while let Some(d) = current {
        if fs::remove_dir(d).is_err() {
            return;
        }
        current = d.parent();
    }
}

/// Unique parent directories of a set of file paths.
pub fn parent_dirs<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    for path in paths {
        if let Some(parent) = path.as_ref().parent() {
            if !dirs.iter().any(|d| d == parent) {
                dirs.push(parent.to_path_buf());
            }
        }
    }

    dirs
}
