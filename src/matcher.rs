//! Read-only discovery of files whose names contain a keyword.
//!
//! The walk is a depth-first `WalkDir` traversal that never follows links.
//! Symlinks to files count as files; symlinked directories are neither
//! matched nor descended into.

use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::ffi::OsStr;
use std::fs::{self, FileType};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds all files under `source_dir` whose name contains `pattern`.
///
/// Matching is a case-insensitive substring test against the file name only,
/// never the full path. An empty pattern matches every file. With `recursive`
/// set the full subtree is searched, otherwise only direct children.
///
/// The returned paths are absolute. Their order is traversal order, not
/// sorted.
///
/// # Errors
///
/// Returns `OrganizeError::ReadDirectory` if any directory on the way cannot
/// be enumerated, and `OrganizeError::PathResolution` if `source_dir` cannot
/// be made absolute.
///
/// # Examples
///
/// ```no_run
/// use nametidy::matcher::find_files_with_pattern;
/// use std::path::Path;
///
/// let reports = find_files_with_pattern(Path::new("/home/user/Documents"), "report", true)?;
/// for path in &reports {
///     println!("{}", path.display());
/// }
/// # Ok::<(), nametidy::OrganizeError>(())
/// ```
pub fn find_files_with_pattern(
    source_dir: &Path,
    pattern: &str,
    recursive: bool,
) -> OrganizeResult<Vec<PathBuf>> {
    let root = std::path::absolute(source_dir).map_err(|e| OrganizeError::PathResolution {
        path: source_dir.to_path_buf(),
        source: e,
    })?;
    let needle = pattern.to_lowercase();

    let walker = WalkDir::new(&root)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .follow_links(false);

    let mut matching_files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| read_error(&root, e))?;
        if is_regular_file(entry.path(), entry.file_type())
            && name_contains(entry.file_name(), &needle)
        {
            matching_files.push(entry.into_path());
        }
    }

    Ok(matching_files)
}

/// Maps a walk failure onto the directory that could not be read.
fn read_error(root: &Path, error: walkdir::Error) -> OrganizeError {
    let path = error.path().unwrap_or(root).to_path_buf();
    let message = error.to_string();
    let source = error
        .into_io_error()
        .unwrap_or_else(|| io::Error::other(message));
    OrganizeError::ReadDirectory { path, source }
}

/// Regular files and symlinks that resolve to regular files.
fn is_regular_file(path: &Path, file_type: FileType) -> bool {
    if file_type.is_file() {
        return true;
    }
    file_type.is_symlink() && fs::metadata(path).is_ok_and(|meta| meta.is_file())
}

/// Case-insensitive substring test; `needle` must already be lowercased.
fn name_contains(file_name: &OsStr, needle: &str) -> bool {
    file_name.to_string_lossy().to_lowercase().contains(needle)
}
