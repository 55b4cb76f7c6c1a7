//! Enumeration of directory entries.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while listing a directory.
#[derive(Debug, Error)]
pub enum ListError {
    /// The path does not exist or is not a directory.
    #[error("Directory not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Reading the directory failed part-way.
    #[error("Error reading directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Returns the names of all entries (files and directories) directly under
/// `path`.
///
/// Names come back in the order the file system yields them, which is
/// neither sorted nor guaranteed to be stable between calls. The result is a
/// snapshot: entries created or removed afterwards are not reflected.
///
/// # Errors
///
/// Returns `ListError::PathNotFound` if `path` is missing or not a directory.
pub fn list_entries(path: &Path) -> Result<Vec<OsString>, ListError> {
    if !path.is_dir() {
        return Err(ListError::PathNotFound(path.to_path_buf()));
    }

    let io_error = |source| ListError::Io {
        path: path.to_path_buf(),
        source,
    };

    fs::read_dir(path)
        .map_err(io_error)?
        .map(|entry| entry.map(|e| e.file_name()).map_err(io_error))
        .collect()
}
