//! Filesystem helpers returning [`CoreError`].

use crate::error::CoreError;
use std::fs;
use std::io;
use std::path::Path;

/// Creates `path` and its parents if missing.
///
/// # Errors
///
/// [`CoreError::Filesystem`] if the path is occupied by something other than
/// a directory, or if creation fails.
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        return Err(CoreError::Filesystem {
            message: "Path exists but is not a directory".to_string(),
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "Path exists but is not a directory"),
        });
    }
    fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
        message: "Failed to create directory".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}
