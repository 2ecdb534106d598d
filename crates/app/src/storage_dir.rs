//! Storage directory preparation.

use std::io::ErrorKind;
use std::path::Path;

use aarlo_domain::error::StorageDirError;

/// Outcome of [`ensure_storage_dir`] when the directory is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageDir {
    Created,
    AlreadyExists,
}

/// Create the storage directory if it is missing.
///
/// Only the directory itself is created; its parent must exist.
///
/// # Errors
///
/// [`StorageDirError::PermissionDenied`] when creation is not allowed,
/// [`StorageDirError::NotADirectory`] when a file occupies the path and
/// [`StorageDirError::Other`] for any other IO failure.
pub fn ensure_storage_dir(path: &Path) -> Result<StorageDir, StorageDirError> {
    match std::fs::create_dir(path) {
        Ok(()) => Ok(StorageDir::Created),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            if path.is_dir() {
                Ok(StorageDir::AlreadyExists)
            } else {
                Err(StorageDirError::NotADirectory {
                    path: path.to_path_buf(),
                })
            }
        }
        Err(err) if err.kind() == ErrorKind::PermissionDenied => {
            Err(StorageDirError::PermissionDenied {
                path: path.to_path_buf(),
                source: err,
            })
        }
        Err(err) => Err(StorageDirError::Other {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}
