//! Storage-specific error type wrapping IO and JSON errors.

use std::path::PathBuf;

use aarlo_domain::error::AarloError;

/// Errors originating from the JSON file store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the store file failed.
    #[error("store file {} IO error: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file is not a JSON object, or a value failed to serialize.
    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StorageError> for AarloError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
