//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`AarloError`]
//! via `From` when crossing a port boundary.

use std::path::PathBuf;

/// Boxed error carried by collaborator failures (backend, store, media).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for every fallible operation of the integration.
#[derive(Debug, thiserror::Error)]
pub enum AarloError {
    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The storage directory could not be prepared.
    #[error("storage directory unavailable: {0}")]
    StorageDir(#[from] StorageDirError),

    /// The cloud backend failed (network, authentication, server error).
    #[error("backend error: {0}")]
    Backend(#[source] BoxError),

    /// The backend answered with a payload of an unexpected shape.
    #[error("unexpected response from {endpoint}")]
    UnexpectedResponse {
        /// Endpoint (or resource) that produced the payload.
        endpoint: &'static str,
    },

    /// The key/value store failed to persist or load.
    #[error("storage error: {0}")]
    Storage(#[source] BoxError),

    /// The media library failed to load or query recordings.
    #[error("media library error: {0}")]
    Media(#[source] BoxError),
}

/// Domain validation failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The integration name must not be empty.
    #[error("name must not be empty")]
    EmptyName,

    /// A refresh interval must be strictly positive.
    #[error("{field} must be non-zero")]
    ZeroInterval {
        /// Name of the offending setting.
        field: &'static str,
    },

    /// A refresh or reload period exceeds what the scheduler can track.
    #[error("{field} must not exceed {max}")]
    IntervalTooLong {
        /// Name of the offending setting.
        field: &'static str,
        /// Largest accepted value, in the setting's unit.
        max: u64,
    },

    /// The last-capture format is not a valid strftime format.
    #[error("invalid time format {0:?}")]
    InvalidTimeFormat(String),
}

/// Why the storage directory could not be created.
///
/// An already existing directory is not an error.
#[derive(Debug, thiserror::Error)]
pub enum StorageDirError {
    /// The process may not create the directory.
    #[error("permission denied creating {}: {source}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Something other than a directory already sits at the path.
    #[error("{} exists and is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// Any other filesystem failure.
    #[error("failed to create {}: {source}", path.display())]
    Other {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
