//! # aarlo-adapter-storage-json
//!
//! Key/value store persisted as one JSON file in the storage directory.
//!
//! ## Responsibilities
//! - Implement the `KeyValueStore` port defined in `aarlo-app::ports::store`
//! - Load the file on open, serve reads and writes from memory
//! - Write the file atomically on `save`
//!
//! ## Dependency rule
//! Depends on `aarlo-app` (for port traits) and `aarlo-domain` (for error types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod store;

pub use error::StorageError;
pub use store::{Config, JsonFileStore};
