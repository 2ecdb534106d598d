//! JSON file implementation of [`KeyValueStore`].

use std::collections::BTreeMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use aarlo_app::ports::KeyValueStore;
use aarlo_domain::error::AarloError;
use serde_json::Value;

use crate::error::StorageError;

const SEPARATOR: &str = "/";

/// Configuration for the JSON file store.
pub struct Config {
    /// Location of the store file.
    pub path: PathBuf,
}

impl Config {
    /// Store file named after the account inside the storage directory.
    #[must_use]
    pub fn in_storage_dir(storage_dir: &Path, name: &str) -> Self {
        Self {
            path: storage_dir.join(format!("{name}.json")),
        }
    }

    /// Open the store, loading the file when it exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file cannot be read and
    /// [`StorageError::Json`] if it is not a JSON object.
    pub async fn open(self) -> Result<JsonFileStore, StorageError> {
        JsonFileStore::load(self.path).await
    }
}

/// In-memory key/value map flushed to a JSON file on [`save`](KeyValueStore::save).
///
/// Paths are joined with `/`, so `["CAM1", "deviceName"]` is stored under
/// `"CAM1/deviceName"`. Saves are serialized: each one snapshots the map
/// once the previous write has been renamed into place.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
    writing: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    async fn load(path: PathBuf) -> Result<Self, StorageError> {
        let read = tokio::fs::read(&path).await;
        let values = match read {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no store file, starting empty");
                BTreeMap::new()
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
            writing: tokio::sync::Mutex::new(()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn snapshot(&self) -> Result<Vec<u8>, StorageError> {
        Ok(serde_json::to_vec_pretty(&*self.lock())?)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn write(path: &Path, contents: Vec<u8>) -> Result<(), StorageError> {
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|source| StorageError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|source| StorageError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "store saved");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, path: &[&str]) -> Option<Value> {
        self.lock().get(&path.join(SEPARATOR)).cloned()
    }

    fn set(&self, path: &[&str], value: Value) {
        self.lock().insert(path.join(SEPARATOR), value);
    }

    fn save(&self) -> impl Future<Output = Result<(), AarloError>> + Send {
        async move {
            let _writing = self.writing.lock().await;
            let contents = self.snapshot()?;
            Self::write(&self.path, contents)
                .await
                .map_err(AarloError::from)
        }
    }
}
