//! Store port — the local key/value cache keyed by device id.

use std::future::Future;

use aarlo_domain::error::AarloError;
use serde_json::Value;

/// Persistent key/value store addressed by a path of segments,
/// typically `[device_id, key]`.
///
/// Reads and writes are in-memory; [`save`](Self::save) flushes to the
/// durable medium.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, path: &[&str]) -> Option<Value>;

    fn set(&self, path: &[&str], value: Value);

    /// Flush the current contents to durable storage.
    fn save(&self) -> impl Future<Output = Result<(), AarloError>> + Send;

    /// Read a value, falling back to `default` when absent.
    fn get_or(&self, path: &[&str], default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }
}

impl<T: KeyValueStore> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, path: &[&str]) -> Option<Value> {
        (**self).get(path)
    }

    fn set(&self, path: &[&str], value: Value) {
        (**self).set(path, value);
    }

    fn save(&self) -> impl Future<Output = Result<(), AarloError>> + Send {
        (**self).save()
    }
}
