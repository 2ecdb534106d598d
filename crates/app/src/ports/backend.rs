//! Backend port — the Arlo cloud session.

use std::future::Future;

use aarlo_domain::device::NotifyTarget;
use aarlo_domain::error::AarloError;
use serde_json::Value;

/// Authenticated session with the Arlo cloud.
///
/// Implementations own login, request signing, timeouts and the event
/// stream; results of [`notify`](Self::notify) requests arrive through that
/// stream and are not returned here.
pub trait Backend: Send + Sync {
    /// `GET` a cloud endpoint and return the unwrapped `data` payload.
    fn get(&self, url: &str) -> impl Future<Output = Result<Value, AarloError>> + Send;

    /// Download raw bytes (thumbnails, snapshots) from a presigned url.
    fn get_image(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, AarloError>> + Send;

    /// Send a request to a base station; the answer comes back asynchronously.
    fn notify(
        &self,
        base: &NotifyTarget,
        body: Value,
    ) -> impl Future<Output = Result<(), AarloError>> + Send;

    /// Keep-alive ping of a base station.
    fn ping(&self, base: &NotifyTarget) -> impl Future<Output = Result<(), AarloError>> + Send;

    /// End the session.
    fn logout(&self) -> impl Future<Output = Result<(), AarloError>> + Send;

    /// Whether the session is currently logged in.
    fn is_connected(&self) -> bool;
}

impl<T: Backend> Backend for std::sync::Arc<T> {
    fn get(&self, url: &str) -> impl Future<Output = Result<Value, AarloError>> + Send {
        (**self).get(url)
    }

    fn get_image(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, AarloError>> + Send {
        (**self).get_image(url)
    }

    fn notify(
        &self,
        base: &NotifyTarget,
        body: Value,
    ) -> impl Future<Output = Result<(), AarloError>> + Send {
        (**self).notify(base, body)
    }

    fn ping(&self, base: &NotifyTarget) -> impl Future<Output = Result<(), AarloError>> + Send {
        (**self).ping(base)
    }

    fn logout(&self) -> impl Future<Output = Result<(), AarloError>> + Send {
        (**self).logout()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}
