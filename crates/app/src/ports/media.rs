//! Media library port — the index of recorded videos.

use std::future::Future;

use aarlo_domain::error::AarloError;
use aarlo_domain::media::Video;

/// Library of recordings for the whole account.
pub trait MediaLibrary: Send + Sync {
    /// (Re)load the library from the cloud.
    fn load(&self) -> impl Future<Output = Result<(), AarloError>> + Send;

    /// Recordings of one camera from the last load, in any order.
    fn videos_for(
        &self,
        device_id: &str,
    ) -> impl Future<Output = Result<Vec<Video>, AarloError>> + Send;
}

impl<T: MediaLibrary> MediaLibrary for std::sync::Arc<T> {
    fn load(&self) -> impl Future<Output = Result<(), AarloError>> + Send {
        (**self).load()
    }

    fn videos_for(
        &self,
        device_id: &str,
    ) -> impl Future<Output = Result<Vec<Video>, AarloError>> + Send {
        (**self).videos_for(device_id)
    }
}
