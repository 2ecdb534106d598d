//! Simulated recording library implementing the [`MediaLibrary`] port.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use aarlo_app::ports::MediaLibrary;
use aarlo_domain::error::AarloError;
use aarlo_domain::media::Video;
use aarlo_domain::time::now;

use crate::devices::{self, VirtualCamera, VirtualDevice};

/// Recordings of the virtual cameras, regenerated relative to the current
/// time on every [`load`](MediaLibrary::load).
///
/// Nothing is listed before the first load.
pub struct VirtualMediaLibrary {
    cameras: Vec<VirtualCamera>,
    videos: Mutex<Vec<Video>>,
    loads: AtomicUsize,
}

impl Default for VirtualMediaLibrary {
    fn default() -> Self {
        Self::for_devices(&devices::demo())
    }
}

impl VirtualMediaLibrary {
    #[must_use]
    pub fn for_devices(devices: &[VirtualDevice]) -> Self {
        Self {
            cameras: devices
                .iter()
                .filter_map(VirtualDevice::as_camera)
                .cloned()
                .collect(),
            videos: Mutex::new(Vec::new()),
            loads: AtomicUsize::new(0),
        }
    }

    /// How many times the library was loaded.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Acquire)
    }
}

impl MediaLibrary for VirtualMediaLibrary {
    async fn load(&self) -> Result<(), AarloError> {
        let at = now();
        let videos: Vec<Video> = self
            .cameras
            .iter()
            .flat_map(|camera| camera.recordings(at))
            .collect();
        tracing::debug!(count = videos.len(), "virtual media library loaded");
        *self.videos.lock().unwrap_or_else(PoisonError::into_inner) = videos;
        self.loads.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn videos_for(&self, device_id: &str) -> Result<Vec<Video>, AarloError> {
        Ok(self
            .videos
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|video| video.device_id == device_id)
            .cloned()
            .collect())
    }
}
