//! Camera entity.

use std::time::Duration;

use aarlo_domain::device::{ARLO_BABY_MODEL, DeviceRecord, NotifyTarget};
use aarlo_domain::entity::CameraState;
use aarlo_domain::error::AarloError;
use aarlo_domain::keys::{CAPTURED_TODAY_KEY, LAST_CAPTURE_KEY, LAST_IMAGE_URL_KEY};
use aarlo_domain::time::{now, to_arlo_time};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use super::DeviceInfo;
use super::base::get_request;
use crate::ports::{Backend, KeyValueStore, MediaLibrary};

/// A camera, including the camera half of an Arlo Q.
#[derive(Debug)]
pub struct Camera {
    info: DeviceInfo,
    parent: NotifyTarget,
    state: Mutex<CameraState>,
}

impl Camera {
    /// Build from a device record; `None` when the record has no device id.
    ///
    /// A camera without a parent is its own base.
    #[must_use]
    pub fn from_record(record: &DeviceRecord) -> Option<Self> {
        let info = DeviceInfo::from_record(record)?;
        let parent = NotifyTarget {
            device_id: record.parent_id().unwrap_or(&info.device_id).to_string(),
            xcloud_id: record.xcloud_id().map(ToString::to_string),
        };
        Some(Self {
            info,
            parent,
            state: Mutex::new(CameraState::default()),
        })
    }

    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.info.device_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    #[must_use]
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Base station relaying this camera's requests.
    #[must_use]
    pub fn parent(&self) -> &NotifyTarget {
        &self.parent
    }

    /// Whether the model carries ambient sensors.
    #[must_use]
    pub fn has_ambient_sensors(&self) -> bool {
        self.info
            .model_id
            .as_deref()
            .is_some_and(|model| model.starts_with(ARLO_BABY_MODEL))
    }

    /// Copy of the current state.
    pub async fn state(&self) -> CameraState {
        self.state.lock().await.clone()
    }

    /// Download the thumbnail the cloud last reported for this camera.
    ///
    /// Without a thumbnail url the camera shows `blank`. On failure the
    /// previous image is kept.
    ///
    /// # Errors
    ///
    /// Propagates the download error.
    #[tracing::instrument(skip_all, fields(device_id = %self.info.device_id))]
    pub async fn update_last_image<B, S>(
        &self,
        backend: &B,
        store: &S,
        blank: &[u8],
    ) -> Result<(), AarloError>
    where
        B: Backend,
        S: KeyValueStore,
    {
        let mut state = self.state.lock().await;
        let url = store
            .get(&[self.device_id(), LAST_IMAGE_URL_KEY])
            .and_then(|value| value.as_str().map(ToString::to_string));

        let Some(url) = url else {
            tracing::debug!("no thumbnail url, using blank image");
            state.last_image = Some(blank.to_vec());
            state.last_image_url = None;
            return Ok(());
        };

        let image = backend.get_image(&url).await?;
        tracing::debug!(bytes = image.len(), "thumbnail updated");
        state.last_image = Some(image);
        state.last_image_url = Some(url);
        Ok(())
    }

    /// Reload this camera's recordings and persist the capture summary.
    ///
    /// # Errors
    ///
    /// Propagates the media library error; the previous list is kept.
    #[tracing::instrument(skip_all, fields(device_id = %self.info.device_id))]
    pub async fn update_media<M, S>(
        &self,
        media: &M,
        store: &S,
        today: NaiveDate,
    ) -> Result<(), AarloError>
    where
        M: MediaLibrary,
        S: KeyValueStore,
    {
        let mut state = self.state.lock().await;
        let videos = media.videos_for(&self.info.device_id).await?;
        state.set_videos(videos, today);

        store.set(
            &[self.device_id(), CAPTURED_TODAY_KEY],
            json!(state.captured_today()),
        );
        let last_capture = state
            .last_video()
            .map_or(Value::Null, |video| json!(to_arlo_time(video.created_at)));
        store.set(&[self.device_id(), LAST_CAPTURE_KEY], last_capture);

        tracing::debug!(
            videos = state.videos().len(),
            captured_today = state.captured_today(),
            "media updated"
        );
        Ok(())
    }

    /// Ask the parent base for the ambient sensor history of this camera.
    ///
    /// Cameras without ambient sensors are left alone.
    ///
    /// # Errors
    ///
    /// Propagates the backend error.
    #[tracing::instrument(skip_all, fields(device_id = %self.info.device_id))]
    pub async fn update_ambient_sensors<B: Backend>(&self, backend: &B) -> Result<(), AarloError> {
        if !self.has_ambient_sensors() {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        let resource = format!("cameras/{}/ambientSensors/history", self.info.device_id);
        backend
            .notify(&self.parent, get_request(&resource))
            .await?;
        state.ambient_requested_at = Some(now());
        Ok(())
    }

    /// Whether the newest recording started within `window`.
    pub async fn is_recent(&self, window: Duration) -> bool {
        self.state.lock().await.is_recent(now(), window)
    }

    /// Local time of the newest recording rendered with `format`.
    pub async fn last_capture_text(&self, format: &str) -> Option<String> {
        self.state.lock().await.last_capture_text(format)
    }
}
