//! Base station entity.

use aarlo_domain::device::{DeviceRecord, NotifyTarget};
use aarlo_domain::entity::{BaseState, parse_mode_list};
use aarlo_domain::error::AarloError;
use aarlo_domain::keys::DEFINITIONS_URL;
use aarlo_domain::time::now;
use serde_json::json;
use tokio::sync::Mutex;

use super::DeviceInfo;
use crate::ports::Backend;

/// A base station: relays notify requests to its cameras and doorbells and
/// holds the alarm modes.
#[derive(Debug)]
pub struct Base {
    info: DeviceInfo,
    target: NotifyTarget,
    state: Mutex<BaseState>,
}

impl Base {
    /// Build from a device record; `None` when the record has no device id.
    #[must_use]
    pub fn from_record(record: &DeviceRecord) -> Option<Self> {
        Some(Self {
            info: DeviceInfo::from_record(record)?,
            target: record.notify_target()?,
            state: Mutex::new(BaseState::default()),
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

    /// Where requests for this base are sent.
    #[must_use]
    pub fn target(&self) -> &NotifyTarget {
        &self.target
    }

    /// Copy of the current state.
    pub async fn state(&self) -> BaseState {
        self.state.lock().await.clone()
    }

    /// Keep the base connection alive.
    ///
    /// # Errors
    ///
    /// Propagates the backend error.
    #[tracing::instrument(skip_all, fields(device_id = %self.info.device_id))]
    pub async fn ping<B: Backend>(&self, backend: &B) -> Result<(), AarloError> {
        let mut state = self.state.lock().await;
        backend.ping(&self.target).await?;
        state.last_ping = Some(now());
        Ok(())
    }

    /// Reload the mode definitions of this base.
    ///
    /// # Errors
    ///
    /// Returns the backend error, or [`AarloError::UnexpectedResponse`]
    /// when the payload does not describe this base.
    #[tracing::instrument(skip_all, fields(device_id = %self.info.device_id))]
    pub async fn update_modes<B: Backend>(&self, backend: &B) -> Result<(), AarloError> {
        let mut state = self.state.lock().await;
        let unique_id = self
            .info
            .unique_id
            .as_deref()
            .unwrap_or(&self.info.device_id);
        let payload = backend
            .get(&format!("{DEFINITIONS_URL}?uniqueIds={unique_id}"))
            .await?;
        let modes = parse_mode_list(&payload, unique_id)?;
        tracing::debug!(count = modes.len(), "modes updated");
        state.set_modes(modes);
        Ok(())
    }

    /// Ask the base for its active mode; the answer arrives on the event stream.
    ///
    /// # Errors
    ///
    /// Propagates the backend error.
    #[tracing::instrument(skip_all, fields(device_id = %self.info.device_id))]
    pub async fn update_mode<B: Backend>(&self, backend: &B) -> Result<(), AarloError> {
        let _state = self.state.lock().await;
        backend.notify(&self.target, get_request("modes")).await
    }

    /// Ask the base for the status of its cameras and doorbells.
    ///
    /// # Errors
    ///
    /// Stops at the first backend error.
    #[tracing::instrument(skip_all, fields(device_id = %self.info.device_id))]
    pub async fn request_status<B: Backend>(&self, backend: &B) -> Result<(), AarloError> {
        let _state = self.state.lock().await;
        for resource in ["cameras", "doorbells"] {
            backend.notify(&self.target, get_request(resource)).await?;
        }
        Ok(())
    }

    /// Record the mode the base reported as active.
    pub async fn set_active_mode(&self, mode_id: impl Into<String>) {
        self.state.lock().await.active_mode = Some(mode_id.into());
    }
}

/// Body of a notify `get` request for `resource`.
pub(crate) fn get_request(resource: &str) -> serde_json::Value {
    json!({
        "action": "get",
        "resource": resource,
        "publishResponse": false,
    })
}
