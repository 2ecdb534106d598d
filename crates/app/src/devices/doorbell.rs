//! Doorbell entity.

use std::time::Duration;

use aarlo_domain::device::DeviceRecord;
use aarlo_domain::entity::DoorbellState;
use aarlo_domain::time::Timestamp;
use tokio::sync::Mutex;

use super::DeviceInfo;

/// A doorbell with debounced motion and ding events.
#[derive(Debug)]
pub struct Doorbell {
    info: DeviceInfo,
    state: Mutex<DoorbellState>,
}

impl Doorbell {
    /// Build from a device record; `None` when the record has no device id.
    #[must_use]
    pub fn from_record(
        record: &DeviceRecord,
        motion_time: Duration,
        ding_time: Duration,
    ) -> Option<Self> {
        Some(Self {
            info: DeviceInfo::from_record(record)?,
            state: Mutex::new(DoorbellState::new(motion_time, ding_time)),
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

    #[tracing::instrument(skip(self), fields(device_id = %self.info.device_id))]
    pub async fn handle_motion(&self, at: Timestamp) {
        self.state.lock().await.record_motion(at);
    }

    #[tracing::instrument(skip(self), fields(device_id = %self.info.device_id))]
    pub async fn handle_ding(&self, at: Timestamp) {
        self.state.lock().await.record_ding(at);
    }

    pub async fn motion_detected(&self, now: Timestamp) -> bool {
        self.state.lock().await.motion_detected(now)
    }

    pub async fn ding_detected(&self, now: Timestamp) -> bool {
        self.state.lock().await.ding_detected(now)
    }
}
