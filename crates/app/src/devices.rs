//! Device entities — one object per provisioned device and kind.
//!
//! Each entity keeps its identity outside of any lock, so lookups by id or
//! name never wait, and its mutable state behind a single
//! [`tokio::sync::Mutex`] held for the whole of every update.

mod base;
mod camera;
mod doorbell;

pub use base::Base;
pub use camera::Camera;
pub use doorbell::Doorbell;

use aarlo_domain::device::DeviceRecord;

/// Identity of a device, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub device_id: String,
    pub name: String,
    pub model_id: Option<String>,
    pub unique_id: Option<String>,
}

impl DeviceInfo {
    /// Read the identity of a record; `None` when it has no device id.
    ///
    /// A record without a name is named after its id.
    #[must_use]
    pub fn from_record(record: &DeviceRecord) -> Option<Self> {
        let device_id = record.device_id()?.to_string();
        Some(Self {
            name: record.device_name().unwrap_or(&device_id).to_string(),
            model_id: record.model_id().map(ToString::to_string),
            unique_id: record.unique_id().map(ToString::to_string),
            device_id,
        })
    }
}
