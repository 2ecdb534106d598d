//! Virtual device implementations — base station, camera, doorbell.
//!
//! Each virtual device has a fixed device id so it stays stable across
//! restarts, and renders itself as a record of the device list endpoint.

mod base;
mod camera;
mod doorbell;

pub use base::VirtualBase;
pub use camera::VirtualCamera;
pub use doorbell::VirtualDoorbell;

use aarlo_domain::device::DeviceRecord;
use serde_json::Value;

/// Wrapper enum for the concrete virtual device types.
#[derive(Debug, Clone)]
pub enum VirtualDevice {
    Base(VirtualBase),
    Camera(VirtualCamera),
    Doorbell(VirtualDoorbell),
}

impl VirtualDevice {
    #[must_use]
    pub fn device_id(&self) -> &str {
        match self {
            Self::Base(d) => d.device_id(),
            Self::Camera(d) => d.device_id(),
            Self::Doorbell(d) => d.device_id(),
        }
    }

    /// The record the device list endpoint reports for this device.
    #[must_use]
    pub fn record(&self) -> DeviceRecord {
        match self {
            Self::Base(d) => d.record(),
            Self::Camera(d) => d.record(),
            Self::Doorbell(d) => d.record(),
        }
    }

    #[must_use]
    pub fn as_camera(&self) -> Option<&VirtualCamera> {
        match self {
            Self::Camera(camera) => Some(camera),
            _ => None,
        }
    }
}

/// The demo account: one base with a camera and a doorbell, an Arlo Q,
/// an Arlo Baby and a removed camera.
#[must_use]
pub fn demo() -> Vec<VirtualDevice> {
    vec![
        VirtualDevice::Base(VirtualBase::default()),
        VirtualDevice::Camera(VirtualCamera::porch()),
        VirtualDevice::Camera(VirtualCamera::arlo_q()),
        VirtualDevice::Camera(VirtualCamera::arlo_baby()),
        VirtualDevice::Doorbell(VirtualDoorbell::default()),
        VirtualDevice::Camera(VirtualCamera::removed()),
    ]
}

fn to_record(value: Value) -> DeviceRecord {
    match value {
        Value::Object(fields) => DeviceRecord::new(fields),
        _ => DeviceRecord::default(),
    }
}
