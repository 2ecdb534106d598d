//! Virtual doorbell.

use aarlo_domain::device::DeviceRecord;
use serde_json::json;

use super::to_record;

/// A simulated doorbell attached to the virtual base.
#[derive(Debug, Clone)]
pub struct VirtualDoorbell {
    device_id: &'static str,
    parent_id: &'static str,
}

impl Default for VirtualDoorbell {
    fn default() -> Self {
        Self {
            device_id: "VBELL01",
            parent_id: "VBASE01",
        }
    }
}

impl VirtualDoorbell {
    #[must_use]
    pub fn device_id(&self) -> &str {
        self.device_id
    }

    #[must_use]
    pub fn record(&self) -> DeviceRecord {
        to_record(json!({
            "deviceId": self.device_id,
            "deviceName": "Virtual Doorbell",
            "deviceType": "doorbell",
            "modelId": "AAD1001",
            "state": "provisioned",
            "parentId": self.parent_id,
            "uniqueId": format!("{}-unique", self.device_id),
            "xCloudId": format!("{}-xcloud", self.parent_id),
        }))
    }
}
