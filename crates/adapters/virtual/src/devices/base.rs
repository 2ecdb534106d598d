//! Virtual base station.

use aarlo_domain::device::DeviceRecord;
use serde_json::json;

use super::to_record;

/// A simulated base station.
#[derive(Debug, Clone)]
pub struct VirtualBase {
    device_id: &'static str,
    name: &'static str,
}

impl Default for VirtualBase {
    fn default() -> Self {
        Self {
            device_id: "VBASE01",
            name: "Virtual Base",
        }
    }
}

impl VirtualBase {
    #[must_use]
    pub fn device_id(&self) -> &str {
        self.device_id
    }

    #[must_use]
    pub fn record(&self) -> DeviceRecord {
        to_record(json!({
            "deviceId": self.device_id,
            "deviceName": self.name,
            "deviceType": "basestation",
            "modelId": "VMB4000",
            "state": "provisioned",
            "uniqueId": format!("{}-unique", self.device_id),
            "xCloudId": format!("{}-xcloud", self.device_id),
            "userId": "virtual-user",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aarlo_domain::device::{EntityKind, classify};

    #[test]
    fn should_report_provisioned_base_station() {
        let record = VirtualBase::default().record();
        assert!(record.is_provisioned());
        assert_eq!(record.unique_id(), Some("VBASE01-unique"));
        assert!(classify(&record).contains(&EntityKind::Base));
    }
}
