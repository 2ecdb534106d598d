//! Virtual camera — reports a thumbnail url and a few recordings.

use aarlo_domain::device::DeviceRecord;
use aarlo_domain::keys::LAST_IMAGE_URL_KEY;
use aarlo_domain::media::Video;
use aarlo_domain::time::Timestamp;
use chrono::TimeDelta;
use serde_json::json;

use super::to_record;

/// Minutes before "now" at which each camera made its recordings.
const RECORDING_AGES_MINUTES: [i64; 3] = [5, 3 * 60, 26 * 60];

/// A simulated camera.
#[derive(Debug, Clone)]
pub struct VirtualCamera {
    device_id: &'static str,
    name: &'static str,
    device_type: &'static str,
    model_id: &'static str,
    parent_id: Option<&'static str>,
    state: &'static str,
}

impl VirtualCamera {
    /// Camera behind the virtual base.
    #[must_use]
    pub fn porch() -> Self {
        Self {
            device_id: "VCAM01",
            name: "Virtual Porch",
            device_type: "camera",
            model_id: "VMC4030",
            parent_id: Some("VBASE01"),
            state: "provisioned",
        }
    }

    /// Arlo Q: its own base station.
    #[must_use]
    pub fn arlo_q() -> Self {
        Self {
            device_id: "VQ01",
            name: "Virtual Q",
            device_type: "arloq",
            model_id: "VMC3040",
            parent_id: None,
            state: "provisioned",
        }
    }

    /// Arlo Baby: its own base station, with ambient sensors.
    #[must_use]
    pub fn arlo_baby() -> Self {
        Self {
            device_id: "VBABY01",
            name: "Virtual Nursery",
            device_type: "camera",
            model_id: "ABC1000",
            parent_id: None,
            state: "provisioned",
        }
    }

    /// Camera that was removed from the account.
    #[must_use]
    pub fn removed() -> Self {
        Self {
            device_id: "VCAM02",
            name: "Virtual Garage",
            device_type: "camera",
            model_id: "VMC4030",
            parent_id: Some("VBASE01"),
            state: "removed",
        }
    }

    #[must_use]
    pub fn device_id(&self) -> &str {
        self.device_id
    }

    /// Presigned url of the last thumbnail.
    #[must_use]
    pub fn image_url(&self) -> String {
        format!("virtual://{}/last-image.jpg", self.device_id)
    }

    /// Bytes served at [`image_url`](Self::image_url).
    #[must_use]
    pub fn image(&self) -> Vec<u8> {
        format!("virtual thumbnail of {}", self.device_id).into_bytes()
    }

    #[must_use]
    pub fn record(&self) -> DeviceRecord {
        let parent_id = self.parent_id.unwrap_or(self.device_id);
        to_record(json!({
            "deviceId": self.device_id,
            "deviceName": self.name,
            "deviceType": self.device_type,
            "modelId": self.model_id,
            "state": self.state,
            "parentId": parent_id,
            "uniqueId": format!("{}-unique", self.device_id),
            "xCloudId": format!("{parent_id}-xcloud"),
            LAST_IMAGE_URL_KEY: self.image_url(),
        }))
    }

    /// Recordings of this camera as of `now`, newest first.
    #[must_use]
    pub fn recordings(&self, now: Timestamp) -> Vec<Video> {
        RECORDING_AGES_MINUTES
            .iter()
            .enumerate()
            .map(|(index, minutes)| Video {
                id: format!("{}-{index}", self.device_id),
                device_id: self.device_id.to_string(),
                created_at: now - TimeDelta::minutes(*minutes),
                duration_secs: 20,
                content_url: format!("virtual://{}/{index}.mp4", self.device_id),
                thumbnail_url: format!("virtual://{}/{index}.jpg", self.device_id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aarlo_domain::device::{EntityKind, classify};
    use aarlo_domain::time::now;

    #[test]
    fn should_make_arlo_q_its_own_base() {
        let record = VirtualCamera::arlo_q().record();
        assert_eq!(record.parent_id(), Some("VQ01"));
        let kinds = classify(&record);
        assert!(kinds.contains(&EntityKind::Base));
        assert!(kinds.contains(&EntityKind::Camera));
    }

    #[test]
    fn should_report_thumbnail_url() {
        let camera = VirtualCamera::porch();
        let record = camera.record();
        assert_eq!(
            record.get(LAST_IMAGE_URL_KEY).and_then(|v| v.as_str()),
            Some("virtual://VCAM01/last-image.jpg")
        );
    }

    #[test]
    fn should_produce_recordings_newest_first() {
        let now = now();
        let videos = VirtualCamera::porch().recordings(now);
        assert_eq!(videos.len(), 3);
        assert_eq!(videos[0].created_at, now - TimeDelta::minutes(5));
        assert!(videos.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }
}
