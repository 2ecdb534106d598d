//! Device — a raw record from the Arlo cloud device list, and its
//! classification into entity kinds.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AarloError;
use crate::keys::{
    DEVICE_ID_KEY, DEVICE_NAME_KEY, DEVICE_TYPE_KEY, MODEL_ID_KEY, PARENT_ID_KEY, PROVISIONED,
    STATE_KEY, UNIQUE_ID_KEY, XCLOUD_ID_KEY,
};

/// Model id of the Arlo Baby, which acts as its own base station.
pub const ARLO_BABY_MODEL: &str = "ABC1000";

/// A raw device record as returned by the device list endpoint.
///
/// The cloud is loose about which keys are present, so every accessor
/// returns an `Option` instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceRecord(Map<String, Value>);

impl DeviceRecord {
    /// Wrap an already decoded JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw access to any key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        self.get_str(DEVICE_ID_KEY)
    }

    #[must_use]
    pub fn device_name(&self) -> Option<&str> {
        self.get_str(DEVICE_NAME_KEY)
    }

    #[must_use]
    pub fn device_type(&self) -> Option<&str> {
        self.get_str(DEVICE_TYPE_KEY)
    }

    #[must_use]
    pub fn model_id(&self) -> Option<&str> {
        self.get_str(MODEL_ID_KEY)
    }

    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        self.get_str(PARENT_ID_KEY)
    }

    #[must_use]
    pub fn unique_id(&self) -> Option<&str> {
        self.get_str(UNIQUE_ID_KEY)
    }

    #[must_use]
    pub fn xcloud_id(&self) -> Option<&str> {
        self.get_str(XCLOUD_ID_KEY)
    }

    /// Reported state, `"unknown"` when absent.
    #[must_use]
    pub fn state(&self) -> &str {
        self.get_str(STATE_KEY).unwrap_or("unknown")
    }

    /// Whether the device is registered and usable.
    #[must_use]
    pub fn is_provisioned(&self) -> bool {
        self.state() == PROVISIONED
    }

    /// Address used to send notify requests through this device.
    ///
    /// Returns `None` when the record carries no device id.
    #[must_use]
    pub fn notify_target(&self) -> Option<NotifyTarget> {
        Some(NotifyTarget {
            device_id: self.device_id()?.to_string(),
            xcloud_id: self.xcloud_id().map(ToString::to_string),
        })
    }
}

impl From<Map<String, Value>> for DeviceRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Decode the payload of the device list endpoint.
///
/// Entries that are not JSON objects are dropped.
///
/// # Errors
///
/// Returns [`AarloError::UnexpectedResponse`] when the payload is not an array.
pub fn parse_device_list(payload: Value) -> Result<Vec<DeviceRecord>, AarloError> {
    let Value::Array(entries) = payload else {
        return Err(AarloError::UnexpectedResponse { endpoint: "devices" });
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(fields) => Some(DeviceRecord(fields)),
            _ => None,
        })
        .collect())
}

/// Where notify and ping requests for a base station are sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotifyTarget {
    pub device_id: String,
    pub xcloud_id: Option<String>,
}

/// The kinds of entity a device record can turn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Base,
    Camera,
    Doorbell,
}

/// Decide which entities a record becomes, ignoring its provisioning state.
///
/// A record may match several rows: an Arlo Q is both its own base station
/// and a camera.
#[must_use]
pub fn classify(record: &DeviceRecord) -> BTreeSet<EntityKind> {
    let device_type = record.device_type();
    let mut kinds = BTreeSet::new();

    if matches!(device_type, Some("basestation" | "arloq" | "arloqs"))
        || record.model_id() == Some(ARLO_BABY_MODEL)
    {
        kinds.insert(EntityKind::Base);
    }
    if matches!(device_type, Some("camera" | "arloq" | "arloqs")) {
        kinds.insert(EntityKind::Camera);
    }
    if device_type == Some("doorbell") {
        kinds.insert(EntityKind::Doorbell);
    }
    kinds
}
