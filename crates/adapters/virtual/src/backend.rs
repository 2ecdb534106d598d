//! Simulated cloud session implementing the [`Backend`] port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use aarlo_app::ports::Backend;
use aarlo_domain::device::{EntityKind, NotifyTarget, classify};
use aarlo_domain::error::AarloError;
use aarlo_domain::keys::{DEFINITIONS_URL, DEVICES_URL};
use serde_json::{Map, Value, json};

use crate::devices::{self, VirtualDevice};
use crate::error::VirtualError;

const DEFAULT_MODE: &str = "mode0";

/// Cloud session answering from a fixed set of virtual devices.
///
/// Bases accept `get` and `set` requests on their `modes` resource; every
/// other notify request is recorded and acknowledged.
pub struct VirtualBackend {
    devices: Vec<VirtualDevice>,
    active_modes: Mutex<HashMap<String, String>>,
    notifications: Mutex<Vec<(String, Value)>>,
    connected: AtomicBool,
}

impl Default for VirtualBackend {
    fn default() -> Self {
        Self::with_devices(devices::demo())
    }
}

impl VirtualBackend {
    #[must_use]
    pub fn with_devices(devices: Vec<VirtualDevice>) -> Self {
        Self {
            devices,
            active_modes: Mutex::new(HashMap::new()),
            notifications: Mutex::new(Vec::new()),
            connected: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn devices(&self) -> &[VirtualDevice] {
        &self.devices
    }

    /// Every notify request received so far, as `(base id, body)`.
    #[must_use]
    pub fn notifications(&self) -> Vec<(String, Value)> {
        lock(&self.notifications).clone()
    }

    /// Active mode of a base.
    #[must_use]
    pub fn active_mode(&self, base_id: &str) -> Option<String> {
        if !self.is_base(base_id) {
            return None;
        }
        Some(
            lock(&self.active_modes)
                .get(base_id)
                .cloned()
                .unwrap_or_else(|| DEFAULT_MODE.to_string()),
        )
    }

    fn is_base(&self, device_id: &str) -> bool {
        self.devices.iter().any(|device| {
            device.device_id() == device_id && classify(&device.record()).contains(&EntityKind::Base)
        })
    }

    fn ensure_connected(&self) -> Result<(), VirtualError> {
        if self.connected.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(VirtualError::NotConnected)
        }
    }

    fn ensure_base(&self, base: &NotifyTarget) -> Result<(), VirtualError> {
        if self.is_base(&base.device_id) {
            Ok(())
        } else {
            Err(VirtualError::UnknownBase(base.device_id.clone()))
        }
    }

    fn device_list(&self) -> Value {
        Value::Array(
            self.devices
                .iter()
                .filter_map(|device| serde_json::to_value(device.record()).ok())
                .collect(),
        )
    }

    /// Mode definitions of the bases listed in `query`'s `uniqueIds`.
    fn definitions(&self, query: &str) -> Value {
        let wanted: Vec<&str> = query
            .split('&')
            .filter_map(|param| param.strip_prefix("uniqueIds="))
            .flat_map(|ids| ids.split(','))
            .collect();

        let mut definitions = Map::new();
        for device in &self.devices {
            let record = device.record();
            let Some(unique_id) = record.unique_id() else {
                continue;
            };
            if wanted.contains(&unique_id) && classify(&record).contains(&EntityKind::Base) {
                definitions.insert(unique_id.to_string(), json!({ "modes": modes() }));
            }
        }
        Value::Object(definitions)
    }

    fn handle_notify(&self, base: &NotifyTarget, body: &Value) {
        let resource = body.get("resource").and_then(Value::as_str);
        let action = body.get("action").and_then(Value::as_str);
        if let (Some("set"), Some("modes")) = (action, resource)
            && let Some(mode) = body.pointer("/properties/active").and_then(Value::as_str)
        {
            tracing::debug!(base = %base.device_id, mode, "virtual mode change");
            lock(&self.active_modes).insert(base.device_id.clone(), mode.to_string());
        }
    }
}

impl Backend for VirtualBackend {
    async fn get(&self, url: &str) -> Result<Value, AarloError> {
        self.ensure_connected()?;
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        match path {
            DEVICES_URL => Ok(self.device_list()),
            DEFINITIONS_URL => Ok(self.definitions(query)),
            _ => Err(VirtualError::UnknownEndpoint(path.to_string()).into()),
        }
    }

    async fn get_image(&self, url: &str) -> Result<Vec<u8>, AarloError> {
        self.ensure_connected()?;
        self.devices
            .iter()
            .filter_map(VirtualDevice::as_camera)
            .find(|camera| camera.image_url() == url)
            .map(devices::VirtualCamera::image)
            .ok_or_else(|| VirtualError::UnknownImage(url.to_string()).into())
    }

    async fn notify(&self, base: &NotifyTarget, body: Value) -> Result<(), AarloError> {
        self.ensure_connected()?;
        self.ensure_base(base)?;
        self.handle_notify(base, &body);
        lock(&self.notifications).push((base.device_id.clone(), body));
        Ok(())
    }

    async fn ping(&self, base: &NotifyTarget) -> Result<(), AarloError> {
        self.ensure_connected()?;
        self.ensure_base(base)?;
        tracing::trace!(base = %base.device_id, "virtual ping");
        Ok(())
    }

    async fn logout(&self) -> Result<(), AarloError> {
        self.connected.store(false, Ordering::Release);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

fn modes() -> Value {
    json!([
        {"id": "mode0", "name": "disarmed"},
        {"id": "mode1", "name": "armed"},
        {"id": "mode2", "name": "", "type": "schedule"},
    ])
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
