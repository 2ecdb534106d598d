//! Base station state — the mode list and the active mode.

use serde_json::Value;

use crate::error::AarloError;
use crate::time::Timestamp;

/// A base-station mode (armed, disarmed, schedule, custom ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode {
    pub id: String,
    pub name: String,
}

/// Last known state of a base station.
#[derive(Debug, Clone, Default)]
pub struct BaseState {
    modes: Vec<Mode>,
    /// Id of the active mode, as last reported.
    pub active_mode: Option<String>,
    /// When the base last answered a ping.
    pub last_ping: Option<Timestamp>,
}

impl BaseState {
    #[must_use]
    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn set_modes(&mut self, modes: Vec<Mode>) {
        self.modes = modes;
    }

    /// Name of the mode with the given id.
    #[must_use]
    pub fn mode_name(&self, id: &str) -> Option<&str> {
        self.modes
            .iter()
            .find(|mode| mode.id == id)
            .map(|mode| mode.name.as_str())
    }

    /// Id of the mode with the given name, ignoring case.
    #[must_use]
    pub fn mode_id(&self, name: &str) -> Option<&str> {
        self.modes
            .iter()
            .find(|mode| mode.name.eq_ignore_ascii_case(name))
            .map(|mode| mode.id.as_str())
    }

    /// Name of the active mode, if both the mode and its definition are known.
    #[must_use]
    pub fn active_mode_name(&self) -> Option<&str> {
        self.active_mode.as_deref().and_then(|id| self.mode_name(id))
    }
}

/// Extract the mode list of one base from an automation definitions payload.
///
/// The payload is keyed by base unique id:
/// `{ "<uniqueId>": { "modes": [ { "id": "mode0", "name": "disarmed" } ] } }`.
/// A mode without a name falls back to its `type`, then to its id.
///
/// # Errors
///
/// Returns [`AarloError::UnexpectedResponse`] when the base or its mode list
/// is missing from the payload.
pub fn parse_mode_list(payload: &Value, unique_id: &str) -> Result<Vec<Mode>, AarloError> {
    let modes = payload
        .get(unique_id)
        .and_then(|definition| definition.get("modes"))
        .and_then(Value::as_array)
        .ok_or(AarloError::UnexpectedResponse {
            endpoint: "automation/definitions",
        })?;

    Ok(modes
        .iter()
        .filter_map(|mode| {
            let id = mode.get("id")?.as_str()?.to_string();
            let name = ["name", "type"]
                .iter()
                .filter_map(|key| mode.get(*key).and_then(Value::as_str))
                .find(|name| !name.is_empty())
                .unwrap_or(&id)
                .to_string();
            Some(Mode { id, name })
        })
        .collect())
}
