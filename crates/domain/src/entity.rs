//! Entity state — the mutable, last-known state of each kind of device.
//!
//! These types hold no locks and perform no IO; the application layer wraps
//! each one in a per-entity mutex and feeds it from the cloud.

mod base;
mod camera;
mod doorbell;

pub use base::{BaseState, Mode, parse_mode_list};
pub use camera::CameraState;
pub use doorbell::DoorbellState;
