//! # aarlo-adapter-virtual
//!
//! Virtual/demo Arlo cloud that provides simulated devices and recordings
//! for testing and demonstration purposes.
//!
//! ## Provided devices
//!
//! | Device | Device ID | Becomes |
//! |--------|-----------|---------|
//! | Virtual Base | `VBASE01` | base station with three modes |
//! | Virtual Porch | `VCAM01` | camera behind `VBASE01` |
//! | Virtual Q | `VQ01` | Arlo Q: base station and camera |
//! | Virtual Nursery | `VBABY01` | Arlo Baby: base station and camera with ambient sensors |
//! | Virtual Doorbell | `VBELL01` | doorbell behind `VBASE01` |
//! | Virtual Garage | `VCAM02` | removed camera, skipped |
//!
//! ## Dependency rule
//!
//! Depends on `aarlo-app` (port traits) and `aarlo-domain` only.

mod backend;
pub mod devices;
mod error;
mod media;

pub use backend::VirtualBackend;
pub use error::VirtualError;
pub use media::VirtualMediaLibrary;
