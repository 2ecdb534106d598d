//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the refresh controller and the outside
//! world. They are defined here (in `app`) so that both the controller and
//! the adapter crates can depend on them without circular dependencies.

pub mod backend;
pub mod clock;
pub mod media;
pub mod store;

pub use backend::Backend;
pub use clock::{Clock, SystemClock};
pub use media::MediaLibrary;
pub use store::KeyValueStore;
