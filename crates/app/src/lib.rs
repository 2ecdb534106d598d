//! # aarlo-app
//!
//! Application layer — the controller of one Arlo account and the
//! **port definitions** (traits) it drives.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `Backend` — the authenticated cloud session
//!   - `KeyValueStore` — the device cache keyed by device id
//!   - `MediaLibrary` — the index of recordings
//!   - `Clock` — calendar date and monotonic time
//! - Provide the **background scheduler** (immediate, delayed and recurring
//!   jobs on tokio tasks)
//! - Build the **device entities** (`Base`, `Camera`, `Doorbell`) from the
//!   device list and drive their refresh from the `Controller`
//!
//! ## Dependency rule
//! Depends on `aarlo-domain` only (plus `tokio` for tasks, locks and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod config;
pub mod controller;
pub mod devices;
pub mod ports;
pub mod scheduler;
pub mod storage_dir;

#[cfg(test)]
mod test_support;
