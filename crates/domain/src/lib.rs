//! # aarlo-domain
//!
//! Pure domain model for the aarlo Arlo camera integration.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, Arlo time
//! - Raw **device records** as returned by the Arlo cloud, and their
//!   classification into entity kinds (base station, camera, doorbell)
//! - Per-entity **state** (modes, thumbnails, recordings, debounced events)
//! - **Media** records (recorded videos)
//! - Well-known cloud URLs and store keys
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod keys;
pub mod time;

pub mod device;
pub mod entity;
pub mod media;
