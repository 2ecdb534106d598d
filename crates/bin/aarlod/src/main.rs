//! # aarlod — Arlo refresh daemon
//!
//! Composition root that wires the adapters together and runs the refresh
//! controller until interrupted.
//!
//! ## Responsibilities
//! - Parse configuration (config file path argument, env vars)
//! - Install the tracing subscriber
//! - Open the JSON key/value store inside the storage directory
//! - Start the controller against the virtual cloud
//! - On Ctrl-C, save the store and log out
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no refresh logic belongs here.

mod config;

use aarlo_adapter_storage_json::Config as StoreConfig;
use aarlo_adapter_virtual::{VirtualBackend, VirtualMediaLibrary};
use aarlo_app::controller::Controller;
use aarlo_app::ports::SystemClock;
use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_CONFIG_PATH: &str = "aarlo.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = config::Config::load(&config_path)
        .with_context(|| format!("failed to load configuration from {config_path}"))?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "aarlod starting");

    // Store
    let store = StoreConfig::in_storage_dir(&config.aarlo.storage_dir, &config.aarlo.name)
        .open()
        .await
        .context("failed to open the store")?;

    // Cloud
    let backend = VirtualBackend::default();
    let media = VirtualMediaLibrary::for_devices(backend.devices());

    let controller = Controller::start(config.aarlo, backend, store, media, SystemClock)
        .await
        .context("failed to start the controller")?;
    tracing::info!(
        bases = controller.base_stations().len(),
        cameras = controller.cameras().len(),
        doorbells = controller.doorbells().len(),
        "aarlod ready"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("shutting down");

    controller
        .stop()
        .await
        .context("failed to stop the controller")?;
    Ok(())
}
