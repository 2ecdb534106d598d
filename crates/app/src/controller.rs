//! Controller — the object graph of one Arlo account and its refresh loop.
//!
//! [`Controller::start`] fetches the device list, builds the entities and
//! hands the rest of its life to the [`Scheduler`]:
//!
//! | job | when |
//! |---|---|
//! | thumbnails, camera media | once, 2 s after start |
//! | initial refresh (modes, active mode, status, ambient sensors) | once, 5 s after start |
//! | media library load | once, 10 s after start |
//! | fast refresh (save, ping, day rollover) | every `fast_refresh_interval` |
//! | slow refresh (modes, status, ambient sensors, device reload) | every `slow_refresh_interval` |
//!
//! Refresh passes only submit work to the scheduler, so a slow cloud never
//! delays the tick that noticed it. Failures of a single entity are logged
//! and the pass moves on to the next one.

mod timers;

pub use timers::RefreshTimers;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use aarlo_domain::device::{DeviceRecord, EntityKind, classify, parse_device_list};
use aarlo_domain::error::AarloError;
use aarlo_domain::keys::{
    ARLO_NAMESPACE, BLANK_IMAGE, DEVICE_KEYS, DEVICES_URL, TOTAL_BELLS_KEY, TOTAL_CAMERAS_KEY,
};
use aarlo_domain::time::arlo_time_now;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tracing::{Instrument, Span};

use crate::config::AarloConfig;
use crate::devices::{Base, Camera, Doorbell};
use crate::ports::{Backend, Clock, KeyValueStore, MediaLibrary};
use crate::scheduler::{JobFuture, Scheduler};
use crate::storage_dir::{StorageDir, ensure_storage_dir};

const THUMBNAIL_DELAY: Duration = Duration::from_secs(2);
const CAMERA_MEDIA_DELAY: Duration = Duration::from_secs(2);
const INITIAL_REFRESH_DELAY: Duration = Duration::from_secs(5);
const MEDIA_LOAD_DELAY: Duration = Duration::from_secs(10);

/// One Arlo account: its collaborators, its entities and its background jobs.
pub struct Controller<B, S, M, C> {
    config: AarloConfig,
    backend: B,
    store: S,
    media: M,
    clock: C,
    scheduler: Scheduler,
    bases: Vec<Arc<Base>>,
    cameras: Vec<Arc<Camera>>,
    doorbells: Vec<Arc<Doorbell>>,
    devices: Mutex<Vec<DeviceRecord>>,
    timers: Mutex<RefreshTimers>,
    blank_image: Vec<u8>,
}

/// Entities built from one device list.
#[derive(Default)]
struct Entities {
    bases: Vec<Arc<Base>>,
    cameras: Vec<Arc<Camera>>,
    doorbells: Vec<Arc<Doorbell>>,
}

impl<B, S, M, C> Controller<B, S, M, C>
where
    B: Backend + 'static,
    S: KeyValueStore + 'static,
    M: MediaLibrary + 'static,
    C: Clock + 'static,
{
    /// Validate `config`, discover the account's devices and start the
    /// background jobs on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`AarloError::Validation`] for an invalid configuration,
    /// [`AarloError::StorageDir`] when the storage directory cannot be
    /// created, and the backend error when the device list cannot be fetched.
    pub async fn start(
        config: AarloConfig,
        backend: B,
        store: S,
        media: M,
        clock: C,
    ) -> Result<Arc<Self>, AarloError> {
        config.validate()?;
        let span = tracing::info_span!("aarlo", name = %config.name);
        Self::connect(config, backend, store, media, clock, span.clone())
            .instrument(span)
            .await
    }

    async fn connect(
        config: AarloConfig,
        backend: B,
        store: S,
        media: M,
        clock: C,
        span: Span,
    ) -> Result<Arc<Self>, AarloError> {
        match ensure_storage_dir(&config.storage_dir)? {
            StorageDir::Created => {
                tracing::info!(path = %config.storage_dir.display(), "storage directory created");
            }
            StorageDir::AlreadyExists => {
                tracing::debug!(path = %config.storage_dir.display(), "storage directory exists");
            }
        }

        let scheduler = Scheduler::start(span);
        let devices = fetch_devices(&backend).await?;
        persist_device_keys(&store, &devices);

        let entities = build_entities(&devices, &config);
        store.set(
            &[ARLO_NAMESPACE, TOTAL_CAMERAS_KEY],
            json!(entities.cameras.len()),
        );
        store.set(
            &[ARLO_NAMESPACE, TOTAL_BELLS_KEY],
            json!(entities.doorbells.len()),
        );
        tracing::info!(
            bases = entities.bases.len(),
            cameras = entities.cameras.len(),
            doorbells = entities.doorbells.len(),
            "devices ready"
        );

        let timers = RefreshTimers::new(
            clock.today(),
            clock.now(),
            config.refresh_devices_every(),
        );
        let blank_image = STANDARD.decode(BLANK_IMAGE).unwrap_or_default();

        let controller = Arc::new(Self {
            config,
            backend,
            store,
            media,
            clock,
            scheduler,
            bases: entities.bases,
            cameras: entities.cameras,
            doorbells: entities.doorbells,
            devices: Mutex::new(devices),
            timers: Mutex::new(timers),
            blank_image,
        });

        controller.ping_bases();
        controller.schedule_jobs();
        Ok(controller)
    }

    fn schedule_jobs(self: &Arc<Self>) {
        self.scheduler.run_in(
            "thumbnails",
            THUMBNAIL_DELAY,
            self.bind(|this| async move {
                this.refresh_camera_thumbnails().await;
                Ok(())
            }),
        );
        self.scheduler.run_in(
            "camera-media",
            CAMERA_MEDIA_DELAY,
            self.bind(|this| async move {
                this.refresh_camera_media().await;
                Ok(())
            }),
        );
        self.scheduler.run_in(
            "initial-refresh",
            INITIAL_REFRESH_DELAY,
            self.bind(|this| async move {
                this.initial_refresh();
                Ok(())
            }),
        );
        self.scheduler.run_in(
            "media-load",
            MEDIA_LOAD_DELAY,
            self.bind(|this| async move { this.media.load().await }),
        );
        self.scheduler.run_every(
            "fast-refresh",
            self.config.fast_refresh_interval(),
            self.bind(|this| async move {
                this.fast_refresh();
                Ok(())
            }),
        );
        self.scheduler.run_every(
            "slow-refresh",
            self.config.slow_refresh_interval(),
            self.bind(|this| async move {
                this.slow_refresh();
                Ok(())
            }),
        );
    }

    /// Turn a job on the controller into a scheduler job.
    ///
    /// The job holds the controller weakly: once the last handle is dropped
    /// its queued runs do nothing.
    fn bind<F, Fut>(self: &Arc<Self>, job: F) -> impl Fn() -> JobFuture + Send + Sync + 'static
    where
        F: Fn(Arc<Self>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AarloError>> + Send + 'static,
    {
        let controller = Arc::downgrade(self);
        move || -> JobFuture {
            match controller.upgrade() {
                Some(this) => Box::pin(job(this)),
                None => Box::pin(async { Ok(()) }),
            }
        }
    }

    /// Save the store, ping the bases and, when the date changed since the
    /// last tick, reload the media library and the cameras' recordings.
    pub fn fast_refresh(self: &Arc<Self>) {
        tracing::debug!("fast refresh");

        let this = Arc::clone(self);
        self.scheduler
            .run("save", async move { this.store.save().await });
        self.ping_bases();

        let today = self.clock.today();
        if self.lock_timers().roll_day(today) {
            tracing::debug!(%today, "day changed");
            let this = Arc::clone(self);
            self.scheduler.run("day-rollover", async move {
                let loaded = this.media.load().await;
                this.refresh_camera_media().await;
                loaded
            });
        }
    }

    /// Refresh the bases and the ambient sensors, and reload the device list
    /// when its deadline has passed.
    pub fn slow_refresh(self: &Arc<Self>) {
        tracing::debug!("slow refresh");
        self.submit_base_refresh(false);
        self.submit_ambient_sensor_refresh();

        let now = self.clock.now();
        if self.lock_timers().take_device_reload(now) {
            tracing::debug!("device reload needed");
            let this = Arc::clone(self);
            self.scheduler
                .run("refresh-devices", async move { this.refresh_devices().await });
        }
    }

    /// First full refresh after start, which also asks each base for its
    /// active mode.
    pub fn initial_refresh(self: &Arc<Self>) {
        tracing::debug!("initial refresh");
        self.submit_base_refresh(true);
        self.submit_ambient_sensor_refresh();
    }

    /// Ping every base, each in its own job.
    pub fn ping_bases(self: &Arc<Self>) {
        for base in &self.bases {
            let this = Arc::clone(self);
            let base = Arc::clone(base);
            self.scheduler
                .run("ping", async move { base.ping(&this.backend).await });
        }
    }

    fn submit_base_refresh(self: &Arc<Self>, initial: bool) {
        let this = Arc::clone(self);
        self.scheduler.run("refresh-bases", async move {
            this.refresh_bases(initial).await;
            Ok(())
        });
    }

    fn submit_ambient_sensor_refresh(self: &Arc<Self>) {
        let this = Arc::clone(self);
        self.scheduler.run("ambient-sensors", async move {
            this.refresh_ambient_sensors().await;
            Ok(())
        });
    }

    /// Re-fetch the device list, persist its keys and replace the cached
    /// records. Entities are left as they are.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the cached records are kept.
    pub async fn refresh_devices(&self) -> Result<(), AarloError> {
        let devices = fetch_devices(&self.backend).await?;
        persist_device_keys(&self.store, &devices);
        tracing::debug!(count = devices.len(), "device list reloaded");
        *self.lock_devices() = devices;
        Ok(())
    }

    /// Reload the mode list of every base and ask for the status of their
    /// devices; `initial` also asks for the active mode.
    pub async fn refresh_bases(&self, initial: bool) {
        for base in &self.bases {
            log_failure(
                "mode list",
                base.device_id(),
                base.update_modes(&self.backend).await,
            );
            if initial {
                log_failure(
                    "active mode",
                    base.device_id(),
                    base.update_mode(&self.backend).await,
                );
            }
            log_failure(
                "device status",
                base.device_id(),
                base.request_status(&self.backend).await,
            );
        }
    }

    pub async fn refresh_camera_thumbnails(&self) {
        for camera in &self.cameras {
            let result = camera
                .update_last_image(&self.backend, &self.store, &self.blank_image)
                .await;
            log_failure("thumbnail", camera.device_id(), result);
        }
    }

    pub async fn refresh_camera_media(&self) {
        let today = self.clock.today();
        for camera in &self.cameras {
            let result = camera.update_media(&self.media, &self.store, today).await;
            log_failure("media", camera.device_id(), result);
        }
    }

    pub async fn refresh_ambient_sensors(&self) {
        for camera in &self.cameras {
            let result = camera.update_ambient_sensors(&self.backend).await;
            log_failure("ambient sensors", camera.device_id(), result);
        }
    }

    /// Save the store, then log out.
    ///
    /// Queued jobs are not drained.
    ///
    /// # Errors
    ///
    /// Returns the save error if saving failed, otherwise the logout error.
    pub async fn stop(&self) -> Result<(), AarloError> {
        let saved = self.store.save().await;
        let logged_out = self.backend.logout().await;
        if let (Err(_), Err(err)) = (&saved, &logged_out) {
            tracing::warn!(%err, "logout failed");
        }
        saved.and(logged_out)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.backend.is_connected()
    }

    #[must_use]
    pub fn cameras(&self) -> &[Arc<Camera>] {
        &self.cameras
    }

    #[must_use]
    pub fn doorbells(&self) -> &[Arc<Doorbell>] {
        &self.doorbells
    }

    #[must_use]
    pub fn base_stations(&self) -> &[Arc<Base>] {
        &self.bases
    }

    /// PNG shown by cameras without a thumbnail.
    #[must_use]
    pub fn blank_image(&self) -> &[u8] {
        &self.blank_image
    }

    /// Window during which a recording counts as recent activity.
    #[must_use]
    pub fn recent_time(&self) -> Duration {
        self.config.recent_time()
    }

    #[must_use]
    pub fn config(&self) -> &AarloConfig {
        &self.config
    }

    /// Account-wide attribute stored under the `ARLO` namespace.
    #[must_use]
    pub fn attribute(&self, attr: &str) -> Option<Value> {
        self.store.get(&[ARLO_NAMESPACE, attr])
    }

    /// Snapshot of the last fetched device list.
    #[must_use]
    pub fn devices(&self) -> Vec<DeviceRecord> {
        self.lock_devices().clone()
    }

    /// Snapshot of the rollover and reload bookkeeping.
    #[must_use]
    pub fn refresh_timers(&self) -> RefreshTimers {
        self.lock_timers().clone()
    }

    #[must_use]
    pub fn lookup_camera_by_id(&self, device_id: &str) -> Option<Arc<Camera>> {
        self.cameras
            .iter()
            .find(|camera| camera.device_id() == device_id)
            .cloned()
    }

    #[must_use]
    pub fn lookup_camera_by_name(&self, name: &str) -> Option<Arc<Camera>> {
        self.cameras
            .iter()
            .find(|camera| camera.name() == name)
            .cloned()
    }

    #[must_use]
    pub fn lookup_doorbell_by_id(&self, device_id: &str) -> Option<Arc<Doorbell>> {
        self.doorbells
            .iter()
            .find(|doorbell| doorbell.device_id() == device_id)
            .cloned()
    }

    #[must_use]
    pub fn lookup_doorbell_by_name(&self, name: &str) -> Option<Arc<Doorbell>> {
        self.doorbells
            .iter()
            .find(|doorbell| doorbell.name() == name)
            .cloned()
    }

    fn lock_timers(&self) -> MutexGuard<'_, RefreshTimers> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_devices(&self) -> MutexGuard<'_, Vec<DeviceRecord>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn fetch_devices<B: Backend>(backend: &B) -> Result<Vec<DeviceRecord>, AarloError> {
    let payload = backend
        .get(&format!("{DEVICES_URL}?t={}", arlo_time_now()))
        .await?;
    parse_device_list(payload)
}

/// Copy the allow-listed keys of every record into the store.
fn persist_device_keys<S: KeyValueStore>(store: &S, devices: &[DeviceRecord]) {
    for record in devices {
        let Some(device_id) = record.device_id() else {
            continue;
        };
        for key in DEVICE_KEYS {
            match record.get(key) {
                None | Some(Value::Null) => {}
                Some(value) => store.set(&[device_id, key], value.clone()),
            }
        }
    }
}

fn build_entities(devices: &[DeviceRecord], config: &AarloConfig) -> Entities {
    let mut entities = Entities::default();
    for record in devices {
        let Some(device_id) = record.device_id() else {
            tracing::debug!("skipping device without id");
            continue;
        };
        if !record.is_provisioned() {
            tracing::info!(device_id, state = record.state(), "skipping unprovisioned device");
            continue;
        }
        for kind in classify(record) {
            match kind {
                EntityKind::Base => entities
                    .bases
                    .extend(Base::from_record(record).map(Arc::new)),
                EntityKind::Camera => entities
                    .cameras
                    .extend(Camera::from_record(record).map(Arc::new)),
                EntityKind::Doorbell => entities.doorbells.extend(
                    Doorbell::from_record(record, config.db_motion_time(), config.db_ding_time())
                        .map(Arc::new),
                ),
            }
        }
    }
    entities
}

fn log_failure(what: &'static str, device_id: &str, result: Result<(), AarloError>) {
    if let Err(err) = result {
        tracing::warn!(%err, device_id, "{what} refresh failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, FakeClock, FakeMedia, FakeStore};
    use aarlo_domain::error::ValidationError;
    use aarlo_domain::keys::DEFINITIONS_URL;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    type TestController =
        Controller<Arc<FakeBackend>, Arc<FakeStore>, Arc<FakeMedia>, Arc<FakeClock>>;

    struct Harness {
        controller: Arc<TestController>,
        backend: Arc<FakeBackend>,
        store: Arc<FakeStore>,
        media: Arc<FakeMedia>,
        clock: Arc<FakeClock>,
        _dir: TempDir,
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn three_devices() -> Value {
        json!([
            {"deviceId": "BASE1", "deviceName": "Hall", "deviceType": "basestation",
             "state": "provisioned", "uniqueId": "U-BASE1", "xCloudId": "X-1"},
            {"deviceId": "CAM1", "deviceName": "Porch", "deviceType": "camera",
             "state": "provisioned", "parentId": "BASE1", "modelId": "VMC4030"},
            {"deviceId": "CAM2", "deviceName": "Garage", "deviceType": "camera",
             "state": "removed", "parentId": "BASE1"},
        ])
    }

    async fn start_with(
        devices: Value,
        configure: impl FnOnce(&mut AarloConfig),
    ) -> Result<Harness, AarloError> {
        let dir = TempDir::new().unwrap();
        let mut config = AarloConfig {
            storage_dir: dir.path().join("aarlo"),
            ..AarloConfig::default()
        };
        configure(&mut config);

        let backend = Arc::new(FakeBackend::default());
        backend.respond(DEVICES_URL, devices);
        let store = Arc::new(FakeStore::default());
        let media = Arc::new(FakeMedia::default());
        let clock = Arc::new(FakeClock::new(day(1)));

        let controller = Controller::start(
            config,
            Arc::clone(&backend),
            Arc::clone(&store),
            Arc::clone(&media),
            Arc::clone(&clock),
        )
        .await?;
        Ok(Harness {
            controller,
            backend,
            store,
            media,
            clock,
            _dir: dir,
        })
    }

    async fn start(devices: Value) -> Harness {
        start_with(devices, |_| {}).await.unwrap()
    }

    async fn advance(secs: u64) {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_build_entities_from_provisioned_devices() {
        let h = start(three_devices()).await;

        assert_eq!(h.controller.base_stations().len(), 1);
        assert_eq!(h.controller.cameras().len(), 1);
        assert_eq!(h.controller.doorbells().len(), 0);
        assert_eq!(h.controller.cameras()[0].device_id(), "CAM1");
        assert_eq!(
            h.store.value(&[ARLO_NAMESPACE, TOTAL_CAMERAS_KEY]),
            Some(json!(1))
        );
        assert_eq!(
            h.store.value(&[ARLO_NAMESPACE, TOTAL_BELLS_KEY]),
            Some(json!(0))
        );
        assert_eq!(h.controller.attribute(TOTAL_CAMERAS_KEY), Some(json!(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn should_persist_keys_of_every_device_with_an_id() {
        let h = start(three_devices()).await;

        assert_eq!(h.store.value(&["BASE1", "deviceName"]), Some(json!("Hall")));
        assert_eq!(h.store.value(&["CAM2", "state"]), Some(json!("removed")));
        assert_eq!(h.store.value(&["CAM1", "xCloudId"]), None);
        assert_eq!(h.controller.devices().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_skip_every_kind_for_unprovisioned_device() {
        let h = start(json!([
            {"deviceId": "Q1", "deviceType": "arloq", "state": "synced"},
            {"deviceId": "BELL1", "deviceType": "doorbell", "state": "removed"},
        ]))
        .await;

        assert!(h.controller.base_stations().is_empty());
        assert!(h.controller.cameras().is_empty());
        assert!(h.controller.doorbells().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_make_arloq_both_base_and_camera() {
        let h = start(json!([
            {"deviceId": "Q1", "deviceName": "Nursery", "deviceType": "arloq",
             "state": "provisioned"},
        ]))
        .await;

        assert_eq!(h.controller.base_stations()[0].device_id(), "Q1");
        assert_eq!(h.controller.cameras()[0].device_id(), "Q1");
    }

    #[tokio::test(start_paused = true)]
    async fn should_build_doorbell_with_configured_debounce() {
        let h = start_with(
            json!([{"deviceId": "BELL1", "deviceName": "Front", "deviceType": "doorbell",
                    "state": "provisioned"}]),
            |config| config.db_ding_time_secs = 3,
        )
        .await
        .unwrap();

        let bell = h.controller.lookup_doorbell_by_name("Front").unwrap();
        let at = aarlo_domain::time::now();
        bell.handle_ding(at).await;
        assert!(bell.ding_detected(at + chrono::TimeDelta::seconds(2)).await);
        assert!(!bell.ding_detected(at + chrono::TimeDelta::seconds(3)).await);
        assert!(h.controller.lookup_doorbell_by_id("BELL1").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn should_return_none_for_unknown_lookups() {
        let h = start(three_devices()).await;

        assert!(h.controller.lookup_camera_by_id("nope").is_none());
        assert!(h.controller.lookup_camera_by_id("nope").is_none());
        assert!(h.controller.lookup_camera_by_name("Garage").is_none());
        assert!(h.controller.lookup_doorbell_by_id("CAM1").is_none());
        assert_eq!(
            h.controller.lookup_camera_by_name("Porch").unwrap().device_id(),
            "CAM1"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_fail_start_when_device_list_unavailable() {
        let dir = TempDir::new().unwrap();
        let config = AarloConfig {
            storage_dir: dir.path().to_path_buf(),
            ..AarloConfig::default()
        };
        let result = Controller::start(
            config,
            FakeBackend::default(),
            FakeStore::default(),
            FakeMedia::default(),
            FakeClock::new(day(1)),
        )
        .await;

        assert!(matches!(result, Err(AarloError::Backend(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn should_fail_start_when_storage_dir_is_a_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("taken");
        std::fs::write(&file, b"").unwrap();
        let backend = FakeBackend::default();
        backend.respond(DEVICES_URL, three_devices());
        let config = AarloConfig {
            storage_dir: file,
            ..AarloConfig::default()
        };

        let result = Controller::start(
            config,
            backend,
            FakeStore::default(),
            FakeMedia::default(),
            FakeClock::new(day(1)),
        )
        .await;

        assert!(matches!(result, Err(AarloError::StorageDir(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn should_reject_invalid_config() {
        let result = start_with(three_devices(), |config| config.name = String::new()).await;
        assert!(matches!(result, Err(AarloError::Validation(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn should_reject_reload_period_too_long_to_schedule() {
        let result = start_with(three_devices(), |config| {
            config.refresh_devices_every_hours = u64::MAX / 3600;
        })
        .await;
        assert!(matches!(
            result,
            Err(AarloError::Validation(ValidationError::IntervalTooLong { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn should_reject_refresh_interval_too_long_to_schedule() {
        let result = start_with(three_devices(), |config| {
            config.slow_refresh_interval_secs = u64::MAX;
        })
        .await;
        assert!(matches!(
            result,
            Err(AarloError::Validation(ValidationError::IntervalTooLong { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn should_run_startup_jobs() {
        let h = start(three_devices()).await;
        h.backend.respond(
            DEFINITIONS_URL,
            json!({"U-BASE1": {"modes": [{"id": "mode0", "name": "disarmed"}]}}),
        );

        advance(1).await;
        assert_eq!(h.backend.ping_count(), 1);
        assert!(h.controller.cameras()[0].state().await.last_image.is_none());

        advance(2).await;
        let camera = h.controller.cameras()[0].state().await;
        assert_eq!(
            camera.last_image.as_deref(),
            Some(h.controller.blank_image())
        );
        assert_eq!(h.media.lookup_count(), 1);
        assert_eq!(h.store.value(&["CAM1", "capturedToday"]), Some(json!(0)));

        advance(3).await;
        assert_eq!(
            h.controller.base_stations()[0].state().await.mode_name("mode0"),
            Some("disarmed")
        );
        let resources: Vec<String> = h
            .backend
            .notified_resources()
            .into_iter()
            .map(|(_, resource)| resource)
            .collect();
        assert_eq!(resources, vec!["modes", "cameras", "doorbells"]);

        assert_eq!(h.media.load_count(), 0);
        advance(5).await;
        assert_eq!(h.media.load_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_save_and_ping_on_fast_refresh() {
        let h = start(three_devices()).await;

        advance(61).await;
        assert_eq!(h.store.save_count(), 1);
        assert_eq!(h.backend.ping_count(), 2);

        advance(60).await;
        assert_eq!(h.store.save_count(), 2);
        assert_eq!(h.backend.ping_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_reload_media_once_per_day_rollover() {
        let h = start(three_devices()).await;
        advance(11).await;
        assert_eq!(h.media.load_count(), 1);
        assert_eq!(h.media.lookup_count(), 1);

        h.clock.set_today(day(2));
        advance(50).await;
        assert_eq!(h.controller.refresh_timers().today(), day(2));
        assert_eq!(h.media.load_count(), 2);
        assert_eq!(h.media.lookup_count(), 2);

        advance(240).await;
        assert_eq!(h.media.load_count(), 2);
        assert_eq!(h.media.lookup_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn should_never_reload_devices_when_disabled() {
        let h = start(three_devices()).await;

        advance(10 * 3600).await;

        assert_eq!(h.backend.requests_to(DEVICES_URL), 1);
        assert_eq!(h.controller.refresh_timers().refresh_devices_at(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn should_reload_devices_when_deadline_passes() {
        let h = start_with(three_devices(), |config| {
            config.refresh_devices_every_hours = 1;
        })
        .await
        .unwrap();
        let started = tokio::time::Instant::now();

        advance(1801).await;
        assert_eq!(h.backend.requests_to(DEVICES_URL), 1);

        // the tick landing exactly on the deadline does not reload
        advance(1800).await;
        assert_eq!(h.backend.requests_to(DEVICES_URL), 1);

        h.backend.respond(
            DEVICES_URL,
            json!([{"deviceId": "CAM9", "deviceType": "camera", "state": "provisioned"}]),
        );
        advance(1800).await;
        assert_eq!(h.backend.requests_to(DEVICES_URL), 2);
        assert_eq!(
            h.controller.refresh_timers().refresh_devices_at(),
            Some(started + Duration::from_secs(2 * 3600))
        );
        assert_eq!(h.controller.devices().len(), 1);
        assert_eq!(h.store.value(&["CAM9", "deviceType"]), Some(json!("camera")));
        assert_eq!(h.controller.cameras()[0].device_id(), "CAM1");

        advance(1800).await;
        assert_eq!(h.backend.requests_to(DEVICES_URL), 2);
        advance(1800).await;
        assert_eq!(h.backend.requests_to(DEVICES_URL), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_request_ambient_history_for_baby_cameras_on_slow_refresh() {
        let h = start(json!([
            {"deviceId": "BABY1", "deviceType": "camera", "modelId": "ABC1000A",
             "state": "provisioned", "parentId": "BABY1"},
        ]))
        .await;

        h.controller.slow_refresh();
        advance(1).await;

        assert!(
            h.backend
                .notified_resources()
                .contains(&("BABY1".to_string(), "cameras/BABY1/ambientSensors/history".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_save_then_logout_on_stop() {
        let h = start(three_devices()).await;
        assert!(h.controller.is_connected());

        h.controller.stop().await.unwrap();

        assert_eq!(h.store.save_count(), 1);
        assert!(!h.controller.is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn should_expose_configuration() {
        let h = start_with(three_devices(), |config| {
            config.name = "home".to_string();
            config.recent_time_secs = 120;
        })
        .await
        .unwrap();

        assert_eq!(h.controller.name(), "home");
        assert_eq!(h.controller.recent_time(), Duration::from_secs(120));
        assert!(h.controller.blank_image().starts_with(b"\x89PNG"));
        assert_eq!(h.controller.config().max_days, 365);
    }
}
