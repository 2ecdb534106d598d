//! In-memory port fakes shared by the unit tests of this crate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use aarlo_domain::device::NotifyTarget;
use aarlo_domain::error::AarloError;
use aarlo_domain::media::Video;
use chrono::NaiveDate;
use serde_json::Value;

use crate::ports::{Backend, Clock, KeyValueStore, MediaLibrary};

/// Cloud fake answering `get` by url path (query string ignored).
#[derive(Default)]
pub struct FakeBackend {
    pub responses: Mutex<HashMap<String, Value>>,
    pub images: Mutex<HashMap<String, Vec<u8>>>,
    pub requested: Mutex<Vec<String>>,
    pub notified: Mutex<Vec<(String, Value)>>,
    pub pinged: Mutex<Vec<String>>,
    pub logged_out: AtomicBool,
}

impl FakeBackend {
    pub fn respond(&self, path: &str, payload: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), payload);
    }

    pub fn serve_image(&self, url: &str, bytes: &[u8]) {
        self.images
            .lock()
            .unwrap()
            .insert(url.to_string(), bytes.to_vec());
    }

    pub fn requests_to(&self, path: &str) -> usize {
        self.requested
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.starts_with(path))
            .count()
    }

    pub fn notified_resources(&self) -> Vec<(String, String)> {
        self.notified
            .lock()
            .unwrap()
            .iter()
            .map(|(device_id, body)| {
                let resource = body["resource"].as_str().unwrap_or_default().to_string();
                (device_id.clone(), resource)
            })
            .collect()
    }

    pub fn ping_count(&self) -> usize {
        self.pinged.lock().unwrap().len()
    }
}

impl Backend for FakeBackend {
    fn get(&self, url: &str) -> impl Future<Output = Result<Value, AarloError>> + Send {
        self.requested.lock().unwrap().push(url.to_string());
        let path = url.split('?').next().unwrap_or_default();
        let result = self
            .responses
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| AarloError::Backend(format!("no response for {path}").into()));
        async { result }
    }

    fn get_image(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, AarloError>> + Send {
        let result = self
            .images
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| AarloError::Backend(format!("no image at {url}").into()));
        async { result }
    }

    fn notify(
        &self,
        base: &NotifyTarget,
        body: Value,
    ) -> impl Future<Output = Result<(), AarloError>> + Send {
        self.notified
            .lock()
            .unwrap()
            .push((base.device_id.clone(), body));
        async { Ok(()) }
    }

    fn ping(&self, base: &NotifyTarget) -> impl Future<Output = Result<(), AarloError>> + Send {
        self.pinged.lock().unwrap().push(base.device_id.clone());
        async { Ok(()) }
    }

    fn logout(&self) -> impl Future<Output = Result<(), AarloError>> + Send {
        self.logged_out.store(true, Ordering::SeqCst);
        async { Ok(()) }
    }

    fn is_connected(&self) -> bool {
        !self.logged_out.load(Ordering::SeqCst)
    }
}

/// Store fake keyed by the `/`-joined path.
#[derive(Default)]
pub struct FakeStore {
    pub values: Mutex<HashMap<String, Value>>,
    pub saves: AtomicUsize,
}

impl FakeStore {
    pub fn value(&self, path: &[&str]) -> Option<Value> {
        self.values.lock().unwrap().get(&path.join("/")).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for FakeStore {
    fn get(&self, path: &[&str]) -> Option<Value> {
        self.value(path)
    }

    fn set(&self, path: &[&str], value: Value) {
        self.values.lock().unwrap().insert(path.join("/"), value);
    }

    fn save(&self) -> impl Future<Output = Result<(), AarloError>> + Send {
        self.saves.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    }
}

/// Media library fake with a fixed set of recordings.
#[derive(Default)]
pub struct FakeMedia {
    pub videos: Mutex<Vec<Video>>,
    pub loads: AtomicUsize,
    pub lookups: AtomicUsize,
}

impl FakeMedia {
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl MediaLibrary for FakeMedia {
    fn load(&self) -> impl Future<Output = Result<(), AarloError>> + Send {
        self.loads.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    }

    fn videos_for(
        &self,
        device_id: &str,
    ) -> impl Future<Output = Result<Vec<Video>, AarloError>> + Send {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let videos: Vec<Video> = self
            .videos
            .lock()
            .unwrap()
            .iter()
            .filter(|video| video.device_id == device_id)
            .cloned()
            .collect();
        async { Ok(videos) }
    }
}

/// Clock fake whose date is moved by hand.
pub struct FakeClock {
    pub today: Mutex<NaiveDate>,
}

impl FakeClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        *self.today.lock().unwrap() = today;
    }
}

impl Clock for FakeClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }
}
