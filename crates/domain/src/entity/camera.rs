//! Camera state — thumbnail, recordings and ambient-sensor bookkeeping.

use std::time::Duration;

use chrono::{NaiveDate, TimeDelta};

use crate::media::{Video, sort_newest_first};
use crate::time::{Timestamp, format_local};

/// Last known state of a camera.
#[derive(Debug, Clone, Default)]
pub struct CameraState {
    /// Bytes of the most recent thumbnail (or the blank image).
    pub last_image: Option<Vec<u8>>,
    /// Url the current thumbnail was downloaded from.
    pub last_image_url: Option<String>,
    /// When ambient sensor readings were last requested.
    pub ambient_requested_at: Option<Timestamp>,
    videos: Vec<Video>,
    captured_today: usize,
}

impl CameraState {
    /// Replace the recording list and recount today's captures.
    pub fn set_videos(&mut self, mut videos: Vec<Video>, today: NaiveDate) {
        sort_newest_first(&mut videos);
        self.captured_today = videos.iter().filter(|v| v.created_on() == today).count();
        self.videos = videos;
    }

    /// Recordings, newest first.
    #[must_use]
    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    #[must_use]
    pub fn last_video(&self) -> Option<&Video> {
        self.videos.first()
    }

    /// Number of recordings made since local midnight, as of the last update.
    #[must_use]
    pub fn captured_today(&self) -> usize {
        self.captured_today
    }

    /// Whether the newest recording started less than `window` before `now`.
    #[must_use]
    pub fn is_recent(&self, now: Timestamp, window: Duration) -> bool {
        let Ok(window) = TimeDelta::from_std(window) else {
            return self.last_video().is_some();
        };
        self.last_video()
            .is_some_and(|video| now.signed_duration_since(video.created_at) < window)
    }

    /// Creation time of the newest recording rendered with `format`.
    #[must_use]
    pub fn last_capture_text(&self, format: &str) -> Option<String> {
        self.last_video()
            .and_then(|video| format_local(video.created_at, format))
    }
}
