//! Media — recorded videos as indexed by the media library.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A single recording made by a camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub device_id: String,
    pub created_at: Timestamp,
    pub duration_secs: u32,
    pub content_url: String,
    pub thumbnail_url: String,
}

impl Video {
    /// Local calendar day the recording was made on.
    #[must_use]
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.with_timezone(&Local).date_naive()
    }
}

/// Sort recordings newest first.
pub fn sort_newest_first(videos: &mut [Video]) {
    videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
