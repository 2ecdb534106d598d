//! Integration configuration — every option recognised at construction.
//!
//! Every field has a default matching the Home-Assistant component, so an
//! empty table is a valid configuration (apart from credentials).

use std::path::PathBuf;
use std::time::Duration;

use aarlo_domain::error::ValidationError;
use aarlo_domain::time::is_valid_format;
use serde::Deserialize;

use crate::scheduler::MAX_DELAY;

const SECS_PER_HOUR: u64 = 60 * 60;

/// Top-level integration configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AarloConfig {
    /// Arlo account user name.
    pub username: String,
    /// Arlo account password.
    pub password: Password,
    /// Display name, also the store file name.
    pub name: String,
    /// Directory holding the store and debug dumps.
    pub storage_dir: PathBuf,
    /// Dump raw cloud traffic into the storage directory.
    pub dump: bool,
    /// How many days of recordings the media library loads.
    pub max_days: u32,
    /// How long a doorbell motion event stays active, in seconds.
    pub db_motion_time_secs: u64,
    /// How long a doorbell ding stays active, in seconds.
    pub db_ding_time_secs: u64,
    /// Timeout of cloud requests, in seconds.
    pub request_timeout_secs: u64,
    /// Timeout of the event stream, in seconds (0 = none).
    pub stream_timeout_secs: u64,
    /// Window during which a recording counts as recent activity, in seconds.
    pub recent_time_secs: u64,
    /// strftime format of the "last capture" text.
    pub last_format: String,
    /// Do not upload media when recording on demand.
    pub no_media_upload: bool,
    /// Client identity presented to the cloud.
    pub user_agent: String,
    /// Which mode API the bases speak.
    pub mode_api: ModeApi,
    /// Reload the device list every this many hours (0 = never).
    pub refresh_devices_every_hours: u64,
    /// Connection pool: number of pooled hosts.
    pub http_connections: usize,
    /// Connection pool: connections per host.
    pub http_max_size: usize,
    /// Fast refresh period, in seconds.
    pub fast_refresh_interval_secs: u64,
    /// Slow refresh period, in seconds.
    pub slow_refresh_interval_secs: u64,
}

/// Mode API selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeApi {
    #[default]
    Auto,
    V1,
    V2,
}

/// Account password, never printed.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("\"***\"")
    }
}

impl Default for AarloConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: Password::default(),
            name: "aarlo".to_string(),
            storage_dir: PathBuf::from("/config/.aarlo"),
            dump: false,
            max_days: 365,
            db_motion_time_secs: 30,
            db_ding_time_secs: 10,
            request_timeout_secs: 60,
            stream_timeout_secs: 0,
            recent_time_secs: 600,
            last_format: "%m-%d %H:%M".to_string(),
            no_media_upload: false,
            user_agent: "apple".to_string(),
            mode_api: ModeApi::Auto,
            refresh_devices_every_hours: 0,
            http_connections: 5,
            http_max_size: 10,
            fast_refresh_interval_secs: 60,
            slow_refresh_interval_secs: 30 * 60,
        }
    }
}

impl AarloConfig {
    /// Check the values the controller depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for an empty name,
    /// [`ValidationError::ZeroInterval`] for a zero refresh period,
    /// [`ValidationError::IntervalTooLong`] for a period the scheduler cannot
    /// track and [`ValidationError::InvalidTimeFormat`] for an unusable
    /// `last_format`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.fast_refresh_interval_secs == 0 {
            return Err(ValidationError::ZeroInterval {
                field: "fast_refresh_interval_secs",
            });
        }
        if self.slow_refresh_interval_secs == 0 {
            return Err(ValidationError::ZeroInterval {
                field: "slow_refresh_interval_secs",
            });
        }
        let max_secs = MAX_DELAY.as_secs();
        for (field, secs) in [
            ("fast_refresh_interval_secs", self.fast_refresh_interval_secs),
            ("slow_refresh_interval_secs", self.slow_refresh_interval_secs),
        ] {
            if secs > max_secs {
                return Err(ValidationError::IntervalTooLong {
                    field,
                    max: max_secs,
                });
            }
        }
        if self.refresh_devices_every_hours > max_secs / SECS_PER_HOUR {
            return Err(ValidationError::IntervalTooLong {
                field: "refresh_devices_every_hours",
                max: max_secs / SECS_PER_HOUR,
            });
        }
        if !is_valid_format(&self.last_format) {
            return Err(ValidationError::InvalidTimeFormat(self.last_format.clone()));
        }
        Ok(())
    }

    #[must_use]
    pub fn db_motion_time(&self) -> Duration {
        Duration::from_secs(self.db_motion_time_secs)
    }

    #[must_use]
    pub fn db_ding_time(&self) -> Duration {
        Duration::from_secs(self.db_ding_time_secs)
    }

    #[must_use]
    pub fn recent_time(&self) -> Duration {
        Duration::from_secs(self.recent_time_secs)
    }

    #[must_use]
    pub fn fast_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.fast_refresh_interval_secs)
    }

    #[must_use]
    pub fn slow_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.slow_refresh_interval_secs)
    }

    /// Device-list reload period, `None` when disabled.
    #[must_use]
    pub fn refresh_devices_every(&self) -> Option<Duration> {
        match self.refresh_devices_every_hours {
            0 => None,
            hours => Some(Duration::from_secs(hours.saturating_mul(SECS_PER_HOUR))),
        }
    }
}
