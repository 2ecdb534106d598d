//! Refresh timers — day rollover and device-list reload deadline.

use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::Instant;

use crate::scheduler::deadline_after;

/// Calendar and deadline state consulted by the fast and slow refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTimers {
    today: NaiveDate,
    reload: Option<Reload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reload {
    every: Duration,
    at: Instant,
}

impl RefreshTimers {
    /// Start tracking from `today`; a reload period of `None` never reloads.
    #[must_use]
    pub fn new(today: NaiveDate, now: Instant, reload_every: Option<Duration>) -> Self {
        Self {
            today,
            reload: reload_every.map(|every| Reload {
                every,
                at: deadline_after(now, every),
            }),
        }
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// When the next device-list reload is due.
    #[must_use]
    pub fn refresh_devices_at(&self) -> Option<Instant> {
        self.reload.map(|reload| reload.at)
    }

    /// Record `today`; `true` when it differs from the last date seen.
    pub fn roll_day(&mut self, today: NaiveDate) -> bool {
        if self.today == today {
            return false;
        }
        self.today = today;
        true
    }

    /// `true` once `now` is past the reload deadline, in which case the
    /// deadline moves one period forward, or one period from `now` if that
    /// is still in the past.
    pub fn take_device_reload(&mut self, now: Instant) -> bool {
        let Some(reload) = self.reload.as_mut() else {
            return false;
        };
        if now <= reload.at {
            return false;
        }
        reload.at = deadline_after(reload.at, reload.every);
        if reload.at <= now {
            reload.at = deadline_after(now, reload.every);
        }
        true
    }
}
