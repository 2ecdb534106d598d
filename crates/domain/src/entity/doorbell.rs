//! Doorbell state — motion and ding events held for a debounce period.

use std::time::Duration;

use chrono::TimeDelta;

use crate::time::Timestamp;

/// Last known state of a doorbell.
///
/// A motion or ding event stays active for its debounce duration after it
/// was last seen, so a burst of events reads as one continuous activation.
#[derive(Debug, Clone)]
pub struct DoorbellState {
    motion_time: TimeDelta,
    ding_time: TimeDelta,
    last_motion: Option<Timestamp>,
    last_ding: Option<Timestamp>,
}

impl DoorbellState {
    /// Durations that do not fit a `TimeDelta` are clamped to its maximum.
    #[must_use]
    pub fn new(motion_time: Duration, ding_time: Duration) -> Self {
        Self {
            motion_time: TimeDelta::from_std(motion_time).unwrap_or(TimeDelta::MAX),
            ding_time: TimeDelta::from_std(ding_time).unwrap_or(TimeDelta::MAX),
            last_motion: None,
            last_ding: None,
        }
    }

    pub fn record_motion(&mut self, at: Timestamp) {
        self.last_motion = Some(at);
    }

    pub fn record_ding(&mut self, at: Timestamp) {
        self.last_ding = Some(at);
    }

    #[must_use]
    pub fn motion_detected(&self, now: Timestamp) -> bool {
        is_active(self.last_motion, self.motion_time, now)
    }

    #[must_use]
    pub fn ding_detected(&self, now: Timestamp) -> bool {
        is_active(self.last_ding, self.ding_time, now)
    }
}

fn is_active(last: Option<Timestamp>, hold: TimeDelta, now: Timestamp) -> bool {
    last.is_some_and(|at| now.signed_duration_since(at) < hold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn start() -> Timestamp {
        DateTime::from_timestamp(1_600_000_000, 0).unwrap()
    }

    #[test]
    fn should_start_idle() {
        let state = DoorbellState::new(Duration::from_secs(30), Duration::from_secs(10));
        assert!(!state.motion_detected(start()));
        assert!(!state.ding_detected(start()));
    }

    #[test]
    fn should_hold_motion_for_motion_time() {
        let mut state = DoorbellState::new(Duration::from_secs(30), Duration::from_secs(10));
        state.record_motion(start());

        assert!(state.motion_detected(start() + TimeDelta::seconds(29)));
        assert!(!state.motion_detected(start() + TimeDelta::seconds(30)));
    }

    #[test]
    fn should_hold_ding_for_ding_time() {
        let mut state = DoorbellState::new(Duration::from_secs(30), Duration::from_secs(10));
        state.record_ding(start());

        assert!(state.ding_detected(start() + TimeDelta::seconds(9)));
        assert!(!state.ding_detected(start() + TimeDelta::seconds(10)));
        assert!(!state.motion_detected(start()));
    }

    #[test]
    fn should_extend_motion_on_repeated_events() {
        let mut state = DoorbellState::new(Duration::from_secs(30), Duration::from_secs(10));
        state.record_motion(start());
        state.record_motion(start() + TimeDelta::seconds(20));

        assert!(state.motion_detected(start() + TimeDelta::seconds(45)));
    }
}
