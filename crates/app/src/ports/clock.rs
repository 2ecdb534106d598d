//! Clock port — calendar date and monotonic time.

use chrono::NaiveDate;
use tokio::time::Instant;

/// Source of the current date and monotonic instant.
///
/// The monotonic side defaults to [`tokio::time::Instant::now`], which follows
/// the paused clock of `#[tokio::test(start_paused = true)]`.
pub trait Clock: Send + Sync {
    /// Local calendar date.
    fn today(&self) -> NaiveDate;

    /// Monotonic now.
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

impl<T: Clock> Clock for std::sync::Arc<T> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now(&self) -> Instant {
        (**self).now()
    }
}
