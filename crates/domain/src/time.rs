//! Time and timestamp helpers.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};

/// UTC timestamp used for recordings, captures and event times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Convert a timestamp into Arlo time: milliseconds since the Unix epoch.
///
/// The cloud uses it both as a cache buster on `GET` requests and as the
/// unit of every timestamp it reports.
#[must_use]
pub fn to_arlo_time(ts: Timestamp) -> i64 {
    ts.timestamp_millis()
}

/// Convert Arlo time back into a timestamp, `None` when out of range.
#[must_use]
pub fn from_arlo_time(millis: i64) -> Option<Timestamp> {
    DateTime::from_timestamp_millis(millis)
}

/// Arlo time for the current instant.
#[must_use]
pub fn arlo_time_now() -> i64 {
    to_arlo_time(now())
}

/// Whether `format` is a usable strftime-style format string.
#[must_use]
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Render a timestamp in local time with a strftime-style format.
///
/// Returns `None` for an invalid format instead of panicking.
#[must_use]
pub fn format_local(ts: Timestamp, format: &str) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut out = String::new();
    write!(
        out,
        "{}",
        ts.with_timezone(&Local).format_with_items(items.iter())
    )
    .ok()?;
    Some(out)
}
