use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// Monotonic-nondecreasing nanosecond counter, the only time source the
/// record service reads.
pub trait Clock: Send + Sync {
    fn now_nanos(&self) -> u64;
}

/// Production clock: nanoseconds since the Unix epoch.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

/// Convert a nanosecond counter reading to a calendar timestamp at
/// millisecond resolution. Integer division floors the sub-millisecond
/// remainder, so equal counter readings always map to equal timestamps.
pub fn datetime_from_nanos(nanos: u64) -> DateTime<Utc> {
    let millis = (nanos / 1_000_000) as i64;
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
