use chrono::{DateTime, Utc};

use super::entry::Entry;

/// Readings older than this many minutes are treated as stale.
pub const DEFAULT_STALE_THRESHOLD_MIN: i64 = 15;

/// Whole minutes elapsed between `time` and `now`, truncated toward zero.
pub fn minutes_since(time: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - time).num_seconds() / 60
}

/// A reading is stale once its truncated age exceeds the threshold.
pub fn is_stale(entry: &Entry, threshold_min: i64, now: DateTime<Utc>) -> bool {
    minutes_since(entry.time, now) > threshold_min
}
