//! Glucose entries as served by the Nightscout `sgv.json` endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::FeedError;

/// Fixed mg/dL to mmol/L conversion factor.
pub const MGDL_PER_MMOL: f64 = 18.0182;

/// Trend code attached to a reading. Unknown codes are kept verbatim so the
/// formatter can report them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    Empty,
    None,
    Flat,
    FortyFiveDown,
    FortyFiveUp,
    SingleUp,
    DoubleUp,
    SingleDown,
    DoubleDown,
    Unrecognized(String),
}

impl Direction {
    pub fn parse(code: &str) -> Self {
        match code {
            "" => Direction::Empty,
            "NONE" => Direction::None,
            "Flat" => Direction::Flat,
            "FortyFiveDown" => Direction::FortyFiveDown,
            "FortyFiveUp" => Direction::FortyFiveUp,
            "SingleUp" => Direction::SingleUp,
            "DoubleUp" => Direction::DoubleUp,
            "SingleDown" => Direction::SingleDown,
            "DoubleDown" => Direction::DoubleDown,
            other => Direction::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Direction::Empty => "",
            Direction::None => "NONE",
            Direction::Flat => "Flat",
            Direction::FortyFiveDown => "FortyFiveDown",
            Direction::FortyFiveUp => "FortyFiveUp",
            Direction::SingleUp => "SingleUp",
            Direction::DoubleUp => "DoubleUp",
            Direction::SingleDown => "SingleDown",
            Direction::DoubleDown => "DoubleDown",
            Direction::Unrecognized(code) => code,
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One glucose reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub time: DateTime<Utc>,
    pub value_mgdl: i64,
    /// Full precision; rounding happens when formatting.
    pub value_mmol: f64,
    pub direction: Direction,
}

impl Entry {
    pub fn new(time: DateTime<Utc>, value_mgdl: i64, direction: Direction) -> Self {
        Self {
            time,
            value_mgdl,
            value_mmol: mgdl_to_mmol(value_mgdl),
            direction,
        }
    }

    /// Decode a single raw record. `sgv`, `date` and `direction` are required.
    pub fn from_json(raw: &Value) -> Result<Self, FeedError> {
        let sgv = raw
            .get("sgv")
            .ok_or_else(|| FeedError::malformed("sgv", "is missing"))?;
        let value_mgdl = sgv
            .as_i64()
            .ok_or_else(|| FeedError::malformed("sgv", format!("is not an integer: {}", sgv)))?;

        let date = raw
            .get("date")
            .ok_or_else(|| FeedError::malformed("date", "is missing"))?;
        let millis = date
            .as_f64()
            .ok_or_else(|| FeedError::malformed("date", format!("is not numeric: {}", date)))?;
        let time = DateTime::from_timestamp_millis(millis as i64)
            .ok_or_else(|| FeedError::malformed("date", format!("is out of range: {}", millis)))?;

        let direction = raw
            .get("direction")
            .ok_or_else(|| FeedError::malformed("direction", "is missing"))?
            .as_str()
            .ok_or_else(|| FeedError::malformed("direction", "is not a string"))?;

        Ok(Entry::new(time, value_mgdl, Direction::parse(direction)))
    }
}

pub fn mgdl_to_mmol(mgdl: i64) -> f64 {
    mgdl as f64 / MGDL_PER_MMOL
}

/// Decode a batch of raw records, skipping malformed ones.
///
/// The result is ordered newest-first regardless of the order the server
/// returned the records in.
pub fn parse_entries(raw: &Value) -> Vec<Entry> {
    let Some(records) = raw.as_array() else {
        warn!("entries response is not a JSON array");
        return Vec::new();
    };

    let mut entries: Vec<Entry> = records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| match Entry::from_json(record) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping entry {}: {}", i, e);
                None
            }
        })
        .collect();

    entries.sort_by(|a, b| b.time.cmp(&a.time));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_entry() {
        let entry =
            Entry::from_json(&json!({"sgv": 120, "date": 1700000000000u64, "direction": "Flat"}))
                .unwrap();
        assert_eq!(entry.value_mgdl, 120);
        assert_eq!(entry.direction, Direction::Flat);
        assert_eq!(entry.time.timestamp(), 1_700_000_000);
        assert!((entry.value_mmol - 120.0 / 18.0182).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_float_date() {
        let entry =
            Entry::from_json(&json!({"sgv": 99, "date": 1700000000123.0, "direction": ""}))
                .unwrap();
        assert_eq!(entry.time.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(entry.direction, Direction::Empty);
    }

    #[test]
    fn test_parse_missing_sgv() {
        let err = Entry::from_json(&json!({"date": 1700000000000u64, "direction": "Flat"}))
            .unwrap_err();
        assert!(matches!(err, FeedError::MalformedEntry { field: "sgv", .. }));
    }

    #[test]
    fn test_parse_fractional_sgv_is_malformed() {
        let err = Entry::from_json(&json!({"sgv": 120.5, "date": 1, "direction": "Flat"}))
            .unwrap_err();
        assert!(matches!(err, FeedError::MalformedEntry { field: "sgv", .. }));
    }

    #[test]
    fn test_parse_string_date_is_malformed() {
        let err = Entry::from_json(&json!({"sgv": 120, "date": "yesterday", "direction": "Flat"}))
            .unwrap_err();
        assert!(matches!(err, FeedError::MalformedEntry { field: "date", .. }));
    }

    #[test]
    fn test_parse_missing_direction() {
        let err = Entry::from_json(&json!({"sgv": 120, "date": 1700000000000u64})).unwrap_err();
        assert!(matches!(
            err,
            FeedError::MalformedEntry {
                field: "direction",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_direction_is_kept() {
        let entry =
            Entry::from_json(&json!({"sgv": 120, "date": 1700000000000u64, "direction": "banana"}))
                .unwrap();
        assert_eq!(entry.direction, Direction::Unrecognized("banana".into()));
        assert_eq!(entry.direction.as_str(), "banana");
    }

    #[test]
    fn test_parse_entries_skips_malformed_and_orders_newest_first() {
        let raw = json!([
            {"sgv": 110, "date": 1700000000000u64, "direction": "Flat"},
            {"sgv": "high", "date": 1700000300000u64, "direction": "Flat"},
            {"sgv": 130, "date": 1700000600000u64, "direction": "SingleUp"},
            {"date": 1700000900000u64},
        ]);
        let entries = parse_entries(&raw);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value_mgdl, 130);
        assert_eq!(entries[1].value_mgdl, 110);
    }

    #[test]
    fn test_parse_entries_non_array() {
        assert!(parse_entries(&json!({"status": 401})).is_empty());
    }

    #[test]
    fn test_mmol_round_trip_within_tolerance() {
        for mgdl in [40_i64, 72, 100, 120, 180, 250, 400] {
            let mmol = mgdl_to_mmol(mgdl);
            let rounded: f64 = format!("{:.1}", mmol).parse().unwrap();
            let back = rounded * MGDL_PER_MMOL;
            assert!((back / MGDL_PER_MMOL - mmol).abs() <= 0.1, "mgdl {}", mgdl);
        }
    }
}
