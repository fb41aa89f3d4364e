//! Status line and history row rendering.
//!
//! All functions are pure: they take the entry list and preferences and
//! return plain strings. Coloring is left to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::entry::{Direction, Entry};
use super::staleness::minutes_since;

/// Rendered in place of a reading when no data is available.
pub const UNKNOWN_READING: &str = "???";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Mgdl,
    Mmol,
}

impl std::str::FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mgdl" => Ok(Units::Mgdl),
            "mmol" => Ok(Units::Mmol),
            other => Err(format!("unknown units '{}' (expected mgdl or mmol)", other)),
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Units::Mgdl => write!(f, "mgdl"),
            Units::Mmol => write!(f, "mmol"),
        }
    }
}

/// Display toggles that affect the status line.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayPrefs {
    pub units: Units,
    pub show_delta: bool,
    pub show_age: bool,
}

/// Arrow suffix for a trend code, including its leading space.
pub fn trend_suffix(direction: &Direction) -> &'static str {
    match direction {
        Direction::Empty => "",
        Direction::None | Direction::Flat => " \u{2192}",
        Direction::FortyFiveDown => " \u{2798}",
        Direction::FortyFiveUp => " \u{279A}",
        Direction::SingleUp => " \u{2191}",
        Direction::DoubleUp => " \u{2191}\u{2191}",
        Direction::SingleDown => " \u{2193}",
        Direction::DoubleDown => " \u{2193}\u{2193}",
        Direction::Unrecognized(code) => {
            warn!("unknown direction: {}", code);
            " *"
        }
    }
}

pub fn format_value(entry: &Entry, units: Units) -> String {
    match units {
        Units::Mgdl => entry.value_mgdl.to_string(),
        Units::Mmol => format!("{:.1}", entry.value_mmol),
    }
}

/// Value plus trend arrow, used for every row of the history list.
pub fn format_history_row(entry: &Entry, units: Units) -> String {
    format!("{}{}", format_value(entry, units), trend_suffix(&entry.direction))
}

/// Change between the two most recent readings (newest minus previous).
/// Returns `None` when fewer than two readings are available.
pub fn format_delta(entries: &[Entry], units: Units) -> Option<String> {
    let [newest, previous, ..] = entries else {
        return None;
    };
    Some(match units {
        Units::Mgdl => newest.value_mgdl.saturating_sub(previous.value_mgdl).to_string(),
        Units::Mmol => format!("{:.1}", newest.value_mmol - previous.value_mmol),
    })
}

pub fn format_age(entry: &Entry, now: DateTime<Utc>) -> String {
    format!("{} m", minutes_since(entry.time, now))
}

/// Short status string for the most recent reading.
pub fn format_status(entries: &[Entry], prefs: &DisplayPrefs, now: DateTime<Utc>) -> String {
    let Some(latest) = entries.first() else {
        return UNKNOWN_READING.to_string();
    };

    let mut out = format_history_row(latest, prefs.units);
    if prefs.show_delta {
        if let Some(delta) = format_delta(entries, prefs.units) {
            out.push(' ');
            out.push_str(&delta);
        }
    }
    if prefs.show_age {
        out.push(' ');
        out.push_str(&format_age(latest, now));
    }
    out
}
