use serde::{Deserialize, Serialize};

use crate::feed::{Units, DEFAULT_STALE_THRESHOLD_MIN};

/// User preferences, stored as TOML. Every field has a default so a missing
/// or partial file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BarConfig {
    /// Base URL of the Nightscout site, e.g. "https://my-cgm.example.org".
    pub nightscout_url: String,

    /// Optional access token appended as `?token=`.
    pub access_token: String,

    pub units: Units,

    /// Also fetch loop/pump telemetry and append IOB to the status line.
    pub show_loop_data: bool,

    /// Append the age of the latest reading in minutes.
    pub show_update_time: bool,

    /// Append the change between the two latest readings.
    pub show_bg_difference: bool,

    /// Render the status and extra message on a single line.
    pub legacy_status_item: bool,

    pub stale_threshold_min: i64,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            nightscout_url: String::new(),
            access_token: String::new(),
            units: Units::Mgdl,
            show_loop_data: false,
            show_update_time: false,
            show_bg_difference: false,
            legacy_status_item: false,
            stale_threshold_min: DEFAULT_STALE_THRESHOLD_MIN,
            refresh_interval_secs: 60,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigMessage {
    Warning(String),
    Error(String),
}

impl BarConfig {
    pub fn validate(&self) -> Vec<ConfigMessage> {
        let mut messages = Vec::new();

        let url = self.nightscout_url.trim();
        if url.is_empty() {
            messages.push(ConfigMessage::Warning(
                "nightscout_url is not set; nothing will be fetched".to_string(),
            ));
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            messages.push(ConfigMessage::Error(format!(
                "nightscout_url must start with http:// or https:// (got '{}')",
                url
            )));
        }

        if self.refresh_interval_secs == 0 {
            messages.push(ConfigMessage::Error(
                "refresh_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            messages.push(ConfigMessage::Error(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.stale_threshold_min < 1 {
            messages.push(ConfigMessage::Warning(format!(
                "stale_threshold_min is {}; every reading older than a minute will be stale",
                self.stale_threshold_min
            )));
        }

        messages
    }

    /// The access token with all but the last four characters hidden.
    pub fn masked_token(&self) -> String {
        let token = self.access_token.trim();
        let len = token.chars().count();
        match len {
            0 => String::new(),
            1..=4 => "****".to_string(),
            _ => format!("****{}", token.chars().skip(len - 4).collect::<String>()),
        }
    }
}
