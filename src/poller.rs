//! Owns the entry list and telemetry snapshot between polls and decides what
//! the status line shows after each fetch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::FeedSource;
use crate::error::FeedError;
use crate::feed::{format_history_row, format_status, is_stale, DisplayPrefs, Entry, OtherInfo};

pub const LOADING_MESSAGE: &str = "[loading]";
pub const NETWORK_MESSAGE: &str = "[network]";
pub const STALE_MESSAGE: &str = "???";

#[derive(Debug, Clone, Copy)]
pub struct PollerSettings {
    pub prefs: DisplayPrefs,
    pub show_loop_data: bool,
    pub stale_threshold_min: i64,
}

/// One row of the history list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub time: DateTime<Utc>,
    pub text: String,
}

/// Everything a renderer needs after a poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub message: String,
    pub extra_message: Option<String>,
    pub history: Vec<HistoryRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_info: Option<OtherInfo>,
}

impl StatusUpdate {
    /// Placeholder shown before the first poll completes.
    pub fn loading() -> Self {
        Self {
            message: LOADING_MESSAGE.to_string(),
            extra_message: Some("Getting initial entries...".to_string()),
            history: Vec::new(),
            other_info: None,
        }
    }
}

pub struct Poller<S> {
    source: Option<S>,
    settings: PollerSettings,
    entries: Vec<Entry>,
    other_info: OtherInfo,
}

impl<S: FeedSource> Poller<S> {
    /// `source` is `None` when no Nightscout URL has been configured.
    pub fn new(source: Option<S>, settings: PollerSettings) -> Self {
        Self {
            source,
            settings,
            entries: Vec::new(),
            other_info: OtherInfo::default(),
        }
    }

    pub async fn poll(&mut self) -> StatusUpdate {
        self.poll_at(Utc::now()).await
    }

    pub async fn poll_at(&mut self, now: DateTime<Utc>) -> StatusUpdate {
        let Some(source) = self.source.as_ref() else {
            return self.fail(&FeedError::NotConfigured, now);
        };

        let entries = match source.fetch_entries().await {
            Ok(entries) => entries,
            Err(e) => return self.fail(&e, now),
        };
        if entries.is_empty() {
            return self.fail_with("no valid data", now);
        }
        debug!("received {} entries", entries.len());
        self.entries = entries;

        if self.settings.show_loop_data {
            match source.fetch_properties().await {
                Ok(info) => self.other_info = info,
                Err(e) => warn!("network error getting other info: {}", e),
            }
        }

        if self.latest_is_stale(now) {
            return self.update(
                STALE_MESSAGE.to_string(),
                Some("No recent readings from CGM".to_string()),
            );
        }

        let mut message = format_status(&self.entries, &self.settings.prefs, now);
        if self.settings.show_loop_data {
            message.push_str(" | IOB: ");
            message.push_str(self.other_info.iob_or_unknown());
        }
        self.update(message, None)
    }

    fn latest_is_stale(&self, now: DateTime<Utc>) -> bool {
        self.entries
            .first()
            .map_or(true, |e| is_stale(e, self.settings.stale_threshold_min, now))
    }

    fn fail(&mut self, err: &FeedError, now: DateTime<Utc>) -> StatusUpdate {
        self.fail_with(&err.to_string(), now)
    }

    /// Fresh data survives a failed fetch with a warning marker; stale or
    /// missing data is cleared.
    fn fail_with(&mut self, reason: &str, now: DateTime<Utc>) -> StatusUpdate {
        warn!("network error source: {}", reason);
        if self.latest_is_stale(now) {
            self.entries.clear();
            return self.update(NETWORK_MESSAGE.to_string(), Some(reason.to_string()));
        }

        let message = format!("{}!", format_status(&self.entries, &self.settings.prefs, now));
        self.update(message, Some("Temporary network failure".to_string()))
    }

    fn update(&self, message: String, extra_message: Option<String>) -> StatusUpdate {
        let units = self.settings.prefs.units;
        StatusUpdate {
            message,
            extra_message,
            history: self
                .entries
                .iter()
                .map(|e| HistoryRow {
                    time: e.time,
                    text: format_history_row(e, units),
                })
                .collect(),
            other_info: self
                .settings
                .show_loop_data
                .then(|| self.other_info.clone()),
        }
    }
}
