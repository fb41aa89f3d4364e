//! Shared CLI utility functions.
//!
//! Helpers used by several subcommands: logging setup, config loading and
//! building a poller from the loaded preferences.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::client::NightscoutClient;
use crate::config::{self, BarConfig};
use crate::error::FeedError;
use crate::feed::DisplayPrefs;
use crate::poller::{Poller, PollerSettings};

/// Initialize tracing to stderr. Unknown levels fall back to `warn`.
pub fn init_tracing(log_level: &str) {
    let filter = match log_level {
        "off" | "error" | "warn" | "info" | "debug" | "trace" => log_level,
        other => {
            eprintln!(
                "warning: unknown log level '{}', defaulting to 'warn'",
                other
            );
            "warn"
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<BarConfig> {
    config::load(path).with_context(|| format!("could not load config from {}", path.display()))
}

pub fn settings_from(config: &BarConfig) -> PollerSettings {
    PollerSettings {
        prefs: DisplayPrefs {
            units: config.units,
            show_delta: config.show_bg_difference,
            show_age: config.show_update_time,
        },
        show_loop_data: config.show_loop_data,
        stale_threshold_min: config.stale_threshold_min,
    }
}

/// Build the HTTP client, or `None` when no Nightscout URL is configured.
pub fn client_from(config: &BarConfig) -> Result<Option<NightscoutClient>> {
    let token = Some(config.access_token.as_str());
    let timeout = Duration::from_secs(config.request_timeout_secs);
    match NightscoutClient::new(&config.nightscout_url, token, timeout) {
        Ok(client) => Ok(Some(client)),
        Err(FeedError::NotConfigured) => Ok(None),
        Err(e) => Err(e).context("failed to create HTTP client"),
    }
}

pub fn poller_from(config: &BarConfig) -> Result<Poller<NightscoutClient>> {
    Ok(Poller::new(client_from(config)?, settings_from(config)))
}

pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to create tokio runtime")
}
