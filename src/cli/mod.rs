pub mod config;
pub mod history;
pub mod info;
pub mod output;
pub mod status;
pub mod util;
pub mod watch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nightscout glucose readings for your status bar
#[derive(Parser)]
#[command(name = "nsbar", version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file (default: <config dir>/nightscout-bar/config.toml)
    #[arg(long, global = true, env = "NSBAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Logging verbosity for stderr: off, error, warn, info, debug
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch once and print the status line
    Status(status::Args),

    /// Keep polling and print every update
    Watch(watch::Args),

    /// List recent readings
    History(history::Args),

    /// Show loop and pump telemetry
    Info(info::Args),

    /// Inspect or edit the config file
    Config(config::Args),
}
