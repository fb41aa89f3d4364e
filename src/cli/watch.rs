//! Watch command: poll on a fixed interval and print every update.
//!
//! Each poll is awaited before the next tick is taken, so at most one
//! request is in flight. Ticks missed during a slow poll are skipped rather
//! than fired back to back.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::cli::{output, util};
use crate::config::BarConfig;
use crate::poller::StatusUpdate;

#[derive(ClapArgs)]
pub struct Args {
    /// Seconds between polls (default: refresh_interval_secs from config)
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// Stop after this many polls (0 = run until Ctrl+C)
    #[arg(long, short, default_value_t = 0)]
    pub count: u32,

    /// Print one JSON object per update instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: Args, config_path: &Path) -> Result<()> {
    let config = util::load_config(config_path)?;
    let interval = args.interval.unwrap_or(config.refresh_interval_secs);
    if interval == 0 {
        anyhow::bail!("interval must be greater than zero");
    }

    util::runtime()?.block_on(watch(&config, Duration::from_secs(interval), &args))
}

async fn watch(config: &BarConfig, interval: Duration, args: &Args) -> Result<()> {
    let mut poller = util::poller_from(config)?;
    let print = |update: &StatusUpdate| -> Result<()> {
        if args.json {
            println!(
                "{}",
                serde_json::to_string(update).context("failed to serialize update")?
            );
        } else {
            println!("{}", output::render_status(update, config.legacy_status_item));
        }
        Ok(())
    };

    info!("polling every {}s", interval.as_secs());
    print(&StatusUpdate::loading())?;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut polls: u32 = 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        let update = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                return Ok(());
            }
            update = poller.poll() => update,
        };
        print(&update)?;

        polls += 1;
        if args.count > 0 && polls >= args.count {
            return Ok(());
        }
    }
}
