use std::path::Path;

use anyhow::Result;
use chrono::Local;
use clap::Args as ClapArgs;

use crate::cli::{output, util};

#[derive(ClapArgs)]
pub struct Args {
    /// Show at most this many readings
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Output the readings as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fetch once and list recent readings, newest first.
pub fn run(args: Args, config_path: &Path) -> Result<()> {
    let config = util::load_config(config_path)?;
    let mut poller = util::poller_from(&config)?;

    let spinner = output::spinner("Fetching readings...");
    let update = util::runtime()?.block_on(poller.poll());
    spinner.finish_and_clear();

    let limit = args.limit.unwrap_or(usize::MAX);
    let rows: Vec<_> = update.history.iter().take(limit).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        let reason = update.extra_message.as_deref().unwrap_or("no readings");
        output::warning(&format!("{} {}", update.message, reason));
        return Ok(());
    }

    output::header(&format!("Last {} readings ({})", rows.len(), config.units));
    for row in rows {
        let time = row.time.with_timezone(&Local).format("%H:%M");
        println!("{}  {}", time, row.text);
    }
    Ok(())
}
