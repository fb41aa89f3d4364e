use std::path::Path;

use anyhow::Result;
use clap::Args as ClapArgs;

use crate::cli::{output, util};

#[derive(ClapArgs)]
pub struct Args {
    /// Output the full status update as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fetch once and print the status line. Fetch failures are part of the
/// status, so this exits 0 unless the config itself is broken.
pub fn run(args: Args, config_path: &Path) -> Result<()> {
    let config = util::load_config(config_path)?;
    let mut poller = util::poller_from(&config)?;

    let update = util::runtime()?.block_on(poller.poll());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&update)?);
    } else {
        println!("{}", output::render_status(&update, config.legacy_status_item));
    }
    Ok(())
}
