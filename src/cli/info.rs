use std::path::Path;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;

use crate::cli::{output, util};
use crate::client::FeedSource;
use crate::feed::properties::or_unknown;

#[derive(ClapArgs)]
pub struct Args {
    /// Output the telemetry snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fetch and print loop/pump telemetry.
pub fn run(args: Args, config_path: &Path) -> Result<()> {
    let config = util::load_config(config_path)?;
    let Some(client) = util::client_from(&config)? else {
        anyhow::bail!("Add your Nightscout URL to the config file (nsbar config set nightscout_url <url>)");
    };

    let spinner = output::spinner(&format!("Fetching loop data from {}...", client.base_url()));
    let result = util::runtime()?.block_on(client.fetch_properties());
    spinner.finish_and_clear();
    let info = result.context("failed to fetch loop properties")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    output::header("Loop / pump");
    println!("  IOB:        {}", or_unknown(&info.iob));
    println!("  COB:        {}", or_unknown(&info.cob));
    println!("  Pump clock: {}", or_unknown(&info.pump_clock));
    println!("  Battery:    {}", or_unknown(&info.pump_battery));
    println!("  Reservoir:  {}", or_unknown(&info.pump_reservoir));

    if !info.is_complete() {
        output::warning(&format!(
            "Not reported by this site: {}",
            info.missing_fields().join(", ")
        ));
    }
    Ok(())
}
