use std::path::Path;

use anyhow::Result;
use clap::{Args as ClapArgs, Subcommand};

use crate::cli::{output, util};
use crate::config;

#[derive(ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (token masked)
    Show,

    /// Print the config file location
    Path,

    /// Set a single key, keeping the rest of the file intact
    Set {
        /// Key name, e.g. nightscout_url, units, show_loop_data
        key: String,

        /// New value
        value: String,
    },
}

pub fn run(args: Args, config_path: &Path) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let mut cfg = util::load_config(config_path)?;
            cfg.access_token = cfg.masked_token();
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigCommand::Path => println!("{}", config_path.display()),
        ConfigCommand::Set { key, value } => {
            config::set_value(config_path, &key, &value)?;
            output::success(&format!("Set {} in {}", key, config_path.display()));
        }
    }
    Ok(())
}
