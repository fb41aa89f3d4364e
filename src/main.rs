mod cli;
mod client;
mod config;
mod error;
mod feed;
mod poller;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::util::init_tracing(&cli.log_level);

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    let config_path = config::resolve_path(cli.config.as_deref())?;

    match cli.command {
        Command::Status(args) => cli::status::run(args, &config_path),
        Command::Watch(args) => cli::watch::run(args, &config_path),
        Command::History(args) => cli::history::run(args, &config_path),
        Command::Info(args) => cli::info::run(args, &config_path),
        Command::Config(args) => cli::config::run(args, &config_path),
    }
}
