//! toolbox-host - resource host and live-reload bridge for the graphics toolbox.

#![allow(dead_code)]

mod cli;
mod config;
mod host;
mod logger;
mod module;
mod source;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::HostConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = HostConfig::load(&cli)?;

    match &cli.command {
        Commands::List => cli::list::list_resources(&config),
        Commands::Watch { .. } => cli::watch::run_watch(&config),
    }
}
