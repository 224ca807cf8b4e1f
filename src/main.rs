//! hotview - a webview shell core with UI-thread scheduling and hot reload.

#![allow(dead_code)]

mod cli;
mod config;
mod host;
mod logger;
mod reload;
mod scheduler;
mod shell;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ShellConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = ShellConfig::load(&cli)?;

    match &cli.command {
        Commands::Run(args) => cli::run::run_shell(config, args),
        Commands::Check => cli::check::check_config(&config),
    }
}
