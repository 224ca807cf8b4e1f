//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::watch::CoalesceMode;

/// Webview shell with coalesced hot reload
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: hotview.toml)
    #[arg(short = 'C', long, default_value = "hotview.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the shell with hot reload
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Validate configuration and the watch root, then exit
    #[command(visible_alias = "c")]
    Check,
}

/// `run` arguments. Every flag overrides the matching `[watch]` key.
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory to watch (relative to the config file)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// File name pattern, e.g. `*.html`
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Coalescing strategy
    #[arg(short, long, value_enum)]
    pub mode: Option<CoalesceMode>,

    /// Coalescing window in milliseconds
    #[arg(long = "window-ms")]
    pub window_ms: Option<u64>,

    /// Enable hot reload
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub watch: Option<bool>,

    /// Close the shell after this many seconds
    #[arg(long = "exit-after", value_name = "SECS")]
    pub exit_after: Option<u64>,
}
