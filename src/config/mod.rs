//! Shell configuration management for `hotview.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── shell      # [shell]
//! │   └── watch      # [watch]
//! ├── error          # ConfigError
//! ├── util           # config file lookup, env toggles
//! └── mod.rs         # ShellConfig (this file)
//! ```
//!
//! Precedence, lowest first: defaults, `hotview.toml`, `HOTVIEW_HOT_RELOAD`,
//! CLI flags.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{ShellSection, WatchConfig};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, Commands, RunArgs};
use util::{find_config_file, parse_toggle};

/// Environment toggle for hot reload.
pub const HOT_RELOAD_ENV: &str = "HOTVIEW_HOT_RELOAD";

/// Root configuration structure representing hotview.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Window settings
    #[serde(default)]
    pub shell: ShellSection,

    /// Hot reload settings
    #[serde(default)]
    pub watch: WatchConfig,
}

impl ShellConfig {
    /// Load configuration for the parsed CLI.
    ///
    /// A missing config file is not an error: the shell runs on defaults
    /// relative to the current directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let toggle = std::env::var(HOT_RELOAD_ENV).ok();
        Self::load_with_toggle(cli, toggle.as_deref())
    }

    /// [`load`](Self::load) with the `HOTVIEW_HOT_RELOAD` value passed in.
    fn load_with_toggle(cli: &Cli, toggle: Option<&str>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                crate::debug!("shell"; "config: {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map_or_else(|| cwd.clone(), Path::to_path_buf);
                config.config_path = Some(path);
                config
            }
            None => {
                crate::debug!("shell"; "no {} found, using defaults", cli.config.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        if let Some(enabled) = toggle.and_then(parse_toggle) {
            config.watch.enabled = enabled;
        }
        if let Commands::Run(args) = &cli.command {
            config.apply_run_args(args);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::parse(&content)
    }

    /// Parse config text (no path resolution).
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `run` flags on top of file values.
    pub fn apply_run_args(&mut self, args: &RunArgs) {
        if let Some(root) = &args.root {
            self.watch.root = root.clone();
        }
        if let Some(pattern) = &args.pattern {
            self.watch.pattern = pattern.clone();
        }
        if let Some(mode) = args.mode {
            self.watch.mode = mode;
        }
        if let Some(window_ms) = args.window_ms {
            self.watch.window_ms = window_ms;
        }
        if let Some(watch) = args.watch {
            self.watch.enabled = watch;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch.window_ms == 0 {
            return Err(ConfigError::Validation(
                "`watch.window_ms` must be greater than 0".to_string(),
            ));
        }
        if self.watch.pattern.trim().is_empty() {
            return Err(ConfigError::Validation(
                "`watch.pattern` must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute watch root.
    pub fn watch_root(&self) -> PathBuf {
        self.root.join(&self.watch.root)
    }
}

/// Parse config text for section tests.
#[cfg(test)]
pub(crate) fn test_parse_config(content: &str) -> ShellConfig {
    ShellConfig::parse(content).expect("valid test config")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::watch::CoalesceMode;

    fn run_args() -> RunArgs {
        RunArgs {
            root: None,
            pattern: None,
            mode: None,
            window_ms: None,
            watch: None,
            exit_after: None,
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ShellConfig::parse("[watch]\nwindow = 10").is_err());
        assert!(ShellConfig::parse("[server]\nport = 1").is_err());
    }

    #[test]
    fn test_invalid_mode_rejected() {
        assert!(ShellConfig::parse("[watch]\nmode = \"sometimes\"").is_err());
    }

    #[test]
    fn test_validate_window() {
        let config = test_parse_config("[watch]\nwindow_ms = 0");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        assert!(test_parse_config("").validate().is_ok());
    }

    #[test]
    fn test_validate_pattern() {
        let config = test_parse_config("[watch]\npattern = \" \"");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_run_args_override_file() {
        let mut config = test_parse_config("[watch]\nroot = \"web\"\nwindow_ms = 300");
        let args = RunArgs {
            mode: Some(CoalesceMode::Suppress),
            window_ms: Some(50),
            watch: Some(false),
            ..run_args()
        };
        config.apply_run_args(&args);

        assert_eq!(config.watch.root, PathBuf::from("web"));
        assert_eq!(config.watch.mode, CoalesceMode::Suppress);
        assert_eq!(config.watch.window_ms, 50);
        assert!(!config.watch.enabled);
    }

    #[test]
    fn test_watch_root_resolves_against_config_dir() {
        let mut config = test_parse_config("[watch]\nroot = \"static\"");
        config.root = PathBuf::from("/home/user/app");
        assert_eq!(config.watch_root(), PathBuf::from("/home/user/app/static"));

        config.watch.root = PathBuf::from("/srv/site");
        assert_eq!(config.watch_root(), PathBuf::from("/srv/site"));
    }

    fn cli_for(config: &std::path::Path, args: &[&str]) -> Cli {
        use clap::Parser;

        let config = config.to_string_lossy().into_owned();
        let mut argv = vec!["hotview".to_string(), "-C".to_string(), config];
        argv.extend(args.iter().map(|a| a.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_hot_reload_precedence() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("hotview.toml");
        std::fs::write(&path, "[watch]
enabled = true").unwrap();

        // file only
        let config = ShellConfig::load_with_toggle(&cli_for(&path, &["run"]), None).unwrap();
        assert!(config.watch.enabled);
        assert_eq!(config.root, temp.path());
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));

        // env overrides the file
        let config = ShellConfig::load_with_toggle(&cli_for(&path, &["run"]), Some("0")).unwrap();
        assert!(!config.watch.enabled);

        // unrecognized env values are ignored
        let config = ShellConfig::load_with_toggle(&cli_for(&path, &["run"]), Some("maybe")).unwrap();
        assert!(config.watch.enabled);

        // cli overrides the env
        let cli = cli_for(&path, &["run", "--watch"]);
        let config = ShellConfig::load_with_toggle(&cli, Some("off")).unwrap();
        assert!(config.watch.enabled);

        // `check` has no run flags, so the env decides
        let config = ShellConfig::load_with_toggle(&cli_for(&path, &["check"]), Some("0")).unwrap();
        assert!(!config.watch.enabled);
    }

    #[test]
    fn test_load_rejects_invalid_override() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("hotview.toml");
        std::fs::write(&path, "").unwrap();

        let cli = cli_for(&path, &["run", "--window-ms", "0"]);
        assert!(ShellConfig::load_with_toggle(&cli, None).is_err());
    }

    #[test]
    fn test_from_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("hotview.toml");
        std::fs::write(&path, "[shell]\ntitle = \"Demo\"\n[watch]\npattern = \"*.html\"").unwrap();

        let config = ShellConfig::from_path(&path).unwrap();
        assert_eq!(config.shell.title, "Demo");
        assert_eq!(config.watch.pattern, "*.html");

        let missing = ShellConfig::from_path(&temp.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(..))));
    }
}
