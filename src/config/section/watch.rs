//! `[watch]` section configuration.
//!
//! Hot-reload watcher settings.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! enabled = true          # Reload the view on file changes
//! root = "static"         # Directory to watch (relative to config file)
//! pattern = "*"           # File name glob
//! mode = "window"         # "window" (batch per tick) | "suppress" (per-path debounce)
//! window_ms = 150         # Coalescing window in milliseconds
//! ignore_temp = true      # Ignore editor temp/backup files
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::watch::CoalesceMode;

/// Hot-reload watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Enable hot reload.
    pub enabled: bool,

    /// Directory to watch, recursively.
    pub root: PathBuf,

    /// File name glob (`*` and `?`).
    pub pattern: String,

    /// Coalescing strategy.
    pub mode: CoalesceMode,

    /// Coalescing window in milliseconds. Must be > 0.
    pub window_ms: u64,

    /// Ignore editor artifacts (`*.swp`, `*~`, dotfiles, ...).
    pub ignore_temp: bool,
}

impl WatchConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root: PathBuf::from("static"),
            pattern: "*".to_string(),
            mode: CoalesceMode::Window,
            window_ms: 150,
            ignore_temp: true,
        }
    }
}
