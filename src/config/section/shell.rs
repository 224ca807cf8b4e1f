//! `[shell]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [shell]
//! title = "hotview"    # Window title
//! ```

use serde::{Deserialize, Serialize};

/// Presentation settings for the host window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellSection {
    /// Window title.
    pub title: String,
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            title: "hotview".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_shell_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.shell.title, "hotview");
    }

    #[test]
    fn test_shell_title() {
        let config = test_parse_config("[shell]\ntitle = \"Notes\"");
        assert_eq!(config.shell.title, "Notes");
    }
}
