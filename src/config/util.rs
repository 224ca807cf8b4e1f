//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/app/static/css/  ← cwd
/// /home/user/app/hotview.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

/// Parse an on/off environment toggle (`1`, `true`, `on`, `yes` and negations).
pub fn parse_toggle(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_absolute_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("hotview.toml");
        assert!(find_config_file(&path).is_none());

        std::fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path), Some(path));
    }

    #[test]
    fn test_parse_toggle() {
        assert_eq!(parse_toggle("1"), Some(true));
        assert_eq!(parse_toggle(" TRUE "), Some(true));
        assert_eq!(parse_toggle("off"), Some(false));
        assert_eq!(parse_toggle("0"), Some(false));
        assert_eq!(parse_toggle("debug"), None);
    }
}
