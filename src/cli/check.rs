//! `hotview check`: resolve and print the effective configuration.

use anyhow::Result;

use crate::config::ShellConfig;
use crate::log;
use crate::watch::EventFilter;

pub fn check_config(config: &ShellConfig) -> Result<()> {
    match &config.config_path {
        Some(path) => log!("check"; "config: {}", path.display()),
        None => log!("check"; "config: none (defaults)"),
    }

    // Same compile step the watcher runs, so a bad glob fails here.
    EventFilter::new(&config.watch.pattern, config.watch.ignore_temp)?;

    let root = config.watch_root();
    let watch = &config.watch;
    log!("check"; "title: {}", config.shell.title);
    log!("check"; "hot reload: {}", if watch.enabled { "on" } else { "off" });
    log!("check"; "root: {}{}", root.display(), if root.is_dir() { "" } else { " (missing)" });
    log!("check"; "pattern: {}, mode: {}, window: {}ms", watch.pattern, watch.mode.label(), watch.window_ms);

    if watch.enabled && !root.is_dir() {
        anyhow::bail!("watch root `{}` is not a directory", root.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn config_in(dir: &TempDir, enabled: bool) -> ShellConfig {
        let mut config = ShellConfig::default();
        config.root = dir.path().to_path_buf();
        config.watch.enabled = enabled;
        config
    }

    #[test]
    fn test_check_existing_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("static")).unwrap();
        assert!(check_config(&config_in(&dir, true)).is_ok());
    }

    #[test]
    fn test_check_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = check_config(&config_in(&dir, true)).unwrap_err();
        assert!(err.to_string().contains("not a directory"));

        // only matters when hot reload is on
        assert!(check_config(&config_in(&dir, false)).is_ok());
    }
}
