//! Name-pattern and editor-artifact filtering.

use std::path::Path;

use regex::Regex;

use super::WatchError;
use super::types::RawChangeEvent;

/// Decides which raw events reach the coalescer.
#[derive(Debug, Clone)]
pub struct EventFilter {
    pattern: Regex,
    ignore_temp: bool,
}

impl EventFilter {
    /// `pattern` is a file-name glob: `*` matches any run, `?` one char.
    pub fn new(pattern: &str, ignore_temp: bool) -> Result<Self, WatchError> {
        let regex = Regex::new(&glob_to_regex(pattern))
            .map_err(|e| WatchError::InvalidPattern(pattern.to_string(), e))?;
        Ok(Self {
            pattern: regex,
            ignore_temp,
        })
    }

    /// Renames pass if either side passes.
    pub fn accepts(&self, event: &RawChangeEvent) -> bool {
        event.paths().into_iter().any(|path| self.accepts_path(path))
    }

    fn accepts_path(&self, path: &Path) -> bool {
        if self.ignore_temp && is_temp_file(path) {
            return false;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        self.pattern.is_match(name)
    }
}

/// Translate a file-name glob to an anchored regex.
///
/// `*.*` matches every name, extension or not.
fn glob_to_regex(glob: &str) -> String {
    if glob == "*.*" {
        return "^.*$".to_string();
    }

    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out.push('$');
    out
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
