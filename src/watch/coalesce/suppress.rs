use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::path::PathBuf;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::time::Instant;

use crate::watch::types::RawChangeEvent;

/// Per-path suppression debounce.
///
/// The first event for a path passes and suppresses that path for `window`.
/// Expiry is a clock comparison; stale entries are purged from a deadline
/// heap instead of running one timer per path.
#[derive(Debug)]
pub struct Suppressor {
    window: Duration,
    /// Path → suppressed until
    until: FxHashMap<PathBuf, Instant>,
    deadlines: BinaryHeap<Reverse<(Instant, PathBuf)>>,
}

impl Suppressor {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            until: FxHashMap::default(),
            deadlines: BinaryHeap::new(),
        }
    }

    /// Forward `event` unless its path is suppressed at `at`.
    pub fn admit(&mut self, at: Instant, event: RawChangeEvent) -> Option<RawChangeEvent> {
        self.purge(at);

        let path = event.key_path();
        if self.until.get(path).is_some_and(|&until| at < until) {
            crate::debug!("watch"; "suppressed {}: {}", event.label(), path.display());
            return None;
        }

        let path = path.to_path_buf();
        let until = at + self.window;
        self.until.insert(path.clone(), until);
        self.deadlines.push(Reverse((until, path)));
        Some(event)
    }

    /// Drop entries whose window ended at or before `now`.
    pub fn purge(&mut self, now: Instant) {
        while let Some(Reverse((deadline, _))) = self.deadlines.peek() {
            if *deadline > now {
                break;
            }
            let Some(Reverse((deadline, path))) = self.deadlines.pop() else {
                break;
            };
            // A later re-suppression owns the entry now.
            if self.until.get(&path) == Some(&deadline) {
                self.until.remove(&path);
            }
        }
    }

    /// Paths currently tracked.
    pub fn tracked(&self) -> usize {
        self.until.len()
    }
}
