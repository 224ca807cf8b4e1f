//! Coalescing strategies.
//!
//! - `window`: periodic tumbling-window batching (at most one signal per tick)
//! - `suppress`: per-path debounce (first event forwarded, repeats dropped)

mod suppress;
mod window;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

pub use suppress::Suppressor;
pub use window::WindowBatcher;

use super::types::{ChangeSignal, RawChangeEvent};

/// Which coalescing strategy a watcher uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CoalesceMode {
    /// Batch everything seen per window; only "something changed" matters.
    #[default]
    Window,
    /// Forward each path's first event immediately, drop repeats.
    Suppress,
}

impl CoalesceMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::Suppress => "suppress",
        }
    }
}

/// State for the selected strategy, owned by the pump task.
pub(super) enum Coalescer {
    Window(WindowBatcher),
    Suppress(Suppressor),
}

impl Coalescer {
    pub(super) fn new(mode: CoalesceMode, window: Duration) -> Self {
        match mode {
            CoalesceMode::Window => Self::Window(WindowBatcher::new()),
            CoalesceMode::Suppress => Self::Suppress(Suppressor::new(window)),
        }
    }

    /// Feed one event. Suppress mode may forward it right away.
    pub(super) fn accept(&mut self, at: Instant, event: RawChangeEvent) -> Option<ChangeSignal> {
        match self {
            Self::Window(batcher) => {
                batcher.push(event);
                None
            }
            Self::Suppress(suppressor) => suppressor.admit(at, event).map(ChangeSignal::Event),
        }
    }

    /// Window boundary reached.
    pub(super) fn tick(&mut self, now: Instant) -> Option<ChangeSignal> {
        match self {
            Self::Window(batcher) => batcher.flush().map(ChangeSignal::Batch),
            Self::Suppress(suppressor) => {
                suppressor.purge(now);
                None
            }
        }
    }
}
