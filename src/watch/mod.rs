//! Change Watcher
//!
//! Turns raw filesystem notifications into a coalesced, cancellable stream.
//!
//! ```text
//! ChangeSource → ChangeSink → pump (Coalescer) → ChangeStream
//!  (any thread)   (unbounded)   (one task)       (one reader)
//! ```
//!
//! The source starts at construction, so events arriving before the first
//! `watch()` are buffered rather than lost.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

// Coalescing strategies (window / suppress).
pub mod coalesce;
// Name pattern and temp-file filtering.
mod filter;
// Coalescing task.
mod pump;
// Change source capability and the notify backend.
pub mod source;
// Pull-based output.
mod stream;
// Shared event types.
pub mod types;


pub use coalesce::CoalesceMode;
pub use filter::EventFilter;
pub use source::{ChangeSink, ChangeSource, NotifySource};
pub use stream::ChangeStream;
pub use types::{ChangeSignal, CoalescedBatch, RawChangeEvent, StreamEnd};

use crate::config::WatchConfig;
use coalesce::Coalescer;

/// Watcher errors
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to start file watcher")]
    Notify(#[from] notify::Error),

    #[error("watch root `{0}` is not a directory")]
    RootMissing(PathBuf),

    #[error("invalid name pattern `{0}`")]
    InvalidPattern(String, #[source] regex::Error),

    /// The stream is single-reader; create a new watcher for another one.
    #[error("change stream already taken")]
    AlreadyWatching,
}

/// Coalescing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub mode: CoalesceMode,
    pub window: Duration,
}

impl WatchOptions {
    pub fn new(mode: CoalesceMode, window: Duration) -> Self {
        Self { mode, window }
    }
}

/// Owns a change source and the coalescing pump behind one stream.
///
/// Dispose (or drop) to stop the source and end the stream.
pub struct ChangeWatcher {
    source: Box<dyn ChangeSource>,
    output: Option<mpsc::UnboundedReceiver<ChangeSignal>>,
    disposed: CancellationToken,
    pump: JoinHandle<()>,
    options: WatchOptions,
}

impl ChangeWatcher {
    /// Start `source` and the coalescing pump.
    ///
    /// Must be called inside a tokio runtime. Source errors surface here,
    /// once, and only affect this watcher.
    pub fn new(source: impl ChangeSource + 'static, options: WatchOptions) -> Result<Self, WatchError> {
        let mut source: Box<dyn ChangeSource> = Box::new(source);
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        source.notify_on_change(ChangeSink::new(raw_tx))?;

        let disposed = CancellationToken::new();
        let ticker = pump::window_clock(options.window);
        let coalescer = Coalescer::new(options.mode, options.window);
        let pump = tokio::spawn(pump::run(raw_rx, out_tx, coalescer, ticker, disposed.clone()));

        crate::debug!("watch"; "coalescing: {} every {:?}", options.mode.label(), options.window);

        Ok(Self {
            source,
            output: Some(out_rx),
            disposed,
            pump,
            options,
        })
    }

    /// Watcher over the configured root using `notify`.
    pub fn from_config(config: &WatchConfig, root: PathBuf) -> Result<Self, WatchError> {
        let filter = EventFilter::new(&config.pattern, config.ignore_temp)?;
        let options = WatchOptions::new(config.mode, config.window());
        Self::new(NotifySource::new(root, filter), options)
    }

    /// Take the output stream, tied to `cancel` for this session.
    pub fn watch(&mut self, cancel: CancellationToken) -> Result<ChangeStream, WatchError> {
        let rx = self.output.take().ok_or(WatchError::AlreadyWatching)?;
        Ok(ChangeStream::new(rx, cancel, self.disposed.clone()))
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.is_cancelled()
    }

    /// Stop native events, stop the pump, end the stream.
    pub fn dispose(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.disposed.is_cancelled() {
            return;
        }
        self.source.stop();
        // The pump exits on its own once it observes the token.
        self.disposed.cancel();
        crate::debug!("watch"; "watcher disposed");
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ChangeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeWatcher")
            .field("options", &self.options)
            .field("disposed", &self.is_disposed())
            .field("stream_taken", &self.output.is_none())
            .field("pump_finished", &self.pump.is_finished())
            .finish()
    }
}
