//! Change sources: where raw events come from.
//!
//! The core only depends on [`ChangeSource`]. [`NotifySource`] is the
//! OS-backed implementation; tests inject events through a [`ChangeSink`]
//! directly.

use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::WatchError;
use super::filter::EventFilter;
use super::types::RawChangeEvent;

/// Raw event tagged with its arrival time.
pub(super) type Stamped = (Instant, RawChangeEvent);

/// Producer handle into the coalescer. Cheap to clone, callable from any
/// thread, never blocks.
#[derive(Debug, Clone)]
pub struct ChangeSink {
    tx: mpsc::UnboundedSender<Stamped>,
}

impl ChangeSink {
    pub(super) fn new(tx: mpsc::UnboundedSender<Stamped>) -> Self {
        Self { tx }
    }

    /// Report one event. Returns false once the watcher is disposed.
    pub fn report(&self, event: RawChangeEvent) -> bool {
        self.tx.send((Instant::now(), event)).is_ok()
    }
}

/// Callback-style event subscription.
pub trait ChangeSource: Send {
    /// Start delivering events to `sink`.
    ///
    /// Called once. An error here is fatal to the watch session only.
    fn notify_on_change(&mut self, sink: ChangeSink) -> Result<(), WatchError>;

    /// Stop delivering events. Must be idempotent.
    fn stop(&mut self);
}

/// Recursive `notify` watcher over one root directory.
pub struct NotifySource {
    root: PathBuf,
    filter: EventFilter,
    watcher: Option<RecommendedWatcher>,
}

impl NotifySource {
    pub fn new(root: PathBuf, filter: EventFilter) -> Self {
        Self {
            root,
            filter,
            watcher: None,
        }
    }
}

impl ChangeSource for NotifySource {
    fn notify_on_change(&mut self, sink: ChangeSink) -> Result<(), WatchError> {
        if !self.root.is_dir() {
            return Err(WatchError::RootMissing(self.root.clone()));
        }

        let filter = self.filter.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);
                    for change in convert_event(&event) {
                        if filter.accepts(&change) {
                            sink.report(change);
                        }
                    }
                }
                Err(e) => crate::log!("watch"; "notify error: {}", e),
            }
        })?;
        watcher.watch(&self.root, RecursiveMode::Recursive)?;

        self.watcher = Some(watcher);
        Ok(())
    }

    fn stop(&mut self) {
        // Dropping the watcher unregisters the OS watch and its callback.
        if self.watcher.take().is_some() {
            crate::debug!("watch"; "stopped watching {}", self.root.display());
        }
    }
}

/// Map a notify event onto zero or more raw change events.
///
/// Metadata-only modifications (mtime/atime/chmod) and access events are
/// dropped.
pub(super) fn convert_event(event: &notify::Event) -> Vec<RawChangeEvent> {
    use notify::EventKind;
    use notify::event::{ModifyKind, RenameMode};

    let each = |make: fn(PathBuf) -> RawChangeEvent| -> Vec<RawChangeEvent> {
        event.paths.iter().cloned().map(make).collect()
    };

    match event.kind {
        EventKind::Create(_) => each(RawChangeEvent::Created),
        EventKind::Remove(_) => each(RawChangeEvent::Deleted),
        EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => {
            vec![RawChangeEvent::Renamed {
                from: event.paths[0].clone(),
                to: event.paths[1].clone(),
            }]
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => each(RawChangeEvent::Deleted),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => each(RawChangeEvent::Created),
        EventKind::Modify(_) => each(RawChangeEvent::Changed),
        _ => Vec::new(),
    }
}
