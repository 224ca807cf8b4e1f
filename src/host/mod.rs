//! Host message loop.
//!
//! Stands in for the native window event loop: it blocks the UI thread on a
//! channel and answers every wake with one drain.
//!
//! ```text
//! UiScheduler::post ─► ChannelWake ─► HostMsg::WorkAvailable ─► drain
//! HostCloser::close ──────────────► HostMsg::Close ─► complete + final drain
//! ```

mod view;

pub use view::{HeadlessView, View};

use crossbeam::channel::{self, Receiver, Sender};

use crate::scheduler::{SchedulerError, UiScheduler, WakeSignal};

/// Messages understood by the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMsg {
    WorkAvailable,
    Close,
}

/// Wake signal that posts [`HostMsg::WorkAvailable`] to the host loop.
#[derive(Debug, Clone)]
pub struct ChannelWake {
    tx: Sender<HostMsg>,
}

impl WakeSignal for ChannelWake {
    fn request_wake(&self) {
        // Loop already gone: nothing left to wake.
        let _ = self.tx.send(HostMsg::WorkAvailable);
    }
}

/// Asks the host loop to close. Cheap to clone, usable from any thread.
#[derive(Debug, Clone)]
pub struct HostCloser {
    tx: Sender<HostMsg>,
}

impl HostCloser {
    pub fn close(&self) {
        let _ = self.tx.send(HostMsg::Close);
    }
}

/// Counters reported when the loop exits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HostStats {
    pub wakes: usize,
    pub items_run: usize,
    pub failures: usize,
}

/// Blocking message loop for the UI thread.
pub struct HostLoop {
    tx: Sender<HostMsg>,
    rx: Receiver<HostMsg>,
}

impl HostLoop {
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self { tx, rx }
    }

    /// Wake signal to hand to [`UiScheduler::new`].
    pub fn wake_signal(&self) -> ChannelWake {
        ChannelWake { tx: self.tx.clone() }
    }

    pub fn closer(&self) -> HostCloser {
        HostCloser { tx: self.tx.clone() }
    }

    /// Run until [`HostMsg::Close`].
    ///
    /// A failing work item is reported and the loop keeps going. On close the
    /// scheduler is completed and everything still queued is drained.
    pub fn run<T>(&self, scheduler: &UiScheduler<T>, target: &mut T) -> Result<HostStats, SchedulerError> {
        if !scheduler.is_ui_thread() {
            return Err(SchedulerError::WrongThread);
        }

        let mut stats = HostStats::default();
        // `self.tx` keeps the channel open, so recv only ends on Close.
        while let Ok(msg) = self.rx.recv() {
            match msg {
                HostMsg::WorkAvailable => {
                    stats.wakes += 1;
                    drain_once(scheduler, target, &mut stats);
                }
                HostMsg::Close => {
                    scheduler.complete();
                    while scheduler.pending() > 0 {
                        drain_once(scheduler, target, &mut stats);
                    }
                    break;
                }
            }
        }

        crate::debug!("ui"; "host loop exited: {:?}", stats);
        Ok(stats)
    }
}

impl Default for HostLoop {
    fn default() -> Self {
        Self::new()
    }
}

fn drain_once<T>(scheduler: &UiScheduler<T>, target: &mut T, stats: &mut HostStats) {
    match scheduler.drain_available_work(target) {
        Ok(ran) => stats.items_run += ran,
        Err(e) => {
            stats.failures += 1;
            let detail = match &e {
                SchedulerError::WorkItemFailed(source) => format!("{source:#}"),
                other => other.to_string(),
            };
            crate::logger::status_error("ui work item failed", &detail);
        }
    }
}
