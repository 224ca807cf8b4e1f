//! UI Thread Scheduler
//!
//! Hands work from any thread to the single thread that owns the view.
//!
//! ```text
//! any thread --post--> WorkQueue --request_wake--> host loop
//!                                                     |
//!                      UI thread <--drain_available_work
//! ```
//!
//! Work items receive `&mut T`, the UI-thread state passed in by the drain
//! caller. `T` itself never crosses threads; only the boxed callbacks do.

mod queue;
mod wake;


use std::thread::{self, ThreadId};

use thiserror::Error;
use tokio::sync::oneshot;

pub use queue::{WorkItem, WorkQueue, WorkResult};
pub use wake::WakeSignal;

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Post after `complete()`. Always a programming error in the caller.
    #[error("scheduler is closed, no further work is accepted")]
    Closed,

    #[error("work can only be drained on the ui thread")]
    WrongThread,

    #[error("work item failed")]
    WorkItemFailed(#[source] anyhow::Error),
}

/// Cooperative single-consumer dispatcher for the UI thread.
pub struct UiScheduler<T> {
    queue: WorkQueue<T>,
    wake: Box<dyn WakeSignal>,
    ui_thread: ThreadId,
}

impl<T> UiScheduler<T> {
    /// Create a scheduler owned by the calling thread.
    ///
    /// Must be called on the UI thread: only that thread may drain.
    pub fn new(wake: impl WakeSignal + 'static) -> Self {
        Self {
            queue: WorkQueue::new(),
            wake: Box::new(wake),
            ui_thread: thread::current().id(),
        }
    }

    /// Queue a callback for the UI thread and wake the host loop.
    ///
    /// Never blocks and never runs the callback inline, even when called on
    /// the UI thread itself.
    pub fn post(
        &self,
        callback: impl FnOnce(&mut T) -> WorkResult + Send + 'static,
    ) -> Result<(), SchedulerError> {
        self.enqueue(WorkItem::new(callback))
    }

    /// Like [`post`](Self::post), with an explicit state value.
    pub fn post_with<S: Send + 'static>(
        &self,
        callback: impl FnOnce(&mut T, S) -> WorkResult + Send + 'static,
        state: S,
    ) -> Result<(), SchedulerError> {
        self.enqueue(WorkItem::with_state(callback, state))
    }

    /// Run `f` on the UI thread and deliver its return value.
    ///
    /// The receiver errors if the item is never run (the scheduler was
    /// dropped with the item still queued).
    pub fn invoke<R: Send + 'static>(
        &self,
        f: impl FnOnce(&mut T) -> R + Send + 'static,
    ) -> Result<oneshot::Receiver<R>, SchedulerError> {
        let (tx, rx) = oneshot::channel();
        self.post(move |target| {
            // Awaiting side may have given up; nothing to report then.
            let _ = tx.send(f(target));
            Ok(())
        })?;
        Ok(rx)
    }

    /// Run every item queued at the moment of the call, in FIFO order.
    ///
    /// Items posted while draining are left for the next wake. On the first
    /// failing item the drain stops: that item is discarded, later items
    /// stay queued. Returns the number of items run successfully.
    pub fn drain_available_work(&self, target: &mut T) -> Result<usize, SchedulerError> {
        if !self.is_ui_thread() {
            return Err(SchedulerError::WrongThread);
        }

        let available = self.queue.len();
        let mut ran = 0;
        for _ in 0..available {
            let Some(item) = self.queue.try_pop() else {
                break;
            };
            item.invoke(target).map_err(SchedulerError::WorkItemFailed)?;
            ran += 1;
        }

        if ran > 0 {
            crate::debug!("ui"; "drained {} work item(s)", ran);
        }
        Ok(ran)
    }

    /// Stop accepting work. Safe to call more than once.
    pub fn complete(&self) {
        if self.queue.complete() {
            crate::debug!("ui"; "scheduler completed, {} item(s) pending", self.queue.len());
        }
    }

    pub fn is_completed(&self) -> bool {
        self.queue.is_completed()
    }

    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    /// Items queued right now.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn enqueue(&self, item: WorkItem<T>) -> Result<(), SchedulerError> {
        if !self.queue.push(item) {
            return Err(SchedulerError::Closed);
        }
        self.wake.request_wake();
        Ok(())
    }
}

impl<T> std::fmt::Debug for UiScheduler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiScheduler")
            .field("pending", &self.queue.len())
            .field("completed", &self.queue.is_completed())
            .field("ui_thread", &self.ui_thread)
            .finish()
    }
}
