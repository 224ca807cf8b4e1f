//! Reload Trigger
//!
//! Consumes the change stream and asks the UI thread to reload the view.
//!
//! ```text
//! ChangeStream ──next()──► ReloadTrigger ──post(view.reload)──► UiScheduler
//!  (tokio task)                                                  (ui thread)
//! ```

use std::sync::Arc;

use crate::host::View;
use crate::scheduler::{SchedulerError, UiScheduler};
use crate::watch::ChangeStream;
use crate::{debug, log};

/// Posts one view reload per coalesced signal.
pub struct ReloadTrigger<V> {
    scheduler: Arc<UiScheduler<V>>,
}

impl<V: View + 'static> ReloadTrigger<V> {
    pub fn new(scheduler: Arc<UiScheduler<V>>) -> Self {
        Self { scheduler }
    }

    /// Pull signals until the stream ends or the scheduler closes.
    ///
    /// Returns the number of reloads posted.
    pub async fn run(&self, mut stream: ChangeStream) -> usize {
        let mut posted = 0;
        while let Some(signal) = stream.next().await {
            log!("reload"; "{}", signal.summary());
            match self.scheduler.post(|view: &mut V| view.reload()) {
                Ok(()) => posted += 1,
                Err(SchedulerError::Closed) => {
                    debug!("reload"; "scheduler closed, stopping");
                    break;
                }
                Err(e) => {
                    log!("error"; "failed to post reload: {}", e);
                    break;
                }
            }
        }

        if let Some(end) = stream.end_reason() {
            debug!("reload"; "change stream ended: {:?}", end);
        }
        posted
    }
}
