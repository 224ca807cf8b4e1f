use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::coalesce::Coalescer;
use super::source::Stamped;
use super::types::ChangeSignal;

/// Window clock. Created on the caller's side so the first window starts
/// when the watcher does, not when the task is first polled.
pub(super) fn window_clock(window: Duration) -> Interval {
    let mut ticker = tokio::time::interval_at(Instant::now() + window, window);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Coalescing loop: raw events in, signals out.
///
/// Sole owner of the coalescer state. Exits on disposal, when the source
/// side closes, or when the stream reader is gone.
pub(super) async fn run(
    mut raw_rx: mpsc::UnboundedReceiver<Stamped>,
    out_tx: mpsc::UnboundedSender<ChangeSignal>,
    mut coalescer: Coalescer,
    mut ticker: Interval,
    disposed: CancellationToken,
) {
    loop {
        let signal = tokio::select! {
            biased;
            _ = disposed.cancelled() => break,
            raw = raw_rx.recv() => match raw {
                Some((at, event)) => coalescer.accept(at, event),
                None => {
                    // Source gone: deliver what the last window collected.
                    if let Some(signal) = coalescer.tick(Instant::now()) {
                        let _ = out_tx.send(signal);
                    }
                    break;
                }
            },
            now = ticker.tick() => coalescer.tick(now),
        };

        if let Some(signal) = signal
            && out_tx.send(signal).is_err()
        {
            break;
        }
    }

    crate::debug!("watch"; "coalescer stopped");
}
