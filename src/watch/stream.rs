use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::types::{ChangeSignal, StreamEnd};

/// Single-reader, pull-based view of a watcher's coalesced output.
///
/// Ends (returns `None`) when the session is cancelled or the watcher is
/// disposed; once ended it stays ended. Not restartable: a second reader
/// needs a second watcher.
#[derive(Debug)]
pub struct ChangeStream {
    rx: mpsc::UnboundedReceiver<ChangeSignal>,
    cancel: CancellationToken,
    disposed: CancellationToken,
    ended: Option<StreamEnd>,
}

impl ChangeStream {
    pub(super) fn new(
        rx: mpsc::UnboundedReceiver<ChangeSignal>,
        cancel: CancellationToken,
        disposed: CancellationToken,
    ) -> Self {
        Self {
            rx,
            cancel,
            disposed,
            ended: None,
        }
    }

    /// Wait for the next signal without blocking the thread.
    pub async fn next(&mut self) -> Option<ChangeSignal> {
        if self.ended.is_some() {
            return None;
        }
        // Disposal wins over anything still buffered.
        if self.disposed.is_cancelled() {
            return self.finish(StreamEnd::Disposed);
        }
        if self.cancel.is_cancelled() {
            return self.finish(StreamEnd::Cancelled);
        }

        let outcome = tokio::select! {
            biased;
            _ = self.disposed.cancelled() => Err(StreamEnd::Disposed),
            _ = self.cancel.cancelled() => Err(StreamEnd::Cancelled),
            signal = self.rx.recv() => signal.ok_or(StreamEnd::Disposed),
        };

        match outcome {
            Ok(signal) => Some(signal),
            Err(end) => self.finish(end),
        }
    }

    /// Why the stream ended, if it has.
    pub fn end_reason(&self) -> Option<StreamEnd> {
        self.ended
    }

    /// Adapt into a `futures::Stream`.
    pub fn into_stream(self) -> impl Stream<Item = ChangeSignal> {
        futures::stream::unfold(self, |mut stream| async move {
            let signal = stream.next().await?;
            Some((signal, stream))
        })
    }

    fn finish(&mut self, end: StreamEnd) -> Option<ChangeSignal> {
        crate::debug!("watch"; "change stream ended: {:?}", end);
        self.ended = Some(end);
        self.rx.close();
        None
    }
}
