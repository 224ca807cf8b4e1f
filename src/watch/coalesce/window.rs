use crate::watch::types::{CoalescedBatch, RawChangeEvent};

/// Tumbling-window batcher.
///
/// Pure state: the window clock lives in the pump, which calls `flush` on
/// every tick. Nothing is ever dropped, only grouped.
#[derive(Debug, Default)]
pub struct WindowBatcher {
    pending: Vec<RawChangeEvent>,
}

impl WindowBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: RawChangeEvent) {
        self.pending.push(event);
    }

    /// Close the current window. Empty windows yield nothing.
    pub fn flush(&mut self) -> Option<CoalescedBatch> {
        CoalescedBatch::new(std::mem::take(&mut self.pending))
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_flush_keeps_arrival_order() {
        let mut batcher = WindowBatcher::new();
        batcher.push(RawChangeEvent::Changed(PathBuf::from("/b")));
        batcher.push(RawChangeEvent::Changed(PathBuf::from("/a")));
        batcher.push(RawChangeEvent::Changed(PathBuf::from("/b")));

        let batch = batcher.flush().unwrap();
        let paths: Vec<_> = batch.events().iter().map(|e| e.key_path().to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/b"), PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert_eq!(batcher.pending(), 0);
    }

    #[test]
    fn test_empty_window_emits_nothing() {
        let mut batcher = WindowBatcher::new();
        assert!(batcher.flush().is_none());

        batcher.push(RawChangeEvent::Created(PathBuf::from("/a")));
        assert!(batcher.flush().is_some());
        assert!(batcher.flush().is_none());
    }
}
