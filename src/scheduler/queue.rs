//! Work queue shared between producer threads and the UI thread.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::queue::SegQueue;

/// Result of a single work item.
pub type WorkResult = anyhow::Result<()>;

/// A pending callback for the UI thread.
///
/// Owned by the queue until drained, then invoked exactly once.
pub struct WorkItem<T> {
    callback: Box<dyn FnOnce(&mut T) -> WorkResult + Send>,
}

impl<T> WorkItem<T> {
    pub fn new(callback: impl FnOnce(&mut T) -> WorkResult + Send + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Callback plus an explicit state value handed to it on invocation.
    pub fn with_state<S: Send + 'static>(
        callback: impl FnOnce(&mut T, S) -> WorkResult + Send + 'static,
        state: S,
    ) -> Self {
        Self::new(move |target| callback(target, state))
    }

    pub fn invoke(self, target: &mut T) -> WorkResult {
        (self.callback)(target)
    }
}

impl<T> std::fmt::Debug for WorkItem<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WorkItem")
    }
}

/// Unbounded FIFO with lock-free append.
///
/// Many producers, one consumer. Once completed, `push` rejects new items,
/// but items already queued stay available to `try_pop`.
pub struct WorkQueue<T> {
    items: SegQueue<WorkItem<T>>,
    completed: AtomicBool,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            items: SegQueue::new(),
            completed: AtomicBool::new(false),
        }
    }

    /// Append an item. Returns false if the queue is completed.
    pub fn push(&self, item: WorkItem<T>) -> bool {
        if self.is_completed() {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn try_pop(&self) -> Option<WorkItem<T>> {
        self.items.pop()
    }

    /// Number of items available at this instant.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stop accepting items. Returns true on the first call only.
    pub fn complete(&self) -> bool {
        !self.completed.swap(true, Ordering::SeqCst)
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let queue: WorkQueue<Vec<u32>> = WorkQueue::new();
        for i in 0..3 {
            assert!(queue.push(WorkItem::new(move |out: &mut Vec<u32>| {
                out.push(i);
                Ok(())
            })));
        }
        assert_eq!(queue.len(), 3);

        let mut out = Vec::new();
        while let Some(item) = queue.try_pop() {
            item.invoke(&mut out).unwrap();
        }
        assert_eq!(out, vec![0, 1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_with_state() {
        let item = WorkItem::with_state(
            |out: &mut String, name: &'static str| {
                out.push_str(name);
                Ok(())
            },
            "index.html",
        );
        let mut out = String::new();
        item.invoke(&mut out).unwrap();
        assert_eq!(out, "index.html");
    }

    #[test]
    fn test_push_after_complete_rejected() {
        let queue: WorkQueue<()> = WorkQueue::new();
        assert!(queue.push(WorkItem::new(|_| Ok(()))));
        assert!(queue.complete());
        assert!(!queue.complete());
        assert!(!queue.push(WorkItem::new(|_| Ok(()))));
        // already queued work survives completion
        assert_eq!(queue.len(), 1);
    }
}
