use std::path::{Path, PathBuf};

/// A single path-level change reported by the change source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawChangeEvent {
    Changed(PathBuf),
    Created(PathBuf),
    Deleted(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
}

impl RawChangeEvent {
    /// Path used for deduplication (the new path for renames).
    pub fn key_path(&self) -> &Path {
        match self {
            Self::Changed(path) | Self::Created(path) | Self::Deleted(path) => path,
            Self::Renamed { to, .. } => to,
        }
    }

    /// Every path this event touches.
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            Self::Changed(path) | Self::Created(path) | Self::Deleted(path) => vec![path],
            Self::Renamed { from, to } => vec![from, to],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Changed(_) => "Changed",
            Self::Created(_) => "Created",
            Self::Deleted(_) => "Deleted",
            Self::Renamed { .. } => "Renamed",
        }
    }

    /// `"{kind} {file name}"`, as shown in reload logs.
    pub fn describe(&self) -> String {
        let path = self.key_path();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        format!("{} {}", self.label(), name)
    }
}

/// Events collected within one coalescing window, in arrival order.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoalescedBatch(Vec<RawChangeEvent>);

impl CoalescedBatch {
    /// Returns `None` for an empty window.
    pub fn new(events: Vec<RawChangeEvent>) -> Option<Self> {
        if events.is_empty() {
            None
        } else {
            Some(Self(events))
        }
    }

    pub fn events(&self) -> &[RawChangeEvent] {
        &self.0
    }
}

/// One item of the change stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSignal {
    /// Window mode: everything observed since the previous tick.
    Batch(CoalescedBatch),
    /// Suppress mode: the first event of a burst for one path.
    Event(RawChangeEvent),
}

impl ChangeSignal {
    pub fn events(&self) -> &[RawChangeEvent] {
        match self {
            Self::Batch(batch) => batch.events(),
            Self::Event(event) => std::slice::from_ref(event),
        }
    }

    pub fn summary(&self) -> String {
        self.events()
            .iter()
            .map(RawChangeEvent::describe)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Why a change stream ended. Neither case is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    Cancelled,
    Disposed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_path_uses_new_name() {
        let event = RawChangeEvent::Renamed {
            from: PathBuf::from("/site/old.html"),
            to: PathBuf::from("/site/new.html"),
        };
        assert_eq!(event.key_path(), Path::new("/site/new.html"));
        assert_eq!(event.paths().len(), 2);
    }

    #[test]
    fn test_empty_batch_is_none() {
        assert!(CoalescedBatch::new(Vec::new()).is_none());
    }

    #[test]
    fn test_summary() {
        let batch = CoalescedBatch::new(vec![
            RawChangeEvent::Changed(PathBuf::from("/site/index.html")),
            RawChangeEvent::Deleted(PathBuf::from("/site/app.css")),
        ])
        .unwrap();
        assert_eq!(
            ChangeSignal::Batch(batch).summary(),
            "Changed index.html,Deleted app.css"
        );

        let single = ChangeSignal::Event(RawChangeEvent::Created(PathBuf::from("/site/a.js")));
        assert_eq!(single.summary(), "Created a.js");
    }
}
