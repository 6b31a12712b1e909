use std::path::{Path, PathBuf};

/// Normalised filesystem notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Created(PathBuf),
    /// Content or metadata changed. Goes through the per-path debounce first.
    Modified(PathBuf),
    Deleted(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
    /// The notification subsystem reported an error.
    Fault(String),
}

impl WatchEvent {
    /// The path this event ends up affecting, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Created(p) | WatchEvent::Modified(p) | WatchEvent::Deleted(p) => Some(p),
            WatchEvent::Renamed { to, .. } => Some(to),
            WatchEvent::Fault(_) => None,
        }
    }
}
