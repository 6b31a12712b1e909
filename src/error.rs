use std::path::PathBuf;

use thiserror::Error;

/// Failures raised inside the engine.
///
/// Only [`TwinError::Startup`] is allowed to end the process. Every other variant is
/// caught at the pipeline boundary, recorded in the audit trail, and the offending
/// event is dropped.
#[derive(Debug, Error)]
pub enum TwinError {
    /// The watched root or quarantine directory could not be created.
    #[error("cannot prepare {path}: {source}")]
    Startup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The notification subsystem reported an error. The watcher keeps running
    /// but is not resubscribed.
    #[error("watcher fault: {0}")]
    Watcher(String),

    /// A threat file could not be moved into quarantine and remains in place.
    #[error("quarantine of {path} failed: {source}")]
    Quarantine {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be written.
    #[error("snapshot write to {path} failed: {reason}")]
    Snapshot { path: PathBuf, reason: String },

    /// Any other I/O failure while handling a single event.
    #[error("processing {path} failed: {source}")]
    Processing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type TwinResult<T> = Result<T, TwinError>;
