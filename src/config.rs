use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{TwinError, TwinResult};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "twin.toml";

pub const SNAPSHOT_FILE: &str = "twin_snapshot.json";
pub const LOG_FILE: &str = "system_events.log";
pub const QUARANTINE_DIR: &str = "Security_Quarantine";

/// Configuration loaded from `twin.toml`.
///
/// Every path is optional. Unset paths default to siblings of the watched root
/// so the engine's own writes never land inside the tree it watches.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TwinConfig {
    pub snapshot_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub quarantine_dir: Option<PathBuf>,
    /// Directory that receives exported reports.
    pub report_dir: Option<PathBuf>,
    /// Settle time before a modified file is re-read, in milliseconds.
    pub debounce_ms: Option<u64>,
    /// Number of lines returned by the log tail query.
    pub log_tail: Option<usize>,
}

impl TwinConfig {
    /// Load configuration from `path`.
    ///
    /// Returns a default configuration if the file does not exist or cannot be parsed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!("failed to parse {}: {err}. Using defaults.", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!("failed to read {}: {err}. Using defaults.", path.display());
                Self::default()
            }
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.unwrap_or(100))
    }

    pub fn log_tail(&self) -> usize {
        self.log_tail.unwrap_or(15)
    }
}

/// Fully resolved locations of everything the engine reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwinPaths {
    pub watch_root: PathBuf,
    pub quarantine_dir: PathBuf,
    pub snapshot_file: PathBuf,
    pub log_file: PathBuf,
    pub report_dir: PathBuf,
}

impl TwinPaths {
    /// Resolve paths without touching the filesystem.
    pub fn resolve(watch_root: &Path, config: &TwinConfig) -> Self {
        let watch_root = std::path::absolute(watch_root).unwrap_or_else(|_| watch_root.to_path_buf());
        let base = watch_root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| watch_root.clone());

        Self {
            quarantine_dir: config
                .quarantine_dir
                .clone()
                .unwrap_or_else(|| base.join(QUARANTINE_DIR)),
            snapshot_file: config
                .snapshot_file
                .clone()
                .unwrap_or_else(|| base.join(SNAPSHOT_FILE)),
            log_file: config.log_file.clone().unwrap_or_else(|| base.join(LOG_FILE)),
            report_dir: config.report_dir.clone().unwrap_or(base),
            watch_root,
        }
    }

    /// Create the watched root and the quarantine directory, then canonicalise the
    /// root so record keys match the absolute paths the watcher reports.
    ///
    /// This is the only hard failure the engine has.
    pub fn prepare(mut self) -> TwinResult<Self> {
        for dir in [&self.watch_root, &self.quarantine_dir] {
            std::fs::create_dir_all(dir).map_err(|source| TwinError::Startup {
                path: dir.clone(),
                source,
            })?;
        }
        self.watch_root = self
            .watch_root
            .canonicalize()
            .map_err(|source| TwinError::Startup {
                path: self.watch_root.clone(),
                source,
            })?;
        Ok(self)
    }
}
