use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{TwinError, TwinResult};

/// Suffix appended to every isolated file so extension-based tooling will not run it.
pub const RESTRICTED_SUFFIX: &str = "restricted";

/// Isolation directory for files classified as threats.
#[derive(Debug, Clone)]
pub struct Quarantine {
    dir: PathBuf,
}

impl Quarantine {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Move `file` into the quarantine directory as
    /// `{yyyyMMdd_HHmmss}_{name}.restricted`, creating the directory if needed.
    ///
    /// When that name is already taken a counter is inserted before the suffix
    /// (`{ts}_{name}.1.restricted`, ...). On failure the file stays where it is.
    pub fn isolate(&self, file: &Path, at: DateTime<Local>) -> TwinResult<PathBuf> {
        let fail = |source: io::Error| TwinError::Quarantine {
            path: file.to_path_buf(),
            source,
        };

        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| fail(io::Error::new(io::ErrorKind::InvalidInput, "file has no name")))?;

        std::fs::create_dir_all(&self.dir).map_err(fail)?;

        let stamp = at.format("%Y%m%d_%H%M%S").to_string();
        let target = self.free_target(&stamp, &name);

        move_file(file, &target).map_err(fail)?;
        Ok(target)
    }

    fn free_target(&self, stamp: &str, name: &str) -> PathBuf {
        let first = self.dir.join(format!("{stamp}_{name}.{RESTRICTED_SUFFIX}"));
        if !first.exists() {
            return first;
        }
        (1..)
            .map(|n| self.dir.join(format!("{stamp}_{name}.{n}.{RESTRICTED_SUFFIX}")))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }

    /// File names currently held in quarantine, sorted. Missing directory → empty.
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Rename, falling back to copy + remove when the quarantine lives on another device.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)
        }
        Err(err) => Err(err),
    }
}
