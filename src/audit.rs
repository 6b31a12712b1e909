use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use uuid::Uuid;

/// Closed set of audit record tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditTag {
    Init,
    Created,
    Modified,
    Deleted,
    Renamed,
    SecurityAlert,
    CriticalFail,
    WatcherError,
    DeltaAnalysis,
}

impl AuditTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditTag::Init => "INIT",
            AuditTag::Created => "CREATED",
            AuditTag::Modified => "MODIFIED",
            AuditTag::Deleted => "DELETED",
            AuditTag::Renamed => "RENAMED",
            AuditTag::SecurityAlert => "SECURITY_ALERT",
            AuditTag::CriticalFail => "CRITICAL_FAIL",
            AuditTag::WatcherError => "WATCHER_ERROR",
            AuditTag::DeltaAnalysis => "DELTA_ANALYSIS",
        }
    }
}

impl fmt::Display for AuditTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Short correlation id: the first 8 hex digits of a random v4 UUID.
pub fn correlation_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Format one audit line: `[2024-05-01 13:37:00] [TAG] [ID:1a2b3c4d] message`.
pub fn format_line(at: DateTime<Local>, tag: AuditTag, id: &str, message: &str) -> String {
    format!(
        "[{}] [{}] [ID:{}] {}",
        at.format("%Y-%m-%d %H:%M:%S"),
        tag,
        id,
        message
    )
}

/// Append-only, line-oriented audit trail.
///
/// Writes are best-effort: any I/O failure is reported through `tracing` and
/// otherwise ignored so that logging can never abort event processing. The file
/// is never rotated or truncated.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    /// Serialises writers so lines never interleave, including writers outside
    /// the pipeline section (watcher faults).
    write_lock: Mutex<()>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Append one record. Never fails.
    pub fn append(&self, tag: AuditTag, message: &str) {
        let line = format_line(Local::now(), tag, &correlation_id(), message);
        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{line}"));
        if let Err(err) = result {
            tracing::debug!(path = %self.path.display(), %err, "audit append dropped");
        }
    }

    /// The last `n` lines of the log, oldest first. Missing or unreadable log → empty.
    pub fn tail(&self, n: usize) -> Vec<String> {
        read_tail(&self.path, n)
    }
}

/// Read the last `n` lines of a log file without holding a writer lock.
pub fn read_tail(path: &Path, n: usize) -> Vec<String> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let lines: Vec<&str> = contents.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].iter().map(|l| (*l).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_line_layout() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 13, 37, 0).unwrap();
        let line = format_line(at, AuditTag::SecurityAlert, "deadbeef", "virus.exe quarantined");
        assert_eq!(
            line,
            "[2024-05-01 13:37:00] [SECURITY_ALERT] [ID:deadbeef] virus.exe quarantined"
        );
    }

    #[test]
    fn test_correlation_id_is_short_hex() {
        let id = correlation_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, correlation_id());
    }

    #[test]
    fn test_append_and_tail() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("events.log"));
        for i in 0..20 {
            log.append(AuditTag::Created, &format!("file-{i}"));
        }

        let tail = log.tail(15);
        assert_eq!(tail.len(), 15);
        assert!(tail[0].ends_with("file-5"));
        assert!(tail[14].ends_with("file-19"));
        assert!(tail[14].contains("[CREATED]"));
    }

    #[test]
    fn test_append_to_unwritable_path_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // The parent directory does not exist, so every open fails.
        let log = AuditLog::new(dir.path().join("missing").join("events.log"));
        log.append(AuditTag::Init, "should not panic");
        assert!(log.tail(15).is_empty());
    }
}
