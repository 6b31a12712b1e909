pub mod runtime;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};

use crate::audit::{AuditLog, AuditTag};
use crate::classify::{self, Verdict};
use crate::config::TwinPaths;
use crate::delta;
use crate::error::{TwinError, TwinResult};
use crate::model::VirtualModel;
use crate::model::record::FileRecord;
use crate::query::{self, report::FinalReport, summary::{CategorySummary, SizeAnalysis}};
use crate::quarantine::Quarantine;
use crate::snapshot;
use crate::watcher::event::WatchEvent;

/// Result of running one event through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The model was updated, persisted, and the event logged under this tag.
    Logged(AuditTag),
    /// The file was a threat and now lives at this quarantine path.
    Quarantined(PathBuf),
    /// Nothing to do: the path is not a regular file (a directory, or already gone).
    Skipped,
    /// A watcher fault was recorded.
    Faulted,
    /// Processing failed; a CRITICAL_FAIL record was written and the event dropped.
    Failed(String),
}

/// What happened to a path observed as present on disk.
enum Observation {
    Upserted,
    Quarantined(PathBuf),
    Missing,
}

/// The reconciliation engine.
///
/// Owns the virtual model behind a single mutex. Each event runs the whole
/// pipeline (classify, quarantine or delta + upsert/tombstone, snapshot save,
/// audit append) inside that one critical section, so the model and the
/// snapshot on disk always reflect a prefix of the processed-event sequence.
#[derive(Debug)]
pub struct TwinEngine {
    paths: TwinPaths,
    model: Mutex<VirtualModel>,
    quarantine: Quarantine,
    audit: AuditLog,
    /// Incremented outside the lock; monotonic but not ordered with log lines.
    processed: AtomicU64,
    started_at: DateTime<Local>,
}

impl TwinEngine {
    /// Prepare directories, restore the model from the snapshot (or start empty),
    /// and write the INIT record.
    ///
    /// Directory creation is the only failure that escapes.
    pub fn open(paths: TwinPaths) -> TwinResult<Self> {
        let paths = paths.prepare()?;
        let model = snapshot::load(&paths.snapshot_file);

        let engine = Self {
            quarantine: Quarantine::new(&paths.quarantine_dir),
            audit: AuditLog::new(&paths.log_file),
            model: Mutex::new(model),
            processed: AtomicU64::new(0),
            started_at: Local::now(),
            paths,
        };

        let restored = engine.lock().len();
        engine.audit.append(
            AuditTag::Init,
            &format!(
                "engine started on {} ({restored} records restored)",
                engine.paths.watch_root.display()
            ),
        );
        tracing::info!(
            root = %engine.paths.watch_root.display(),
            quarantine = %engine.paths.quarantine_dir.display(),
            restored,
            "twin engine ready"
        );
        Ok(engine)
    }

    pub fn paths(&self) -> &TwinPaths {
        &self.paths
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn processed_events(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Run one event through the pipeline. Never panics on I/O errors and never
    /// returns an error: failures become `ProcessOutcome::Failed`.
    pub fn process(&self, event: &WatchEvent) -> ProcessOutcome {
        if let WatchEvent::Fault(message) = event {
            self.record_fault(message);
            return ProcessOutcome::Faulted;
        }

        self.processed.fetch_add(1, Ordering::Relaxed);

        let mut model = self.lock();
        match self.apply(&mut model, event) {
            Ok(outcome) => outcome,
            Err(err) => {
                let subject = event.path().map(display_name).unwrap_or_default();
                self.audit
                    .append(AuditTag::CriticalFail, &format!("{subject}: {err}"));
                tracing::error!(%err, ?event, "event dropped");
                ProcessOutcome::Failed(err.to_string())
            }
        }
    }

    /// Record a notification-subsystem error. The watcher is not resubscribed.
    pub fn record_fault(&self, message: &str) {
        let fault = TwinError::Watcher(message.to_owned());
        self.audit.append(AuditTag::WatcherError, &fault.to_string());
        tracing::warn!(%fault, "watcher not resubscribed");
    }

    fn apply(&self, model: &mut VirtualModel, event: &WatchEvent) -> TwinResult<ProcessOutcome> {
        match event {
            WatchEvent::Created(path) => self.observe_and_commit(model, path, AuditTag::Created),
            WatchEvent::Modified(path) => self.observe_and_commit(model, path, AuditTag::Modified),
            WatchEvent::Deleted(path) => {
                model.mark_deleted(path);
                self.commit(model, AuditTag::Deleted, &format!("{} removed", display_name(path)))
            }
            WatchEvent::Renamed { from, to } => {
                let tombstoned = model.mark_deleted(from);
                let message = format!("{} -> {}", display_name(from), display_name(to));
                match self.observe(model, to)? {
                    Observation::Upserted => self.commit(model, AuditTag::Renamed, &message),
                    Observation::Quarantined(target) => {
                        if tombstoned {
                            self.commit(
                                model,
                                AuditTag::Deleted,
                                &format!("{} renamed into quarantine", display_name(from)),
                            )?;
                        }
                        Ok(ProcessOutcome::Quarantined(target))
                    }
                    Observation::Missing if tombstoned => {
                        self.commit(model, AuditTag::Renamed, &message)
                    }
                    Observation::Missing => Ok(ProcessOutcome::Skipped),
                }
            }
            WatchEvent::Fault(_) => Ok(ProcessOutcome::Faulted),
        }
    }

    fn observe_and_commit(
        &self,
        model: &mut VirtualModel,
        path: &Path,
        tag: AuditTag,
    ) -> TwinResult<ProcessOutcome> {
        match self.observe(model, path)? {
            Observation::Upserted => {
                self.commit(model, tag, &format!("{} processed", display_name(path)))
            }
            Observation::Quarantined(target) => Ok(ProcessOutcome::Quarantined(target)),
            Observation::Missing => Ok(ProcessOutcome::Skipped),
        }
    }

    /// Stat `path`, then either quarantine it or run delta analysis and upsert.
    fn observe(&self, model: &mut VirtualModel, path: &Path) -> TwinResult<Observation> {
        let meta = match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Ok(Observation::Missing),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Observation::Missing);
            }
            Err(source) => {
                return Err(TwinError::Processing {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let name = display_name(path);

        if classify::classify_path(path) == Verdict::Threat {
            let target = self.quarantine.isolate(path, Local::now())?;
            self.audit.append(
                AuditTag::SecurityAlert,
                &format!("threat quarantined: {name} -> {}", display_name(&target)),
            );
            tracing::warn!(file = %path.display(), target = %target.display(), "threat quarantined");
            return Ok(Observation::Quarantined(target));
        }

        // Snapshot keys must be valid UTF-8; refuse before the model is touched.
        if path.to_str().is_none() {
            return Err(TwinError::Processing {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "path is not valid UTF-8",
                ),
            });
        }

        let size = meta.len();
        if let Some(delta) = delta::analyze(model.lookup(path), size) {
            self.audit
                .append(AuditTag::DeltaAnalysis, &format!("{name} changed {delta}"));
        }
        model.upsert(path, &name, size, classify::categorize_path(path));
        Ok(Observation::Upserted)
    }

    /// Persist the snapshot, then log the event.
    fn commit(&self, model: &VirtualModel, tag: AuditTag, message: &str) -> TwinResult<ProcessOutcome> {
        snapshot::save(&self.paths.snapshot_file, model)?;
        self.audit.append(tag, message);
        Ok(ProcessOutcome::Logged(tag))
    }

    fn lock(&self) -> MutexGuard<'_, VirtualModel> {
        self.model.lock().unwrap_or_else(|p| p.into_inner())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// A consistent copy of the model as of the last completed event.
    pub fn model(&self) -> VirtualModel {
        self.lock().clone()
    }

    pub fn lookup(&self, path: &Path) -> Option<FileRecord> {
        self.lock().lookup(path).cloned()
    }

    /// Active records whose file no longer exists on disk.
    pub fn health_check(&self) -> Vec<FileRecord> {
        query::health::missing_on_disk(&self.lock())
    }

    pub fn summary(&self) -> Vec<CategorySummary> {
        query::summary::summarize(&self.lock())
    }

    /// Tombstoned records.
    pub fn archive(&self) -> Vec<FileRecord> {
        query::search::archive(&self.lock())
    }

    pub fn size_analysis(&self) -> SizeAnalysis {
        query::summary::size_analysis(&self.lock())
    }

    pub fn search(&self, needle: &str) -> Vec<FileRecord> {
        query::search::search(&self.lock(), needle)
    }

    pub fn recent_logs(&self, n: usize) -> Vec<String> {
        self.audit.tail(n)
    }

    pub fn quarantined_files(&self) -> Vec<String> {
        self.quarantine.list()
    }

    pub fn final_report(&self) -> FinalReport {
        FinalReport::build(
            &self.lock(),
            Some(self.processed_events()),
            Some(self.started_at),
        )
    }

    /// Write the final report into the configured report directory.
    pub fn export_report(&self) -> std::io::Result<PathBuf> {
        self.final_report().export(&self.paths.report_dir)
    }
}

/// Base name of a path for log messages.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
