pub mod record;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;

use record::{Category, FileRecord};

/// The virtual model: an owned map from absolute path to [`FileRecord`].
///
/// Keys are never removed. Deletions only set the tombstone flag so that the
/// archive and search queries can see the full history of the watched tree.
/// The map is ordered so snapshots and query results are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualModel {
    records: BTreeMap<PathBuf, FileRecord>,
}

impl VirtualModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a model from a deserialized snapshot map.
    pub fn from_records(records: BTreeMap<PathBuf, FileRecord>) -> Self {
        Self { records }
    }

    /// Borrow the underlying map for serialization.
    pub fn records(&self) -> &BTreeMap<PathBuf, FileRecord> {
        &self.records
    }

    /// Create or overwrite the record for `path`, clearing any tombstone and
    /// stamping `last_modified` with the current time.
    pub fn upsert(&mut self, path: &Path, name: &str, size: u64, category: Category) -> &FileRecord {
        let record = FileRecord {
            name: name.to_owned(),
            full_path: path.to_path_buf(),
            size,
            last_modified: Utc::now(),
            is_deleted: false,
            category,
        };
        self.records.insert(path.to_path_buf(), record);
        &self.records[path]
    }

    /// Tombstone the record for `path`. Returns `false` (and does nothing) when
    /// the path was never observed.
    pub fn mark_deleted(&mut self, path: &Path) -> bool {
        match self.records.get_mut(path) {
            Some(record) => {
                record.is_deleted = true;
                record.last_modified = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn lookup(&self, path: &Path) -> Option<&FileRecord> {
        self.records.get(path)
    }

    pub fn all(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.values()
    }

    /// Records that are not tombstoned.
    pub fn active_entries(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.values().filter(|r| !r.is_deleted)
    }

    /// Tombstoned records, in path order.
    pub fn deleted_entries(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.values().filter(|r| r.is_deleted)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
