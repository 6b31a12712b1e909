use crate::model::VirtualModel;
use crate::model::record::FileRecord;

/// Case-insensitive substring match on file names, across active and tombstoned
/// records. An empty needle matches everything.
pub fn search(model: &VirtualModel, needle: &str) -> Vec<FileRecord> {
    let needle = needle.to_lowercase();
    model
        .all()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Tombstoned records: the archive of everything that was deleted.
pub fn archive(model: &VirtualModel) -> Vec<FileRecord> {
    model.deleted_entries().cloned().collect()
}
