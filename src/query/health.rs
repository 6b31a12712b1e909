use crate::model::VirtualModel;
use crate::model::record::FileRecord;

/// Active records whose path no longer exists on disk: the model and the
/// filesystem have drifted apart (typically a dropped Deleted notification).
pub fn missing_on_disk(model: &VirtualModel) -> Vec<FileRecord> {
    model
        .active_entries()
        .filter(|r| !r.full_path.exists())
        .cloned()
        .collect()
}
