use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{TwinError, TwinResult};
use crate::model::VirtualModel;
use crate::model::record::FileRecord;

/// Save the whole model to `path`, replacing the previous snapshot.
///
/// The document is a JSON object mapping `fullPath` to its record. It is written
/// to a temp file in the same directory and then renamed over the target, so a
/// crash mid-write leaves the previous snapshot intact.
pub fn save(path: &Path, model: &VirtualModel) -> TwinResult<()> {
    let fail = |reason: String| TwinError::Snapshot {
        path: path.to_path_buf(),
        reason,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| fail(e.to_string()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| fail(e.to_string()))?;
    serde_json::to_writer(&mut tmp, model.records()).map_err(|e| fail(e.to_string()))?;
    tmp.as_file().flush().map_err(|e| fail(e.to_string()))?;
    tmp.persist(path).map_err(|e| fail(e.error.to_string()))?;

    Ok(())
}

/// Load the model from `path`.
///
/// A missing file yields an empty model. So does a malformed one: the engine
/// starts fresh rather than refusing to run.
pub fn load(path: &Path) -> VirtualModel {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(_) => return VirtualModel::new(),
    };
    match serde_json::from_slice::<BTreeMap<PathBuf, FileRecord>>(&bytes) {
        Ok(records) => VirtualModel::from_records(records),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "snapshot unreadable, starting with an empty model");
            VirtualModel::new()
        }
    }
}
