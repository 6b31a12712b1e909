use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inventory category, derived from the file extension on every upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Documentation,
    SourceCode,
    MediaAsset,
    Archive,
    RawData,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Documentation => "DOCUMENTATION",
            Category::SourceCode => "SOURCE_CODE",
            Category::MediaAsset => "MEDIA_ASSET",
            Category::Archive => "ARCHIVE",
            Category::RawData => "RAW_DATA",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed path in the virtual model.
///
/// Field names follow the snapshot document layout (`fullPath`, `lastModified`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Base file name.
    pub name: String,
    /// Absolute path; the key of the model map.
    pub full_path: PathBuf,
    /// Size in bytes at the last observation.
    pub size: u64,
    /// Time of the last creation, update, or tombstone.
    pub last_modified: DateTime<Utc>,
    /// Tombstone flag. Tombstoned records are retained forever.
    pub is_deleted: bool,
    pub category: Category,
}
