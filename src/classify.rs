use std::path::Path;

use crate::model::record::Category;

/// Extensions that are never allowed to live in the watched tree.
const BLOCKLIST: &[&str] = &["exe", "bat", "cmd", "sh", "vbs", "ps1"];

/// Outcome of running a file extension against the blocklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Threat,
    Benign,
}

/// Normalise an extension for table lookups: strip one leading dot, lowercase.
///
/// Accepts both `".EXE"` (as reported by most tooling) and `"exe"` (as returned
/// by [`Path::extension`]).
fn normalise(ext: &str) -> String {
    ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase()
}

/// Classify an extension against the static blocklist. Case-insensitive, exact match.
pub fn classify(ext: &str) -> Verdict {
    let ext = normalise(ext);
    if BLOCKLIST.contains(&ext.as_str()) {
        Verdict::Threat
    } else {
        Verdict::Benign
    }
}

/// Extension of a path, where a dotfile such as `.exe` counts as all extension.
fn extension_of(path: &Path) -> Option<&str> {
    match path.extension() {
        Some(ext) => ext.to_str(),
        None => path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix('.'))
            .filter(|rest| !rest.is_empty()),
    }
}

/// Classify a path by its extension. Paths without an extension are benign.
pub fn classify_path(path: &Path) -> Verdict {
    match extension_of(path) {
        Some(ext) => classify(ext),
        None => Verdict::Benign,
    }
}

/// Map an extension to its inventory category. Unknown extensions fall back to
/// [`Category::RawData`].
pub fn categorize(ext: &str) -> Category {
    match normalise(ext).as_str() {
        "txt" | "pdf" | "doc" | "docx" | "xlsx" | "md" => Category::Documentation,
        "cs" | "py" | "cpp" | "js" | "html" | "rs" | "ts" => Category::SourceCode,
        "jpg" | "jpeg" | "png" | "gif" | "mp4" | "avi" | "mov" => Category::MediaAsset,
        "zip" | "rar" | "7z" | "tar" | "gz" => Category::Archive,
        _ => Category::RawData,
    }
}

/// Category for a path, derived from its extension.
pub fn categorize_path(path: &Path) -> Category {
    extension_of(path)
        .map(categorize)
        .unwrap_or(Category::RawData)
}
