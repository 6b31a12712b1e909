use std::fmt;

use crate::model::record::FileRecord;

/// Direction of a size change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Growth,
    Shrink,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Growth => "growth",
            Trend::Shrink => "shrink",
        }
    }
}

/// Size change between the recorded and the freshly observed size of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeDelta {
    pub old_size: u64,
    pub new_size: u64,
    /// Signed percentage change relative to `old_size`.
    pub ratio: f64,
    pub trend: Trend,
}

impl fmt::Display for SizeDelta {
    /// Renders as `+50.00% growth` / `-25.00% shrink`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.2}% {}", self.ratio, self.trend.as_str())
    }
}

/// Compare a new size against the previous record for the same path.
///
/// Returns `None` for new paths, tombstoned records, a zero previous size, or an
/// unchanged size.
pub fn analyze(previous: Option<&FileRecord>, new_size: u64) -> Option<SizeDelta> {
    let previous = previous.filter(|r| !r.is_deleted)?;
    let old_size = previous.size;
    if old_size == 0 || old_size == new_size {
        return None;
    }

    let ratio = (new_size as f64 - old_size as f64) / old_size as f64 * 100.0;
    let trend = if ratio > 0.0 { Trend::Growth } else { Trend::Shrink };
    Some(SizeDelta {
        old_size,
        new_size,
        ratio,
        trend,
    })
}
