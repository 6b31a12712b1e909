use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::VirtualModel;
use crate::model::record::Category;

const MIB: f64 = 1024.0 * 1024.0;

/// Gauge width of the size analysis, one segment per MiB.
pub const GAUGE_SEGMENTS: usize = 20;

/// Active count and volume for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub count: usize,
    pub bytes: u64,
    pub megabytes: f64,
}

/// Total active volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeAnalysis {
    pub total_bytes: u64,
    pub total_megabytes: f64,
    /// Filled gauge segments, 1..=20.
    pub segments: usize,
}

/// Group active records by category. Tombstones are excluded.
pub fn summarize(model: &VirtualModel) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<Category, (usize, u64)> = BTreeMap::new();
    for record in model.active_entries() {
        let entry = groups.entry(record.category).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += record.size;
    }

    groups
        .into_iter()
        .map(|(category, (count, bytes))| CategorySummary {
            category,
            count,
            bytes,
            megabytes: bytes as f64 / MIB,
        })
        .collect()
}

pub fn size_analysis(model: &VirtualModel) -> SizeAnalysis {
    let total_bytes: u64 = model.active_entries().map(|r| r.size).sum();
    let total_megabytes = total_bytes as f64 / MIB;
    let segments = total_megabytes.clamp(1.0, GAUGE_SEGMENTS as f64) as usize;
    SizeAnalysis {
        total_bytes,
        total_megabytes,
        segments,
    }
}
