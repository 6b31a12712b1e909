use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::model::VirtualModel;
use crate::model::record::Category;

/// One active file in the exported inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryLine {
    pub name: String,
    pub size: u64,
    pub category: Category,
}

/// Closing report of a monitoring session.
///
/// `processed_events` and `uptime_minutes` are only known to a live engine; a
/// report built from a snapshot on disk leaves them out.
#[derive(Debug, Clone, Serialize)]
pub struct FinalReport {
    pub generated_at: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_events: Option<u64>,
    pub active_inventory: Vec<InventoryLine>,
}

impl FinalReport {
    pub fn build(
        model: &VirtualModel,
        processed_events: Option<u64>,
        started_at: Option<DateTime<Local>>,
    ) -> Self {
        let generated_at = Local::now();
        let uptime_minutes =
            started_at.map(|t| (generated_at - t).num_milliseconds() as f64 / 60_000.0);
        let active_inventory = model
            .active_entries()
            .map(|r| InventoryLine {
                name: r.name.clone(),
                size: r.size,
                category: r.category,
            })
            .collect();

        Self {
            generated_at,
            uptime_minutes,
            processed_events,
            active_inventory,
        }
    }

    /// File name the report is exported under, e.g. `DigitalTwin_FinalReport_20240501_1337.json`.
    pub fn file_name(&self) -> String {
        format!(
            "DigitalTwin_FinalReport_{}.json",
            self.generated_at.format("%Y%m%d_%H%M")
        )
    }

    /// Write the report as pretty JSON into `dir`, returning the file path.
    pub fn export(&self, dir: &Path) -> io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let file = std::fs::File::create(&path)?;
        let mut writer = io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(path)
    }
}
