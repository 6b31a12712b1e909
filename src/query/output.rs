use std::io::IsTerminal;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::model::record::FileRecord;
use crate::query::summary::{CategorySummary, GAUGE_SEGMENTS, SizeAnalysis};

fn status(record: &FileRecord) -> &'static str {
    if record.is_deleted { "deleted" } else { "active" }
}

fn print_header(line: String) {
    if std::io::stdout().is_terminal() {
        println!("\x1b[1m{line}\x1b[0m");
    } else {
        println!("{line}");
    }
}

/// Print file records (health, archive, search results).
pub fn format_records(records: &[FileRecord], format: &OutputFormat, root: &Path) {
    match format {
        OutputFormat::Compact => {
            for r in records {
                let rel = r.full_path.strip_prefix(root).unwrap_or(&r.full_path);
                println!(
                    "{} {} {} {} {}",
                    status(r),
                    rel.display(),
                    r.size,
                    r.category,
                    r.last_modified.to_rfc3339()
                );
            }
            println!("{} records", records.len());
        }

        OutputFormat::Table => {
            let name_w = records.iter().map(|r| r.name.len()).max().unwrap_or(4).max(4);
            print_header(format!(
                "{:<7}  {:<name_w$}  {:>12}  {:<13}  {}",
                "STATUS", "NAME", "BYTES", "CATEGORY", "LAST SEEN"
            ));
            println!("{}", "-".repeat(name_w + 60));
            for r in records {
                println!(
                    "{:<7}  {:<name_w$}  {:>12}  {:<13}  {}",
                    status(r),
                    r.name,
                    r.size,
                    r.category.as_str(),
                    r.last_modified.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S"),
                );
            }
        }

        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(records).unwrap_or_default()
            );
        }
    }
}

/// Print the per-category summary.
pub fn format_summary(summary: &[CategorySummary], format: &OutputFormat) {
    match format {
        OutputFormat::Compact => {
            for s in summary {
                println!("{} {} {:.2}MB", s.category, s.count, s.megabytes);
            }
        }

        OutputFormat::Table => {
            print_header(format!("{:<15}  {:>6}  {:>10}", "CATEGORY", "COUNT", "VOLUME MB"));
            println!("{}", "-".repeat(35));
            for s in summary {
                println!("{:<15}  {:>6}  {:>10.2}", s.category.as_str(), s.count, s.megabytes);
            }
        }

        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(summary).unwrap_or_default()
            );
        }
    }
}

/// Print the total volume with its gauge.
pub fn format_size(analysis: &SizeAnalysis, format: &OutputFormat) {
    match format {
        OutputFormat::Compact => {
            println!("total {} bytes {:.2}MB", analysis.total_bytes, analysis.total_megabytes);
        }

        OutputFormat::Table => {
            let filled = analysis.segments.min(GAUGE_SEGMENTS);
            println!("Total volume: {:.2} MB", analysis.total_megabytes);
            println!(
                "[{}{}]",
                "#".repeat(filled),
                ".".repeat(GAUGE_SEGMENTS - filled)
            );
        }

        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(analysis).unwrap_or_default()
            );
        }
    }
}

/// Print plain lines (log tail, quarantine listing).
pub fn format_lines(lines: &[String], format: &OutputFormat) {
    match format {
        OutputFormat::Compact | OutputFormat::Table => {
            for line in lines {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(lines).unwrap_or_default());
        }
    }
}
