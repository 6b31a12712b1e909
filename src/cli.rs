use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Digital twin of a watched directory tree.
///
/// fs-twin mirrors file metadata into a persisted model, quarantines files with
/// executable/script extensions, and keeps an append-only audit trail. Query
/// commands read the persisted snapshot and never modify it.
#[derive(Parser, Debug)]
#[command(
    name = "fs-twin",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    /// Path to a twin.toml configuration file (defaults to ./twin.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for query results.
#[derive(Clone, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    /// Compact one-line-per-result format (default).
    #[default]
    Compact,
    /// Human-readable columnar table with optional ANSI color when stdout is a terminal.
    Table,
    /// Structured JSON suitable for programmatic consumption.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch a directory and reconcile every change into the twin until Ctrl-C.
    Watch {
        /// Directory to watch (created if absent).
        path: PathBuf,

        /// Export the final report when the watcher stops.
        #[arg(long)]
        report_on_exit: bool,
    },

    /// List active records whose file is missing on disk.
    Health {
        /// Watched directory.
        path: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Active file count and volume per category.
    Summary {
        /// Watched directory.
        path: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// List tombstoned (deleted) records.
    Archive {
        /// Watched directory.
        path: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Total active volume.
    Size {
        /// Watched directory.
        path: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Case-insensitive file name search over active and deleted records.
    Search {
        /// Substring to look for.
        query: String,

        /// Watched directory.
        path: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Show the most recent audit log lines.
    Logs {
        /// Watched directory.
        path: PathBuf,

        /// Number of lines (defaults to `log_tail` from the config, 15 otherwise).
        #[arg(short = 'n', long)]
        lines: Option<usize>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// List files held in quarantine.
    Quarantine {
        /// Watched directory.
        path: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Export the final report (JSON) and print its path.
    Report {
        /// Watched directory.
        path: PathBuf,
    },

    /// Create a file of a given size inside the watched directory.
    Touch {
        /// Watched directory.
        path: PathBuf,

        /// File name to create (no directory components).
        name: String,

        /// Size in MiB.
        #[arg(long, default_value_t = 1)]
        size_mb: u64,
    },

    /// Open the watched directory in the platform file browser.
    Open {
        /// Watched directory.
        path: PathBuf,
    },
}
