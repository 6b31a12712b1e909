use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fs_twin::cli::{Cli, Commands};
use fs_twin::config::{CONFIG_FILE, TwinConfig, TwinPaths};
use fs_twin::engine::{self, TwinEngine};
use fs_twin::model::VirtualModel;
use fs_twin::quarantine::Quarantine;
use fs_twin::query::{self, output, report::FinalReport};
use fs_twin::{audit, host, snapshot};

/// Resolve paths and load the persisted model for a read-only query.
fn offline_view(path: &Path, config: &TwinConfig) -> (TwinPaths, VirtualModel) {
    let mut paths = TwinPaths::resolve(path, config);
    if let Ok(root) = paths.watch_root.canonicalize() {
        paths.watch_root = root;
    }
    let model = snapshot::load(&paths.snapshot_file);
    (paths, model)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = TwinConfig::load(&config_path);

    match cli.command {
        Commands::Watch {
            path,
            report_on_exit,
        } => {
            let engine = Arc::new(TwinEngine::open(TwinPaths::resolve(&path, &config))?);
            println!("Watching {}", engine.paths().watch_root.display());
            engine::runtime::run(Arc::clone(&engine), config.debounce()).await?;
            println!("Processed {} events", engine.processed_events());
            if report_on_exit {
                let report = engine.export_report()?;
                println!("Report written to {}", report.display());
            }
        }

        Commands::Health { path, format } => {
            let (paths, model) = offline_view(&path, &config);
            let missing = query::health::missing_on_disk(&model);
            output::format_records(&missing, &format, &paths.watch_root);
        }

        Commands::Summary { path, format } => {
            let (_, model) = offline_view(&path, &config);
            output::format_summary(&query::summary::summarize(&model), &format);
        }

        Commands::Archive { path, format } => {
            let (paths, model) = offline_view(&path, &config);
            output::format_records(&query::search::archive(&model), &format, &paths.watch_root);
        }

        Commands::Size { path, format } => {
            let (_, model) = offline_view(&path, &config);
            output::format_size(&query::summary::size_analysis(&model), &format);
        }

        Commands::Search {
            query: needle,
            path,
            format,
        } => {
            let (paths, model) = offline_view(&path, &config);
            let hits = query::search::search(&model, &needle);
            output::format_records(&hits, &format, &paths.watch_root);
        }

        Commands::Logs {
            path,
            lines,
            format,
        } => {
            let (paths, _) = offline_view(&path, &config);
            let n = lines.unwrap_or_else(|| config.log_tail());
            output::format_lines(&audit::read_tail(&paths.log_file, n), &format);
        }

        Commands::Quarantine { path, format } => {
            let (paths, _) = offline_view(&path, &config);
            output::format_lines(&Quarantine::new(&paths.quarantine_dir).list(), &format);
        }

        Commands::Report { path } => {
            let (paths, model) = offline_view(&path, &config);
            let report = FinalReport::build(&model, None, None).export(&paths.report_dir)?;
            println!("{}", report.display());
        }

        Commands::Touch {
            path,
            name,
            size_mb,
        } => {
            let created = host::create_synthetic_file(&path, &name, size_mb)?;
            println!("Created {} ({size_mb} MiB)", created.display());
        }

        Commands::Open { path } => {
            host::open_folder(&path)?;
        }
    }

    Ok(())
}
