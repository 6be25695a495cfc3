mod bootstrap;

use anyhow::Result;
use dashboard_core::dates::DateParser;
use dashboard_core::error::DashboardError;
use dashboard_core::settings::{OutputMode, Settings};
use dashboard_data::analysis::AnalysisOptions;
use dashboard_data::export::{self, ExportFormat};
use dashboard_data::reader::CleaningOptions;
use dashboard_runtime::orchestrator::{UploadOrchestrator, UploadRequest};
use dashboard_runtime::upload_manager::UploadManager;
use dashboard_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::ensure_directories()?;
    let log_file = match (&settings.log_file, settings.output) {
        (Some(path), _) => Some(path.clone()),
        (None, OutputMode::Tui) => Some(bootstrap::default_log_path()),
        (None, _) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Media Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, Output: {:?}, Theme: {}, Timezone: {}",
        settings.file.display(),
        settings.output,
        settings.theme,
        settings.timezone.as_deref().unwrap_or("as written")
    );

    let options = AnalysisOptions {
        cleaning: CleaningOptions {
            delimiter: settings.delimiter,
            date_parser: settings
                .timezone
                .as_deref()
                .map(DateParser::new)
                .unwrap_or_default(),
        },
        recommendations: settings.recommendations,
    };

    match report_format(settings.output) {
        Some(format) => run_report(&settings, options, format),
        None => run_tui(&settings, options).await,
    }
}

/// Renderer for a non-interactive output mode; `None` for the TUI.
fn report_format(mode: OutputMode) -> Option<ExportFormat> {
    match mode {
        OutputMode::Tui => None,
        OutputMode::Text => Some(ExportFormat::Text),
        OutputMode::Markdown => Some(ExportFormat::Markdown),
        OutputMode::Json => Some(ExportFormat::Json),
    }
}

/// Analyse the file once and print the report to stdout.
fn run_report(settings: &Settings, options: AnalysisOptions, format: ExportFormat) -> Result<()> {
    let mut manager = UploadManager::new(options);
    let feedback = manager.upload_path(&settings.file).clone();
    let Some(report) = manager.report() else {
        anyhow::bail!("{feedback}");
    };
    eprintln!("{feedback}");

    println!("{}", export::render(report, format)?);

    if let Some(path) = &settings.export {
        export::write_report(report, path)?;
        tracing::info!("Report exported to {}", path.display());
    }
    Ok(())
}

/// Run the interactive dashboard until the user quits.
async fn run_tui(settings: &Settings, options: AnalysisOptions) -> Result<()> {
    tracing::info!("Starting dashboard TUI...");

    let (rx, handle) = UploadOrchestrator::new(options).start();
    handle.submit(UploadRequest::Path(settings.file.clone()));

    let app = App::new(&settings.theme, Some(settings.file.clone()));

    // The TUI exits on 'q' / Ctrl+C itself. Signals received while the
    // terminal is in raw mode are handled here.
    let report = tokio::select! {
        result = app.run(rx, &handle) => {
            handle.abort();
            result.map_err(|e| DashboardError::Terminal(e.to_string()))?
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down upload task");
            handle.abort();
            None
        }
    };

    if let Some(path) = &settings.export {
        match report {
            Some(report) => {
                export::write_report(&report, path)?;
                tracing::info!("Report exported to {}", path.display());
            }
            None => tracing::warn!("Nothing to export; the last upload produced no report"),
        }
    }
    Ok(())
}
