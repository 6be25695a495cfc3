//! State holder for the current upload.
//!
//! [`UploadManager`] owns at most one [`DashboardReport`]. Every upload
//! replaces it wholesale; a failed upload clears it so stale charts are never
//! shown next to an error.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use dashboard_data::analysis::{analyze, analyze_file, AnalysisOptions, DashboardReport};

// ── UploadFeedback ────────────────────────────────────────────────────────────

/// User-facing outcome of one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFeedback {
    /// Cleaning kept `rows` records and views were computed.
    Success { rows: usize },
    /// The upload was readable but no row had a usable date.
    Empty,
    /// The upload was rejected; carries the error text.
    Failed(String),
}

impl UploadFeedback {
    pub fn is_error(&self) -> bool {
        matches!(self, UploadFeedback::Failed(_))
    }
}

impl fmt::Display for UploadFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadFeedback::Success { rows } => write!(
                f,
                "Data cleaned successfully! Showing {} valid entries.",
                rows
            ),
            UploadFeedback::Empty => write!(
                f,
                "Data cleaned successfully! Showing 0 valid entries. No rows had a recognizable date, so there is nothing to chart."
            ),
            UploadFeedback::Failed(message) => write!(f, "Error processing file: {}", message),
        }
    }
}

// ── UploadManager ─────────────────────────────────────────────────────────────

/// Runs uploads through the pipeline and keeps the latest result.
///
/// # Example
/// ```no_run
/// use dashboard_runtime::upload_manager::UploadManager;
///
/// let mut mgr = UploadManager::default();
/// println!("{}", mgr.upload_path("media.csv".as_ref()));
/// if let Some(report) = mgr.report() {
///     println!("{} panels", report.panels.len());
/// }
/// ```
#[derive(Debug, Default)]
pub struct UploadManager {
    options: AnalysisOptions,
    report: Option<DashboardReport>,
    feedback: Option<UploadFeedback>,
    last_upload: Option<Instant>,
    uploads: usize,
}

impl UploadManager {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Analyse an in-memory upload and replace the current state.
    pub fn upload_bytes(&mut self, source: &str, raw: &[u8]) -> &UploadFeedback {
        let result = analyze(source, raw, &self.options).map_err(|e| e.to_string());
        self.apply(source, result)
    }

    /// Read `path` from disk, analyse it and replace the current state.
    pub fn upload_path(&mut self, path: &Path) -> &UploadFeedback {
        let result = analyze_file(path, &self.options).map_err(|e| e.to_string());
        self.apply(&path.display().to_string(), result)
    }

    /// Report for the current upload, if it produced one.
    pub fn report(&self) -> Option<&DashboardReport> {
        self.report.as_ref()
    }

    /// Feedback for the most recent upload.
    pub fn last_feedback(&self) -> Option<&UploadFeedback> {
        self.feedback.as_ref()
    }

    /// Time since the last upload finished.
    pub fn last_upload_age(&self) -> Option<Duration> {
        self.last_upload.map(|t| t.elapsed())
    }

    /// Number of uploads processed, successful or not.
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    /// Forget the current upload.
    pub fn clear(&mut self) {
        self.report = None;
        self.feedback = None;
        tracing::debug!("upload state cleared");
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn apply(&mut self, source: &str, result: Result<DashboardReport, String>) -> &UploadFeedback {
        self.uploads += 1;
        self.last_upload = Some(Instant::now());

        let feedback = match result {
            Ok(report) => {
                let feedback = if report.is_empty() {
                    UploadFeedback::Empty
                } else {
                    UploadFeedback::Success {
                        rows: report.valid_rows(),
                    }
                };
                self.report = Some(report);
                feedback
            }
            Err(message) => {
                tracing::warn!(source, error = %message, "upload rejected");
                self.report = None;
                UploadFeedback::Failed(message)
            }
        };

        self.feedback.insert(feedback)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
