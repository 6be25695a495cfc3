use std::path::PathBuf;
use thiserror::Error;

/// Format-level failures raised while turning uploaded bytes into records.
///
/// Row-level problems (a bad date, a missing engagement count) are never
/// reported here; those rows are dropped or defaulted by the reader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CleaningError {
    /// The byte stream is not delimited text, or it has no columns at all.
    #[error("Unparseable CSV data: {0}")]
    Unparseable(String),

    /// A required column is absent after header normalization.
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// All errors produced by the media dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The uploaded data failed format or schema validation.
    #[error(transparent)]
    Cleaning(#[from] CleaningError),

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
