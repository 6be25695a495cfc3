//! Async upload orchestrator.
//!
//! Runs an [`UploadManager`] inside a tokio task. The TUI submits
//! [`UploadRequest`]s and receives [`DashboardSnapshot`]s over `mpsc`
//! channels, so the two sides never share mutable state.

use std::path::PathBuf;

use dashboard_data::analysis::{AnalysisOptions, DashboardReport};
use tokio::sync::mpsc;

use crate::upload_manager::{UploadFeedback, UploadManager};

/// Pending requests buffered before `submit` starts rejecting.
const REQUEST_BUFFER: usize = 8;

// ── Public types ──────────────────────────────────────────────────────────────

/// One upload to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRequest {
    /// Read and analyse a file on disk.
    Path(PathBuf),
    /// Analyse bytes already in memory.
    Bytes { source: String, data: Vec<u8> },
}

/// Result of one upload, forwarded to the TUI layer.
///
/// This is the data contract between the background runtime and the
/// presentation layer.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// Report for the upload; `None` when it was rejected.
    pub report: Option<DashboardReport>,
    /// Outcome message for the upload.
    pub feedback: UploadFeedback,
    /// 1-based sequence number of the upload.
    pub upload_number: usize,
}

// ── UploadOrchestrator ────────────────────────────────────────────────────────

/// Background upload coordinator.
///
/// Call [`UploadOrchestrator::start`] to spin up the worker task.
pub struct UploadOrchestrator {
    options: AnalysisOptions,
}

impl UploadOrchestrator {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    /// Spawn the worker task.
    ///
    /// Returns the receiver for snapshots and a handle used to submit
    /// requests or abort the worker. The worker exits once the handle is
    /// dropped and all pending requests are processed.
    pub fn start(self) -> (mpsc::Receiver<DashboardSnapshot>, UploadHandle) {
        let (request_tx, request_rx) = mpsc::channel(REQUEST_BUFFER);
        let (snapshot_tx, snapshot_rx) = mpsc::channel(REQUEST_BUFFER);

        let handle = tokio::spawn(async move {
            self.upload_loop(request_rx, snapshot_tx).await;
        });

        (
            snapshot_rx,
            UploadHandle {
                requests: request_tx,
                handle,
            },
        )
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn upload_loop(
        self,
        mut requests: mpsc::Receiver<UploadRequest>,
        snapshots: mpsc::Sender<DashboardSnapshot>,
    ) {
        let mut manager = UploadManager::new(self.options);

        while let Some(request) = requests.recv().await {
            let feedback = match &request {
                UploadRequest::Path(path) => manager.upload_path(path).clone(),
                UploadRequest::Bytes { source, data } => manager.upload_bytes(source, data).clone(),
            };
            tracing::info!(upload = manager.upload_count(), %feedback, "upload processed");

            let snapshot = DashboardSnapshot {
                report: manager.report().cloned(),
                feedback,
                upload_number: manager.upload_count(),
            };

            if let Err(e) = snapshots.send(snapshot).await {
                tracing::warn!(error = %e, "failed to send dashboard snapshot; receiver dropped");
                break;
            }
        }
        tracing::debug!("upload request channel closed; exiting loop");
    }
}

// ── UploadHandle ──────────────────────────────────────────────────────────────

/// A handle to the background upload task.
pub struct UploadHandle {
    requests: mpsc::Sender<UploadRequest>,
    handle: tokio::task::JoinHandle<()>,
}

impl UploadHandle {
    /// Queue `request` without blocking. Returns `false` when the worker is
    /// gone or its queue is full.
    pub fn submit(&self, request: UploadRequest) -> bool {
        match self.requests.try_send(request) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "upload request not queued");
                false
            }
        }
    }

    /// Immediately abort the worker.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
