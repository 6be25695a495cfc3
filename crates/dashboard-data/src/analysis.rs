//! End-to-end dashboard pipeline.
//!
//! Cleans one upload, aggregates every view and attaches its insights,
//! returning a [`DashboardReport`] ready for a renderer.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use dashboard_core::error::{CleaningError, DashboardError};
use dashboard_core::models::{AggregateView, CleanedDataset, InsightSet, ViewKind};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::{DatasetTotals, ViewAggregator};
use crate::insights::{InsightEngine, RecommendationMode};
use crate::reader::{clean, CleaningOptions};

// ── Public types ──────────────────────────────────────────────────────────────

/// Options for [`analyze`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalysisOptions {
    pub cleaning: CleaningOptions,
    pub recommendations: RecommendationMode,
}

/// Metadata produced alongside the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this report was generated.
    pub generated_at: String,
    /// Data rows in the upload (header excluded).
    pub rows_read: usize,
    /// Rows that survived cleaning.
    pub rows_valid: usize,
    /// Rows dropped for an unparseable date.
    pub rows_dropped: usize,
    /// Valid rows whose engagements were defaulted to zero.
    pub engagements_defaulted: usize,
    /// Wall-clock seconds spent cleaning.
    pub clean_time_seconds: f64,
    /// Wall-clock seconds spent aggregating and writing insights.
    pub aggregate_time_seconds: f64,
}

/// One chart plus the sentences shown beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewPanel {
    pub view: AggregateView,
    pub insights: InsightSet,
}

impl ViewPanel {
    pub fn kind(&self) -> ViewKind {
        self.view.kind
    }
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone)]
pub struct DashboardReport {
    /// Display name of the upload, usually its path.
    pub source: String,
    /// Cleaned records and data-quality counters.
    pub dataset: CleanedDataset,
    /// Record count and engagement sum.
    pub totals: DatasetTotals,
    /// One panel per view in dashboard order; empty when no rows survived.
    pub panels: Vec<ViewPanel>,
    pub metadata: AnalysisMetadata,
}

impl DashboardReport {
    /// `true` when cleaning left nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn valid_rows(&self) -> usize {
        self.dataset.valid_rows()
    }

    /// Panel for `kind`, if views were computed.
    pub fn panel(&self, kind: ViewKind) -> Option<&ViewPanel> {
        self.panels.iter().find(|p| p.kind() == kind)
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline over the bytes of one upload.
///
/// 1. Clean the bytes into records.
/// 2. Skip aggregation when no record survived.
/// 3. Otherwise build the five views and their insights.
pub fn analyze(
    source: &str,
    raw: &[u8],
    opts: &AnalysisOptions,
) -> Result<DashboardReport, CleaningError> {
    // ── Step 1: Clean ─────────────────────────────────────────────────────────
    let clean_start = Instant::now();
    let dataset = clean(raw, &opts.cleaning)?;
    let clean_time = clean_start.elapsed().as_secs_f64();

    // ── Step 2/3: Aggregate ───────────────────────────────────────────────────
    let aggregate_start = Instant::now();
    let totals = ViewAggregator::totals(&dataset.records);
    let panels = if dataset.is_empty() {
        Vec::new()
    } else {
        let engine = InsightEngine::new(opts.recommendations);
        ViewAggregator::all_views(&dataset.records)
            .into_iter()
            .map(|view| {
                let insights = engine.insights(&view);
                ViewPanel { view, insights }
            })
            .collect()
    };
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        rows_read: dataset.rows_read,
        rows_valid: dataset.valid_rows(),
        rows_dropped: dataset.rows_dropped,
        engagements_defaulted: dataset.engagements_defaulted,
        clean_time_seconds: clean_time,
        aggregate_time_seconds: aggregate_time,
    };

    info!(
        "Analyzed {}: {} valid rows, {} panels",
        source,
        metadata.rows_valid,
        panels.len()
    );

    Ok(DashboardReport {
        source: source.to_string(),
        dataset,
        totals,
        panels,
        metadata,
    })
}

/// Read `path` from disk and [`analyze`] it.
pub fn analyze_file(
    path: &Path,
    opts: &AnalysisOptions,
) -> Result<DashboardReport, DashboardError> {
    let bytes = std::fs::read(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(analyze(&path.display().to_string(), &bytes, opts)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
