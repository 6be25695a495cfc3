//! Data layer for the media dashboard.
//!
//! Cleans uploaded CSV exports, aggregates the five dashboard views, writes
//! the insight text beneath each one and renders reports for export.

pub mod aggregator;
pub mod analysis;
pub mod export;
pub mod insights;
pub mod reader;

pub use dashboard_core as core;
