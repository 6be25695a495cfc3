//! Terminal UI layer for the media dashboard.
//!
//! Provides themes, the header and share-bar components, the per-panel chart
//! view and the main application event loop built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod themes;

pub use dashboard_core as core;
