//! Runtime layer for the media dashboard.
//!
//! Holds the current upload's state and runs uploads on a background task
//! for the terminal UI.

pub mod orchestrator;
pub mod upload_manager;

pub use dashboard_core as core;
pub use dashboard_data as data;
