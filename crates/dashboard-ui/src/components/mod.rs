//! Reusable building blocks for the dashboard screens.

pub mod header;
pub mod share_bar;
