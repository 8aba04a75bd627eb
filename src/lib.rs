//! OrderScope: an analytics dashboard over a static e-commerce order table.
//!
//! The library holds everything except process start-up, so integration
//! tests can drive loading, filtering and aggregation without a window.

pub mod analytics;
pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod state;
pub mod ui;
