//! HTTP API handlers for chartlens-review

pub mod health;
pub mod reports;
pub mod ui;

pub use health::health_routes;
pub use reports::{list_reports, run_report};
pub use ui::{serve_app_js, serve_index};
