//! chartlens-review library - analytical report service
//!
//! Serves the fixed report catalog over HTTP against a read-only connection
//! to the database populated by chartlens-ingest, plus a minimal web UI for
//! picking a report and viewing its rows.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod db;
pub mod reports;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only)
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/reports", get(api::list_reports))
        .route("/api/reports/:slug", get(api::run_report))
        .merge(api::health_routes())
        .with_state(state)
}
