//! Report catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::reports::{self, ReportResult};
use crate::AppState;

/// Catalog entry as exposed to clients
#[derive(Debug, Serialize)]
pub struct ReportListing {
    pub slug: &'static str,
    pub title: &'static str,
}

/// GET /api/reports
///
/// Lists the report catalog in display order.
pub async fn list_reports() -> Json<Vec<ReportListing>> {
    Json(
        reports::REPORTS
            .iter()
            .map(|report| ReportListing {
                slug: report.slug,
                title: report.title,
            })
            .collect(),
    )
}

/// GET /api/reports/:slug
///
/// Executes one catalog report and returns its columns and rows.
pub async fn run_report(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ReportResult>, ReportError> {
    let report = reports::find_report(&slug).ok_or(ReportError::UnknownReport(slug))?;

    let result = reports::run_report(&state.db, report)
        .await
        .map_err(|e| ReportError::QueryFailed(e.to_string()))?;

    Ok(Json(result))
}

/// Report API errors
#[derive(Debug)]
pub enum ReportError {
    UnknownReport(String),
    QueryFailed(String),
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ReportError::UnknownReport(slug) => {
                (StatusCode::NOT_FOUND, format!("Unknown report: {}", slug))
            }
            ReportError::QueryFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Report query failed: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
