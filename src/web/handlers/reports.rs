// Persisted history.
//
// GET /api/reports: stored reports, newest first (?severity= ?limit=)
// GET /api/runs: recent collection runs (?limit=)
//
// Both return 503 when the server runs without a database.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::detection::models::Severity;
use crate::web::{api_error, AppState};

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 500;

#[derive(Deserialize, Default)]
pub struct ReportsQuery {
    pub severity: Option<String>,
    pub limit: Option<u32>,
}

pub async fn list_reports(
    State(state): State<AppState>,
    params: Result<Query<ReportsQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(query) => query,
        Err(rejection) => return api_error(rejection.status(), &rejection.body_text()),
    };
    let Some(db) = state.monitor.database() else {
        return api_error(StatusCode::SERVICE_UNAVAILABLE, "No database configured");
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    let result = match params.severity.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => match s.parse::<Severity>() {
            Ok(severity) => db.get_reports_by_severity(severity.as_str(), limit).await,
            Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
        },
        None => db.get_recent_reports(limit).await,
    };

    match result {
        Ok(reports) => Json(serde_json::json!({
            "count": reports.len(),
            "reports": reports,
        }))
        .into_response(),
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

#[derive(Deserialize, Default)]
pub struct RunsQuery {
    pub limit: Option<u32>,
}

pub async fn list_runs(
    State(state): State<AppState>,
    params: Result<Query<RunsQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(query) => query,
        Err(rejection) => return api_error(rejection.status(), &rejection.body_text()),
    };
    let Some(db) = state.monitor.database() else {
        return api_error(StatusCode::SERVICE_UNAVAILABLE, "No database configured");
    };
    let limit = params.limit.unwrap_or(20).min(MAX_LIMIT);

    match db.get_recent_runs(limit).await {
        Ok(runs) => Json(serde_json::json!({ "runs": runs })).into_response(),
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}
