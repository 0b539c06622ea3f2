// Dashboard views over the current hazard reports.
//
// GET /api/hazards: items, optional ?severity= ?hazard= ?limit=
// GET /api/hazards/table: newest-first table rows (?limit=, default 20)
// GET /api/distribution: counts per hazard kind and per severity
// GET /api/map: markers grouped by severity
// GET /api/keywords: trending terms across current items (?limit=)

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::detection::models::{HazardKind, Severity};
use crate::monitor::state::DEFAULT_TABLE_LIMIT;
use crate::web::{api_error, AppState};

const DEFAULT_KEYWORD_LIMIT: usize = 10;
const MAX_KEYWORD_LIMIT: usize = 50;

#[derive(Deserialize, Default)]
pub struct HazardsQuery {
    /// high | medium | low | unknown
    pub severity: Option<String>,
    /// Hazard kind, e.g. storm_surge
    pub hazard: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize, Default)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

pub async fn list_hazards(
    State(state): State<AppState>,
    params: Result<Query<HazardsQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(query) => query,
        Err(rejection) => return api_error(rejection.status(), &rejection.body_text()),
    };
    let severity = match params.severity.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => match s.parse::<Severity>() {
            Ok(v) => Some(v),
            Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
        },
        None => None,
    };
    let hazard = match params.hazard.as_deref().filter(|s| !s.is_empty()) {
        Some(h) => match h.parse::<HazardKind>() {
            Ok(v) => Some(v),
            Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
        },
        None => None,
    };

    let dashboard = state.monitor.state().await;
    let hazards = dashboard.filtered(severity, hazard, params.limit);

    Json(serde_json::json!({
        "count": hazards.len(),
        "hazards": hazards,
        "last_updated": dashboard.last_updated().map(|t| t.to_rfc3339()),
    }))
    .into_response()
}

pub async fn hazard_table(
    State(state): State<AppState>,
    params: Result<Query<LimitQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(query) => query,
        Err(rejection) => return api_error(rejection.status(), &rejection.body_text()),
    };
    let limit = params.limit.unwrap_or(DEFAULT_TABLE_LIMIT);
    let rows = state.monitor.state().await.table(limit);
    Json(serde_json::json!({ "rows": rows })).into_response()
}

pub async fn distribution(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.monitor.state().await.distribution())
}

pub async fn map(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.monitor.state().await.map())
}

pub async fn keywords(
    State(state): State<AppState>,
    params: Result<Query<LimitQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(query) => query,
        Err(rejection) => return api_error(rejection.status(), &rejection.body_text()),
    };
    let limit = params
        .limit
        .unwrap_or(DEFAULT_KEYWORD_LIMIT)
        .min(MAX_KEYWORD_LIMIT);
    let terms = state.monitor.trending(limit).await;
    Json(serde_json::json!({ "keywords": terms })).into_response()
}
