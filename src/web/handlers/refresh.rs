// POST /api/refresh: trigger a background refresh.
//
// Returns 202 Accepted if the refresh starts.
// Returns 409 Conflict if a refresh is already running.
//
// Callers poll GET /api/status to track progress.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::monitor::launch_refresh;
use crate::web::{api_error, AppState};

pub async fn trigger_refresh(State(state): State<AppState>) -> impl IntoResponse {
    if !launch_refresh(state.monitor.clone()) {
        return api_error(StatusCode::CONFLICT, "A refresh is already running");
    }

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "message": "Refresh started" })),
    )
        .into_response()
}
