// POST /api/analyze: run the detector on ad-hoc text.
//
// Body: {"text": "..."}. The text is analyzed but never stored or added to
// the dashboard.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::web::{api_error, AppState};

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

pub async fn analyze_text(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return api_error(rejection.status(), &rejection.body_text()),
    };
    if body.text.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "text must not be empty");
    }

    let analyzed = state.monitor.analyze_text(&body.text);
    Json(analyzed).into_response()
}
