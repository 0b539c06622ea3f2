// GET /api/status: returns refresh status and severity counts.
//
// Combines the live RefreshStatus (running, progress) with the current
// dashboard counts so the page can render its header cards in one
// round-trip.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let refresh = state.monitor.status().await;
    let dashboard = state.monitor.state().await;

    Json(serde_json::json!({
        "last_updated": dashboard.last_updated().map(|t| t.to_rfc3339()),
        "refresh": refresh,
        "stats": dashboard.stats(),
        "history_size": dashboard.history_len(),
        "sources": state.monitor.collector().source_names(),
        "persistent": state.monitor.database().is_some(),
    }))
}
