// Web server: Axum-based dashboard backend.
//
// Serves one embedded HTML page that polls the JSON API. All /api/* routes
// read from the shared Monitor; POST /api/refresh kicks off a background
// refresh and returns immediately.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::monitor::Monitor;

pub mod handlers;

static DASHBOARD_HTML: &str = include_str!("dashboard.html");

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<Monitor>,
}

/// Start the Axum web server and run until `shutdown` resolves.
pub async fn run_server<F>(monitor: Arc<Monitor>, bind: &str, port: u16, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(AppState { monitor });

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Ohm dashboard listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Dashboard server stopped");
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/status", get(handlers::status::get_status))
        .route("/api/hazards", get(handlers::hazards::list_hazards))
        .route("/api/hazards/table", get(handlers::hazards::hazard_table))
        .route("/api/distribution", get(handlers::hazards::distribution))
        .route("/api/map", get(handlers::hazards::map))
        .route("/api/keywords", get(handlers::hazards::keywords))
        .route("/api/reports", get(handlers::reports::list_reports))
        .route("/api/runs", get(handlers::reports::list_runs))
        .route("/api/refresh", post(handlers::refresh::trigger_refresh))
        .route("/api/analyze", post(handlers::analyze::analyze_text));

    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .merge(api)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check, always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
