use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::metrics;

mod path;

use path::router as path_routes;

use super::state::ServeState;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Full HTTP surface: UI shell, health checks, metrics and the generation API.
pub fn build_router() -> Router<ServeState> {
    Router::new()
        .route("/", get(|| async { Html(INDEX_HTML) }))
        .route("/health", get(health_handler))
        .route("/livez", get(live_handler))
        .route("/readyz", get(ready_handler))
        .route("/metrics", get(metrics::metrics_handler))
        .merge(path_routes())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

async fn health_handler(State(state): State<ServeState>) -> impl IntoResponse {
    let snapshot = state.health.snapshot();
    Json(json!({
        "ok": snapshot.live,
        "ready": snapshot.ready,
        "generator": state.service.generator_name(),
        "version": env!("CARGO_PKG_VERSION"),
        "last_ready_check": snapshot.last_ready_check,
        "last_error": snapshot.last_error,
    }))
}

async fn live_handler(State(state): State<ServeState>) -> impl IntoResponse {
    let snapshot = state.health.snapshot();
    let status = if snapshot.live {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(json!({ "live": snapshot.live })))
}

async fn ready_handler(State(state): State<ServeState>) -> impl IntoResponse {
    let snapshot = state.health.snapshot();
    let status = if snapshot.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(json!({
            "ready": snapshot.ready,
            "last_ready_check": snapshot.last_ready_check,
            "last_error": snapshot.last_error,
        })),
    )
}
