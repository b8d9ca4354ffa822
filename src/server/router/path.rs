use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use path_core::PathError;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::metrics;
use crate::server::ServeState;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub(crate) fn router() -> Router<ServeState> {
    Router::new().route("/generate-path", post(generate_path_handler))
}

#[derive(Debug, Default, Deserialize)]
struct GeneratePathRequest {
    #[serde(default)]
    goal: Option<String>,
    #[serde(default)]
    level: Option<String>,
}

async fn generate_path_handler(
    State(state): State<ServeState>,
    payload: Result<Json<GeneratePathRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!("generate_path", request_id = %request_id);

    let mut response = match run_generation(&state, payload).instrument(span).await {
        Ok(body) => body.into_response(),
        Err(err) => err.into_response(),
    };
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

async fn run_generation(
    state: &ServeState,
    payload: Result<Json<GeneratePathRequest>, JsonRejection>,
) -> Result<Json<path_core::LearningPath>, HttpError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(%rejection, "rejected generate-path body");
            metrics::record_path_request("invalid");
            return Err(HttpError::invalid_argument(PathError::MissingInput.to_string()));
        }
    };
    let goal = request.goal.unwrap_or_default();
    let level = request.level.unwrap_or_default();

    let generator = state.service.generator_name();
    let started = Instant::now();
    let result = state.service.generate_path(&goal, &level).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(outcome) => {
            metrics::record_path_request("ok");
            metrics::observe_generation_latency(generator, "ok", elapsed_ms);
            info!(
                generator,
                elapsed_ms,
                nodes = outcome.report.nodes_visited,
                verified = outcome.report.verified,
                dropped = outcome.report.dropped,
                "learning path ready"
            );
            Ok(Json(outcome.path))
        }
        Err(err) if err.is_client_error() => {
            metrics::record_path_request("invalid");
            Err(HttpError::invalid_argument(err.to_string()))
        }
        Err(err) => {
            metrics::record_path_request("error");
            metrics::observe_generation_latency(generator, "error", elapsed_ms);
            error!(generator, elapsed_ms, %err, "learning path generation failed");
            Err(HttpError::internal(format!(
                "Ocurrió un error en el servidor: {err}"
            )))
        }
    }
}

#[derive(Debug)]
pub(crate) struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
