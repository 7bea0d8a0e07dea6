use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tracing::{error, warn};

use backend_application::commands::ingest_commands;
use backend_application::queries::ops_queries;
use backend_application::AppState;
use backend_domain::IngestStatus;

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    match ops_queries::check_ready(&state).await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            error!("ready check failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = ops_queries::render_metrics(&state);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}

/// Starts an ingest run in the background. The run outlives the request.
pub async fn run_ingest(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    if ops_queries::ingest_status(&state).await.running {
        return Err(HttpError::Conflict("ingest already running".to_string()));
    }
    tokio::spawn(async move {
        if let Err(err) = ingest_commands::run_ingest(&state).await {
            warn!("manual ingest did not run: {}", err);
        }
    });
    Ok(StatusCode::ACCEPTED)
}

pub async fn get_ingest_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<IngestStatus>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(ops_queries::ingest_status(&state).await))
}
