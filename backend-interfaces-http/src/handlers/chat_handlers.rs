use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::chat_commands;
use backend_application::queries::chat_queries;
use backend_application::AppState;
use backend_domain::{ChatExchange, ChatMessage, ChatRequest, ChatSession, SessionSummary};

use crate::error::HttpError;
use crate::middleware::authenticate;

pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<ChatSession>), HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    let session = chat_commands::create_session(&state, user_id).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SessionSummary>>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(chat_queries::list_sessions(&state, user_id).await?))
}

pub async fn session_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(
        chat_queries::session_messages(&state, user_id, &session_id).await?,
    ))
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatExchange>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(chat_commands::chat(&state, user_id, request).await?))
}
