use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::queries::event_queries;
use backend_application::AppState;
use backend_domain::{EventCategoryButton, EventListQuery, EventRecord};

use crate::error::HttpError;
use crate::middleware::authenticate;

pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<EventRecord>>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    let events = event_queries::list_events(&state, user_id, query).await?;
    Ok(Json(events))
}

pub async fn list_event_categories(
    State(state): State<AppState>,
) -> Json<Vec<EventCategoryButton>> {
    Json(event_queries::list_event_categories(&state))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<EventRecord>, HttpError> {
    Ok(Json(event_queries::get_event(&state, id).await?))
}
