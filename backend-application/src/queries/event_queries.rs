use tracing::{debug, error};

use crate::queries::user_queries::require_user;
use crate::{AppError, AppState};
use backend_domain::services::{
    extract_interests, filter_events, normalize_category_filter, order_events, resolve_locations,
};
use backend_domain::{
    EventCategoryButton, EventListQuery, EventRecord, EventSort, LocationMode,
};

pub const RECOMMENDATION_BUTTON_NAME: &str = "NestOn 추천 행사 보기";

/// Lists events around the user's home or interested locations.
///
/// Location resolution happens before any event read: a missing home location
/// fails without touching the event repository, and an empty interested set
/// returns an empty list.
pub async fn list_events(
    state: &AppState,
    user_id: u64,
    query: EventListQuery,
) -> Result<Vec<EventRecord>, AppError> {
    let mode = query
        .location_type
        .as_deref()
        .and_then(LocationMode::parse)
        .ok_or_else(|| {
            AppError::BadRequest(
                "location_type은 'my_location' 또는 'interested'이어야 합니다.".to_string(),
            )
        })?;
    let sort = query
        .sort
        .as_deref()
        .map(EventSort::from)
        .unwrap_or_default();
    state
        .metrics
        .record_event_list(sort == EventSort::Recommendation);

    let user = require_user(state, user_id).await?;
    let locations = resolve_locations(&user, mode, &state.catalog)?;
    if locations.is_empty() {
        debug!(user_id, mode = mode.as_str(), "no locations resolved");
        return Ok(Vec::new());
    }

    let candidates = state
        .event_repo
        .fetch_events_near(&locations.districts, &locations.location_ids)
        .await
        .map_err(|err| {
            error!("failed to fetch events: {}", err);
            AppError::Internal(err)
        })?;
    let category = normalize_category_filter(query.category.as_deref());
    let events = filter_events(candidates, &locations, category.as_deref());
    let profile = extract_interests(&state.catalog.interests_for(&user.interest_subcategory_ids));
    Ok(order_events(events, sort, &profile))
}

pub fn list_event_categories(state: &AppState) -> Vec<EventCategoryButton> {
    let mut buttons: Vec<EventCategoryButton> = state
        .catalog
        .categories()
        .iter()
        .map(|category| EventCategoryButton {
            kind: "category".to_string(),
            name: category.name.clone(),
        })
        .collect();
    buttons.push(EventCategoryButton {
        kind: "recommendation".to_string(),
        name: RECOMMENDATION_BUTTON_NAME.to_string(),
    });
    buttons
}

pub async fn get_event(state: &AppState, id: u64) -> Result<EventRecord, AppError> {
    let event = state
        .event_repo
        .fetch_event(id)
        .await
        .map_err(|err| {
            error!(id, "failed to fetch event: {}", err);
            AppError::Internal(err)
        })?
        .ok_or_else(|| AppError::NotFound(format!("event {id}")))?;
    Ok(EventRecord::from_event(event, None))
}
