use tracing::error;

use crate::{AppError, AppState};
use backend_domain::{
    Catalog, CategoryTree, LocationSearchQuery, LocationView, User, UserProfile,
};

pub(crate) async fn require_user(state: &AppState, user_id: u64) -> Result<User, AppError> {
    state
        .user_repo
        .find_user(user_id)
        .await
        .map_err(|err| {
            error!(user_id, "failed to load user: {}", err);
            AppError::Internal(err)
        })?
        .ok_or(AppError::Unauthorized)
}

pub fn build_profile(catalog: &Catalog, user: &User) -> UserProfile {
    UserProfile {
        id: user.id,
        username: user.username.clone(),
        name: user.name.clone(),
        phone_number: user.phone_number.clone(),
        birth_date: user.birth_date,
        home_location: user
            .home_location_id
            .and_then(|id| catalog.location(id))
            .map(LocationView::from),
        interested_locations: user
            .interested_location_ids
            .iter()
            .filter_map(|id| catalog.location(*id))
            .map(LocationView::from)
            .collect(),
        interests: catalog.interests_for(&user.interest_subcategory_ids),
    }
}

pub async fn get_profile(state: &AppState, user_id: u64) -> Result<UserProfile, AppError> {
    let user = require_user(state, user_id).await?;
    Ok(build_profile(&state.catalog, &user))
}

pub async fn check_username_available(state: &AppState, username: &str) -> Result<bool, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("아이디를 입력해주세요.".to_string()));
    }
    let existing = state
        .user_repo
        .find_user_by_username(username)
        .await
        .map_err(AppError::Internal)?;
    Ok(existing.is_none())
}

pub fn search_locations(state: &AppState, query: LocationSearchQuery) -> Vec<LocationView> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    state
        .catalog
        .search_locations(query.query.as_deref().unwrap_or_default(), limit)
}

pub fn list_categories(state: &AppState) -> Vec<CategoryTree> {
    state.catalog.category_tree()
}
