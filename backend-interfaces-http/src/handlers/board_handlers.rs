use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use backend_application::commands::board_commands;
use backend_application::queries::board_queries;
use backend_application::AppState;
use backend_domain::{
    CategoryOption, CommentPayload, CommentView, LikeStatus, Post, PostCreatePayload, PostDetail,
    PostListQuery, PostSummary, PostUpdatePayload, Report, ReportPayload, ReportedPost,
};

use crate::error::HttpError;
use crate::middleware::{authenticate, optional_user};

#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub category: Option<String>,
}

pub async fn list_board_categories() -> Json<Vec<CategoryOption>> {
    Json(board_queries::list_board_categories())
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<Vec<PostSummary>>, HttpError> {
    Ok(Json(board_queries::list_posts(&state, query).await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PostCreatePayload>,
) -> Result<(StatusCode, Json<Post>), HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    let post = board_commands::create_post(&state, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn hot_posts(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> Result<Json<Vec<PostSummary>>, HttpError> {
    Ok(Json(
        board_queries::hot_posts(&state, filter.category.as_deref()).await?,
    ))
}

pub async fn my_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PostSummary>>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(board_queries::my_posts(&state, user_id).await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<u64>,
) -> Result<Json<PostDetail>, HttpError> {
    let viewer = optional_user(&state.config, &headers)?;
    Ok(Json(board_commands::view_post(&state, viewer, post_id).await?))
}

pub async fn update_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<u64>,
    Json(payload): Json<PostUpdatePayload>,
) -> Result<Json<Post>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(
        board_commands::update_post(&state, user_id, post_id, payload).await?,
    ))
}

pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<u64>,
) -> Result<StatusCode, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    board_commands::delete_post(&state, user_id, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<u64>,
    Json(payload): Json<CommentPayload>,
) -> Result<(StatusCode, Json<CommentView>), HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    let comment = board_commands::add_comment(&state, user_id, post_id, payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(comment_id): Path<u64>,
    Json(payload): Json<CommentPayload>,
) -> Result<Json<CommentView>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(
        board_commands::update_comment(&state, user_id, comment_id, payload).await?,
    ))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(comment_id): Path<u64>,
) -> Result<StatusCode, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    board_commands::delete_comment(&state, user_id, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn my_comments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CommentView>>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(board_queries::my_comments(&state, user_id).await?))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<u64>,
) -> Result<Json<LikeStatus>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(
        board_commands::toggle_like(&state, user_id, post_id).await?,
    ))
}

pub async fn report_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<u64>,
    Json(payload): Json<ReportPayload>,
) -> Result<(StatusCode, Json<Report>), HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    let report = board_commands::report_post(&state, user_id, post_id, payload).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn reported_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ReportedPost>>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(board_queries::reported_posts(&state, user_id).await?))
}
