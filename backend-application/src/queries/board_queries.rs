use std::collections::HashMap;

use tracing::error;

use crate::queries::user_queries::require_user;
use crate::{AppError, AppState};
use backend_domain::{
    alert_category_options, AlertCategory, CategoryOption, Comment, CommentView, Post,
    PostListQuery, PostStats, PostSummary, ReportedPost, HOT_POST_LIKE_THRESHOLD,
    REPORT_DEACTIVATION_THRESHOLD,
};

pub fn list_board_categories() -> Vec<CategoryOption> {
    alert_category_options()
}

/// Category for a new post. Unknown keys are rejected; blank means none given.
pub(crate) fn parse_category_filter(raw: Option<&str>) -> Result<Option<AlertCategory>, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(key) => AlertCategory::from_key(key)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("unknown category '{key}'"))),
    }
}

/// Listing filter. Blank matches every post, an unknown key matches none.
fn category_matcher(raw: Option<&str>) -> impl Fn(&Post) -> bool {
    let wanted = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(AlertCategory::from_key);
    move |post: &Post| match wanted {
        None => true,
        Some(category) => category == Some(post.category),
    }
}

async fn load_posts(state: &AppState) -> Result<Vec<Post>, AppError> {
    state.board_repo.list_posts().await.map_err(|err| {
        error!("failed to list posts: {}", err);
        AppError::Internal(err)
    })
}

pub(crate) async fn summarize_posts(
    state: &AppState,
    posts: Vec<Post>,
) -> Result<Vec<(PostSummary, PostStats)>, AppError> {
    let post_ids: Vec<u64> = posts.iter().map(|post| post.id).collect();
    let mut author_ids: Vec<u64> = posts.iter().map(|post| post.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let stats = state
        .board_repo
        .post_stats(&post_ids)
        .await
        .map_err(AppError::Internal)?;
    let usernames = state
        .user_repo
        .usernames(&author_ids)
        .await
        .map_err(AppError::Internal)?;

    Ok(posts
        .into_iter()
        .map(|post| {
            let stat = stats.get(&post.id).copied().unwrap_or_default();
            (summary_of(&post, &usernames, stat), stat)
        })
        .collect())
}

fn summary_of(post: &Post, usernames: &HashMap<u64, String>, stats: PostStats) -> PostSummary {
    PostSummary {
        id: post.id,
        category: post.category,
        title: post.title.clone(),
        author_username: usernames.get(&post.author_id).cloned().unwrap_or_default(),
        created_at: post.created_at,
        view_count: post.view_count,
        comment_count: stats.comments,
        like_count: stats.likes,
    }
}

pub async fn list_posts(state: &AppState, query: PostListQuery) -> Result<Vec<PostSummary>, AppError> {
    let in_category = category_matcher(query.category.as_deref());
    let posts: Vec<Post> = load_posts(state)
        .await?
        .into_iter()
        .filter(|post| post.is_active && in_category(post))
        .collect();
    let mut summaries: Vec<PostSummary> = summarize_posts(state, posts)
        .await?
        .into_iter()
        .map(|(summary, _)| summary)
        .collect();

    let by_likes = query.ordering.as_deref().map(str::trim) == Some("likes");
    summaries.sort_by(|a, b| {
        if by_likes {
            b.like_count
                .cmp(&a.like_count)
                .then_with(|| b.created_at.cmp(&a.created_at))
        } else {
            b.created_at.cmp(&a.created_at)
        }
    });
    Ok(summaries)
}

pub async fn hot_posts(state: &AppState, category: Option<&str>) -> Result<Vec<PostSummary>, AppError> {
    let in_category = category_matcher(category);
    let posts: Vec<Post> = load_posts(state)
        .await?
        .into_iter()
        .filter(|post| post.is_active && in_category(post))
        .collect();
    let mut hot: Vec<PostSummary> = summarize_posts(state, posts)
        .await?
        .into_iter()
        .filter(|(_, stats)| stats.likes >= HOT_POST_LIKE_THRESHOLD)
        .map(|(summary, _)| summary)
        .collect();
    hot.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(hot)
}

pub async fn my_posts(state: &AppState, user_id: u64) -> Result<Vec<PostSummary>, AppError> {
    let posts: Vec<Post> = load_posts(state)
        .await?
        .into_iter()
        .filter(|post| post.author_id == user_id)
        .collect();
    let mut summaries: Vec<PostSummary> = summarize_posts(state, posts)
        .await?
        .into_iter()
        .map(|(summary, _)| summary)
        .collect();
    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(summaries)
}

pub(crate) async fn comment_views(
    state: &AppState,
    comments: Vec<Comment>,
    viewer_id: Option<u64>,
) -> Result<Vec<CommentView>, AppError> {
    let mut author_ids: Vec<u64> = comments.iter().map(|c| c.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    let usernames = state
        .user_repo
        .usernames(&author_ids)
        .await
        .map_err(AppError::Internal)?;

    let mut titles: HashMap<u64, String> = HashMap::new();
    let mut views = Vec::with_capacity(comments.len());
    for comment in comments.into_iter().filter(|c| c.is_active) {
        if !titles.contains_key(&comment.post_id) {
            let title = state
                .board_repo
                .find_post(comment.post_id)
                .await
                .map_err(AppError::Internal)?
                .map(|post| post.title)
                .unwrap_or_default();
            titles.insert(comment.post_id, title);
        }
        views.push(CommentView {
            id: comment.id,
            author_username: usernames.get(&comment.author_id).cloned().unwrap_or_default(),
            is_mine: viewer_id == Some(comment.author_id),
            post_title: titles.get(&comment.post_id).cloned().unwrap_or_default(),
            post_id: comment.post_id,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        });
    }
    Ok(views)
}

pub async fn my_comments(state: &AppState, user_id: u64) -> Result<Vec<CommentView>, AppError> {
    let mut comments = state
        .board_repo
        .comments_by_author(user_id)
        .await
        .map_err(AppError::Internal)?;
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    comment_views(state, comments, Some(user_id)).await
}

/// Posts at or above the report threshold. Admins only.
pub async fn reported_posts(state: &AppState, user_id: u64) -> Result<Vec<ReportedPost>, AppError> {
    let user = require_user(state, user_id).await?;
    if !user.is_admin {
        return Err(AppError::Forbidden("관리자만 접근할 수 있습니다.".to_string()));
    }
    let posts = load_posts(state).await?;
    let active: HashMap<u64, bool> = posts.iter().map(|p| (p.id, p.is_active)).collect();
    let mut reported: Vec<ReportedPost> = summarize_posts(state, posts)
        .await?
        .into_iter()
        .filter(|(_, stats)| stats.reports >= REPORT_DEACTIVATION_THRESHOLD)
        .map(|(summary, stats)| ReportedPost {
            is_active: active.get(&summary.id).copied().unwrap_or(false),
            report_count: stats.reports,
            summary,
        })
        .collect();
    reported.sort_by(|a, b| b.report_count.cmp(&a.report_count));
    Ok(reported)
}
