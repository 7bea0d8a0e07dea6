use tracing::{error, info};

use crate::queries::board_queries::{comment_views, parse_category_filter, summarize_posts};
use crate::queries::user_queries::require_user;
use crate::{AppError, AppState};
use backend_domain::{
    Comment, CommentPayload, CommentView, LikeStatus, NewComment, NewPost, Post,
    PostCreatePayload, PostDetail, PostUpdatePayload, Report, ReportPayload, ReportReason,
    REPORT_DEACTIVATION_THRESHOLD,
};

fn required_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AppError::BadRequest(format!("{field} must not be empty")))
    } else {
        Ok(trimmed.to_string())
    }
}

async fn load_post(state: &AppState, post_id: u64) -> Result<Post, AppError> {
    state
        .board_repo
        .find_post(post_id)
        .await
        .map_err(|err| {
            error!(post_id, "failed to load post: {}", err);
            AppError::Internal(err)
        })?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))
}

async fn load_active_post(state: &AppState, post_id: u64) -> Result<Post, AppError> {
    let post = load_post(state, post_id).await?;
    if post.is_active {
        Ok(post)
    } else {
        Err(AppError::NotFound(format!("post {post_id}")))
    }
}

async fn load_comment(state: &AppState, comment_id: u64) -> Result<Comment, AppError> {
    state
        .board_repo
        .find_comment(comment_id)
        .await
        .map_err(AppError::Internal)?
        .filter(|comment| comment.is_active)
        .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))
}

fn ensure_author(author_id: u64, user_id: u64) -> Result<(), AppError> {
    if author_id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden("작성자만 수정/삭제할 수 있습니다.".to_string()))
    }
}

pub async fn create_post(
    state: &AppState,
    user_id: u64,
    payload: PostCreatePayload,
) -> Result<Post, AppError> {
    require_user(state, user_id).await?;
    let title = required_text(&payload.title, "title")?;
    let content = required_text(&payload.content, "content")?;
    let category = parse_category_filter(payload.category.as_deref())?.unwrap_or_default();
    let post = state
        .board_repo
        .insert_post(NewPost {
            category,
            author_id: user_id,
            title,
            content,
        })
        .await
        .map_err(AppError::Internal)?;
    info!(post_id = post.id, user_id, "post created");
    Ok(post)
}

/// Post detail for a viewer. Each call counts as one view. Inactive posts are
/// visible to their author only.
pub async fn view_post(
    state: &AppState,
    viewer_id: Option<u64>,
    post_id: u64,
) -> Result<PostDetail, AppError> {
    let post = load_post(state, post_id).await?;
    if !post.is_active && viewer_id != Some(post.author_id) {
        return Err(AppError::NotFound(format!("post {post_id}")));
    }
    let post = state
        .board_repo
        .increment_post_views(post_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

    let is_liked = match viewer_id {
        Some(user_id) => state
            .board_repo
            .has_liked(post.id, user_id)
            .await
            .map_err(AppError::Internal)?,
        None => false,
    };
    let mut comments = state
        .board_repo
        .comments_for_post(post.id)
        .await
        .map_err(AppError::Internal)?;
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let comments = comment_views(state, comments, viewer_id).await?;

    let is_mine = viewer_id == Some(post.author_id);
    let content = post.content.clone();
    let updated_at = post.updated_at;
    let (summary, _) = summarize_posts(state, vec![post])
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;
    Ok(PostDetail {
        summary,
        content,
        updated_at,
        comments,
        is_mine,
        is_liked,
    })
}

pub async fn update_post(
    state: &AppState,
    user_id: u64,
    post_id: u64,
    payload: PostUpdatePayload,
) -> Result<Post, AppError> {
    let post = load_active_post(state, post_id).await?;
    ensure_author(post.author_id, user_id)?;
    let title = payload
        .title
        .as_deref()
        .map(|title| required_text(title, "title"))
        .transpose()?;
    let content = payload
        .content
        .as_deref()
        .map(|content| required_text(content, "content"))
        .transpose()?;
    state
        .board_repo
        .update_post_text(post.id, title, content)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))
}

pub async fn delete_post(state: &AppState, user_id: u64, post_id: u64) -> Result<(), AppError> {
    let post = load_post(state, post_id).await?;
    ensure_author(post.author_id, user_id)?;
    state
        .board_repo
        .delete_post(post_id)
        .await
        .map_err(AppError::Internal)?;
    info!(post_id, user_id, "post deleted");
    Ok(())
}

pub async fn add_comment(
    state: &AppState,
    user_id: u64,
    post_id: u64,
    payload: CommentPayload,
) -> Result<CommentView, AppError> {
    require_user(state, user_id).await?;
    let post = load_active_post(state, post_id).await?;
    let content = required_text(&payload.content, "content")?;
    let comment = state
        .board_repo
        .insert_comment(NewComment {
            post_id: post.id,
            author_id: user_id,
            content,
        })
        .await
        .map_err(AppError::Internal)?;
    single_view(state, comment, user_id).await
}

async fn single_view(
    state: &AppState,
    comment: Comment,
    user_id: u64,
) -> Result<CommentView, AppError> {
    let comment_id = comment.id;
    comment_views(state, vec![comment], Some(user_id))
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))
}

pub async fn update_comment(
    state: &AppState,
    user_id: u64,
    comment_id: u64,
    payload: CommentPayload,
) -> Result<CommentView, AppError> {
    let comment = load_comment(state, comment_id).await?;
    ensure_author(comment.author_id, user_id)?;
    let content = required_text(&payload.content, "content")?;
    let comment = state
        .board_repo
        .update_comment_content(comment.id, content)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))?;
    single_view(state, comment, user_id).await
}

pub async fn delete_comment(
    state: &AppState,
    user_id: u64,
    comment_id: u64,
) -> Result<(), AppError> {
    let comment = load_comment(state, comment_id).await?;
    ensure_author(comment.author_id, user_id)?;
    state
        .board_repo
        .delete_comment(comment_id)
        .await
        .map_err(AppError::Internal)
}

pub async fn toggle_like(
    state: &AppState,
    user_id: u64,
    post_id: u64,
) -> Result<LikeStatus, AppError> {
    let post = load_active_post(state, post_id).await?;
    let is_liked = state
        .board_repo
        .toggle_like(post.id, user_id)
        .await
        .map_err(AppError::Internal)?;
    let like_count = state
        .board_repo
        .post_stats(&[post.id])
        .await
        .map_err(AppError::Internal)?
        .get(&post.id)
        .map(|stats| stats.likes)
        .unwrap_or(0);
    Ok(LikeStatus {
        is_liked,
        like_count,
    })
}

/// Files a report. One report per user and post; the post is deactivated once
/// it collects the threshold number of reports.
pub async fn report_post(
    state: &AppState,
    user_id: u64,
    post_id: u64,
    payload: ReportPayload,
) -> Result<Report, AppError> {
    let reason = ReportReason::from_key(&payload.reason)
        .ok_or_else(|| AppError::BadRequest(format!("unknown report reason '{}'", payload.reason)))?;
    let post = load_active_post(state, post_id).await?;
    if state
        .board_repo
        .has_reported(post.id, user_id)
        .await
        .map_err(AppError::Internal)?
    {
        return Err(AppError::Conflict("이미 신고한 게시글입니다.".to_string()));
    }
    let report = state
        .board_repo
        .insert_report(post.id, user_id, reason)
        .await
        .map_err(AppError::Internal)?;

    let reports = state
        .board_repo
        .post_stats(&[post.id])
        .await
        .map_err(AppError::Internal)?
        .get(&post.id)
        .map(|stats| stats.reports)
        .unwrap_or(0);
    if reports >= REPORT_DEACTIVATION_THRESHOLD {
        state
            .board_repo
            .deactivate_post(post.id)
            .await
            .map_err(AppError::Internal)?;
        info!(post_id, reports, "post deactivated after reports");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::AlertCategory;

    #[test]
    fn blank_text_is_rejected() {
        assert!(matches!(
            required_text("   ", "title"),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(required_text(" 제목 ", "title").expect("title"), "제목");
    }

    #[test]
    fn only_author_may_edit() {
        assert!(ensure_author(1, 1).is_ok());
        assert!(matches!(ensure_author(1, 2), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn default_post_category_is_etc() {
        assert_eq!(AlertCategory::default(), AlertCategory::Etc);
    }
}
