// Community board entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AlertCategory, ReportReason};

pub const REPORT_DEACTIVATION_THRESHOLD: u64 = 10;
pub const HOT_POST_LIKE_THRESHOLD: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub category: AlertCategory,
    pub author_id: u64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub view_count: u64,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub category: AlertCategory,
    pub author_id: u64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub author_id: u64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: u64,
    pub author_id: u64,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub post_id: u64,
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: u64,
    pub post_id: u64,
    pub reporter_id: u64,
    pub reason: ReportReason,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostStats {
    pub likes: u64,
    pub comments: u64,
    pub reports: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: u64,
    pub category: AlertCategory,
    pub title: String,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub view_count: u64,
    pub comment_count: u64,
    pub like_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: u64,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_mine: bool,
    pub post_id: u64,
    pub post_title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub content: String,
    pub updated_at: DateTime<Utc>,
    pub comments: Vec<CommentView>,
    pub is_mine: bool,
    pub is_liked: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct PostListQuery {
    pub category: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostCreatePayload {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostUpdatePayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportPayload {
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct LikeStatus {
    pub is_liked: bool,
    pub like_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportedPost {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub report_count: u64,
    pub is_active: bool,
}
