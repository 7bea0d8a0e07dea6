use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::{
    BotResponse, CategorySeed, ChatMessage, ChatSession, Comment, LocalEvent, Location, MessageKind,
    NewComment, NewPost, NewUser, Post, PostStats, PublicAlert, Report, User,
};
use crate::value_objects::{AlertCategory, ReportReason};

#[async_trait]
pub trait LocalEventRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn upsert_events(&self, events: &[LocalEvent]) -> anyhow::Result<()>;
    /// Candidate events for the given districts or location ids. May return a
    /// superset; callers apply the exact district match.
    async fn fetch_events_near(
        &self,
        districts: &[String],
        location_ids: &[u64],
    ) -> anyhow::Result<Vec<LocalEvent>>;
    async fn fetch_event(&self, id: u64) -> anyhow::Result<Option<LocalEvent>>;
    /// Events whose location name contains `region`, best score first and the
    /// soonest start among equal scores.
    async fn search_events_by_region(
        &self,
        region: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<LocalEvent>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait PublicAlertRepository: Send + Sync {
    async fn upsert_alerts(&self, alerts: &[PublicAlert]) -> anyhow::Result<()>;
    async fn fetch_alerts(&self, category: AlertCategory, limit: usize) -> anyhow::Result<Vec<PublicAlert>>;
    async fn search_alerts_by_region(
        &self,
        region: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<PublicAlert>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: u64) -> anyhow::Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn find_user_by_phone(&self, phone_number: &str) -> anyhow::Result<Option<User>>;
    async fn insert_user(&self, user: NewUser) -> anyhow::Result<User>;
    async fn save_user(&self, user: &User) -> anyhow::Result<()>;
    async fn usernames(&self, ids: &[u64]) -> anyhow::Result<HashMap<u64, String>>;
}

#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn insert_post(&self, post: NewPost) -> anyhow::Result<Post>;
    async fn find_post(&self, id: u64) -> anyhow::Result<Option<Post>>;
    /// Adds one view and returns the updated post.
    async fn increment_post_views(&self, id: u64) -> anyhow::Result<Option<Post>>;
    /// Replaces the given text fields and bumps `updated_at`. Other fields are
    /// left as stored.
    async fn update_post_text(
        &self,
        id: u64,
        title: Option<String>,
        content: Option<String>,
    ) -> anyhow::Result<Option<Post>>;
    async fn deactivate_post(&self, id: u64) -> anyhow::Result<()>;
    /// Removes the post together with its comments, likes and reports.
    async fn delete_post(&self, id: u64) -> anyhow::Result<()>;
    async fn list_posts(&self) -> anyhow::Result<Vec<Post>>;
    async fn post_stats(&self, post_ids: &[u64]) -> anyhow::Result<HashMap<u64, PostStats>>;

    async fn insert_comment(&self, comment: NewComment) -> anyhow::Result<Comment>;
    async fn find_comment(&self, id: u64) -> anyhow::Result<Option<Comment>>;
    async fn update_comment_content(
        &self,
        id: u64,
        content: String,
    ) -> anyhow::Result<Option<Comment>>;
    async fn delete_comment(&self, id: u64) -> anyhow::Result<()>;
    async fn comments_for_post(&self, post_id: u64) -> anyhow::Result<Vec<Comment>>;
    async fn comments_by_author(&self, author_id: u64) -> anyhow::Result<Vec<Comment>>;

    /// Flips the like state and returns whether the post is now liked.
    async fn toggle_like(&self, post_id: u64, user_id: u64) -> anyhow::Result<bool>;
    async fn has_liked(&self, post_id: u64, user_id: u64) -> anyhow::Result<bool>;

    async fn has_reported(&self, post_id: u64, reporter_id: u64) -> anyhow::Result<bool>;
    async fn insert_report(
        &self,
        post_id: u64,
        reporter_id: u64,
        reason: ReportReason,
    ) -> anyhow::Result<Report>;
}

#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn insert_session(&self, session: ChatSession) -> anyhow::Result<()>;
    async fn find_session(&self, session_id: &str) -> anyhow::Result<Option<ChatSession>>;
    async fn touch_session(&self, session_id: &str) -> anyhow::Result<()>;
    async fn sessions_for_user(&self, user_id: u64) -> anyhow::Result<Vec<ChatSession>>;
    async fn insert_message(
        &self,
        session_id: &str,
        kind: MessageKind,
        content: &str,
    ) -> anyhow::Result<ChatMessage>;
    async fn messages(&self, session_id: &str) -> anyhow::Result<Vec<ChatMessage>>;
}

#[async_trait]
pub trait SeedRepository: Send + Sync {
    async fn load_taxonomy(&self, path: &str) -> anyhow::Result<Vec<CategorySeed>>;
    async fn load_locations(&self, path: &str) -> anyhow::Result<Vec<Location>>;
    async fn load_bot_responses(&self, path: &str) -> anyhow::Result<Vec<BotResponse>>;
}
