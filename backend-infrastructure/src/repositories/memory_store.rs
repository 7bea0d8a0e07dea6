// In-memory store for users, board, chat and (with the memory backend)
// events and alerts. Optionally persisted to a JSON snapshot after each write.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use backend_domain::{
    AlertCategory, BoardRepository, ChatMessage, ChatRepository, ChatSession, Comment, Like,
    LocalEvent, LocalEventRepository, MessageKind, NewComment, NewPost, NewUser, Post, PostStats,
    PublicAlert, PublicAlertRepository, Report, ReportReason, User, UserRepository,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IdCounters {
    user: u64,
    post: u64,
    comment: u64,
    report: u64,
    message: u64,
}

fn next(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct StoreData {
    ids: IdCounters,
    users: BTreeMap<u64, User>,
    posts: BTreeMap<u64, Post>,
    comments: BTreeMap<u64, Comment>,
    likes: Vec<Like>,
    reports: Vec<Report>,
    sessions: BTreeMap<String, ChatSession>,
    messages: Vec<ChatMessage>,
    events: BTreeMap<u64, LocalEvent>,
    alerts: BTreeMap<u64, PublicAlert>,
}

#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store backed by `snapshot_path`, loading it when it exists.
    pub async fn open(snapshot_path: Option<&str>) -> anyhow::Result<Self> {
        let Some(path) = snapshot_path else {
            return Ok(Self::new());
        };
        let path = PathBuf::from(path);
        let data = if path.exists() {
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read snapshot {}", path.display()))?;
            let data: StoreData = serde_json::from_str(&content)
                .with_context(|| format!("invalid snapshot {}", path.display()))?;
            info!(
                path = %path.display(),
                users = data.users.len(),
                posts = data.posts.len(),
                "snapshot loaded"
            );
            data
        } else {
            StoreData::default()
        };
        Ok(Self {
            data: RwLock::new(data),
            snapshot_path: Some(path),
        })
    }

    /// Applies `change` under the write lock and writes the snapshot before the
    /// lock is released. When the change or the snapshot write fails, the
    /// previous state is restored and the error returned.
    async fn mutate<T, F>(&self, change: F) -> anyhow::Result<T>
    where
        F: FnOnce(&mut StoreData) -> anyhow::Result<T> + Send,
        T: Send,
    {
        let mut data = self.data.write().await;
        let Some(path) = &self.snapshot_path else {
            return change(&mut *data);
        };
        let previous = data.clone();
        let written = match change(&mut *data) {
            Ok(value) => persist(path, &*data).await.map(|_| value),
            Err(err) => Err(err),
        };
        if written.is_err() {
            *data = previous;
        }
        written
    }
}

async fn persist(path: &Path, data: &StoreData) -> anyhow::Result<()> {
    let content = serde_json::to_vec(data)?;
    write_atomic(path, &content).await.map_err(|err| {
        error!(path = %path.display(), "snapshot write failed: {}", err);
        err.context(format!("failed to write snapshot {}", path.display()))
    })
}

async fn write_atomic(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

/// Undated events sort after dated ones.
fn soonest_first(a: &LocalEvent, b: &LocalEvent) -> Ordering {
    match (a.start_date, b.start_date) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn events_by_score(mut events: Vec<LocalEvent>) -> Vec<LocalEvent> {
    events.sort_by(|a, b| {
        b.recommendation_score
            .cmp(&a.recommendation_score)
            .then_with(|| soonest_first(a, b))
    });
    events
}

#[async_trait]
impl LocalEventRepository for MemoryStore {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn upsert_events(&self, events: &[LocalEvent]) -> anyhow::Result<()> {
        self.mutate(|data| {
            for event in events {
                data.events.insert(event.id, event.clone());
            }
            Ok(())
        })
        .await
    }

    async fn fetch_events_near(
        &self,
        districts: &[String],
        location_ids: &[u64],
    ) -> anyhow::Result<Vec<LocalEvent>> {
        let data = self.data.read().await;
        Ok(data
            .events
            .values()
            .filter(|event| {
                event
                    .location_id
                    .map(|id| location_ids.contains(&id))
                    .unwrap_or(false)
                    || districts
                        .iter()
                        .any(|district| event.location_name.contains(district.as_str()))
            })
            .cloned()
            .collect())
    }

    async fn fetch_event(&self, id: u64) -> anyhow::Result<Option<LocalEvent>> {
        Ok(self.data.read().await.events.get(&id).cloned())
    }

    async fn search_events_by_region(
        &self,
        region: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<LocalEvent>> {
        let matching = {
            let data = self.data.read().await;
            data.events
                .values()
                .filter(|event| event.location_name.contains(region))
                .cloned()
                .collect()
        };
        Ok(events_by_score(matching).into_iter().take(limit).collect())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl PublicAlertRepository for MemoryStore {
    async fn upsert_alerts(&self, alerts: &[PublicAlert]) -> anyhow::Result<()> {
        self.mutate(|data| {
            for alert in alerts {
                data.alerts.insert(alert.id, alert.clone());
            }
            Ok(())
        })
        .await
    }

    async fn fetch_alerts(
        &self,
        category: AlertCategory,
        limit: usize,
    ) -> anyhow::Result<Vec<PublicAlert>> {
        let data = self.data.read().await;
        let mut alerts: Vec<PublicAlert> = data
            .alerts
            .values()
            .filter(|alert| alert.category == category)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        alerts.truncate(limit);
        Ok(alerts)
    }

    async fn search_alerts_by_region(
        &self,
        region: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<PublicAlert>> {
        let data = self.data.read().await;
        let mut alerts: Vec<PublicAlert> = data
            .alerts
            .values()
            .filter(|alert| alert.location_name.contains(region) || alert.title.contains(region))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        alerts.truncate(limit);
        Ok(alerts)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user(&self, id: u64) -> anyhow::Result<Option<User>> {
        Ok(self.data.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let data = self.data.read().await;
        Ok(data
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_user_by_phone(&self, phone_number: &str) -> anyhow::Result<Option<User>> {
        let data = self.data.read().await;
        Ok(data
            .users
            .values()
            .find(|user| user.phone_number == phone_number)
            .cloned())
    }

    async fn insert_user(&self, user: NewUser) -> anyhow::Result<User> {
        self.mutate(|data| {
            if data.users.values().any(|u| u.username == user.username) {
                anyhow::bail!("username '{}' already exists", user.username);
            }
            let id = next(&mut data.ids.user);
            let created = User {
                id,
                username: user.username,
                password_hash: user.password_hash,
                name: user.name,
                phone_number: user.phone_number,
                birth_date: user.birth_date,
                agreements: user.agreements,
                is_admin: false,
                home_location_id: None,
                interested_location_ids: Vec::new(),
                interest_subcategory_ids: Vec::new(),
                created_at: Utc::now(),
            };
            data.users.insert(id, created.clone());
            Ok(created)
        })
        .await
    }

    async fn save_user(&self, user: &User) -> anyhow::Result<()> {
        self.mutate(|data| {
            data.users.insert(user.id, user.clone());
            Ok(())
        })
        .await
    }

    async fn usernames(&self, ids: &[u64]) -> anyhow::Result<HashMap<u64, String>> {
        let data = self.data.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| data.users.get(id).map(|u| (*id, u.username.clone())))
            .collect())
    }
}

#[async_trait]
impl BoardRepository for MemoryStore {
    async fn insert_post(&self, post: NewPost) -> anyhow::Result<Post> {
        self.mutate(|data| {
            let id = next(&mut data.ids.post);
            let now = Utc::now();
            let created = Post {
                id,
                category: post.category,
                author_id: post.author_id,
                title: post.title,
                content: post.content,
                created_at: now,
                updated_at: now,
                view_count: 0,
                is_active: true,
            };
            data.posts.insert(id, created.clone());
            Ok(created)
        })
        .await
    }

    async fn find_post(&self, id: u64) -> anyhow::Result<Option<Post>> {
        Ok(self.data.read().await.posts.get(&id).cloned())
    }

    async fn increment_post_views(&self, id: u64) -> anyhow::Result<Option<Post>> {
        self.mutate(|data| {
            Ok(data.posts.get_mut(&id).map(|post| {
                post.view_count += 1;
                post.clone()
            }))
        })
        .await
    }

    async fn update_post_text(
        &self,
        id: u64,
        title: Option<String>,
        content: Option<String>,
    ) -> anyhow::Result<Option<Post>> {
        self.mutate(|data| {
            Ok(data.posts.get_mut(&id).map(|post| {
                if let Some(title) = title {
                    post.title = title;
                }
                if let Some(content) = content {
                    post.content = content;
                }
                post.updated_at = Utc::now();
                post.clone()
            }))
        })
        .await
    }

    async fn deactivate_post(&self, id: u64) -> anyhow::Result<()> {
        self.mutate(|data| {
            match data.posts.get_mut(&id) {
                Some(post) => post.is_active = false,
                None => warn!(post_id = id, "deactivate on unknown post"),
            }
            Ok(())
        })
        .await
    }

    async fn delete_post(&self, id: u64) -> anyhow::Result<()> {
        self.mutate(|data| {
            data.posts.remove(&id);
            data.comments.retain(|_, comment| comment.post_id != id);
            data.likes.retain(|like| like.post_id != id);
            data.reports.retain(|report| report.post_id != id);
            Ok(())
        })
        .await
    }

    async fn list_posts(&self) -> anyhow::Result<Vec<Post>> {
        Ok(self.data.read().await.posts.values().cloned().collect())
    }

    async fn post_stats(&self, post_ids: &[u64]) -> anyhow::Result<HashMap<u64, PostStats>> {
        let data = self.data.read().await;
        let mut stats: HashMap<u64, PostStats> = post_ids
            .iter()
            .map(|id| (*id, PostStats::default()))
            .collect();
        for like in &data.likes {
            if let Some(entry) = stats.get_mut(&like.post_id) {
                entry.likes += 1;
            }
        }
        for comment in data.comments.values().filter(|c| c.is_active) {
            if let Some(entry) = stats.get_mut(&comment.post_id) {
                entry.comments += 1;
            }
        }
        for report in &data.reports {
            if let Some(entry) = stats.get_mut(&report.post_id) {
                entry.reports += 1;
            }
        }
        Ok(stats)
    }

    async fn insert_comment(&self, comment: NewComment) -> anyhow::Result<Comment> {
        self.mutate(|data| {
            let id = next(&mut data.ids.comment);
            let now = Utc::now();
            let created = Comment {
                id,
                post_id: comment.post_id,
                author_id: comment.author_id,
                content: comment.content,
                created_at: now,
                updated_at: now,
                is_active: true,
            };
            data.comments.insert(id, created.clone());
            Ok(created)
        })
        .await
    }

    async fn find_comment(&self, id: u64) -> anyhow::Result<Option<Comment>> {
        Ok(self.data.read().await.comments.get(&id).cloned())
    }

    async fn update_comment_content(
        &self,
        id: u64,
        content: String,
    ) -> anyhow::Result<Option<Comment>> {
        self.mutate(|data| {
            Ok(data.comments.get_mut(&id).map(|comment| {
                comment.content = content;
                comment.updated_at = Utc::now();
                comment.clone()
            }))
        })
        .await
    }

    async fn delete_comment(&self, id: u64) -> anyhow::Result<()> {
        self.mutate(|data| {
            data.comments.remove(&id);
            Ok(())
        })
        .await
    }

    async fn comments_for_post(&self, post_id: u64) -> anyhow::Result<Vec<Comment>> {
        let data = self.data.read().await;
        Ok(data
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn comments_by_author(&self, author_id: u64) -> anyhow::Result<Vec<Comment>> {
        let data = self.data.read().await;
        Ok(data
            .comments
            .values()
            .filter(|comment| comment.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn toggle_like(&self, post_id: u64, user_id: u64) -> anyhow::Result<bool> {
        self.mutate(|data| {
            let before = data.likes.len();
            data.likes
                .retain(|like| !(like.post_id == post_id && like.user_id == user_id));
            if data.likes.len() == before {
                data.likes.push(Like {
                    post_id,
                    user_id,
                    created_at: Utc::now(),
                });
                Ok(true)
            } else {
                Ok(false)
            }
        })
        .await
    }

    async fn has_liked(&self, post_id: u64, user_id: u64) -> anyhow::Result<bool> {
        let data = self.data.read().await;
        Ok(data
            .likes
            .iter()
            .any(|like| like.post_id == post_id && like.user_id == user_id))
    }

    async fn has_reported(&self, post_id: u64, reporter_id: u64) -> anyhow::Result<bool> {
        let data = self.data.read().await;
        Ok(data
            .reports
            .iter()
            .any(|report| report.post_id == post_id && report.reporter_id == reporter_id))
    }

    async fn insert_report(
        &self,
        post_id: u64,
        reporter_id: u64,
        reason: ReportReason,
    ) -> anyhow::Result<Report> {
        self.mutate(|data| {
            if data
                .reports
                .iter()
                .any(|r| r.post_id == post_id && r.reporter_id == reporter_id)
            {
                anyhow::bail!("post {} already reported by user {}", post_id, reporter_id);
            }
            let report = Report {
                id: next(&mut data.ids.report),
                post_id,
                reporter_id,
                reason,
                created_at: Utc::now(),
            };
            data.reports.push(report.clone());
            Ok(report)
        })
        .await
    }
}

#[async_trait]
impl ChatRepository for MemoryStore {
    async fn insert_session(&self, session: ChatSession) -> anyhow::Result<()> {
        self.mutate(|data| {
            data.sessions.insert(session.session_id.clone(), session);
            Ok(())
        })
        .await
    }

    async fn find_session(&self, session_id: &str) -> anyhow::Result<Option<ChatSession>> {
        Ok(self.data.read().await.sessions.get(session_id).cloned())
    }

    async fn touch_session(&self, session_id: &str) -> anyhow::Result<()> {
        self.mutate(|data| {
            match data.sessions.get_mut(session_id) {
                Some(session) => session.updated_at = Utc::now(),
                None => warn!(session_id, "touch on unknown chat session"),
            }
            Ok(())
        })
        .await
    }

    async fn sessions_for_user(&self, user_id: u64) -> anyhow::Result<Vec<ChatSession>> {
        let data = self.data.read().await;
        Ok(data
            .sessions
            .values()
            .filter(|session| session.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn insert_message(
        &self,
        session_id: &str,
        kind: MessageKind,
        content: &str,
    ) -> anyhow::Result<ChatMessage> {
        self.mutate(|data| {
            let message = ChatMessage {
                id: next(&mut data.ids.message),
                session_id: session_id.to_string(),
                kind,
                content: content.to_string(),
                timestamp: Utc::now(),
            };
            data.messages.push(message.clone());
            Ok(message)
        })
        .await
    }

    async fn messages(&self, session_id: &str) -> anyhow::Result<Vec<ChatMessage>> {
        let data = self.data.read().await;
        Ok(data
            .messages
            .iter()
            .filter(|message| message.session_id == session_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::Agreements;
    use chrono::TimeZone;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            name: "주민".to_string(),
            phone_number: format!("+8210{}", username.len()),
            birth_date: None,
            agreements: Agreements::default(),
        }
    }

    #[tokio::test]
    async fn like_toggles_on_and_off() {
        let store = MemoryStore::new();
        assert!(store.toggle_like(1, 2).await.expect("like"));
        assert!(store.has_liked(1, 2).await.expect("has"));
        assert!(!store.toggle_like(1, 2).await.expect("unlike"));
        assert!(!store.has_liked(1, 2).await.expect("has"));
    }

    #[tokio::test]
    async fn delete_post_cascades() {
        let store = MemoryStore::new();
        let post = store
            .insert_post(NewPost {
                category: AlertCategory::Traffic,
                author_id: 1,
                title: "신호등 고장".to_string(),
                content: "교차로 신호등이 꺼져 있어요".to_string(),
            })
            .await
            .expect("post");
        store
            .insert_comment(NewComment {
                post_id: post.id,
                author_id: 2,
                content: "확인했습니다".to_string(),
            })
            .await
            .expect("comment");
        store.toggle_like(post.id, 2).await.expect("like");
        store
            .insert_report(post.id, 3, ReportReason::Spam)
            .await
            .expect("report");

        store.delete_post(post.id).await.expect("delete");
        assert!(store.find_post(post.id).await.expect("find").is_none());
        assert!(store.comments_for_post(post.id).await.expect("comments").is_empty());
        assert_eq!(
            store.post_stats(&[post.id]).await.expect("stats")[&post.id],
            PostStats::default()
        );
    }

    #[tokio::test]
    async fn duplicate_report_is_rejected() {
        let store = MemoryStore::new();
        store
            .insert_report(1, 2, ReportReason::Spam)
            .await
            .expect("first");
        assert!(store.insert_report(1, 2, ReportReason::Other).await.is_err());
    }

    #[tokio::test]
    async fn snapshot_round_trip() {
        let path = std::env::temp_dir().join(format!("neston-snapshot-{}.json", uuid::Uuid::new_v4()));
        let path_str = path.to_string_lossy().to_string();
        {
            let store = MemoryStore::open(Some(&path_str)).await.expect("open");
            store.insert_user(new_user("resident")).await.expect("user");
        }
        let reopened = MemoryStore::open(Some(&path_str)).await.expect("reopen");
        let user = reopened
            .find_user_by_username("resident")
            .await
            .expect("find")
            .expect("present");
        assert_eq!(user.id, 1);
        let second = reopened.insert_user(new_user("neighbor")).await.expect("user");
        assert_eq!(second.id, 2);
        let _ = std::fs::remove_file(&path);
    }

    fn scored_event(id: u64, score: i64, month: Option<u32>) -> LocalEvent {
        LocalEvent {
            id,
            api_id: None,
            title: format!("행사 {id}"),
            content: None,
            category_name: Some("문화.예술".to_string()),
            start_date: month.map(|m| {
                Utc.with_ymd_and_hms(2024, m, 1, 0, 0, 0)
                    .single()
                    .expect("date")
            }),
            end_date: None,
            location_name: "마포구".to_string(),
            location_id: None,
            place: None,
            image_url: None,
            org_link: None,
            latitude: None,
            longitude: None,
            recommendation_score: score,
        }
    }

    #[tokio::test]
    async fn region_search_prefers_soonest_among_equal_scores() {
        let store = MemoryStore::new();
        store
            .upsert_events(&[
                scored_event(1, 80, Some(4)),
                scored_event(2, 80, Some(9)),
                scored_event(3, 80, None),
                scored_event(4, 95, Some(12)),
            ])
            .await
            .expect("upsert");
        let ids: Vec<u64> = store
            .search_events_by_region("마포구", 5)
            .await
            .expect("search")
            .into_iter()
            .map(|event| event.id)
            .collect();
        assert_eq!(ids, vec![4, 1, 2, 3]);
    }

    #[tokio::test]
    async fn failed_snapshot_write_leaves_state_unchanged() {
        let blocker = std::env::temp_dir().join(format!("neston-blocker-{}", uuid::Uuid::new_v4()));
        std::fs::write(&blocker, b"not a directory").expect("blocker file");
        let path = blocker.join("snapshot.json");
        let store = MemoryStore::open(Some(&path.to_string_lossy()))
            .await
            .expect("open");

        assert!(store.insert_user(new_user("resident")).await.is_err());
        assert!(store
            .find_user_by_username("resident")
            .await
            .expect("find")
            .is_none());
        assert!(store.toggle_like(1, 2).await.is_err());
        assert!(!store.has_liked(1, 2).await.expect("has"));
        let _ = std::fs::remove_file(&blocker);
    }

    #[tokio::test]
    async fn targeted_post_updates_keep_other_fields() {
        let store = MemoryStore::new();
        let post = store
            .insert_post(NewPost {
                category: AlertCategory::Safety,
                author_id: 1,
                title: "가로등".to_string(),
                content: "골목 가로등이 꺼졌어요".to_string(),
            })
            .await
            .expect("post");

        store.deactivate_post(post.id).await.expect("deactivate");
        let viewed = store
            .increment_post_views(post.id)
            .await
            .expect("view")
            .expect("present");
        assert_eq!(viewed.view_count, 1);
        assert!(!viewed.is_active);

        let edited = store
            .update_post_text(post.id, Some("가로등 고장".to_string()), None)
            .await
            .expect("edit")
            .expect("present");
        assert_eq!(edited.title, "가로등 고장");
        assert_eq!(edited.content, "골목 가로등이 꺼졌어요");
        assert_eq!(edited.view_count, 1);
        assert!(!edited.is_active);

        assert!(store
            .increment_post_views(999)
            .await
            .expect("view")
            .is_none());
    }
}
