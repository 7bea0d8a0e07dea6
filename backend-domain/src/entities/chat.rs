// Chatbot entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    #[serde(default)]
    pub user_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub session_id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotResponse {
    pub keyword: String,
    pub response: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub summary: String,
    pub message_count: usize,
    pub last_message_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatExchange {
    pub success: bool,
    pub user_message: ChatMessage,
    pub bot_message: ChatMessage,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommunityNews {
    pub title: String,
    pub content: String,
    pub date: String,
    pub views: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertBrief {
    pub title: String,
    pub content: String,
    pub category: String,
    pub date: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EventBrief {
    pub title: String,
    pub content: String,
    pub period: String,
    pub location: String,
    pub score: i64,
}

/// Regional data handed to the responder alongside the user's question.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegionalContext {
    pub region: Option<String>,
    pub community_news: Vec<CommunityNews>,
    pub public_alerts: Vec<AlertBrief>,
    pub local_events: Vec<EventBrief>,
}

impl RegionalContext {
    pub fn is_empty(&self) -> bool {
        self.community_news.is_empty() && self.public_alerts.is_empty() && self.local_events.is_empty()
    }
}
