use tracing::error;

use crate::{AppError, AppState};
use backend_domain::utils::truncate_chars;
use backend_domain::{ChatMessage, ChatSession, MessageKind, SessionSummary};

const SUMMARY_CHARS: usize = 50;

pub(crate) async fn owned_session(
    state: &AppState,
    user_id: u64,
    session_id: &str,
) -> Result<Option<ChatSession>, AppError> {
    let session = state
        .chat_repo
        .find_session(session_id.trim())
        .await
        .map_err(|err| {
            error!(session_id, "failed to load chat session: {}", err);
            AppError::Internal(err)
        })?;
    Ok(session.filter(|s| s.is_active && s.user_id == Some(user_id)))
}

/// First user question, or a placeholder for bot-only and empty sessions.
pub fn summarize(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return "빈 대화".to_string();
    }
    messages
        .iter()
        .find(|m| m.kind == MessageKind::User)
        .map(|m| format!("질문: {}", truncate_chars(&m.content, SUMMARY_CHARS)))
        .unwrap_or_else(|| "대화 내용".to_string())
}

pub async fn list_sessions(state: &AppState, user_id: u64) -> Result<Vec<SessionSummary>, AppError> {
    let mut sessions: Vec<ChatSession> = state
        .chat_repo
        .sessions_for_user(user_id)
        .await
        .map_err(AppError::Internal)?
        .into_iter()
        .filter(|s| s.is_active)
        .collect();
    sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let mut summaries = Vec::with_capacity(sessions.len());
    for session in sessions {
        let messages = state
            .chat_repo
            .messages(&session.session_id)
            .await
            .map_err(AppError::Internal)?;
        summaries.push(SessionSummary {
            summary: summarize(&messages),
            message_count: messages.len(),
            last_message_time: messages.last().map(|m| m.timestamp),
            session_id: session.session_id,
            created_at: session.created_at,
            updated_at: session.updated_at,
        });
    }
    Ok(summaries)
}

pub async fn session_messages(
    state: &AppState,
    user_id: u64,
    session_id: &str,
) -> Result<Vec<ChatMessage>, AppError> {
    let session = owned_session(state, user_id, session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("chat session '{}'", session_id.trim())))?;
    state
        .chat_repo
        .messages(&session.session_id)
        .await
        .map_err(AppError::Internal)
}
