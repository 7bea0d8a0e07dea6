use chrono::Utc;
use tracing::{debug, error, warn};

use crate::queries::chat_queries::owned_session;
use crate::queries::user_queries::require_user;
use crate::{AppError, AppState};
use backend_domain::services::extract_region;
use backend_domain::utils::truncate_chars;
use backend_domain::{
    AlertBrief, BotResponse, ChatExchange, ChatRequest, ChatSession, CommunityNews, EventBrief,
    MessageKind, RegionalContext,
};

pub const CONTEXT_ITEM_LIMIT: usize = 5;
const CONTEXT_CONTENT_CHARS: usize = 200;
pub const FALLBACK_REPLY: &str =
    "죄송합니다. 질문을 이해하지 못했습니다. 지역 이름과 함께 다시 질문해주세요.";

pub async fn create_session(state: &AppState, user_id: u64) -> Result<ChatSession, AppError> {
    require_user(state, user_id).await?;
    let now = Utc::now();
    let session = ChatSession {
        session_id: uuid::Uuid::new_v4().to_string(),
        user_id: Some(user_id),
        created_at: now,
        updated_at: now,
        is_active: true,
    };
    state
        .chat_repo
        .insert_session(session.clone())
        .await
        .map_err(AppError::Internal)?;
    Ok(session)
}

pub async fn chat(
    state: &AppState,
    user_id: u64,
    request: ChatRequest,
) -> Result<ChatExchange, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("메시지를 입력해주세요.".to_string()));
    }
    let session_id = request
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("session_id is required".to_string()))?;
    let session = owned_session(state, user_id, session_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("유효하지 않은 세션입니다.".to_string()))?;

    let user_message = state
        .chat_repo
        .insert_message(&session.session_id, MessageKind::User, message)
        .await
        .map_err(AppError::Internal)?;
    let reply = build_reply(state, message).await?;
    let bot_message = state
        .chat_repo
        .insert_message(&session.session_id, MessageKind::Bot, &reply)
        .await
        .map_err(AppError::Internal)?;
    state
        .chat_repo
        .touch_session(&session.session_id)
        .await
        .map_err(AppError::Internal)?;

    Ok(ChatExchange {
        success: true,
        user_message,
        bot_message,
    })
}

/// Language model answer when one is configured and succeeds, otherwise the
/// first matching keyword response, otherwise a fixed fallback.
pub async fn build_reply(state: &AppState, message: &str) -> Result<String, AppError> {
    let context = gather_context(state, extract_region(message)).await?;
    match state.chat_responder.respond(message, &context).await {
        Ok(Some(answer)) if !answer.trim().is_empty() => return Ok(answer.trim().to_string()),
        Ok(_) => debug!("no language model answer, using keyword responses"),
        Err(err) => warn!("chat responder failed: {}", err),
    }
    Ok(keyword_reply(&state.bot_responses, message)
        .unwrap_or(FALLBACK_REPLY)
        .to_string())
}

pub fn keyword_reply<'a>(responses: &'a [BotResponse], message: &str) -> Option<&'a str> {
    responses
        .iter()
        .filter(|r| r.is_active && !r.keyword.trim().is_empty())
        .find(|r| message.contains(r.keyword.trim()))
        .map(|r| r.response.as_str())
}

/// Recent board posts, alerts and events that mention `region`. Empty when
/// no region was recognized.
pub async fn gather_context(
    state: &AppState,
    region: Option<&str>,
) -> Result<RegionalContext, AppError> {
    let Some(region) = region else {
        return Ok(RegionalContext::default());
    };

    let mut posts: Vec<_> = state
        .board_repo
        .list_posts()
        .await
        .map_err(|err| {
            error!("failed to load posts for chat context: {}", err);
            AppError::Internal(err)
        })?
        .into_iter()
        .filter(|post| post.is_active && (post.title.contains(region) || post.content.contains(region)))
        .collect();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let community_news = posts
        .into_iter()
        .take(CONTEXT_ITEM_LIMIT)
        .map(|post| CommunityNews {
            title: post.title,
            content: truncate_chars(&post.content, CONTEXT_CONTENT_CHARS),
            date: post.created_at.format("%Y-%m-%d").to_string(),
            views: post.view_count,
        })
        .collect();

    let public_alerts = state
        .alert_repo
        .search_alerts_by_region(region, CONTEXT_ITEM_LIMIT)
        .await
        .map_err(AppError::Internal)?
        .into_iter()
        .map(|alert| AlertBrief {
            title: alert.title,
            content: truncate_chars(&alert.content, CONTEXT_CONTENT_CHARS),
            category: alert.category.display_name().to_string(),
            date: alert.published_at.format("%Y-%m-%d %H:%M").to_string(),
            location: alert.location_name,
        })
        .collect();

    let local_events = state
        .event_repo
        .search_events_by_region(region, CONTEXT_ITEM_LIMIT)
        .await
        .map_err(AppError::Internal)?
        .into_iter()
        .map(|event| EventBrief {
            period: event_period(event.start_date, event.end_date),
            content: truncate_chars(event.content.as_deref().unwrap_or_default(), CONTEXT_CONTENT_CHARS),
            location: event.place.unwrap_or(event.location_name),
            score: event.recommendation_score,
            title: event.title,
        })
        .collect();

    Ok(RegionalContext {
        region: Some(region.to_string()),
        community_news,
        public_alerts,
        local_events,
    })
}

fn event_period(
    start: Option<chrono::DateTime<Utc>>,
    end: Option<chrono::DateTime<Utc>>,
) -> String {
    let fmt = |d: chrono::DateTime<Utc>| d.format("%Y-%m-%d").to_string();
    match (start, end) {
        (Some(s), Some(e)) => format!("{} ~ {}", fmt(s), fmt(e)),
        (Some(s), None) => format!("{} ~", fmt(s)),
        (None, Some(e)) => format!("~ {}", fmt(e)),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn response(keyword: &str, text: &str, is_active: bool) -> BotResponse {
        BotResponse {
            keyword: keyword.to_string(),
            response: text.to_string(),
            is_active,
        }
    }

    #[test]
    fn keyword_reply_skips_inactive_entries() {
        let responses = vec![
            response("날씨", "비활성", false),
            response("날씨", "날씨 정보는 기상청을 확인하세요.", true),
        ];
        assert_eq!(
            keyword_reply(&responses, "오늘 날씨 어때?"),
            Some("날씨 정보는 기상청을 확인하세요.")
        );
        assert_eq!(keyword_reply(&responses, "안녕"), None);
    }

    #[test]
    fn period_formats_open_ranges() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap();
        assert_eq!(event_period(Some(start), Some(end)), "2024-05-01 ~ 2024-05-03");
        assert_eq!(event_period(Some(start), None), "2024-05-01 ~");
        assert_eq!(event_period(None, None), "");
    }
}
