use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use backend_domain::ports::ChatResponder;
use backend_domain::RegionalContext;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

const SYSTEM_PROMPT: &str = "당신은 서울 지역 정보를 안내하는 NestOn 챗봇입니다. \
제공된 지역 데이터(커뮤니티 소식, 공공 알림, 지역 행사)만 근거로 한국어로 간결하게 답하세요. \
데이터에 없는 내용은 모른다고 답하세요.";

/// OpenAI-compatible chat completions client. Without a configured endpoint
/// it answers `None` so callers fall back to keyword replies.
pub struct OpenAiChatResponder {
    client: Client,
    config: Option<LlmConfig>,
}

impl OpenAiChatResponder {
    pub fn new(config: Option<LlmConfig>) -> Result<Self> {
        let timeout = config
            .as_ref()
            .map(|c| c.timeout)
            .unwrap_or(Duration::from_secs(15));
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

pub fn build_user_prompt(question: &str, context: &RegionalContext) -> Result<String> {
    let data = serde_json::to_string_pretty(context)?;
    Ok(format!("[지역 데이터]\n{data}\n\n[질문]\n{question}"))
}

#[async_trait]
impl ChatResponder for OpenAiChatResponder {
    async fn respond(&self, question: &str, context: &RegionalContext) -> Result<Option<String>> {
        let Some(config) = &self.config else {
            return Ok(None);
        };
        let payload = json!({
            "model": config.model,
            "temperature": 0.3,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_user_prompt(question, context)? },
            ],
        });
        let mut request = self.client.post(&config.api_url).json(&payload);
        if let Some(key) = &config.api_key {
            request = request.bearer_auth(key);
        }
        let response: CompletionResponse = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("completion response has no content"))?;
        debug!(chars = answer.chars().count(), "language model answered");
        Ok(Some(answer))
    }
}
