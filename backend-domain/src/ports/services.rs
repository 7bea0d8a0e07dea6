use std::time::Duration;

use async_trait::async_trait;

use crate::entities::{LocalEvent, PublicAlert, RegionalContext};

/// Single-use, expiring verification codes keyed by phone number.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Stores `code` for `phone_number`, replacing any previous code.
    async fn issue(&self, phone_number: &str, code: &str, ttl: Duration);
    /// Returns true and removes the code when it matches and has not expired.
    async fn consume(&self, phone_number: &str, code: &str) -> bool;
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_code(&self, phone_number: &str, code: &str) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ChatResponder: Send + Sync {
    /// Returns `Ok(None)` when no language model is configured.
    async fn respond(
        &self,
        question: &str,
        context: &RegionalContext,
    ) -> anyhow::Result<Option<String>>;
}

#[async_trait]
pub trait PublicDataFeed: Send + Sync {
    async fn fetch_cultural_events(&self) -> anyhow::Result<Vec<LocalEvent>>;
    async fn fetch_disaster_alerts(&self) -> anyhow::Result<Vec<PublicAlert>>;
}
