use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use backend_domain::ports::VerificationStore;

struct PendingCode {
    code: String,
    expires_at: Instant,
}

/// Process-local verification codes. Codes are single-use and expire.
#[derive(Default)]
pub struct InMemoryVerificationStore {
    codes: RwLock<HashMap<String, PendingCode>>,
}

impl InMemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops expired codes. Called on every issue so the map stays bounded by
    /// the number of numbers verified within one TTL.
    async fn purge_expired(&self, now: Instant) {
        self.codes
            .write()
            .await
            .retain(|_, pending| pending.expires_at > now);
    }
}

#[async_trait]
impl VerificationStore for InMemoryVerificationStore {
    async fn issue(&self, phone_number: &str, code: &str, ttl: Duration) {
        let now = Instant::now();
        self.purge_expired(now).await;
        self.codes.write().await.insert(
            phone_number.to_string(),
            PendingCode {
                code: code.to_string(),
                expires_at: now + ttl,
            },
        );
    }

    async fn consume(&self, phone_number: &str, code: &str) -> bool {
        let mut codes = self.codes.write().await;
        let Some(pending) = codes.get(phone_number) else {
            return false;
        };
        if pending.expires_at <= Instant::now() {
            codes.remove(phone_number);
            return false;
        }
        if pending.code != code.trim() {
            return false;
        }
        codes.remove(phone_number);
        true
    }
}
