use async_trait::async_trait;
use tracing::info;

use backend_domain::ports::SmsSender;

/// Sender for environments without an SMS gateway: the code goes to the log.
#[derive(Default)]
pub struct LogSmsSender;

impl LogSmsSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send_code(&self, phone_number: &str, code: &str) -> anyhow::Result<()> {
        info!(phone_number, code, "verification code issued");
        Ok(())
    }
}
