// Runtime configuration handed to the application layer

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    /// Empty unless configured; startup validation rejects a blank secret.
    pub jwt_secret: String,
    pub jwt_ttl_minutes: u64,
    pub refresh_ttl_days: u64,
    pub bcrypt_cost: u32,
    pub sms_code_ttl_seconds: u64,
    pub ingest_enabled: bool,
    pub ingest_interval_minutes: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            api_token: None,
            jwt_secret: String::new(),
            jwt_ttl_minutes: 60,
            refresh_ttl_days: 7,
            bcrypt_cost: 12,
            sms_code_ttl_seconds: 180,
            ingest_enabled: false,
            ingest_interval_minutes: 360,
            max_body_bytes: 2 * 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IngestStatus {
    pub running: bool,
    pub last_started_at: Option<i64>,
    pub last_finished_at: Option<i64>,
    pub events_upserted: u64,
    pub alerts_upserted: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
