use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig};

use crate::config::{parse_storage_backend, validate_http_url, StorageBackend};
use crate::services::{LlmConfig, PublicDataConfig};

pub const CONFIG_ENV: &str = "NESTON_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: u64,
    pub refresh_ttl_days: u64,
    pub bcrypt_cost: u32,
    pub storage_backend: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub snapshot_path: Option<String>,
    pub taxonomy_path: String,
    pub locations_path: String,
    pub bot_responses_path: String,
    pub sms_code_ttl_seconds: u64,
    pub seoul_api_base_url: String,
    pub seoul_api_key: Option<String>,
    pub disaster_api_url: String,
    pub disaster_api_key: Option<String>,
    pub ingest_enabled: bool,
    pub ingest_interval_minutes: u64,
    pub llm_api_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let runtime = RuntimeConfig::default();
        Self {
            bind_addr: runtime.bind_addr,
            api_token: None,
            jwt_secret: runtime.jwt_secret,
            jwt_ttl_minutes: runtime.jwt_ttl_minutes,
            refresh_ttl_days: runtime.refresh_ttl_days,
            bcrypt_cost: runtime.bcrypt_cost,
            storage_backend: "memory".to_string(),
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "neston".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            snapshot_path: Some("./data/snapshot.json".to_string()),
            taxonomy_path: "./data/taxonomy.yaml".to_string(),
            locations_path: "./data/locations.json".to_string(),
            bot_responses_path: "./data/bot_responses.yaml".to_string(),
            sms_code_ttl_seconds: runtime.sms_code_ttl_seconds,
            seoul_api_base_url: "http://openapi.seoul.go.kr:8088".to_string(),
            seoul_api_key: None,
            disaster_api_url: "https://www.safetydata.go.kr/V2/api/DSSP-IF-00247".to_string(),
            disaster_api_key: None,
            ingest_enabled: runtime.ingest_enabled,
            ingest_interval_minutes: runtime.ingest_interval_minutes,
            llm_api_url: None,
            llm_api_key: None,
            llm_model: "gpt-4o-mini".to_string(),
            max_body_bytes: runtime.max_body_bytes,
            request_timeout_seconds: runtime.request_timeout_seconds,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str(&content)?
        } else {
            warn!(path = %path, "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.finish(base_dir)?;
        Ok(config)
    }

    /// Normalizes, resolves relative paths against `base_dir` and validates.
    pub fn finish(&mut self, base_dir: Option<&Path>) -> Result<()> {
        self.normalize();
        self.resolve_paths(base_dir);
        self.validate()
    }

    pub fn normalize(&mut self) {
        for value in [
            &mut self.api_token,
            &mut self.clickhouse_user,
            &mut self.clickhouse_password,
            &mut self.snapshot_path,
            &mut self.seoul_api_key,
            &mut self.disaster_api_key,
            &mut self.llm_api_url,
            &mut self.llm_api_key,
            &mut self.log_dir,
        ] {
            if value.as_deref().map(|v| v.trim().is_empty()).unwrap_or(false) {
                *value = None;
            }
        }
        self.storage_backend = self.storage_backend.trim().to_lowercase();
        self.seoul_api_base_url = self.seoul_api_base_url.trim_end_matches('/').to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.taxonomy_path = resolve_path(base, &self.taxonomy_path);
        self.locations_path = resolve_path(base, &self.locations_path);
        self.bot_responses_path = resolve_path(base, &self.bot_responses_path);
        if let Some(path) = &self.snapshot_path {
            self.snapshot_path = Some(resolve_path(base, path));
        }
        if let Some(path) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, path));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        parse_storage_backend(&self.storage_backend)?;
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!(
                "jwt_secret must be set in the config file or NESTON_JWT_SECRET"
            ));
        }
        if self.jwt_ttl_minutes == 0 || self.refresh_ttl_days == 0 {
            return Err(anyhow!("token lifetimes must be greater than 0"));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(anyhow!("bcrypt_cost must be between 4 and 31"));
        }
        if self.sms_code_ttl_seconds == 0 {
            return Err(anyhow!("sms_code_ttl_seconds must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.ingest_enabled && self.ingest_interval_minutes == 0 {
            return Err(anyhow!("ingest_interval_minutes must be greater than 0"));
        }
        if let Some(url) = &self.llm_api_url {
            validate_http_url("llm_api_url", url)?;
        }
        validate_http_url("seoul_api_base_url", &self.seoul_api_base_url)?;
        validate_http_url("disaster_api_url", &self.disaster_api_url)?;
        Ok(())
    }

    pub fn storage(&self) -> Result<StorageBackend> {
        Ok(parse_storage_backend(&self.storage_backend)?)
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            jwt_secret: self.jwt_secret.clone(),
            jwt_ttl_minutes: self.jwt_ttl_minutes,
            refresh_ttl_days: self.refresh_ttl_days,
            bcrypt_cost: self.bcrypt_cost,
            sms_code_ttl_seconds: self.sms_code_ttl_seconds,
            ingest_enabled: self.ingest_enabled,
            ingest_interval_minutes: self.ingest_interval_minutes,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    /// `None` when no language model endpoint is configured.
    pub fn to_llm_config(&self) -> Option<LlmConfig> {
        self.llm_api_url.as_ref().map(|url| LlmConfig {
            api_url: url.clone(),
            api_key: self.llm_api_key.clone(),
            model: self.llm_model.clone(),
            timeout: Duration::from_secs(self.request_timeout_seconds.max(3)),
        })
    }

    pub fn to_public_data_config(&self) -> PublicDataConfig {
        PublicDataConfig {
            seoul_api_base_url: self.seoul_api_base_url.clone(),
            seoul_api_key: self.seoul_api_key.clone(),
            disaster_api_url: self.disaster_api_url.clone(),
            disaster_api_key: self.disaster_api_key.clone(),
            timeout: Duration::from_secs(self.request_timeout_seconds.max(10)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("NESTON_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("NESTON_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("NESTON_JWT_SECRET") {
            self.jwt_secret = value;
        }
        if let Ok(value) = env::var("NESTON_JWT_TTL_MINUTES") {
            self.jwt_ttl_minutes = value.parse().unwrap_or(self.jwt_ttl_minutes);
        }
        if let Ok(value) = env::var("NESTON_REFRESH_TTL_DAYS") {
            self.refresh_ttl_days = value.parse().unwrap_or(self.refresh_ttl_days);
        }
        if let Ok(value) = env::var("NESTON_BCRYPT_COST") {
            self.bcrypt_cost = value.parse().unwrap_or(self.bcrypt_cost);
        }
        if let Ok(value) = env::var("NESTON_STORAGE_BACKEND") {
            self.storage_backend = value;
        }
        if let Ok(value) = env::var("NESTON_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("NESTON_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("NESTON_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("NESTON_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("NESTON_SNAPSHOT_PATH") {
            self.snapshot_path = Some(value);
        }
        if let Ok(value) = env::var("NESTON_TAXONOMY_PATH") {
            self.taxonomy_path = value;
        }
        if let Ok(value) = env::var("NESTON_LOCATIONS_PATH") {
            self.locations_path = value;
        }
        if let Ok(value) = env::var("NESTON_BOT_RESPONSES_PATH") {
            self.bot_responses_path = value;
        }
        if let Ok(value) = env::var("NESTON_SMS_CODE_TTL_SECONDS") {
            self.sms_code_ttl_seconds = value.parse().unwrap_or(self.sms_code_ttl_seconds);
        }
        if let Ok(value) = env::var("NESTON_SEOUL_API_BASE_URL") {
            self.seoul_api_base_url = value;
        }
        if let Ok(value) = env::var("NESTON_SEOUL_API_KEY") {
            self.seoul_api_key = Some(value);
        }
        if let Ok(value) = env::var("NESTON_DISASTER_API_URL") {
            self.disaster_api_url = value;
        }
        if let Ok(value) = env::var("NESTON_DISASTER_API_KEY") {
            self.disaster_api_key = Some(value);
        }
        if let Ok(value) = env::var("NESTON_INGEST_ENABLED") {
            self.ingest_enabled = value.parse().unwrap_or(self.ingest_enabled);
        }
        if let Ok(value) = env::var("NESTON_INGEST_INTERVAL_MINUTES") {
            self.ingest_interval_minutes = value.parse().unwrap_or(self.ingest_interval_minutes);
        }
        if let Ok(value) = env::var("NESTON_LLM_API_URL") {
            self.llm_api_url = Some(value);
        }
        if let Ok(value) = env::var("NESTON_LLM_API_KEY") {
            self.llm_api_key = Some(value);
        }
        if let Ok(value) = env::var("NESTON_LLM_MODEL") {
            self.llm_model = value;
        }
        if let Ok(value) = env::var("NESTON_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("NESTON_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("NESTON_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret() -> AppConfig {
        AppConfig {
            jwt_secret: "test-secret".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn defaults_require_a_jwt_secret() {
        let mut config = AppConfig::default();
        assert!(config.jwt_secret.is_empty());
        let err = config.finish(None).expect_err("missing secret");
        assert!(err.to_string().contains("jwt_secret"));

        let mut config = with_secret();
        config.finish(None).expect("defaults validate");
        assert_eq!(config.storage().expect("backend"), StorageBackend::Memory);
        assert!(config.to_llm_config().is_none());
    }

    #[test]
    fn blank_optional_strings_become_none() {
        let mut config: AppConfig = toml::from_str(
            r#"
api_token = "  "
llm_api_url = ""
seoul_api_key = "key"
"#,
        )
        .expect("parse");
        config.normalize();
        assert!(config.api_token.is_none());
        assert!(config.llm_api_url.is_none());
        assert_eq!(config.seoul_api_key.as_deref(), Some("key"));
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let mut config = with_secret();
        config
            .finish(Some(Path::new("/etc/neston")))
            .expect("finish");
        assert_eq!(config.taxonomy_path, "/etc/neston/./data/taxonomy.yaml");
        assert_eq!(
            config.snapshot_path.as_deref(),
            Some("/etc/neston/./data/snapshot.json")
        );
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig {
            storage_backend: "postgres".to_string(),
            ..with_secret()
        };
        assert!(config.finish(None).is_err());

        let mut config = AppConfig {
            jwt_secret: " ".to_string(),
            ..AppConfig::default()
        };
        assert!(config.finish(None).is_err());

        let mut config = AppConfig {
            bind_addr: "not-an-addr".to_string(),
            ..with_secret()
        };
        assert!(config.finish(None).is_err());
    }
}
