use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("storage_backend must be 'clickhouse' or 'memory', got '{0}'")]
    UnknownStorageBackend(String),
    #[error("{0} must be an http(s) url")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Clickhouse,
    Memory,
}

pub fn parse_storage_backend(value: &str) -> Result<StorageBackend, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "clickhouse" => Ok(StorageBackend::Clickhouse),
        "memory" => Ok(StorageBackend::Memory),
        other => Err(ConfigError::UnknownStorageBackend(other.to_string())),
    }
}

pub fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl(field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_names() {
        assert_eq!(
            parse_storage_backend(" Memory ").expect("memory"),
            StorageBackend::Memory
        );
        assert_eq!(
            parse_storage_backend("clickhouse").expect("clickhouse"),
            StorageBackend::Clickhouse
        );
        assert_eq!(
            parse_storage_backend("sqlite"),
            Err(ConfigError::UnknownStorageBackend("sqlite".to_string()))
        );
    }

    #[test]
    fn urls_need_http_scheme() {
        assert!(validate_http_url("llm_api_url", "https://api.example.com/v1").is_ok());
        assert_eq!(
            validate_http_url("llm_api_url", "ftp://example.com"),
            Err(ConfigError::InvalidUrl("llm_api_url".to_string()))
        );
    }
}
