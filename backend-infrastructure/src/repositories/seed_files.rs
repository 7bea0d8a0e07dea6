use std::path::Path;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::warn;

use backend_domain::{BotResponse, CategorySeed, Location, SeedRepository};

/// Reads seed data from YAML or JSON files, chosen by file extension.
pub struct SeedFileRepository;

impl SeedFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SeedFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_by_extension<T: DeserializeOwned>(path: &str, content: &str) -> anyhow::Result<T> {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());
    match extension.as_deref() {
        Some("json") => Ok(serde_json::from_str(content)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(content)?),
        _ => Err(anyhow!("unsupported seed file format: {}", path)),
    }
}

async fn read_seed<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path))?;
    parse_by_extension(path, &content).with_context(|| format!("invalid seed file {}", path))
}

#[async_trait]
impl SeedRepository for SeedFileRepository {
    async fn load_taxonomy(&self, path: &str) -> anyhow::Result<Vec<CategorySeed>> {
        read_seed(path).await
    }

    async fn load_locations(&self, path: &str) -> anyhow::Result<Vec<Location>> {
        read_seed(path).await
    }

    async fn load_bot_responses(&self, path: &str) -> anyhow::Result<Vec<BotResponse>> {
        if !Path::new(path).exists() {
            warn!(path, "bot response file not found, keyword replies disabled");
            return Ok(Vec::new());
        }
        read_seed(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_yaml_parses() {
        let seeds: Vec<CategorySeed> = parse_by_extension(
            "taxonomy.yaml",
            r#"
- id: 1
  name: 문화.예술
  subcategories:
    - id: 11
      name: 지역공연(연극, 뮤지컬, 콘서트)
"#,
        )
        .expect("yaml");
        assert_eq!(seeds[0].subcategories[0].id, 11);
    }

    #[test]
    fn locations_json_parses() {
        let locations: Vec<Location> = parse_by_extension(
            "locations.json",
            r#"[{"id": 1, "city": "서울특별시", "district": "강남구"}]"#,
        )
        .expect("json");
        assert_eq!(locations[0].district, "강남구");
        assert!(locations[0].borough.is_none());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(parse_by_extension::<Vec<Location>>("locations.csv", "").is_err());
    }

    #[tokio::test]
    async fn missing_bot_responses_are_empty() {
        let repo = SeedFileRepository::new();
        let responses = repo
            .load_bot_responses("/nonexistent/neston/bot_responses.yaml")
            .await
            .expect("empty");
        assert!(responses.is_empty());
    }
}
