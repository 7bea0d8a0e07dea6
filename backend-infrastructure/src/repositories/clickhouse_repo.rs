use anyhow::Result;
use async_trait::async_trait;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use backend_domain::{
    AlertCategory, DbConfig, LocalEvent, LocalEventRepository, PublicAlert, PublicAlertRepository,
};

use crate::utils::{chrono_to_offset, offset_to_chrono};

const EVENT_COLUMNS: &str = "id, api_id, title, content, category_name, start_date, end_date, \
location_name, location_id, place, image_url, org_link, latitude, longitude, \
recommendation_score, updated_at";

const ALERT_COLUMNS: &str =
    "id, unique_id, title, content, category, published_at, location_name, source, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct LocalEventRow {
    pub id: u64,
    pub api_id: String,
    pub title: String,
    pub content: String,
    pub category_name: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(with = "clickhouse::serde::time::datetime64::millis::option")]
    pub end_date: Option<OffsetDateTime>,
    pub location_name: String,
    /// 0 when the event is not tied to a catalog location.
    pub location_id: u64,
    pub place: String,
    pub image_url: String,
    pub org_link: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub recommendation_score: i64,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct PublicAlertRow {
    pub id: u64,
    pub unique_id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub published_at: OffsetDateTime,
    pub location_name: String,
    pub source: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub updated_at: OffsetDateTime,
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl LocalEventRow {
    pub fn from_event(event: &LocalEvent, updated_at: OffsetDateTime) -> Self {
        Self {
            id: event.id,
            api_id: event.api_id.clone().unwrap_or_default(),
            title: event.title.clone(),
            content: event.content.clone().unwrap_or_default(),
            category_name: event.category_name.clone().unwrap_or_default(),
            start_date: event.start_date.map(chrono_to_offset),
            end_date: event.end_date.map(chrono_to_offset),
            location_name: event.location_name.clone(),
            location_id: event.location_id.unwrap_or(0),
            place: event.place.clone().unwrap_or_default(),
            image_url: event.image_url.clone().unwrap_or_default(),
            org_link: event.org_link.clone().unwrap_or_default(),
            latitude: event.latitude,
            longitude: event.longitude,
            recommendation_score: event.recommendation_score,
            updated_at,
        }
    }

    pub fn into_event(self) -> LocalEvent {
        LocalEvent {
            id: self.id,
            api_id: non_empty(self.api_id),
            title: self.title,
            content: non_empty(self.content),
            category_name: non_empty(self.category_name),
            start_date: self.start_date.map(offset_to_chrono),
            end_date: self.end_date.map(offset_to_chrono),
            location_name: self.location_name,
            location_id: Some(self.location_id).filter(|id| *id != 0),
            place: non_empty(self.place),
            image_url: non_empty(self.image_url),
            org_link: non_empty(self.org_link),
            latitude: self.latitude,
            longitude: self.longitude,
            recommendation_score: self.recommendation_score,
        }
    }
}

impl PublicAlertRow {
    pub fn from_alert(alert: &PublicAlert, updated_at: OffsetDateTime) -> Self {
        Self {
            id: alert.id,
            unique_id: alert.unique_id.clone().unwrap_or_default(),
            title: alert.title.clone(),
            content: alert.content.clone(),
            category: alert.category.key().to_string(),
            published_at: chrono_to_offset(alert.published_at),
            location_name: alert.location_name.clone(),
            source: alert.source.clone(),
            updated_at,
        }
    }

    pub fn into_alert(self) -> PublicAlert {
        PublicAlert {
            id: self.id,
            unique_id: non_empty(self.unique_id),
            title: self.title,
            content: self.content,
            category: AlertCategory::from_key(&self.category).unwrap_or_default(),
            published_at: offset_to_chrono(self.published_at),
            location_name: self.location_name,
            source: self.source,
        }
    }
}

/// Events and alerts in ClickHouse. Tables are `ReplacingMergeTree` keyed by
/// id, so an upsert is an insert and reads use `FINAL`.
#[derive(Clone)]
pub struct ClickhouseRepo {
    client: Client,
    database: String,
}

impl ClickhouseRepo {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn from_config(config: &DbConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.clickhouse_url)
            .with_database(&config.clickhouse_database);
        if let Some(user) = &config.clickhouse_user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.clickhouse_password {
            client = client.with_password(password);
        }
        Self::new(client, config.clickhouse_database.clone())
    }

    async fn create_tables(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_events = r#"
CREATE TABLE IF NOT EXISTS local_events (
    id UInt64,
    api_id String,
    title String,
    content String,
    category_name String,
    start_date Nullable(DateTime64(3)),
    end_date Nullable(DateTime64(3)),
    location_name String,
    location_id UInt64,
    place String,
    image_url String,
    org_link String,
    latitude Nullable(Float64),
    longitude Nullable(Float64),
    recommendation_score Int64,
    updated_at DateTime64(3)
) ENGINE = ReplacingMergeTree(updated_at)
ORDER BY id
"#;
        self.client.query(create_events).execute().await?;

        let create_alerts = r#"
CREATE TABLE IF NOT EXISTS public_alerts (
    id UInt64,
    unique_id String,
    title String,
    content String,
    category LowCardinality(String),
    published_at DateTime64(3),
    location_name String,
    source String,
    updated_at DateTime64(3)
) ENGINE = ReplacingMergeTree(updated_at)
ORDER BY id
"#;
        self.client.query(create_alerts).execute().await?;
        Ok(())
    }
}

#[async_trait]
impl LocalEventRepository for ClickhouseRepo {
    async fn ensure_schema(&self) -> Result<()> {
        self.create_tables().await
    }

    async fn upsert_events(&self, events: &[LocalEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        let now = OffsetDateTime::now_utc();
        let mut insert = self.client.insert("local_events")?;
        for event in events {
            insert.write(&LocalEventRow::from_event(event, now)).await?;
        }
        insert.end().await?;
        Ok(())
    }

    async fn fetch_events_near(
        &self,
        districts: &[String],
        location_ids: &[u64],
    ) -> Result<Vec<LocalEvent>> {
        if districts.is_empty() && location_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conditions = Vec::new();
        if !location_ids.is_empty() {
            conditions.push("has(?, location_id)");
        }
        if !districts.is_empty() {
            conditions.push("multiSearchAny(location_name, ?)");
        }
        let sql = format!(
            "SELECT {} FROM local_events FINAL WHERE {}",
            EVENT_COLUMNS,
            conditions.join(" OR ")
        );
        let mut query = self.client.query(&sql);
        if !location_ids.is_empty() {
            query = query.bind(location_ids);
        }
        if !districts.is_empty() {
            query = query.bind(districts);
        }
        let rows = query.fetch_all::<LocalEventRow>().await?;
        Ok(rows.into_iter().map(LocalEventRow::into_event).collect())
    }

    async fn fetch_event(&self, id: u64) -> Result<Option<LocalEvent>> {
        let sql = format!(
            "SELECT {} FROM local_events FINAL WHERE id = ? LIMIT 1",
            EVENT_COLUMNS
        );
        let row = self
            .client
            .query(&sql)
            .bind(id)
            .fetch_optional::<LocalEventRow>()
            .await?;
        Ok(row.map(LocalEventRow::into_event))
    }

    async fn search_events_by_region(&self, region: &str, limit: usize) -> Result<Vec<LocalEvent>> {
        let sql = format!(
            "SELECT {} FROM local_events FINAL WHERE positionUTF8(location_name, ?) > 0 \
             ORDER BY recommendation_score DESC, start_date ASC LIMIT ?",
            EVENT_COLUMNS
        );
        let rows = self
            .client
            .query(&sql)
            .bind(region)
            .bind(limit as u64)
            .fetch_all::<LocalEventRow>()
            .await?;
        Ok(rows.into_iter().map(LocalEventRow::into_event).collect())
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}

#[async_trait]
impl PublicAlertRepository for ClickhouseRepo {
    async fn upsert_alerts(&self, alerts: &[PublicAlert]) -> Result<()> {
        if alerts.is_empty() {
            return Ok(());
        }
        let now = OffsetDateTime::now_utc();
        let mut insert = self.client.insert("public_alerts")?;
        for alert in alerts {
            insert.write(&PublicAlertRow::from_alert(alert, now)).await?;
        }
        insert.end().await?;
        Ok(())
    }

    async fn fetch_alerts(&self, category: AlertCategory, limit: usize) -> Result<Vec<PublicAlert>> {
        let sql = format!(
            "SELECT {} FROM public_alerts FINAL WHERE category = ? \
             ORDER BY published_at DESC LIMIT ?",
            ALERT_COLUMNS
        );
        let rows = self
            .client
            .query(&sql)
            .bind(category.key())
            .bind(limit as u64)
            .fetch_all::<PublicAlertRow>()
            .await?;
        Ok(rows.into_iter().map(PublicAlertRow::into_alert).collect())
    }

    async fn search_alerts_by_region(&self, region: &str, limit: usize) -> Result<Vec<PublicAlert>> {
        let sql = format!(
            "SELECT {} FROM public_alerts FINAL \
             WHERE positionUTF8(location_name, ?) > 0 OR positionUTF8(title, ?) > 0 \
             ORDER BY published_at DESC LIMIT ?",
            ALERT_COLUMNS
        );
        let rows = self
            .client
            .query(&sql)
            .bind(region)
            .bind(region)
            .bind(limit as u64)
            .fetch_all::<PublicAlertRow>()
            .await?;
        Ok(rows.into_iter().map(PublicAlertRow::into_alert).collect())
    }
}
