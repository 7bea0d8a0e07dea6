// Local event entity
// `location_name` is the free-text district label delivered by the data
// source; `location_id` is set when the event was tied to a catalog location.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RECOMMENDATION_SCORE: i64 = 70;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalEvent {
    pub id: u64,
    #[serde(default)]
    pub api_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub location_name: String,
    #[serde(default)]
    pub location_id: Option<u64>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub org_link: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default = "default_recommendation_score")]
    pub recommendation_score: i64,
}

fn default_recommendation_score() -> i64 {
    DEFAULT_RECOMMENDATION_SCORE
}

/// Transport record for an event, with the final score in ranking mode.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub id: u64,
    pub title: String,
    pub content: Option<String>,
    pub category_name: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location_name: String,
    pub place: Option<String>,
    pub image_url: Option<String>,
    pub recommendation_score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<i64>,
}

impl EventRecord {
    pub fn from_event(event: LocalEvent, final_score: Option<i64>) -> Self {
        Self {
            id: event.id,
            title: event.title,
            content: event.content,
            category_name: event.category_name,
            start_date: event.start_date,
            end_date: event.end_date,
            location_name: event.location_name,
            place: event.place,
            image_url: event.image_url,
            recommendation_score: event.recommendation_score,
            final_score,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct EventListQuery {
    pub location_type: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventCategoryButton {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}
