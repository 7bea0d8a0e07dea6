// Public alert entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::AlertCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicAlert {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    pub title: String,
    pub content: String,
    pub category: AlertCategory,
    pub published_at: DateTime<Utc>,
    pub location_name: String,
    #[serde(default)]
    pub source: String,
}
