// Alert category value object
// Shared by public alerts and community board posts

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Disaster,
    Accident,
    Traffic,
    Safety,
    Facility,
    #[default]
    Etc,
}

impl AlertCategory {
    pub const ALL: [AlertCategory; 6] = [
        AlertCategory::Disaster,
        AlertCategory::Accident,
        AlertCategory::Traffic,
        AlertCategory::Safety,
        AlertCategory::Facility,
        AlertCategory::Etc,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            AlertCategory::Disaster => "disaster",
            AlertCategory::Accident => "accident",
            AlertCategory::Traffic => "traffic",
            AlertCategory::Safety => "safety",
            AlertCategory::Facility => "facility",
            AlertCategory::Etc => "etc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AlertCategory::Disaster => "자연재해",
            AlertCategory::Accident => "사고",
            AlertCategory::Traffic => "교통",
            AlertCategory::Safety => "치안",
            AlertCategory::Facility => "시설고장",
            AlertCategory::Etc => "기타",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryOption {
    pub key: String,
    pub name: String,
}

pub fn alert_category_options() -> Vec<CategoryOption> {
    AlertCategory::ALL
        .iter()
        .map(|category| CategoryOption {
            key: category.key().to_string(),
            name: category.display_name().to_string(),
        })
        .collect()
}
