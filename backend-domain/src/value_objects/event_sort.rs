// Event sort value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSort {
    #[default]
    StartDate,
    Recommendation,
}

impl From<&str> for EventSort {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "recommendation" => EventSort::Recommendation,
            _ => EventSort::StartDate,
        }
    }
}
