// Location mode value object

use serde::{Deserialize, Serialize};

/// Which of the user's locations an event listing is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    Home,
    Interested,
}

impl LocationMode {
    /// Parses the `location_type` query value. `my_location` is the name the
    /// public API has always used for the home location.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "my_location" | "home" => Some(LocationMode::Home),
            "interested" => Some(LocationMode::Interested),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationMode::Home => "my_location",
            LocationMode::Interested => "interested",
        }
    }
}
