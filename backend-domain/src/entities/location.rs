// Location entity
// City / district / borough triple, unique per triple

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub city: String,
    pub district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borough: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    pub fn display_name(&self) -> String {
        match self.borough.as_deref().filter(|b| !b.trim().is_empty()) {
            Some(borough) => format!("{} {} {}", self.city, self.district, borough),
            None => format!("{} {}", self.city, self.district),
        }
    }

    pub fn triple_key(&self) -> (String, String, String) {
        (
            self.city.trim().to_string(),
            self.district.trim().to_string(),
            self.borough.clone().unwrap_or_default().trim().to_string(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationView {
    pub id: u64,
    pub name: String,
    pub district: String,
}

impl From<&Location> for LocationView {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id,
            name: location.display_name(),
            district: location.district.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationSearchQuery {
    pub query: Option<String>,
    pub limit: Option<usize>,
}
