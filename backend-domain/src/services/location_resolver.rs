use thiserror::Error;

use crate::entities::{Catalog, User};
use crate::value_objects::LocationMode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("'내 지역'을 먼저 설정해주세요.")]
    HomeLocationNotSet,
}

/// District names and catalog ids an event listing is scoped to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLocations {
    pub districts: Vec<String>,
    pub location_ids: Vec<u64>,
}

impl ResolvedLocations {
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty() && self.location_ids.is_empty()
    }

    fn push(&mut self, id: u64, district: &str) {
        if !self.location_ids.contains(&id) {
            self.location_ids.push(id);
        }
        let district = district.trim();
        if !district.is_empty() && !self.districts.iter().any(|d| d == district) {
            self.districts.push(district.to_string());
        }
    }
}

/// Resolves the user's home or interested locations.
///
/// A missing home location is a validation failure. An empty interested set
/// is not: it resolves to an empty value and the caller answers with no
/// events.
pub fn resolve_locations(
    user: &User,
    mode: LocationMode,
    catalog: &Catalog,
) -> Result<ResolvedLocations, LocationError> {
    let mut resolved = ResolvedLocations::default();
    match mode {
        LocationMode::Home => {
            let location = user
                .home_location_id
                .and_then(|id| catalog.location(id))
                .ok_or(LocationError::HomeLocationNotSet)?;
            resolved.push(location.id, &location.district);
        }
        LocationMode::Interested => {
            for location in user
                .interested_location_ids
                .iter()
                .filter_map(|id| catalog.location(*id))
            {
                resolved.push(location.id, &location.district);
            }
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Agreements, CategorySeed, Location};
    use chrono::Utc;

    fn catalog() -> Catalog {
        let locations = [(1, "강남구"), (2, "마포구"), (3, "서대문구")]
            .into_iter()
            .map(|(id, district)| Location {
                id,
                city: "서울특별시".to_string(),
                district: district.to_string(),
                borough: None,
                latitude: None,
                longitude: None,
            })
            .collect();
        Catalog::new(Vec::<CategorySeed>::new(), locations).expect("catalog")
    }

    fn user(home: Option<u64>, interested: Vec<u64>) -> User {
        User {
            id: 7,
            username: "resident".to_string(),
            password_hash: String::new(),
            name: "주민".to_string(),
            phone_number: "+821012345678".to_string(),
            birth_date: None,
            agreements: Agreements::default(),
            is_admin: false,
            home_location_id: home,
            interested_location_ids: interested,
            interest_subcategory_ids: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn home_mode_resolves_district() {
        let resolved = resolve_locations(&user(Some(1), vec![]), LocationMode::Home, &catalog())
            .expect("resolved");
        assert_eq!(resolved.districts, vec!["강남구".to_string()]);
        assert_eq!(resolved.location_ids, vec![1]);
    }

    #[test]
    fn home_mode_without_location_fails() {
        let err = resolve_locations(&user(None, vec![2]), LocationMode::Home, &catalog())
            .expect_err("home unset");
        assert_eq!(err, LocationError::HomeLocationNotSet);
    }

    #[test]
    fn interested_mode_with_no_locations_is_empty() {
        let resolved =
            resolve_locations(&user(Some(1), vec![]), LocationMode::Interested, &catalog())
                .expect("resolved");
        assert!(resolved.is_empty());
    }

    #[test]
    fn interested_mode_skips_unknown_and_duplicates() {
        let resolved = resolve_locations(
            &user(None, vec![2, 99, 3, 2]),
            LocationMode::Interested,
            &catalog(),
        )
        .expect("resolved");
        assert_eq!(resolved.districts, vec!["마포구".to_string(), "서대문구".to_string()]);
        assert_eq!(resolved.location_ids, vec![2, 3]);
    }
}
