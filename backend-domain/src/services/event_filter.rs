use crate::entities::LocalEvent;
use crate::services::ResolvedLocations;

/// True when `location_name` names one of `districts`, either as the whole
/// label or as one of its whitespace-separated parts.
pub fn matches_district(location_name: &str, districts: &[String]) -> bool {
    let name = location_name.trim();
    if name.is_empty() {
        return false;
    }
    districts.iter().any(|district| {
        let district = district.trim();
        !district.is_empty()
            && (name == district || name.split_whitespace().any(|part| part == district))
    })
}

/// Blank category filters are ignored rather than rejected.
pub fn normalize_category_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

pub fn filter_events(
    events: Vec<LocalEvent>,
    locations: &ResolvedLocations,
    category: Option<&str>,
) -> Vec<LocalEvent> {
    events
        .into_iter()
        .filter(|event| {
            event
                .location_id
                .map(|id| locations.location_ids.contains(&id))
                .unwrap_or(false)
                || matches_district(&event.location_name, &locations.districts)
        })
        .filter(|event| match category {
            Some(name) => event.category_name.as_deref() == Some(name),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: u64, location_name: &str, category: Option<&str>) -> LocalEvent {
        LocalEvent {
            id,
            api_id: None,
            title: format!("event {id}"),
            content: None,
            category_name: category.map(ToString::to_string),
            start_date: None,
            end_date: None,
            location_name: location_name.to_string(),
            location_id: None,
            place: None,
            image_url: None,
            org_link: None,
            latitude: None,
            longitude: None,
            recommendation_score: 70,
        }
    }

    fn gangnam() -> ResolvedLocations {
        ResolvedLocations {
            districts: vec!["강남구".to_string()],
            location_ids: vec![1],
        }
    }

    #[test]
    fn district_match_accepts_exact_and_full_address() {
        let districts = vec!["강남구".to_string()];
        assert!(matches_district("강남구", &districts));
        assert!(matches_district("서울특별시 강남구", &districts));
        assert!(!matches_district("서초구", &districts));
        assert!(!matches_district("", &districts));
    }

    #[test]
    fn district_match_does_not_match_inside_other_names() {
        let districts = vec!["서구".to_string()];
        assert!(!matches_district("강서구", &districts));
        assert!(!matches_district("서울특별시 강서구", &districts));
    }

    #[test]
    fn filter_uses_location_reference_when_present() {
        let mut tagged = event(1, "역삼동 일대", None);
        tagged.location_id = Some(1);
        let kept = filter_events(vec![tagged, event(2, "역삼동 일대", None)], &gangnam(), None);
        assert_eq!(kept.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn filter_restricts_by_exact_category() {
        let events = vec![
            event(1, "강남구", Some("문화.예술")),
            event(2, "강남구", Some("축제.마켓")),
            event(3, "마포구", Some("문화.예술")),
        ];
        let kept = filter_events(events, &gangnam(), Some("문화.예술"));
        assert_eq!(kept.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn blank_category_filter_is_ignored() {
        assert_eq!(normalize_category_filter(Some("   ")), None);
        assert_eq!(normalize_category_filter(None), None);
        assert_eq!(
            normalize_category_filter(Some(" 문화.예술 ")),
            Some("문화.예술".to_string())
        );
    }
}
