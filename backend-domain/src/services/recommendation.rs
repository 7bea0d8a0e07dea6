// Recommendation scoring and the two orderings of an event listing.
//
// final = base + category bonus + keyword bonus. The keyword bonus is flat:
// one or more keywords found in the title add it once.

use std::cmp::Ordering;

use crate::entities::{EventRecord, LocalEvent};
use crate::services::InterestProfile;
use crate::value_objects::EventSort;

pub const CATEGORY_MATCH_BONUS: i64 = 100;
pub const KEYWORD_MATCH_BONUS: i64 = 50;

#[derive(Debug, Clone)]
pub struct ScoredEvent {
    pub event: LocalEvent,
    pub final_score: i64,
}

fn has_keyword_match(event: &LocalEvent, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let title = event.title.to_lowercase();
    keywords.iter().any(|keyword| title.contains(keyword.as_str()))
}

fn lowered_keywords(profile: &InterestProfile) -> Vec<String> {
    profile
        .keywords
        .iter()
        .map(|keyword| keyword.to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

fn bonus_with(event: &LocalEvent, profile: &InterestProfile, keywords: &[String]) -> i64 {
    let mut bonus = 0;
    if event
        .category_name
        .as_deref()
        .map(|name| profile.parent_categories.contains(name))
        .unwrap_or(false)
    {
        bonus += CATEGORY_MATCH_BONUS;
    }
    if has_keyword_match(event, keywords) {
        bonus += KEYWORD_MATCH_BONUS;
    }
    bonus
}

pub fn score_event(event: &LocalEvent, profile: &InterestProfile) -> i64 {
    event.recommendation_score + bonus_with(event, profile, &lowered_keywords(profile))
}

/// Orders by final score, then by base score, both descending. The sort is
/// stable so events tied on both keep their retrieval order.
pub fn rank_events(events: Vec<LocalEvent>, profile: &InterestProfile) -> Vec<ScoredEvent> {
    let keywords = lowered_keywords(profile);
    let mut scored: Vec<ScoredEvent> = events
        .into_iter()
        .map(|event| {
            let final_score = event.recommendation_score + bonus_with(&event, profile, &keywords);
            ScoredEvent { event, final_score }
        })
        .collect();
    scored.sort_by(|a, b| {
        b.final_score
            .cmp(&a.final_score)
            .then_with(|| b.event.recommendation_score.cmp(&a.event.recommendation_score))
    });
    scored
}

/// Newest start date first; undated events go last.
pub fn sort_by_start_date(events: &mut [LocalEvent]) {
    events.sort_by(|a, b| match (a.start_date, b.start_date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Applies the requested ordering and converts to transport records.
/// Only the recommendation ordering carries a final score.
pub fn order_events(
    mut events: Vec<LocalEvent>,
    sort: EventSort,
    profile: &InterestProfile,
) -> Vec<EventRecord> {
    match sort {
        EventSort::Recommendation => rank_events(events, profile)
            .into_iter()
            .map(|scored| EventRecord::from_event(scored.event, Some(scored.final_score)))
            .collect(),
        EventSort::StartDate => {
            sort_by_start_date(&mut events);
            events
                .into_iter()
                .map(|event| EventRecord::from_event(event, None))
                .collect()
        }
    }
}
