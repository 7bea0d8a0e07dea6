mod common;

use std::sync::atomic::Ordering;

use chrono::{TimeZone, Utc};

use backend_application::commands::user_commands::{
    update_home_location, update_interested_locations, update_interests,
};
use backend_application::queries::event_queries::{get_event, list_event_categories, list_events};
use backend_application::AppError;
use backend_domain::{
    EventListQuery, HomeLocationUpdate, InterestedLocationsUpdate, InterestsUpdate,
    LocalEventRepository,
};
use common::*;

fn query(location_type: &str, category: Option<&str>, sort: Option<&str>) -> EventListQuery {
    EventListQuery {
        location_type: Some(location_type.to_string()),
        category: category.map(ToString::to_string),
        sort: sort.map(ToString::to_string),
    }
}

#[tokio::test]
async fn unset_home_location_fails_without_reading_events() {
    let env = test_env();
    let user = register(&env.state, "resident", "010-1111-2222").await;

    let err = list_events(&env.state, user.id, query("my_location", None, None))
        .await
        .expect_err("home unset");
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(env.events.reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_interested_set_returns_nothing_without_reading_events() {
    let env = test_env();
    let user = register(&env.state, "resident", "010-1111-2222").await;

    let events = list_events(&env.state, user.id, query("interested", None, None))
        .await
        .expect("empty list");
    assert!(events.is_empty());
    assert_eq!(env.events.reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_or_unknown_location_type_is_rejected() {
    let env = test_env();
    let user = register(&env.state, "resident", "010-1111-2222").await;

    let missing = list_events(&env.state, user.id, EventListQuery::default()).await;
    assert!(matches!(missing, Err(AppError::BadRequest(_))));
    let unknown = list_events(&env.state, user.id, query("office", None, None)).await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn gangnam_recommendation_ranks_category_match_first() {
    let env = test_env();
    let user = register(&env.state, "resident", "010-1111-2222").await;
    update_home_location(
        &env.state,
        user.id,
        HomeLocationUpdate {
            location_id: Some(GANGNAM),
        },
    )
    .await
    .expect("home");
    update_interests(
        &env.state,
        user.id,
        InterestsUpdate {
            subcategory_ids: vec![LOCAL_PERFORMANCE],
        },
    )
    .await
    .expect("interests");
    env.store
        .upsert_events(&[
            event(100, "강남 코딩 교육 세미나", "문화.예술", 85, "강남구"),
            event(200, "강남역 푸드트럭 축제", "스포츠.레저", 92, "강남구"),
            event(300, "홍대 버스킹 콘서트", "문화.예술", 95, "마포구"),
        ])
        .await
        .expect("seed events");

    let ranked = list_events(
        &env.state,
        user.id,
        query("my_location", None, Some("recommendation")),
    )
    .await
    .expect("ranked");
    let ids: Vec<u64> = ranked.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![100, 200]);
    assert_eq!(ranked[0].final_score, Some(185));
    assert_eq!(ranked[1].final_score, Some(92));
    assert_eq!(env.events.reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn default_sort_is_newest_start_date_and_category_filter_applies() {
    let env = test_env();
    let user = register(&env.state, "resident", "010-1111-2222").await;
    update_interested_locations(
        &env.state,
        user.id,
        InterestedLocationsUpdate {
            location_ids: vec![MAPO, SEODAEMUN],
        },
    )
    .await
    .expect("interested");

    let mut older = event(1, "연희 문학 산책", "문화.예술", 70, "서대문구");
    older.start_date = Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
    let mut newer = event(2, "망원 한강 공연", "문화.예술", 70, "서울특별시 마포구");
    newer.start_date = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    let undated = event(3, "마포 플리마켓", "축제.마켓", 70, "마포구");
    let elsewhere = event(4, "강서 벼룩시장", "축제.마켓", 70, "강서구");
    env.store
        .upsert_events(&[older, newer, undated, elsewhere])
        .await
        .expect("seed");

    let all = list_events(&env.state, user.id, query("interested", None, None))
        .await
        .expect("all");
    let ids: Vec<u64> = all.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 1, 3]);
    assert!(all.iter().all(|e| e.final_score.is_none()));

    let culture = list_events(&env.state, user.id, query("interested", Some("문화.예술"), None))
        .await
        .expect("culture");
    assert_eq!(culture.len(), 2);

    let blank = list_events(&env.state, user.id, query("interested", Some("  "), None))
        .await
        .expect("blank category ignored");
    assert_eq!(blank.len(), 3);
}

#[tokio::test]
async fn categories_end_with_recommendation_button() {
    let env = test_env();
    let buttons = list_event_categories(&env.state);
    assert_eq!(buttons.len(), 3);
    assert_eq!(buttons[0].kind, "category");
    assert_eq!(buttons[0].name, "문화.예술");
    let last = buttons.last().expect("button");
    assert_eq!(last.kind, "recommendation");
    assert_eq!(last.name, "NestOn 추천 행사 보기");
}

#[tokio::test]
async fn event_detail_is_not_found_for_unknown_id() {
    let env = test_env();
    env.store
        .upsert_events(&[event(7, "구민 음악회", "문화.예술", 80, "강남구")])
        .await
        .expect("seed");
    assert_eq!(get_event(&env.state, 7).await.expect("found").title, "구민 음악회");
    assert!(matches!(
        get_event(&env.state, 8).await,
        Err(AppError::NotFound(_))
    ));
}
