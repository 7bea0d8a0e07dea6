mod common;

use chrono::{Duration, Utc};

use backend_application::commands::ingest_commands::run_ingest;
use backend_application::queries::alert_queries::{list_alert_categories, list_alerts};
use backend_application::queries::ops_queries::{ingest_status, render_metrics};
use backend_application::AppError;
use backend_domain::{AlertCategory, LocalEventRepository, PublicAlert};
use common::*;

fn alert(id: u64, category: AlertCategory, hours_ago: i64) -> PublicAlert {
    PublicAlert {
        id,
        unique_id: Some(format!("msg-{id}")),
        title: format!("알림 {id}"),
        content: "주의 바랍니다".to_string(),
        category,
        published_at: Utc::now() - Duration::hours(hours_ago),
        location_name: "서울특별시 마포구".to_string(),
        source: "행정안전부".to_string(),
    }
}

#[tokio::test]
async fn ingest_links_locations_and_stores_alerts() {
    let env = test_env_with(EnvOptions {
        feed: StubFeed {
            events: vec![
                event(10, "망원 재즈 페스티벌", "문화.예술", 70, "마포구"),
                event(11, "경기 야외 음악회", "문화.예술", 70, "수원시"),
            ],
            alerts: vec![
                alert(1, AlertCategory::Disaster, 5),
                alert(2, AlertCategory::Disaster, 1),
                alert(3, AlertCategory::Traffic, 2),
            ],
            fail_events: false,
        },
        ..EnvOptions::default()
    });

    let status = run_ingest(&env.state).await.expect("ingest");
    assert!(!status.running);
    assert_eq!(status.events_upserted, 2);
    assert_eq!(status.alerts_upserted, 3);
    assert!(status.last_error.is_none());

    let linked = env.store.fetch_event(10).await.expect("fetch").expect("event");
    assert_eq!(linked.location_id, Some(MAPO));
    let unlinked = env.store.fetch_event(11).await.expect("fetch").expect("event");
    assert_eq!(unlinked.location_id, None);

    let disasters = list_alerts(&env.state, "disaster").await.expect("alerts");
    let ids: Vec<u64> = disasters.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert!(matches!(
        list_alerts(&env.state, "weather").await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(list_alert_categories().len(), 6);

    assert!(render_metrics(&env.state).contains("neston_ingested_alerts_total 3\n"));
    assert_eq!(ingest_status(&env.state).await.alerts_upserted, 3);
}

#[tokio::test]
async fn failed_event_fetch_still_ingests_alerts() {
    let env = test_env_with(EnvOptions {
        feed: StubFeed {
            events: Vec::new(),
            alerts: vec![alert(1, AlertCategory::Safety, 1)],
            fail_events: true,
        },
        ..EnvOptions::default()
    });

    let status = run_ingest(&env.state).await.expect("ingest");
    assert_eq!(status.events_upserted, 0);
    assert_eq!(status.alerts_upserted, 1);
    assert!(status
        .last_error
        .as_deref()
        .expect("error recorded")
        .contains("upstream unavailable"));
    assert!(render_metrics(&env.state).contains("neston_ingest_errors_total 1\n"));
}

#[tokio::test]
async fn concurrent_ingest_is_rejected() {
    let env = test_env();
    env.state.ingest_status.write().await.running = true;
    assert!(matches!(
        run_ingest(&env.state).await,
        Err(AppError::Conflict(_))
    ));
}
