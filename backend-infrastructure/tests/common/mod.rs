#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use backend_application::commands::user_commands::signup;
use backend_application::{AppState, Metrics};
use backend_domain::ports::{ChatResponder, LocalEventRepository, PublicDataFeed, SmsSender};
use backend_domain::{
    BotResponse, Catalog, CategorySeed, IngestStatus, LocalEvent, Location, PublicAlert,
    RegionalContext, RuntimeConfig, SignupRequest, SubCategorySeed, User,
};
use backend_infrastructure::{InMemoryVerificationStore, MemoryStore};

pub const GANGNAM: u64 = 1;
pub const MAPO: u64 = 2;
pub const SEODAEMUN: u64 = 3;
pub const LOCAL_PERFORMANCE: u64 = 11;
pub const EXHIBITION: u64 = 12;
pub const MARATHON: u64 = 21;

pub fn catalog() -> Catalog {
    let seeds = vec![
        CategorySeed {
            id: 1,
            name: "문화.예술".to_string(),
            subcategories: vec![
                SubCategorySeed {
                    id: LOCAL_PERFORMANCE,
                    name: "지역공연(연극, 뮤지컬, 콘서트)".to_string(),
                },
                SubCategorySeed {
                    id: EXHIBITION,
                    name: "전시".to_string(),
                },
            ],
        },
        CategorySeed {
            id: 2,
            name: "스포츠.레저".to_string(),
            subcategories: vec![SubCategorySeed {
                id: MARATHON,
                name: "마라톤".to_string(),
            }],
        },
    ];
    let locations = [(GANGNAM, "강남구"), (MAPO, "마포구"), (SEODAEMUN, "서대문구")]
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
    Catalog::new(seeds, locations).expect("catalog")
}

/// Delegates to the memory store and counts candidate reads.
pub struct CountingEvents {
    inner: Arc<MemoryStore>,
    pub reads: AtomicUsize,
}

#[async_trait]
impl LocalEventRepository for CountingEvents {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        self.inner.ensure_schema().await
    }

    async fn upsert_events(&self, events: &[LocalEvent]) -> anyhow::Result<()> {
        self.inner.upsert_events(events).await
    }

    async fn fetch_events_near(
        &self,
        districts: &[String],
        location_ids: &[u64],
    ) -> anyhow::Result<Vec<LocalEvent>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_events_near(districts, location_ids).await
    }

    async fn fetch_event(&self, id: u64) -> anyhow::Result<Option<LocalEvent>> {
        self.inner.fetch_event(id).await
    }

    async fn search_events_by_region(
        &self,
        region: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<LocalEvent>> {
        self.inner.search_events_by_region(region, limit).await
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.inner.ping().await
    }
}

#[derive(Default)]
pub struct CapturingSms {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SmsSender for CapturingSms {
    async fn send_code(&self, phone_number: &str, code: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .await
            .push((phone_number.to_string(), code.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct StubFeed {
    pub events: Vec<LocalEvent>,
    pub alerts: Vec<PublicAlert>,
    pub fail_events: bool,
}

#[async_trait]
impl PublicDataFeed for StubFeed {
    async fn fetch_cultural_events(&self) -> anyhow::Result<Vec<LocalEvent>> {
        if self.fail_events {
            return Err(anyhow!("upstream unavailable"));
        }
        Ok(self.events.clone())
    }

    async fn fetch_disaster_alerts(&self) -> anyhow::Result<Vec<PublicAlert>> {
        Ok(self.alerts.clone())
    }
}

/// Answers with a fixed text and remembers the last context it saw.
#[derive(Default)]
pub struct StubResponder {
    pub answer: Option<String>,
    pub fail: bool,
    pub last_context: Mutex<Option<RegionalContext>>,
}

#[async_trait]
impl ChatResponder for StubResponder {
    async fn respond(
        &self,
        _question: &str,
        context: &RegionalContext,
    ) -> anyhow::Result<Option<String>> {
        *self.last_context.lock().await = Some(context.clone());
        if self.fail {
            return Err(anyhow!("model unavailable"));
        }
        Ok(self.answer.clone())
    }
}

pub struct TestEnv {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub events: Arc<CountingEvents>,
    pub sms: Arc<CapturingSms>,
    pub responder: Arc<StubResponder>,
}

pub struct EnvOptions {
    pub feed: StubFeed,
    pub responder: StubResponder,
    pub bot_responses: Vec<BotResponse>,
}

impl Default for EnvOptions {
    fn default() -> Self {
        Self {
            feed: StubFeed::default(),
            responder: StubResponder::default(),
            bot_responses: vec![BotResponse {
                keyword: "날씨".to_string(),
                response: "날씨 정보는 기상청 홈페이지를 확인해주세요.".to_string(),
                is_active: true,
            }],
        }
    }
}

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub fn test_env() -> TestEnv {
    test_env_with(EnvOptions::default())
}

pub fn test_env_with(options: EnvOptions) -> TestEnv {
    let store = Arc::new(MemoryStore::new());
    let events = Arc::new(CountingEvents {
        inner: store.clone(),
        reads: AtomicUsize::new(0),
    });
    let sms = Arc::new(CapturingSms::default());
    let responder = Arc::new(options.responder);
    let config = RuntimeConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        bcrypt_cost: 4,
        ..RuntimeConfig::default()
    };
    let state = AppState {
        config,
        catalog: Arc::new(catalog()),
        bot_responses: Arc::new(options.bot_responses),
        event_repo: events.clone(),
        alert_repo: store.clone(),
        user_repo: store.clone(),
        board_repo: store.clone(),
        chat_repo: store.clone(),
        verification_store: Arc::new(InMemoryVerificationStore::new()),
        sms_sender: sms.clone(),
        chat_responder: responder.clone(),
        data_feed: Arc::new(options.feed),
        metrics: Arc::new(Metrics::default()),
        ingest_status: Arc::new(RwLock::new(IngestStatus::default())),
    };
    TestEnv {
        state,
        store,
        events,
        sms,
        responder,
    }
}

pub fn signup_request(username: &str, phone: &str) -> SignupRequest {
    SignupRequest {
        username: username.to_string(),
        password: "password123".to_string(),
        password2: "password123".to_string(),
        name: "주민".to_string(),
        phone_number: phone.to_string(),
        birth_date: None,
        location_services_agreed: true,
        marketing_push_agreed: false,
        terms_agreed: true,
        privacy_agreed: true,
    }
}

pub async fn register(state: &AppState, username: &str, phone: &str) -> User {
    signup(state, signup_request(username, phone))
        .await
        .expect("signup")
}

pub fn event(id: u64, title: &str, category: &str, base: i64, district: &str) -> LocalEvent {
    LocalEvent {
        id,
        api_id: None,
        title: title.to_string(),
        content: None,
        category_name: Some(category.to_string()),
        start_date: None,
        end_date: None,
        location_name: district.to_string(),
        location_id: None,
        place: None,
        image_url: None,
        org_link: None,
        latitude: None,
        longitude: None,
        recommendation_score: base,
    }
}
