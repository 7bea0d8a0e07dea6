use std::sync::Arc;

use backend_domain::ports::{
    BoardRepository, ChatRepository, ChatResponder, LocalEventRepository, PublicAlertRepository,
    PublicDataFeed, SmsSender, UserRepository, VerificationStore,
};
use backend_domain::{BotResponse, Catalog, IngestStatus, RuntimeConfig};
use tokio::sync::RwLock;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub catalog: Arc<Catalog>,
    pub bot_responses: Arc<Vec<BotResponse>>,
    pub event_repo: Arc<dyn LocalEventRepository>,
    pub alert_repo: Arc<dyn PublicAlertRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub board_repo: Arc<dyn BoardRepository>,
    pub chat_repo: Arc<dyn ChatRepository>,
    pub verification_store: Arc<dyn VerificationStore>,
    pub sms_sender: Arc<dyn SmsSender>,
    pub chat_responder: Arc<dyn ChatResponder>,
    pub data_feed: Arc<dyn PublicDataFeed>,
    pub metrics: Arc<Metrics>,
    pub ingest_status: Arc<RwLock<IngestStatus>>,
}
