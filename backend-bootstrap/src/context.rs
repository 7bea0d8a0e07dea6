use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::info;

use backend_application::{AppState, Metrics};
use backend_domain::{
    Catalog, IngestStatus, LocalEventRepository, PublicAlertRepository, SeedRepository,
};
use backend_infrastructure::{
    AppConfig, ClickhouseRepo, InMemoryVerificationStore, LogSmsSender, MemoryStore,
    OpenAiChatResponder, OpenDataFeed, SeedFileRepository, StorageBackend,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();

        let seeds = SeedFileRepository::new();
        let taxonomy = seeds
            .load_taxonomy(&config.taxonomy_path)
            .await
            .with_context(|| format!("loading taxonomy from {}", config.taxonomy_path))?;
        let locations = seeds
            .load_locations(&config.locations_path)
            .await
            .with_context(|| format!("loading locations from {}", config.locations_path))?;
        let bot_responses = seeds
            .load_bot_responses(&config.bot_responses_path)
            .await?;
        let catalog = Catalog::new(taxonomy, locations)?;
        info!(
            categories = catalog.categories().len(),
            locations = catalog.locations().len(),
            bot_responses = bot_responses.len(),
            "seed data loaded"
        );

        let store = Arc::new(MemoryStore::open(config.snapshot_path.as_deref()).await?);
        let event_repo: Arc<dyn LocalEventRepository>;
        let alert_repo: Arc<dyn PublicAlertRepository>;
        match config.storage()? {
            StorageBackend::Clickhouse => {
                let repo = Arc::new(ClickhouseRepo::from_config(&config.to_db_config()));
                repo.ensure_schema().await?;
                info!("events and alerts stored in clickhouse");
                event_repo = repo.clone();
                alert_repo = repo;
            }
            StorageBackend::Memory => {
                info!("events and alerts stored in memory");
                event_repo = store.clone();
                alert_repo = store.clone();
            }
        }

        let state = AppState {
            config: runtime_config,
            catalog: Arc::new(catalog),
            bot_responses: Arc::new(bot_responses),
            event_repo,
            alert_repo,
            user_repo: store.clone(),
            board_repo: store.clone(),
            chat_repo: store,
            verification_store: Arc::new(InMemoryVerificationStore::new()),
            sms_sender: Arc::new(LogSmsSender::new()),
            chat_responder: Arc::new(OpenAiChatResponder::new(config.to_llm_config())?),
            data_feed: Arc::new(OpenDataFeed::new(config.to_public_data_config())?),
            metrics: Arc::new(Metrics::default()),
            ingest_status: Arc::new(RwLock::new(IngestStatus::default())),
        };

        Ok(Self { state })
    }
}
