use std::time::Duration;

use anyhow::anyhow;

use crate::{AppError, AppState};
use backend_domain::IngestStatus;

const READY_TIMEOUT: Duration = Duration::from_secs(3);

pub async fn check_ready(state: &AppState) -> Result<(), AppError> {
    match tokio::time::timeout(READY_TIMEOUT, state.event_repo.ping()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(AppError::Internal(err)),
        Err(_) => Err(AppError::Internal(anyhow!("storage ping timed out"))),
    }
}

pub async fn ingest_status(state: &AppState) -> IngestStatus {
    state.ingest_status.read().await.clone()
}

pub fn render_metrics(state: &AppState) -> String {
    state.metrics.render_prometheus()
}
