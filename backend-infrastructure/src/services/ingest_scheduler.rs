use std::time::Duration;

use tracing::{error, info};

use backend_application::commands::ingest_commands::run_ingest;
use backend_application::AppState;

/// Runs the public data ingest every `ingest_interval_minutes`, starting
/// immediately. Errors are logged and the loop keeps going.
pub async fn schedule_ingest(state: AppState) {
    let interval = Duration::from_secs(state.config.ingest_interval_minutes.max(1) * 60);
    info!(
        interval_minutes = state.config.ingest_interval_minutes,
        "public data ingest scheduled"
    );
    loop {
        if let Err(err) = run_ingest(&state).await {
            error!("scheduled ingest failed: {}", err);
        }
        tokio::time::sleep(interval).await;
    }
}
