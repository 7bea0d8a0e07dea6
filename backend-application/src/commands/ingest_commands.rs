use chrono::Utc;
use tracing::{error, info, warn};

use crate::{AppError, AppState};
use backend_domain::{Catalog, IngestStatus, LocalEvent};

/// Ties events to the catalog location whose district equals the event's
/// district label, when exactly one does.
pub fn link_locations(catalog: &Catalog, events: &mut [LocalEvent]) {
    for event in events.iter_mut().filter(|e| e.location_id.is_none()) {
        let name = event.location_name.trim();
        let mut matches = catalog
            .locations()
            .iter()
            .filter(|location| location.district == name && location.borough.is_none());
        if let (Some(location), None) = (matches.next(), matches.next()) {
            event.location_id = Some(location.id);
        }
    }
}

/// Pulls cultural events and disaster messages from the public data feed and
/// upserts them. A failure in one source does not stop the other.
pub async fn run_ingest(state: &AppState) -> Result<IngestStatus, AppError> {
    {
        let mut status = state.ingest_status.write().await;
        if status.running {
            return Err(AppError::Conflict("ingest already running".to_string()));
        }
        status.running = true;
        status.last_started_at = Some(Utc::now().timestamp_millis());
        status.last_error = None;
    }

    let mut errors = Vec::new();
    let mut events_upserted = 0usize;
    let mut alerts_upserted = 0usize;

    match state.data_feed.fetch_cultural_events().await {
        Ok(mut events) => {
            link_locations(&state.catalog, &mut events);
            match state.event_repo.upsert_events(&events).await {
                Ok(()) => events_upserted = events.len(),
                Err(err) => errors.push(format!("event upsert failed: {err}")),
            }
        }
        Err(err) => errors.push(format!("cultural event fetch failed: {err}")),
    }

    match state.data_feed.fetch_disaster_alerts().await {
        Ok(alerts) => match state.alert_repo.upsert_alerts(&alerts).await {
            Ok(()) => alerts_upserted = alerts.len(),
            Err(err) => errors.push(format!("alert upsert failed: {err}")),
        },
        Err(err) => errors.push(format!("disaster alert fetch failed: {err}")),
    }

    state.metrics.record_ingest(events_upserted, alerts_upserted);
    for err in &errors {
        state.metrics.record_ingest_error();
        warn!("{}", err);
    }

    let mut status = state.ingest_status.write().await;
    status.running = false;
    status.last_finished_at = Some(Utc::now().timestamp_millis());
    status.events_upserted = events_upserted as u64;
    status.alerts_upserted = alerts_upserted as u64;
    status.last_error = if errors.is_empty() {
        None
    } else {
        Some(errors.join("; "))
    };
    if errors.is_empty() {
        info!(events_upserted, alerts_upserted, "public data ingest finished");
    } else {
        error!(events_upserted, alerts_upserted, "public data ingest finished with errors");
    }
    Ok(status.clone())
}
