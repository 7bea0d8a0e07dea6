use tracing::error;

use crate::{AppError, AppState};
use backend_domain::{alert_category_options, AlertCategory, CategoryOption, PublicAlert};

const ALERT_LIST_LIMIT: usize = 100;

pub fn list_alert_categories() -> Vec<CategoryOption> {
    alert_category_options()
}

pub async fn list_alerts(state: &AppState, category_key: &str) -> Result<Vec<PublicAlert>, AppError> {
    let category = AlertCategory::from_key(category_key)
        .ok_or_else(|| AppError::NotFound(format!("alert category '{}'", category_key.trim())))?;
    let mut alerts = state
        .alert_repo
        .fetch_alerts(category, ALERT_LIST_LIMIT)
        .await
        .map_err(|err| {
            error!(category = category.key(), "failed to fetch alerts: {}", err);
            AppError::Internal(err)
        })?;
    alerts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    Ok(alerts)
}
