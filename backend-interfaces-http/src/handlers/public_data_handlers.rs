use axum::extract::{Path, State};
use axum::Json;

use backend_application::queries::alert_queries;
use backend_application::AppState;
use backend_domain::{CategoryOption, PublicAlert};

use crate::error::HttpError;

pub async fn list_alert_categories() -> Json<Vec<CategoryOption>> {
    Json(alert_queries::list_alert_categories())
}

pub async fn list_alerts(
    State(state): State<AppState>,
    Path(category_key): Path<String>,
) -> Result<Json<Vec<PublicAlert>>, HttpError> {
    Ok(Json(alert_queries::list_alerts(&state, &category_key).await?))
}
