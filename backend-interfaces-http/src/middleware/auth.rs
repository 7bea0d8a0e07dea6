use axum::http::HeaderMap;

use backend_application::auth::decode_access_token;
use backend_domain::RuntimeConfig;

use crate::error::HttpError;

/// Operator endpoints: open when no `api_token` is configured.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// User id from a valid access token in the `Authorization` header.
pub fn authenticate(config: &RuntimeConfig, headers: &HeaderMap) -> Result<u64, HttpError> {
    let token = extract_bearer(headers).ok_or(HttpError::Unauthorized)?;
    let claims = decode_access_token(config, &token)?;
    Ok(claims.sub)
}

/// Like [`authenticate`], but anonymous requests are allowed. A header that is
/// present but invalid is still rejected.
pub fn optional_user(config: &RuntimeConfig, headers: &HeaderMap) -> Result<Option<u64>, HttpError> {
    if headers.get("Authorization").is_none() {
        return Ok(None);
    }
    authenticate(config, headers).map(Some)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
