use backend_domain::{LocationError, SignupError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<LocationError> for AppError {
    fn from(err: LocationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<SignupError> for AppError {
    fn from(err: SignupError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
