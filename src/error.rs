use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{dao::store::StoreError, state::phase::InvalidTransition};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Lobby or round does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Action attempted in the wrong lobby/phase state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Non-host attempting a host-only transition.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Lobby full, or too few players to start.
    #[error("capacity: {0}")]
    Capacity(String),
    /// Missing or malformed request fields.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Storage backend could not serve the request.
    #[error("storage unavailable")]
    Unavailable(#[source] StoreError),
    /// Invariant breakage that has no user-facing remedy.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<InvalidTransition> for ServiceError {
    fn from(err: InvalidTransition) -> Self {
        ServiceError::InvalidState(err.to_string())
    }
}

/// Application-level errors that are converted to HTTP responses.
///
/// Every variant maps to a 4xx/5xx status plus a machine-readable `kind` in
/// the body; clients branch on the kind, humans read the message.
#[derive(Debug, Error)]
pub enum AppError {
    /// Requested resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),
    /// Wrong lobby/phase state for the action (400).
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Host-only action attempted by another player (403).
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Lobby capacity constraint violated (400).
    #[error("capacity: {0}")]
    Capacity(String),
    /// Request failed validation (400).
    #[error("validation failed: {0}")]
    Validation(String),
    /// Storage unavailable; the client's next poll retries naturally (503).
    #[error("service unavailable: {0}")]
    Unavailable(String),
    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::InvalidState(message) => AppError::InvalidState(message),
            ServiceError::Forbidden(message) => AppError::Forbidden(message),
            ServiceError::Capacity(message) => AppError::Capacity(message),
            ServiceError::Validation(message) => AppError::Validation(message),
            ServiceError::Unavailable(source) => AppError::Unavailable(source.to_string()),
            ServiceError::Internal(message) => AppError::Internal(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::InvalidState(_) => "invalid_state",
            AppError::Forbidden(_) => "forbidden",
            AppError::Capacity(_) => "capacity",
            AppError::Validation(_) => "validation",
            AppError::Unavailable(_) => "unavailable",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_)
            | AppError::Capacity(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_keep_their_kind() {
        let app: AppError = ServiceError::Forbidden("only the host may advance".into()).into();
        assert_eq!(app.kind(), "forbidden");

        let app: AppError = ServiceError::Capacity("lobby is full".into()).into();
        assert_eq!(app.kind(), "capacity");
    }
}
