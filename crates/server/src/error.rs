//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers and services
//! return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::store::StoreError;

/// Application-level error taxonomy.
///
/// Every failure is terminal for its request: a call either fully succeeds
/// or reports exactly one of these.
#[derive(Debug, Error)]
pub enum AppError {
    /// A referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(&'static str),

    /// Authenticated, but not authorized for this resource.
    #[error("access denied")]
    Forbidden,

    /// Missing or invalid credential.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Malformed input: missing required field, out-of-range rating, ...
    #[error("validation error: {0}")]
    Validation(String),

    /// The image host (or another upstream collaborator) failed.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Document store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}

/// JSON error body returned to the client.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side errors to Sentry
        if matches!(self, Self::Store(_) | Self::Upstream(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => {
                    StatusCode::BAD_REQUEST
                }
                AuthError::Token(_) | AuthError::Hash(_) | AuthError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(StoreError::Conflict(msg)) => msg.clone(),
            Self::Store(_) => "Internal server error".to_owned(),
            Self::Upstream(_) => "External service error".to_owned(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::EmailTaken => "An account with this email already exists".to_owned(),
                AuthError::InvalidEmail(e) => e.to_string(),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::Token(_) | AuthError::Hash(_) | AuthError::Store(_) => {
                    "Internal server error".to_owned()
                }
            },
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        assert_eq!(status_of(AppError::NotFound("listing")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(AppError::Unauthorized("missing bearer token")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Validation("rating must be between 0 and 5".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Upstream("image host said no".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn store_details_are_not_leaked() {
        let resp = AppError::Store(StoreError::DataCorruption("secret table".into()));
        let body = format!("{resp:?}");
        assert!(body.contains("secret table")); // present internally...
        let status = status_of(AppError::Store(StoreError::DataCorruption(
            "secret table".into(),
        )));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
