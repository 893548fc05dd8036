//! Unified error handling with Sentry integration.
//!
//! Every route handler returns `Result<T, AppError>`; the `IntoResponse`
//! conversion maps each kind to one HTTP status and the uniform JSON
//! envelope, and captures server-side failures to Sentry. Statuses are
//! applied consistently: a failed request never reports 200.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use maison_core::{ApiEnvelope, FieldErrors};

use crate::db::RepositoryError;

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(RepositoryError),

    /// Field-level validation failed.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// The request is well-formed but semantically wrong.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or unknown brand identity.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced entity does not exist or belongs to another brand.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint was violated.
    #[error("{0}")]
    Conflict(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_owned()),
            RepositoryError::Conflict(message) => Self::Conflict(message),
            err @ (RepositoryError::Database(_) | RepositoryError::DataCorruption(_)) => {
                Self::Database(err)
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(field_errors(&errors))
    }
}

/// Flatten `validator`'s error tree into the envelope's field map.
fn field_errors(errors: &validator::ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for (field, kinds) in errors.errors() {
        if let validator::ValidationErrorsKind::Field(field_errors) = kinds {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("invalid {field}"), ToString::to_string)
                })
                .collect();
            fields.insert((*field).to_string(), messages);
        }
    }
    fields
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        let envelope: ApiEnvelope<()> = match self {
            // Don't expose internal error details to clients
            Self::Database(_) => ApiEnvelope::error("internal server error"),
            Self::Validation(errors) => ApiEnvelope::validation("validation failed", errors),
            other => ApiEnvelope::error(other.to_string()),
        };

        (status, Json(envelope)).into_response()
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
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("x".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Unauthorized("x".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::BadRequest("x".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Conflict("duplicate".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Database(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_conflict_keeps_message() {
        let err: AppError = RepositoryError::Conflict("a coupon with this code already exists".to_owned()).into();
        match err {
            AppError::Conflict(message) => {
                assert_eq!(message, "a coupon with this code already exists");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }
}
