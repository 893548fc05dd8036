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

use maison_core::{ApiEnvelope, FieldErrors, IdentityError};

use crate::db::RepositoryError;
use crate::services::discount::CouponIssue;

/// Application-level error type for the storefront.
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

    /// A coupon cannot be applied to the cart.
    #[error("coupon rejected: {0}")]
    Coupon(#[from] CouponIssue),

    /// Missing or unusable identity headers.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A cart mutation asked for more units than are in stock.
    #[error("insufficient stock: {available} available")]
    InsufficientStock {
        /// Units in stock at the time of the check.
        available: i32,
    },
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_owned()),
            RepositoryError::InsufficientStock { available } => {
                Self::InsufficientStock { available }
            }
            err @ (RepositoryError::Database(_) | RepositoryError::DataCorruption(_)) => {
                Self::Database(err)
            }
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Missing => Self::Unauthorized(err.to_string()),
            IdentityError::Ambiguous | IdentityError::Malformed(_) => {
                Self::BadRequest(err.to_string())
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
            Self::Validation(_) | Self::BadRequest(_) | Self::Coupon(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientStock { .. } => StatusCode::CONFLICT,
        };

        let envelope: ApiEnvelope<()> = match self {
            // Don't expose internal error details to clients
            Self::Database(_) => ApiEnvelope::error("internal server error"),
            Self::Validation(errors) => ApiEnvelope::validation("validation failed", errors),
            Self::InsufficientStock { available } => ApiEnvelope::error(format!(
                "only {available} left in stock for this size"
            )),
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
            status_of(AppError::Coupon(CouponIssue::Expired)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::InsufficientStock { available: 2 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Database(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_identity_errors_map_to_status() {
        let missing: AppError = IdentityError::Missing.into();
        assert!(matches!(missing, AppError::Unauthorized(_)));
        assert_eq!(status_of(missing), StatusCode::UNAUTHORIZED);

        let ambiguous: AppError = IdentityError::Ambiguous.into();
        assert!(matches!(ambiguous, AppError::BadRequest(_)));

        let malformed: AppError = IdentityError::Malformed("x-customer-id".to_owned()).into();
        assert_eq!(status_of(malformed), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_insufficient_stock_carries_available() {
        let err: AppError = RepositoryError::InsufficientStock { available: 3 }.into();
        assert!(matches!(err, AppError::InsufficientStock { available: 3 }));
    }
}
