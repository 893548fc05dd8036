//! Uniform JSON envelope for every API response.
//!
//! Success and failure share one shape so clients can branch on a single
//! `success` flag:
//!
//! ```json
//! { "success": true,  "message": "cart updated", "data": { ... } }
//! { "success": false, "message": "validation failed",
//!   "errors": { "quantity": ["must be greater than 0"] } }
//! ```
//!
//! `data` is omitted on failure and `errors` on success; neither key is
//! serialized as `null`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// The envelope wrapping every JSON body the APIs return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable summary of the outcome.
    pub message: String,
    /// Payload, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Field-level errors, present only on validation failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiEnvelope<T> {
    /// A successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }

    /// A successful response with no payload.
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    /// A failed response with only a summary message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    /// A failed response carrying per-field validation messages.
    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: Some(errors),
        }
    }
}
