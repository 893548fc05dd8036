//! Shopper identity extraction from gateway headers.
//!
//! Authentication is delegated to the hosted auth gateway, which forwards
//! exactly one of two headers with every storefront request:
//!
//! - `x-customer-id: <uuid>` for signed-in shoppers
//! - `x-anonymous-id: <uuid>` for guests (browser-generated)
//!
//! Requests carrying both are ambiguous (400); requests carrying neither
//! are unauthenticated (401).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use maison_core::{AnonymousId, CustomerId, IdentityError, ShopperIdentity};

use crate::error::AppError;

/// Header carrying the authenticated customer's id.
pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";
/// Header carrying the guest shopper's id.
pub const ANONYMOUS_ID_HEADER: &str = "x-anonymous-id";

/// Extractor resolving the shopper behind a request.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Shopper(shopper): Shopper) -> impl IntoResponse {
///     format!("cart owner: {shopper}")
/// }
/// ```
pub struct Shopper(pub ShopperIdentity);

impl<S> FromRequestParts<S> for Shopper
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve_identity(parts).map(Self).map_err(AppError::from)
    }
}

/// Parse the identity headers into a [`ShopperIdentity`].
fn resolve_identity(parts: &Parts) -> Result<ShopperIdentity, IdentityError> {
    let customer = header_uuid(parts, CUSTOMER_ID_HEADER)?;
    let anonymous = header_uuid(parts, ANONYMOUS_ID_HEADER)?;

    match (customer, anonymous) {
        (Some(_), Some(_)) => Err(IdentityError::Ambiguous),
        (Some(id), None) => Ok(ShopperIdentity::Customer(CustomerId::new(id))),
        (None, Some(id)) => Ok(ShopperIdentity::Anonymous(AnonymousId::new(id))),
        (None, None) => Err(IdentityError::Missing),
    }
}

fn header_uuid(parts: &Parts, name: &str) -> Result<Option<Uuid>, IdentityError> {
    let Some(value) = parts.headers.get(name) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| IdentityError::Malformed(format!("{name} is not valid UTF-8")))?;
    let uuid = value
        .parse::<Uuid>()
        .map_err(|_| IdentityError::Malformed(format!("{name} is not a valid UUID")))?;
    Ok(Some(uuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/cart");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).expect("request").into_parts().0
    }

    #[test]
    fn test_customer_header_resolves() {
        let id = Uuid::new_v4();
        let parts = parts(&[(CUSTOMER_ID_HEADER, &id.to_string())]);
        assert_eq!(
            resolve_identity(&parts),
            Ok(ShopperIdentity::Customer(CustomerId::new(id)))
        );
    }

    #[test]
    fn test_anonymous_header_resolves() {
        let id = Uuid::new_v4();
        let parts = parts(&[(ANONYMOUS_ID_HEADER, &id.to_string())]);
        assert_eq!(
            resolve_identity(&parts),
            Ok(ShopperIdentity::Anonymous(AnonymousId::new(id)))
        );
    }

    #[test]
    fn test_both_headers_are_ambiguous() {
        let id = Uuid::new_v4().to_string();
        let parts = parts(&[(CUSTOMER_ID_HEADER, &id), (ANONYMOUS_ID_HEADER, &id)]);
        assert_eq!(resolve_identity(&parts), Err(IdentityError::Ambiguous));
    }

    #[test]
    fn test_no_headers_is_missing() {
        assert_eq!(resolve_identity(&parts(&[])), Err(IdentityError::Missing));
    }

    #[test]
    fn test_malformed_uuid_rejected() {
        let parts = parts(&[(CUSTOMER_ID_HEADER, "not-a-uuid")]);
        assert!(matches!(
            resolve_identity(&parts),
            Err(IdentityError::Malformed(_))
        ));
    }
}
