//! Brand identity extraction from gateway headers.
//!
//! Dashboard users authenticate against the hosted auth gateway, which
//! forwards the acting brand's id in `x-brand-id` with every request. The
//! extractor resolves that id to a [`Brand`] row, so a forged or stale id
//! is rejected before any handler runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use maison_core::BrandId;

use crate::error::AppError;
use crate::models::Brand;
use crate::state::AppState;

/// Header carrying the acting brand's id.
pub const BRAND_ID_HEADER: &str = "x-brand-id";

/// Extractor resolving the brand behind a dashboard request.
///
/// Missing header or an id that resolves to no brand: 401. A header that is
/// not an integer: 400.
pub struct BrandAuth(pub Brand);

impl FromRequestParts<AppState> for BrandAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let brand_id = parse_brand_header(parts)?;
        let brand = state
            .store()
            .brand_by_id(brand_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("unknown brand".to_owned()))?;
        Ok(Self(brand))
    }
}

/// Parse the `x-brand-id` header into a [`BrandId`].
fn parse_brand_header(parts: &Parts) -> Result<BrandId, AppError> {
    let Some(value) = parts.headers.get(BRAND_ID_HEADER) else {
        return Err(AppError::Unauthorized(format!(
            "missing {BRAND_ID_HEADER} header"
        )));
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.parse::<i32>().ok())
        .map(BrandId::new)
        .ok_or_else(|| AppError::BadRequest(format!("{BRAND_ID_HEADER} is not a valid id")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/products");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).expect("request").into_parts().0
    }

    #[test]
    fn test_valid_header_parses() {
        let parsed = parse_brand_header(&parts(&[(BRAND_ID_HEADER, "7")])).unwrap();
        assert_eq!(parsed, BrandId::new(7));
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        assert!(matches!(
            parse_brand_header(&parts(&[])),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_non_numeric_header_is_bad_request() {
        assert!(matches!(
            parse_brand_header(&parts(&[(BRAND_ID_HEADER, "acme")])),
            Err(AppError::BadRequest(_))
        ));
    }
}
