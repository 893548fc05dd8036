//! Payout account route handlers. The IBAN never leaves the service
//! unmasked; both the upsert response and the read return
//! [`PayoutAccountView`].

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use maison_core::ApiEnvelope;

use crate::error::{AppError, Result};
use crate::middleware::BrandAuth;
use crate::models::{PayoutAccountView, PayoutDetails};
use crate::services::payouts;
use crate::state::AppState;

/// Body of `PUT /api/payout-account`.
#[derive(Debug, Deserialize, Validate)]
pub struct PayoutAccountRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub holder_name: String,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub bank_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub iban: String,
    #[validate(length(equal = 2, message = "must be an ISO 3166-1 alpha-2 code"))]
    pub country_code: String,
    #[validate(length(equal = 3, message = "must be an ISO 4217 code"))]
    pub currency_code: String,
}

/// `PUT /api/payout-account`
#[instrument(skip(state, request), fields(brand_id = %brand.id))]
pub async fn save(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
    Json(request): Json<PayoutAccountRequest>,
) -> Result<Json<ApiEnvelope<PayoutAccountView>>> {
    request.validate()?;
    let account = payouts::save_account(
        state.store(),
        brand.id,
        PayoutDetails {
            holder_name: request.holder_name,
            bank_name: request.bank_name,
            iban: request.iban,
            country_code: request.country_code,
            currency_code: request.currency_code,
        },
    )
    .await?;
    Ok(Json(ApiEnvelope::ok("payout account saved", account.into())))
}

/// `GET /api/payout-account`
#[instrument(skip(state), fields(brand_id = %brand.id))]
pub async fn show(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
) -> Result<Json<ApiEnvelope<PayoutAccountView>>> {
    let account = state
        .store()
        .payout_account(brand.id)
        .await?
        .ok_or_else(|| AppError::NotFound("no payout account on file".to_owned()))?;
    Ok(Json(ApiEnvelope::ok("payout account", account.into())))
}
