//! Return policy route handlers.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;

use maison_core::ApiEnvelope;

use crate::error::{AppError, Result};
use crate::middleware::BrandAuth;
use crate::models::{ReturnPolicy, ReturnPolicyDraft};
use crate::services::returns;
use crate::state::AppState;

/// Body of `PUT /api/returns`.
#[derive(Debug, Deserialize)]
pub struct ReturnPolicyRequest {
    pub accepts_returns: bool,
    pub window_days: i32,
    pub terms: String,
}

/// `PUT /api/returns` - publish a new policy version, superseding the
/// active one.
#[instrument(skip(state, request), fields(brand_id = %brand.id))]
pub async fn publish(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
    Json(request): Json<ReturnPolicyRequest>,
) -> Result<Json<ApiEnvelope<ReturnPolicy>>> {
    let policy = returns::publish_policy(
        state.store(),
        brand.id,
        ReturnPolicyDraft {
            accepts_returns: request.accepts_returns,
            window_days: request.window_days,
            terms: request.terms,
        },
    )
    .await?;
    Ok(Json(ApiEnvelope::ok("return policy published", policy)))
}

/// `GET /api/returns` - the active policy.
#[instrument(skip(state), fields(brand_id = %brand.id))]
pub async fn active(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
) -> Result<Json<ApiEnvelope<ReturnPolicy>>> {
    let policy = state
        .store()
        .active_return_policy(brand.id)
        .await?
        .ok_or_else(|| AppError::NotFound("no return policy published yet".to_owned()))?;
    Ok(Json(ApiEnvelope::ok("return policy", policy)))
}

/// `GET /api/returns/history` - every published version, newest first.
#[instrument(skip(state), fields(brand_id = %brand.id))]
pub async fn history(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
) -> Result<Json<ApiEnvelope<Vec<ReturnPolicy>>>> {
    let history = state.store().return_policy_history(brand.id).await?;
    Ok(Json(ApiEnvelope::ok("return policy history", history)))
}
