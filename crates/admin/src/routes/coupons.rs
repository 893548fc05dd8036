//! Coupon route handlers.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use maison_core::{ApiEnvelope, Coupon, CouponId, CouponScope, DiscountType};

use crate::error::{AppError, Result};
use crate::middleware::BrandAuth;
use crate::services::coupons::{self, CouponForm};
use crate::state::AppState;

/// Body of `POST /api/coupons` and `PUT /api/coupons/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct CouponRequest {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub applies_to: CouponScope,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub usage_limit: Option<i32>,
    pub min_purchase_amount: Option<Decimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Product names; required when `applies_to` is `products`.
    #[serde(default)]
    pub products: Vec<String>,
    /// Category names; required when `applies_to` is `categories`.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Country names or alpha-2 codes; empty means available everywhere.
    #[serde(default)]
    pub countries: Vec<String>,
}

const fn default_active() -> bool {
    true
}

impl From<CouponRequest> for CouponForm {
    fn from(request: CouponRequest) -> Self {
        Self {
            code: request.code,
            description: request.description,
            discount_type: request.discount_type,
            discount_value: request.discount_value,
            applies_to: request.applies_to,
            starts_at: request.starts_at,
            expires_at: request.expires_at,
            usage_limit: request.usage_limit,
            min_purchase_amount: request.min_purchase_amount,
            is_active: request.is_active,
            products: request.products,
            categories: request.categories,
            countries: request.countries,
        }
    }
}

/// Body of `PATCH /api/coupons/{id}/active`.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub is_active: bool,
}

/// `POST /api/coupons`
#[instrument(skip(state, request), fields(brand_id = %brand.id))]
pub async fn create(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
    Json(request): Json<CouponRequest>,
) -> Result<Json<ApiEnvelope<Coupon>>> {
    request.validate()?;
    let coupon = coupons::create_coupon(state.store(), brand.id, request.into()).await?;
    Ok(Json(ApiEnvelope::ok("coupon created", coupon)))
}

/// `PUT /api/coupons/{id}`
#[instrument(skip(state, request), fields(brand_id = %brand.id))]
pub async fn update(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
    Path(coupon_id): Path<i32>,
    Json(request): Json<CouponRequest>,
) -> Result<Json<ApiEnvelope<Coupon>>> {
    request.validate()?;
    let coupon = coupons::update_coupon(
        state.store(),
        brand.id,
        CouponId::new(coupon_id),
        request.into(),
    )
    .await?;
    Ok(Json(ApiEnvelope::ok("coupon updated", coupon)))
}

/// `PATCH /api/coupons/{id}/active`
#[instrument(skip(state), fields(brand_id = %brand.id))]
pub async fn toggle(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
    Path(coupon_id): Path<i32>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<ApiEnvelope<Coupon>>> {
    let coupon = state
        .store()
        .set_coupon_active(brand.id, CouponId::new(coupon_id), request.is_active)
        .await?;
    let message = if request.is_active {
        "coupon activated"
    } else {
        "coupon deactivated"
    };
    Ok(Json(ApiEnvelope::ok(message, coupon)))
}

/// `GET /api/coupons`
#[instrument(skip(state), fields(brand_id = %brand.id))]
pub async fn list(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
) -> Result<Json<ApiEnvelope<Vec<Coupon>>>> {
    let coupons = state.store().list_coupons(brand.id).await?;
    Ok(Json(ApiEnvelope::ok("coupons", coupons)))
}

/// `GET /api/coupons/{id}`
#[instrument(skip(state), fields(brand_id = %brand.id))]
pub async fn detail(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
    Path(coupon_id): Path<i32>,
) -> Result<Json<ApiEnvelope<Coupon>>> {
    let coupon = state
        .store()
        .coupon_details(brand.id, CouponId::new(coupon_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("coupon {coupon_id} not found")))?;
    Ok(Json(ApiEnvelope::ok("coupon", coupon)))
}
