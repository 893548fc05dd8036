//! Cart route handlers.
//!
//! Every mutation returns the full refreshed cart view, so clients never
//! need a follow-up read to stay consistent. Totals are computed at
//! response time: the stored `total_price` is the coupon-free subtotal and
//! the discount is re-evaluated from the current lines.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use maison_core::{ApiEnvelope, CartItemId, VariantId};

use crate::error::Result;
use crate::middleware::Shopper;
use crate::models::CartDetail;
use crate::services::cart as cart_service;
use crate::state::AppState;

/// One line of the cart as shoppers see it.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub id: CartItemId,
    pub variant_id: VariantId,
    pub product_name: String,
    pub sku: String,
    pub size: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    /// Public URL of the variant's main image.
    pub image_url: Option<String>,
}

/// The cart with its items and computed totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub free_shipping: bool,
    pub total: Decimal,
    /// Code of the applied coupon, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    /// Why the applied coupon currently yields no discount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_issue: Option<String>,
}

impl CartView {
    fn build(state: &AppState, detail: &CartDetail, country: Option<&str>) -> Self {
        let totals = cart_service::compute_totals(detail, country, Utc::now());
        Self {
            items: detail
                .lines
                .iter()
                .map(|line| CartItemView {
                    id: line.item.id,
                    variant_id: line.item.variant_id,
                    product_name: line.product_name.clone(),
                    sku: line.sku.clone(),
                    size: line.size_name.clone(),
                    quantity: line.item.quantity,
                    unit_price: line.item.unit_price,
                    line_total: line.item.line_total(),
                    image_url: line
                        .image_path
                        .as_deref()
                        .map(|path| state.config().asset_url(path)),
                })
                .collect(),
            subtotal: totals.subtotal,
            discount: totals.discount,
            free_shipping: totals.free_shipping,
            total: totals.total,
            coupon_code: detail.coupon.as_ref().map(|coupon| coupon.code.clone()),
            coupon_issue: totals.coupon_issue.map(|issue| issue.to_string()),
        }
    }
}

/// Query parameters for cart reads.
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    /// ISO 3166-1 alpha-2 code used when evaluating the applied coupon.
    pub country: Option<String>,
}

/// Body of `POST /api/cart/items`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddItemRequest {
    #[validate(range(min = 1, message = "must be a valid variant id"))]
    pub variant_id: i32,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub size: String,
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub quantity: i32,
}

/// Body of `PATCH /api/cart/items/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    /// New absolute quantity; 0 removes the line.
    #[validate(range(min = 0, message = "must not be negative"))]
    pub quantity: i32,
}

/// Body of `POST /api/cart/coupon`.
#[derive(Debug, Deserialize, Validate)]
pub struct ApplyCouponRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub code: String,
    /// ISO 3166-1 alpha-2 code, required by country-restricted coupons.
    #[validate(length(equal = 2, message = "must be a two-letter country code"))]
    pub country: Option<String>,
}

/// `GET /api/cart`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Shopper(shopper): Shopper,
    Query(query): Query<CartQuery>,
) -> Result<Json<ApiEnvelope<CartView>>> {
    let detail = state.store().cart_detail(shopper).await?;
    let view = CartView::build(&state, &detail, query.country.as_deref());
    Ok(Json(ApiEnvelope::ok("cart", view)))
}

/// `POST /api/cart/items`
#[instrument(skip(state, request), fields(request_id))]
pub async fn add_item(
    State(state): State<AppState>,
    Shopper(shopper): Shopper,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<ApiEnvelope<CartView>>> {
    request.validate()?;
    let detail = cart_service::add_item(
        state.store(),
        shopper,
        VariantId::new(request.variant_id),
        &request.size,
        request.quantity,
    )
    .await?;
    let view = CartView::build(&state, &detail, None);
    Ok(Json(ApiEnvelope::ok("item added to cart", view)))
}

/// `PATCH /api/cart/items/{id}`
#[instrument(skip(state, request), fields(request_id))]
pub async fn update_item(
    State(state): State<AppState>,
    Shopper(shopper): Shopper,
    Path(item_id): Path<i32>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<ApiEnvelope<CartView>>> {
    request.validate()?;
    let detail = cart_service::set_quantity(
        state.store(),
        shopper,
        CartItemId::new(item_id),
        request.quantity,
    )
    .await?;
    let view = CartView::build(&state, &detail, None);
    Ok(Json(ApiEnvelope::ok("cart updated", view)))
}

/// `DELETE /api/cart/items/{id}`
#[instrument(skip(state), fields(request_id))]
pub async fn remove_item(
    State(state): State<AppState>,
    Shopper(shopper): Shopper,
    Path(item_id): Path<i32>,
) -> Result<Json<ApiEnvelope<CartView>>> {
    let detail =
        cart_service::remove_item(state.store(), shopper, CartItemId::new(item_id)).await?;
    let view = CartView::build(&state, &detail, None);
    Ok(Json(ApiEnvelope::ok("item removed from cart", view)))
}

/// `POST /api/cart/coupon`
#[instrument(skip(state, request), fields(request_id))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    Shopper(shopper): Shopper,
    Json(request): Json<ApplyCouponRequest>,
) -> Result<Json<ApiEnvelope<CartView>>> {
    request.validate()?;
    let detail = cart_service::apply_coupon(
        state.store(),
        shopper,
        &request.code,
        request.country.as_deref(),
        Utc::now(),
    )
    .await?;
    let view = CartView::build(&state, &detail, request.country.as_deref());
    Ok(Json(ApiEnvelope::ok("coupon applied", view)))
}

/// `DELETE /api/cart/coupon`
#[instrument(skip(state), fields(request_id))]
pub async fn remove_coupon(
    State(state): State<AppState>,
    Shopper(shopper): Shopper,
) -> Result<Json<ApiEnvelope<CartView>>> {
    let detail = cart_service::remove_coupon(state.store(), shopper).await?;
    let view = CartView::build(&state, &detail, None);
    Ok(Json(ApiEnvelope::ok("coupon removed", view)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item_request_validation() {
        let bad = AddItemRequest {
            variant_id: 0,
            size: String::new(),
            quantity: 0,
        };
        let errors = bad.validate().expect_err("all fields invalid");
        assert_eq!(errors.errors().len(), 3);

        let good = AddItemRequest {
            variant_id: 42,
            size: "M".to_owned(),
            quantity: 2,
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_update_allows_zero_but_not_negative() {
        assert!(UpdateItemRequest { quantity: 0 }.validate().is_ok());
        assert!(UpdateItemRequest { quantity: -1 }.validate().is_err());
    }

    #[test]
    fn test_coupon_country_must_be_alpha2() {
        let request = ApplyCouponRequest {
            code: "welcome10".to_owned(),
            country: Some("USA".to_owned()),
        };
        assert!(request.validate().is_err());
    }
}
