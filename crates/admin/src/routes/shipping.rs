//! Shipping configuration route handlers.

use axum::Json;
use axum::extract::State;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use maison_core::{ApiEnvelope, ShippingMethodType, ShippingZoneType};

use crate::error::{AppError, Result};
use crate::middleware::BrandAuth;
use crate::models::{
    ShippingConfiguration, ShippingMethodUpdate, ShippingUpdate, ShippingZoneUpdate,
};
use crate::services::shipping;
use crate::state::AppState;

/// Body of `PUT /api/shipping`. Only the named methods and zones are
/// touched; omitted ones keep their current rows.
#[derive(Debug, Deserialize)]
pub struct ShippingRequest {
    #[serde(default)]
    pub methods: Vec<MethodRequest>,
    #[serde(default)]
    pub zones: Vec<ZoneRequest>,
}

#[derive(Debug, Deserialize)]
pub struct MethodRequest {
    pub method_type: ShippingMethodType,
    pub fee: Decimal,
    pub min_transit_days: i32,
    pub max_transit_days: i32,
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct ZoneRequest {
    pub zone_type: ShippingZoneType,
    pub fee: Decimal,
    #[serde(default)]
    pub country_codes: Vec<String>,
}

impl From<ShippingRequest> for ShippingUpdate {
    fn from(request: ShippingRequest) -> Self {
        Self {
            methods: request
                .methods
                .into_iter()
                .map(|method| ShippingMethodUpdate {
                    method_type: method.method_type,
                    fee: method.fee,
                    min_transit_days: method.min_transit_days,
                    max_transit_days: method.max_transit_days,
                    enabled: method.enabled,
                })
                .collect(),
            zones: request
                .zones
                .into_iter()
                .map(|zone| ShippingZoneUpdate {
                    zone_type: zone.zone_type,
                    fee: zone.fee,
                    country_codes: zone.country_codes,
                })
                .collect(),
        }
    }
}

/// `PUT /api/shipping`
#[instrument(skip(state, request), fields(brand_id = %brand.id))]
pub async fn update(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
    Json(request): Json<ShippingRequest>,
) -> Result<Json<ApiEnvelope<ShippingConfiguration>>> {
    let configuration = shipping::update_shipping(state.store(), brand.id, request.into()).await?;
    Ok(Json(ApiEnvelope::ok("shipping configuration saved", configuration)))
}

/// `GET /api/shipping`
#[instrument(skip(state), fields(brand_id = %brand.id))]
pub async fn show(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
) -> Result<Json<ApiEnvelope<ShippingConfiguration>>> {
    let configuration = state
        .store()
        .shipping_configuration(brand.id)
        .await?
        .ok_or_else(|| AppError::NotFound("shipping is not configured".to_owned()))?;
    Ok(Json(ApiEnvelope::ok("shipping configuration", configuration)))
}
