//! Shipping configuration domain types.
//!
//! One configuration per brand, with method rows keyed on
//! `(config, method_type)` and zone rows keyed on `(config, zone_type)`.
//! Updates upsert the named keys and leave the rest untouched.

use rust_decimal::Decimal;
use serde::Serialize;

use maison_core::{
    BrandId, ShippingConfigId, ShippingMethodId, ShippingMethodType, ShippingZoneId,
    ShippingZoneType,
};

/// A brand's shipping configuration with children loaded.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingConfiguration {
    pub id: ShippingConfigId,
    pub brand_id: BrandId,
    pub methods: Vec<ShippingMethod>,
    pub zones: Vec<ShippingZone>,
}

/// A shipping method row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    pub method_type: ShippingMethodType,
    pub fee: Decimal,
    pub min_transit_days: i32,
    pub max_transit_days: i32,
    pub enabled: bool,
}

/// A shipping zone row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingZone {
    pub id: ShippingZoneId,
    pub zone_type: ShippingZoneType,
    pub fee: Decimal,
    /// ISO 3166-1 alpha-2 codes the zone covers; empty means the zone's
    /// default coverage.
    pub country_codes: Vec<String>,
}

/// Upsert payload for one method, keyed by `method_type`.
#[derive(Debug, Clone)]
pub struct ShippingMethodUpdate {
    pub method_type: ShippingMethodType,
    pub fee: Decimal,
    pub min_transit_days: i32,
    pub max_transit_days: i32,
    pub enabled: bool,
}

/// Upsert payload for one zone, keyed by `zone_type`.
#[derive(Debug, Clone)]
pub struct ShippingZoneUpdate {
    pub zone_type: ShippingZoneType,
    pub fee: Decimal,
    pub country_codes: Vec<String>,
}

/// The full upsert request: only the named methods/zones are touched.
#[derive(Debug, Clone, Default)]
pub struct ShippingUpdate {
    pub methods: Vec<ShippingMethodUpdate>,
    pub zones: Vec<ShippingZoneUpdate>,
}
