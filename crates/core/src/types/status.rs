//! Domain enums shared by the storefront and dashboard APIs.
//!
//! Each enum maps 1:1 onto a PostgreSQL enum type (created by the
//! migrations) and onto the snake_case wire representation used by the JSON
//! surface.

use serde::{Deserialize, Serialize};

/// How a coupon discounts the eligible items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "maison.discount_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage off the eligible subtotal.
    Percentage,
    /// Fixed amount off the eligible subtotal.
    Fixed,
    /// Shipping fee waived at checkout; item prices untouched.
    FreeShipping,
}

/// Which items a coupon applies to within the issuing brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "maison.coupon_scope", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum CouponScope {
    /// Every product of the issuing brand.
    EntireStore,
    /// Only the products linked through `coupon_product`.
    Products,
    /// Only products whose category is linked through `coupon_category`.
    Categories,
}

/// Shipping method offered by a brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "maison.shipping_method_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethodType {
    SameDay,
    Standard,
    Express,
    International,
}

/// Shipping zone a brand configures fees for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "maison.shipping_zone_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ShippingZoneType {
    Domestic,
    Regional,
    International,
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percentage => write!(f, "percentage"),
            Self::Fixed => write!(f, "fixed"),
            Self::FreeShipping => write!(f, "free_shipping"),
        }
    }
}

impl std::fmt::Display for CouponScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntireStore => write!(f, "entire_store"),
            Self::Products => write!(f, "products"),
            Self::Categories => write!(f, "categories"),
        }
    }
}

impl std::fmt::Display for ShippingMethodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SameDay => write!(f, "same_day"),
            Self::Standard => write!(f, "standard"),
            Self::Express => write!(f, "express"),
            Self::International => write!(f, "international"),
        }
    }
}

impl std::fmt::Display for ShippingZoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domestic => write!(f, "domestic"),
            Self::Regional => write!(f, "regional"),
            Self::International => write!(f, "international"),
        }
    }
}

impl std::str::FromStr for ShippingMethodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "same_day" => Ok(Self::SameDay),
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "international" => Ok(Self::International),
            _ => Err(format!("invalid shipping method type: {s}")),
        }
    }
}

impl std::str::FromStr for ShippingZoneType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domestic" => Ok(Self::Domestic),
            "regional" => Ok(Self::Regional),
            "international" => Ok(Self::International),
            _ => Err(format!("invalid shipping zone type: {s}")),
        }
    }
}
