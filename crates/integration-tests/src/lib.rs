//! Cross-service integration tests for Maison.
//!
//! The suites under `tests/` drive the storefront and dashboard service
//! layers against the in-memory stores, covering workflows that span
//! crates: catalog uploads surfacing in listings, dashboard-created coupons
//! redeemed in a shopper's cart, and brand configuration round-trips.
//!
//! Run with `cargo test -p maison-integration-tests`; no database or
//! running server is needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use rust_decimal_macros::dec;

use maison_admin::db::{BrandStore, MemoryDashboardStore};
use maison_admin::models::Brand;
use maison_admin::services::catalog::{
    ImageForm, MeasurementForm, ProductForm, SizeForm, VariantForm,
};
use maison_admin::services::coupons::CouponForm;
use maison_core::{CouponScope, DiscountType};

/// Create the brand the fixtures hang off.
pub async fn demo_brand(store: &MemoryDashboardStore) -> Brand {
    store
        .create_brand("Atelier Nord", "atelier-nord")
        .await
        .expect("create demo brand")
}

/// A womenswear outerwear product, lookup values by name.
#[must_use]
pub fn product_form(name: &str) -> ProductForm {
    ProductForm {
        name: name.to_owned(),
        description: Some("Brushed wool, fully lined.".to_owned()),
        category: "Outerwear".to_owned(),
        subcategory: "Coats".to_owned(),
        season: "Autumn/Winter".to_owned(),
        gender: "Women".to_owned(),
        currency: "EUR".to_owned(),
    }
}

/// A navy wool variant with a main and a detail image.
#[must_use]
pub fn variant_form(sku: &str, sizes: &[(&str, i32)]) -> VariantForm {
    VariantForm {
        sku: sku.to_owned(),
        price: dec!(289.00),
        colors: vec!["Navy".to_owned()],
        materials: vec!["Wool".to_owned()],
        tags: vec!["new-season".to_owned()],
        images: vec![
            ImageForm {
                path: format!("products/{sku}/front.jpg"),
                is_main: true,
            },
            ImageForm {
                path: format!("products/{sku}/detail.jpg"),
                is_main: false,
            },
        ],
        sizes: sizes
            .iter()
            .map(|(name, stock)| SizeForm {
                name: (*name).to_owned(),
                stock_quantity: *stock,
                measurements: vec![MeasurementForm {
                    name: "Chest".to_owned(),
                    value_cm: dec!(100),
                }],
            })
            .collect(),
    }
}

/// An unrestricted, active 10%-off coupon.
#[must_use]
pub fn coupon_form(code: &str) -> CouponForm {
    CouponForm {
        code: code.to_owned(),
        description: None,
        discount_type: DiscountType::Percentage,
        discount_value: dec!(10),
        applies_to: CouponScope::EntireStore,
        starts_at: None,
        expires_at: None,
        usage_limit: None,
        min_purchase_amount: None,
        is_active: true,
        products: vec![],
        categories: vec![],
        countries: vec![],
    }
}
