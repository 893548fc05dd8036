//! Demo data seeding.
//!
//! Creates one brand with a small catalog, a coupon, and a full brand
//! configuration, driving the same service layer the dashboard uses so the
//! data goes through the real validation and resolution paths. Expects a
//! freshly migrated database; re-running fails on the unique brand name.

use rust_decimal_macros::dec;

use maison_admin::db::{BrandStore, PgDashboardStore};
use maison_admin::models::brand::slugify;
use maison_admin::models::{
    PayoutDetails, ReturnPolicyDraft, ShippingMethodUpdate, ShippingUpdate, ShippingZoneUpdate,
};
use maison_admin::services::catalog::{
    ImageForm, MeasurementForm, ProductForm, SizeForm, VariantForm,
};
use maison_admin::services::coupons::CouponForm;
use maison_admin::services::{catalog, coupons, payouts, returns, shipping};
use maison_core::{CouponScope, DiscountType, ShippingMethodType, ShippingZoneType};

use super::CliError;

const BRAND_NAME: &str = "Atelier Nord";

/// Seed the database with demo data.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;
    let store = PgDashboardStore::new(pool);

    let brand = store.create_brand(BRAND_NAME, &slugify(BRAND_NAME)).await?;
    tracing::info!(brand_id = %brand.id, "created demo brand");

    let product = catalog::upload_product(
        &store,
        brand.id,
        ProductForm {
            name: "Wool Overcoat".to_owned(),
            description: Some("Double-breasted overcoat in brushed wool.".to_owned()),
            category: "Outerwear".to_owned(),
            subcategory: "Coats".to_owned(),
            season: "Autumn/Winter".to_owned(),
            gender: "Women".to_owned(),
            currency: "EUR".to_owned(),
        },
    )
    .await?;

    let navy = catalog::upload_variant(
        &store,
        brand.id,
        product.id,
        demo_variant("AN-WOC-NVY", "Navy", dec!(289.00)),
    )
    .await?;
    let camel = catalog::upload_variant(
        &store,
        brand.id,
        product.id,
        demo_variant("AN-WOC-CML", "Camel", dec!(289.00)),
    )
    .await?;
    tracing::info!(product_id = %product.id, "created demo product with variants");

    let coupon = coupons::create_coupon(
        &store,
        brand.id,
        CouponForm {
            code: "WELCOME10".to_owned(),
            description: Some("10% off the first order".to_owned()),
            discount_type: DiscountType::Percentage,
            discount_value: dec!(10),
            applies_to: CouponScope::EntireStore,
            starts_at: None,
            expires_at: None,
            usage_limit: None,
            min_purchase_amount: Some(dec!(50.00)),
            is_active: true,
            products: vec![],
            categories: vec![],
            countries: vec![],
        },
    )
    .await?;

    shipping::update_shipping(
        &store,
        brand.id,
        ShippingUpdate {
            methods: vec![
                ShippingMethodUpdate {
                    method_type: ShippingMethodType::Standard,
                    fee: dec!(4.90),
                    min_transit_days: 2,
                    max_transit_days: 5,
                    enabled: true,
                },
                ShippingMethodUpdate {
                    method_type: ShippingMethodType::Express,
                    fee: dec!(12.90),
                    min_transit_days: 1,
                    max_transit_days: 2,
                    enabled: true,
                },
            ],
            zones: vec![ShippingZoneUpdate {
                zone_type: ShippingZoneType::Domestic,
                fee: dec!(0),
                country_codes: vec!["FR".to_owned()],
            }],
        },
    )
    .await?;

    returns::publish_policy(
        &store,
        brand.id,
        ReturnPolicyDraft {
            accepts_returns: true,
            window_days: 30,
            terms: "Returns accepted within 30 days of delivery. Items must be \
                    unworn with tags attached."
                .to_owned(),
        },
    )
    .await?;

    payouts::save_account(
        &store,
        brand.id,
        PayoutDetails {
            holder_name: "Atelier Nord SARL".to_owned(),
            bank_name: "Banque Demo".to_owned(),
            iban: "FR1420041010050500013M02606".to_owned(),
            country_code: "FR".to_owned(),
            currency_code: "EUR".to_owned(),
        },
    )
    .await?;

    #[allow(clippy::print_stdout)]
    {
        println!("seeded brand {} (id {})", brand.name, brand.id);
        println!(
            "  product {} (id {}) with variants {} and {}",
            product.name, product.id, navy.sku, camel.sku
        );
        println!("  coupon {} (id {})", coupon.code, coupon.id);
        println!("  shipping, return policy, and payout account configured");
    }
    Ok(())
}

/// A variant with two stocked sizes and a main plus detail image.
fn demo_variant(sku: &str, color: &str, price: rust_decimal::Decimal) -> VariantForm {
    let slug = color.to_lowercase();
    VariantForm {
        sku: sku.to_owned(),
        price,
        colors: vec![color.to_owned()],
        materials: vec!["Wool".to_owned(), "Cashmere".to_owned()],
        tags: vec!["new-season".to_owned()],
        images: vec![
            ImageForm {
                path: format!("products/wool-overcoat/{slug}-front.jpg"),
                is_main: true,
            },
            ImageForm {
                path: format!("products/wool-overcoat/{slug}-detail.jpg"),
                is_main: false,
            },
        ],
        sizes: vec![
            SizeForm {
                name: "S".to_owned(),
                stock_quantity: 12,
                measurements: vec![
                    MeasurementForm {
                        name: "Chest".to_owned(),
                        value_cm: dec!(96),
                    },
                    MeasurementForm {
                        name: "Length".to_owned(),
                        value_cm: dec!(104),
                    },
                ],
            },
            SizeForm {
                name: "M".to_owned(),
                stock_quantity: 18,
                measurements: vec![
                    MeasurementForm {
                        name: "Chest".to_owned(),
                        value_cm: dec!(102),
                    },
                    MeasurementForm {
                        name: "Length".to_owned(),
                        value_cm: dec!(106),
                    },
                ],
            },
        ],
    }
}
