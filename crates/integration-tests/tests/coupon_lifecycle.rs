//! Coupon lifecycle: creation with name resolution, association replacement,
//! activation, and redemption in a shopper's cart.

use chrono::Utc;
use rust_decimal_macros::dec;
use uuid::Uuid;

use maison_admin::db::{BrandStore, CatalogStore, CouponStore, MemoryDashboardStore};
use maison_admin::error::AppError;
use maison_admin::services::{catalog, coupons};
use maison_core::{AnonymousId, CategoryId, CouponScope, ShopperIdentity};
use maison_storefront::db::memory::{MemoryStorefrontStore, VariantFixture};
use maison_storefront::services::cart;

use maison_integration_tests::{coupon_form, demo_brand, product_form};

#[tokio::test]
async fn test_countries_resolve_by_name_or_code() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;

    let mut form = coupon_form("EU10");
    form.countries = vec!["France".to_owned(), "de".to_owned()];
    let coupon = coupons::create_coupon(&store, brand.id, form)
        .await
        .expect("create");

    let mut codes = store
        .coupon_details(brand.id, coupon.id)
        .await
        .expect("details")
        .expect("exists")
        .country_codes;
    codes.sort();
    assert_eq!(codes, vec!["DE".to_owned(), "FR".to_owned()]);
}

#[tokio::test]
async fn test_product_scope_resolves_names_within_brand() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;
    let product = catalog::upload_product(&store, brand.id, product_form("Wool Overcoat"))
        .await
        .expect("product");

    let mut form = coupon_form("COAT10");
    form.applies_to = CouponScope::Products;
    form.products = vec!["Wool Overcoat".to_owned()];
    let coupon = coupons::create_coupon(&store, brand.id, form)
        .await
        .expect("create");
    assert_eq!(coupon.product_ids, vec![product.id]);

    let mut form = coupon_form("GHOST10");
    form.applies_to = CouponScope::Products;
    form.products = vec!["Ghost Coat".to_owned()];
    let err = coupons::create_coupon(&store, brand.id, form)
        .await
        .expect_err("unknown product name");
    assert!(matches!(err, AppError::NotFound(ref m) if m == "product \"Ghost Coat\" not found"));
}

#[tokio::test]
async fn test_update_replaces_association_sets() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;
    catalog::upload_product(&store, brand.id, product_form("Wool Overcoat"))
        .await
        .expect("product");

    let mut form = coupon_form("SHIFT10");
    form.applies_to = CouponScope::Products;
    form.products = vec!["Wool Overcoat".to_owned()];
    let coupon = coupons::create_coupon(&store, brand.id, form)
        .await
        .expect("create");

    let mut form = coupon_form("SHIFT10");
    form.applies_to = CouponScope::Categories;
    form.categories = vec!["Outerwear".to_owned()];
    coupons::update_coupon(&store, brand.id, coupon.id, form)
        .await
        .expect("update");

    let details = store
        .coupon_details(brand.id, coupon.id)
        .await
        .expect("details")
        .expect("exists");
    let outerwear: CategoryId = store
        .category_id_by_name("Outerwear")
        .await
        .expect("lookup")
        .expect("exists");
    assert!(details.product_ids.is_empty(), "old set fully replaced");
    assert_eq!(details.category_ids, vec![outerwear]);
}

#[tokio::test]
async fn test_codes_unique_across_brands_case_insensitively() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;
    let other = store
        .create_brand("Maison Deux", "maison-deux")
        .await
        .expect("second brand");

    coupons::create_coupon(&store, brand.id, coupon_form("WELCOME10"))
        .await
        .expect("first");
    let err = coupons::create_coupon(&store, other.id, coupon_form("welcome10"))
        .await
        .expect_err("same code, different case, different brand");
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_toggle_flips_only_the_active_flag() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;
    let coupon = coupons::create_coupon(&store, brand.id, coupon_form("PAUSE10"))
        .await
        .expect("create");
    assert!(coupon.is_active);

    let toggled = store
        .set_coupon_active(brand.id, coupon.id, false)
        .await
        .expect("toggle");
    assert!(!toggled.is_active);
    assert_eq!(toggled.code, coupon.code);
    assert_eq!(toggled.discount_value, coupon.discount_value);
}

/// The full path: a coupon born in the dashboard discounts a shopper's cart.
#[tokio::test]
async fn test_dashboard_coupon_redeems_in_cart() {
    let dashboard = MemoryDashboardStore::new();
    let brand = demo_brand(&dashboard).await;
    let coupon = coupons::create_coupon(&dashboard, brand.id, coupon_form("WELCOME10"))
        .await
        .expect("create");

    let storefront = MemoryStorefrontStore::new();
    let (_, variant_id) = storefront.add_variant(VariantFixture {
        brand_id: brand.id,
        brand_name: brand.name.clone(),
        product_name: "Wool Overcoat".to_owned(),
        category_id: CategoryId::new(1),
        category_name: "Outerwear".to_owned(),
        sku: "AN-WOC-NVY".to_owned(),
        price: dec!(10.00),
        sizes: vec![("M".to_owned(), 10)],
    });
    storefront.add_coupon(coupon);

    let shopper = ShopperIdentity::Anonymous(AnonymousId::new(Uuid::new_v4()));
    cart::add_item(&storefront, shopper, variant_id, "M", 2)
        .await
        .expect("add");
    let detail = cart::apply_coupon(&storefront, shopper, "welcome10", None, Utc::now())
        .await
        .expect("apply");

    let totals = cart::compute_totals(&detail, None, Utc::now());
    assert_eq!(totals.subtotal, dec!(20.00));
    assert_eq!(totals.discount, dec!(2.00));
    assert_eq!(totals.total, dec!(18.00));
}
