//! Product and variant upload orchestration, end to end against the store.

use maison_admin::db::{BrandStore, CatalogStore, MemoryDashboardStore};
use maison_admin::error::AppError;
use maison_admin::services::catalog;

use maison_integration_tests::{demo_brand, product_form, variant_form};

#[tokio::test]
async fn test_upload_roundtrip_expands_children() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;

    let product = catalog::upload_product(&store, brand.id, product_form("Wool Overcoat"))
        .await
        .expect("product");
    catalog::upload_variant(
        &store,
        brand.id,
        product.id,
        variant_form("AN-WOC-NVY", &[("S", 5), ("M", 8)]),
    )
    .await
    .expect("variant");

    let detail = store
        .brand_product_detail(brand.id, product.id)
        .await
        .expect("detail")
        .expect("exists");
    assert_eq!(detail.product.name, "Wool Overcoat");
    assert_eq!(detail.variants.len(), 1);

    let variant = &detail.variants[0];
    assert_eq!(variant.sku, "AN-WOC-NVY");
    assert_eq!(variant.colors, vec!["Navy".to_owned()]);
    assert_eq!(variant.materials, vec!["Wool".to_owned()]);
    assert_eq!(variant.tags, vec!["new-season".to_owned()]);
    assert_eq!(variant.images.len(), 2);
    assert_eq!(variant.images.iter().filter(|i| i.is_main).count(), 1);
    assert_eq!(variant.sizes.len(), 2);
    let total_stock: i32 = variant.sizes.iter().map(|s| s.stock_quantity).sum();
    assert_eq!(total_stock, 13);
}

#[tokio::test]
async fn test_listing_aggregates_variants_and_stock() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;

    let product = catalog::upload_product(&store, brand.id, product_form("Wool Overcoat"))
        .await
        .expect("product");
    catalog::upload_variant(
        &store,
        brand.id,
        product.id,
        variant_form("AN-WOC-NVY", &[("S", 5), ("M", 8)]),
    )
    .await
    .expect("first variant");
    catalog::upload_variant(
        &store,
        brand.id,
        product.id,
        variant_form("AN-WOC-CML", &[("M", 4)]),
    )
    .await
    .expect("second variant");

    let products = store.brand_products(brand.id).await.expect("listing");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].variant_count, 2);
    assert_eq!(products[0].total_stock, 17);
    assert_eq!(products[0].category_name, "Outerwear");
}

#[tokio::test]
async fn test_duplicate_product_name_is_a_conflict() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;

    catalog::upload_product(&store, brand.id, product_form("Wool Overcoat"))
        .await
        .expect("first");
    let err = catalog::upload_product(&store, brand.id, product_form("Wool Overcoat"))
        .await
        .expect_err("same name, same brand");
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_duplicate_sku_is_a_conflict() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;
    let product = catalog::upload_product(&store, brand.id, product_form("Wool Overcoat"))
        .await
        .expect("product");

    catalog::upload_variant(
        &store,
        brand.id,
        product.id,
        variant_form("AN-WOC-NVY", &[("M", 5)]),
    )
    .await
    .expect("first");
    let err = catalog::upload_variant(
        &store,
        brand.id,
        product.id,
        variant_form("AN-WOC-NVY", &[("S", 2)]),
    )
    .await
    .expect_err("sku is globally unique");
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_variant_needs_exactly_one_main_image() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;
    let product = catalog::upload_product(&store, brand.id, product_form("Wool Overcoat"))
        .await
        .expect("product");

    let mut form = variant_form("AN-WOC-NVY", &[("M", 5)]);
    for image in &mut form.images {
        image.is_main = false;
    }
    let err = catalog::upload_variant(&store, brand.id, product.id, form)
        .await
        .expect_err("no main image");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_variant_upload_scoped_to_owning_brand() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;
    let other = store
        .create_brand("Maison Deux", "maison-deux")
        .await
        .expect("second brand");
    let product = catalog::upload_product(&store, brand.id, product_form("Wool Overcoat"))
        .await
        .expect("product");

    let err = catalog::upload_variant(
        &store,
        other.id,
        product.id,
        variant_form("MD-WOC-NVY", &[("M", 5)]),
    )
    .await
    .expect_err("another brand's product");
    assert!(matches!(err, AppError::NotFound(_)));
}
