//! Cart total consistency across the full mutation surface.
//!
//! After every committed mutation the cart's stored total must equal the
//! sum of `quantity * unit_price` over its lines; these tests walk the
//! whole add / merge / re-quantity / delete cycle and check the invariant
//! at each step.

use rust_decimal_macros::dec;
use uuid::Uuid;

use maison_core::{AnonymousId, BrandId, CategoryId, CustomerId, ShopperIdentity, VariantId};
use maison_storefront::db::CartStore;
use maison_storefront::db::memory::{MemoryStorefrontStore, VariantFixture};
use maison_storefront::error::AppError;
use maison_storefront::services::cart;

fn seeded_store(stock: i32) -> (MemoryStorefrontStore, VariantId) {
    let store = MemoryStorefrontStore::new();
    let (_, variant_id) = store.add_variant(VariantFixture {
        brand_id: BrandId::new(1),
        brand_name: "Atelier Nord".to_owned(),
        product_name: "Wool Overcoat".to_owned(),
        category_id: CategoryId::new(1),
        category_name: "Outerwear".to_owned(),
        sku: "AN-WOC-NVY".to_owned(),
        price: dec!(10.00),
        sizes: vec![("M".to_owned(), stock)],
    });
    (store, variant_id)
}

fn anonymous() -> ShopperIdentity {
    ShopperIdentity::Anonymous(AnonymousId::new(Uuid::new_v4()))
}

#[tokio::test]
async fn test_total_tracks_every_mutation() {
    let (store, variant_id) = seeded_store(10);
    let shopper = anonymous();

    // First add creates the cart and the line.
    let detail = cart::add_item(&store, shopper, variant_id, "M", 2)
        .await
        .expect("first add");
    assert_eq!(detail.cart.total_price, dec!(20.00));
    assert_eq!(detail.cart.total_price, detail.items_subtotal());

    // Same (variant, size) again merges into the existing line.
    let detail = cart::add_item(&store, shopper, variant_id, "M", 1)
        .await
        .expect("merge add");
    assert_eq!(detail.lines.len(), 1);
    assert_eq!(detail.lines[0].item.quantity, 3);
    assert_eq!(detail.cart.total_price, dec!(30.00));
    assert_eq!(detail.cart.total_price, detail.items_subtotal());

    // Absolute quantity change.
    let item_id = detail.lines[0].item.id;
    let detail = cart::set_quantity(&store, shopper, item_id, 5)
        .await
        .expect("set quantity");
    assert_eq!(detail.cart.total_price, dec!(50.00));
    assert_eq!(detail.cart.total_price, detail.items_subtotal());

    // Deletion leaves an empty cart with a zero total, not a dangling sum.
    let detail = cart::remove_item(&store, shopper, item_id)
        .await
        .expect("remove");
    assert!(detail.lines.is_empty());
    assert_eq!(detail.cart.total_price, dec!(0));
}

#[tokio::test]
async fn test_merge_cannot_exceed_stock() {
    let (store, variant_id) = seeded_store(5);
    let shopper = anonymous();

    cart::add_item(&store, shopper, variant_id, "M", 3)
        .await
        .expect("within stock");

    let err = cart::add_item(&store, shopper, variant_id, "M", 3)
        .await
        .expect_err("merged quantity would be 6 of 5");
    assert!(matches!(err, AppError::InsufficientStock { .. }));

    // The failed merge must not have touched the cart.
    let detail = store.cart_detail(shopper).await.expect("detail");
    assert_eq!(detail.lines[0].item.quantity, 3);
    assert_eq!(detail.cart.total_price, dec!(30.00));
}

#[tokio::test]
async fn test_carts_are_isolated_per_shopper() {
    let (store, variant_id) = seeded_store(10);
    let customer = ShopperIdentity::Customer(CustomerId::new(Uuid::new_v4()));
    let guest = anonymous();

    cart::add_item(&store, customer, variant_id, "M", 2)
        .await
        .expect("customer add");
    cart::add_item(&store, guest, variant_id, "M", 5)
        .await
        .expect("guest add");

    let customer_cart = store.cart_detail(customer).await.expect("customer cart");
    let guest_cart = store.cart_detail(guest).await.expect("guest cart");
    assert_ne!(customer_cart.cart.id, guest_cart.cart.id);
    assert_eq!(customer_cart.cart.total_price, dec!(20.00));
    assert_eq!(guest_cart.cart.total_price, dec!(50.00));
}

#[tokio::test]
async fn test_zero_quantity_never_leaves_a_row() {
    let (store, variant_id) = seeded_store(10);
    let shopper = anonymous();

    let detail = cart::add_item(&store, shopper, variant_id, "M", 2)
        .await
        .expect("add");
    let item_id = detail.lines[0].item.id;

    let detail = cart::set_quantity(&store, shopper, item_id, 0)
        .await
        .expect("zero routes to deletion");
    assert!(detail.lines.is_empty());
    assert_eq!(detail.cart.total_price, dec!(0));
}
