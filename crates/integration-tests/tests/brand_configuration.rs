//! Brand configuration round-trips: shipping, return policies, payouts.

use rust_decimal_macros::dec;

use maison_admin::db::{MemoryDashboardStore, PayoutStore, ReturnPolicyStore, ShippingStore};
use maison_admin::error::AppError;
use maison_admin::models::{
    PayoutAccountView, PayoutDetails, ReturnPolicyDraft, ShippingMethodUpdate, ShippingUpdate,
    ShippingZoneUpdate,
};
use maison_admin::services::{payouts, returns, shipping};
use maison_core::{ShippingMethodType, ShippingZoneType};

use maison_integration_tests::demo_brand;

fn standard_method() -> ShippingMethodUpdate {
    ShippingMethodUpdate {
        method_type: ShippingMethodType::Standard,
        fee: dec!(4.90),
        min_transit_days: 2,
        max_transit_days: 5,
        enabled: true,
    }
}

fn payout_details(holder: &str) -> PayoutDetails {
    PayoutDetails {
        holder_name: holder.to_owned(),
        bank_name: "Banque Demo".to_owned(),
        iban: "FR1420041010050500013M02606".to_owned(),
        country_code: "FR".to_owned(),
        currency_code: "EUR".to_owned(),
    }
}

#[tokio::test]
async fn test_shipping_update_touches_only_named_keys() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;

    shipping::update_shipping(
        &store,
        brand.id,
        ShippingUpdate {
            methods: vec![standard_method()],
            zones: vec![ShippingZoneUpdate {
                zone_type: ShippingZoneType::Domestic,
                fee: dec!(0),
                country_codes: vec!["FR".to_owned()],
            }],
        },
    )
    .await
    .expect("initial configuration");

    // A later update naming only express must leave standard and the
    // domestic zone as they were.
    let config = shipping::update_shipping(
        &store,
        brand.id,
        ShippingUpdate {
            methods: vec![ShippingMethodUpdate {
                method_type: ShippingMethodType::Express,
                fee: dec!(12.90),
                min_transit_days: 1,
                max_transit_days: 2,
                enabled: true,
            }],
            zones: vec![],
        },
    )
    .await
    .expect("partial update");

    assert_eq!(config.methods.len(), 2);
    let standard = config
        .methods
        .iter()
        .find(|m| m.method_type == ShippingMethodType::Standard)
        .expect("standard preserved");
    assert_eq!(standard.fee, dec!(4.90));
    assert_eq!(config.zones.len(), 1);
    assert_eq!(config.zones[0].country_codes, vec!["FR".to_owned()]);

    let loaded = store
        .shipping_configuration(brand.id)
        .await
        .expect("load")
        .expect("configured");
    assert_eq!(loaded.methods.len(), 2);
}

#[tokio::test]
async fn test_shipping_rejects_unknown_zone_country() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;

    let err = shipping::update_shipping(
        &store,
        brand.id,
        ShippingUpdate {
            methods: vec![],
            zones: vec![ShippingZoneUpdate {
                zone_type: ShippingZoneType::Regional,
                fee: dec!(9.90),
                country_codes: vec!["ZZ".to_owned()],
            }],
        },
    )
    .await
    .expect_err("ZZ is not a country");
    assert!(matches!(err, AppError::BadRequest(_)));

    // The failed update must not have created a configuration.
    assert!(
        store
            .shipping_configuration(brand.id)
            .await
            .expect("load")
            .is_none()
    );
}

#[tokio::test]
async fn test_return_policy_versions_accumulate() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;

    for window in [14, 30, 60] {
        returns::publish_policy(
            &store,
            brand.id,
            ReturnPolicyDraft {
                accepts_returns: true,
                window_days: window,
                terms: format!("Returns within {window} days."),
            },
        )
        .await
        .expect("publish");
    }

    let active = store
        .active_return_policy(brand.id)
        .await
        .expect("load")
        .expect("published");
    assert_eq!(active.version, 3);
    assert_eq!(active.window_days, 60);
    assert!(active.is_active);

    let history = store.return_policy_history(brand.id).await.expect("history");
    let versions: Vec<i32> = history.iter().map(|p| p.version).collect();
    assert_eq!(versions, vec![3, 2, 1]);
    assert_eq!(history.iter().filter(|p| p.is_active).count(), 1);
}

#[tokio::test]
async fn test_return_window_required_when_accepting() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;

    let err = returns::publish_policy(
        &store,
        brand.id,
        ReturnPolicyDraft {
            accepts_returns: true,
            window_days: 0,
            terms: "Returns accepted.".to_owned(),
        },
    )
    .await
    .expect_err("zero-day window");
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(
        store
            .active_return_policy(brand.id)
            .await
            .expect("load")
            .is_none()
    );
}

#[tokio::test]
async fn test_payout_account_is_one_per_brand() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;

    let first = payouts::save_account(&store, brand.id, payout_details("Atelier Nord SARL"))
        .await
        .expect("first save");
    let second = payouts::save_account(&store, brand.id, payout_details("Atelier Nord SAS"))
        .await
        .expect("overwrite");

    assert_eq!(second.id, first.id, "upsert, not a second row");
    let loaded = store
        .payout_account(brand.id)
        .await
        .expect("load")
        .expect("on file");
    assert_eq!(loaded.holder_name, "Atelier Nord SAS");
}

#[tokio::test]
async fn test_payout_view_masks_the_iban() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;

    let account = payouts::save_account(&store, brand.id, payout_details("Atelier Nord SARL"))
        .await
        .expect("save");
    let view = PayoutAccountView::from(account);
    assert!(view.iban_masked.ends_with("2606"));
    assert!(!view.iban_masked.contains("1420"));
    assert!(view.iban_masked.starts_with('*'));
}

#[tokio::test]
async fn test_payout_rejects_malformed_iban() {
    let store = MemoryDashboardStore::new();
    let brand = demo_brand(&store).await;

    let mut details = payout_details("Atelier Nord SARL");
    details.iban = "not-an-iban".to_owned();
    let err = payouts::save_account(&store, brand.id, details)
        .await
        .expect_err("malformed iban");
    assert!(matches!(err, AppError::BadRequest(_)));
}
