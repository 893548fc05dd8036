//! Shipping configuration workflow: validation, then the keyed store upsert.

use rust_decimal::Decimal;

use maison_core::{BrandId, Country};

use crate::db::DashboardStore;
use crate::error::{AppError, Result};
use crate::models::{ShippingConfiguration, ShippingUpdate};

/// Validate and apply a shipping update; methods and zones not named in the
/// request are preserved.
pub async fn update_shipping(
    store: &dyn DashboardStore,
    brand_id: BrandId,
    update: ShippingUpdate,
) -> Result<ShippingConfiguration> {
    check_update(&update)?;
    Ok(store.upsert_shipping(brand_id, update).await?)
}

fn check_update(update: &ShippingUpdate) -> Result<()> {
    for method in &update.methods {
        if method.fee < Decimal::ZERO {
            return Err(AppError::BadRequest(format!(
                "{} fee must not be negative",
                method.method_type
            )));
        }
        if method.min_transit_days < 0 || method.max_transit_days < method.min_transit_days {
            return Err(AppError::BadRequest(format!(
                "{} transit window is invalid",
                method.method_type
            )));
        }
    }
    for zone in &update.zones {
        if zone.fee < Decimal::ZERO {
            return Err(AppError::BadRequest(format!(
                "{} zone fee must not be negative",
                zone.zone_type
            )));
        }
        for code in &zone.country_codes {
            if Country::by_code(code).is_none() {
                return Err(AppError::BadRequest(format!(
                    "unknown country code \"{code}\""
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use maison_core::{ShippingMethodType, ShippingZoneType};

    use crate::db::{BrandStore, MemoryDashboardStore};
    use crate::models::{ShippingMethodUpdate, ShippingZoneUpdate};

    use super::*;

    #[tokio::test]
    async fn test_invalid_transit_window_rejected() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();
        let err = update_shipping(
            &store,
            brand.id,
            ShippingUpdate {
                methods: vec![ShippingMethodUpdate {
                    method_type: ShippingMethodType::Standard,
                    fee: dec!(4.90),
                    min_transit_days: 5,
                    max_transit_days: 3,
                    enabled: true,
                }],
                zones: vec![],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_unknown_zone_country_rejected() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();
        let err = update_shipping(
            &store,
            brand.id,
            ShippingUpdate {
                methods: vec![],
                zones: vec![ShippingZoneUpdate {
                    zone_type: ShippingZoneType::International,
                    fee: dec!(19.90),
                    country_codes: vec!["ZZ".to_owned()],
                }],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
