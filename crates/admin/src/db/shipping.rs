//! Shipping configuration persistence.
//!
//! Each brand has at most one `shipping_configuration` row; method rows are
//! unique on `(configuration, method_type)` and zone rows on
//! `(configuration, zone_type)`. Updates upsert only the keys named in the
//! request and leave every other row untouched.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgConnection;

use maison_core::{
    BrandId, ShippingConfigId, ShippingMethodId, ShippingMethodType, ShippingZoneId,
    ShippingZoneType,
};

use crate::db::{PgDashboardStore, RepositoryError};
use crate::models::{ShippingConfiguration, ShippingMethod, ShippingUpdate, ShippingZone};

/// Shipping configuration reads and keyed upserts.
#[async_trait]
pub trait ShippingStore: Send + Sync {
    /// The brand's configuration with methods and zones, or `None` when the
    /// brand has never configured shipping.
    async fn shipping_configuration(
        &self,
        brand_id: BrandId,
    ) -> Result<Option<ShippingConfiguration>, RepositoryError>;

    /// Apply a keyed upsert and return the resulting full configuration.
    ///
    /// Creates the configuration row on first use.
    async fn upsert_shipping(
        &self,
        brand_id: BrandId,
        update: ShippingUpdate,
    ) -> Result<ShippingConfiguration, RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct MethodRow {
    id: ShippingMethodId,
    method_type: ShippingMethodType,
    fee: Decimal,
    min_transit_days: i32,
    max_transit_days: i32,
    enabled: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct ZoneRow {
    id: ShippingZoneId,
    zone_type: ShippingZoneType,
    fee: Decimal,
    country_codes: Vec<String>,
}

async fn load_configuration(
    conn: &mut PgConnection,
    config_id: ShippingConfigId,
    brand_id: BrandId,
) -> Result<ShippingConfiguration, RepositoryError> {
    let methods = sqlx::query_as::<_, MethodRow>(
        "SELECT id, method_type, fee, min_transit_days, max_transit_days, enabled
         FROM maison.shipping_method WHERE configuration_id = $1 ORDER BY method_type",
    )
    .bind(config_id)
    .fetch_all(&mut *conn)
    .await?;

    let zones = sqlx::query_as::<_, ZoneRow>(
        "SELECT id, zone_type, fee, country_codes
         FROM maison.shipping_zone WHERE configuration_id = $1 ORDER BY zone_type",
    )
    .bind(config_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ShippingConfiguration {
        id: config_id,
        brand_id,
        methods: methods
            .into_iter()
            .map(|row| ShippingMethod {
                id: row.id,
                method_type: row.method_type,
                fee: row.fee,
                min_transit_days: row.min_transit_days,
                max_transit_days: row.max_transit_days,
                enabled: row.enabled,
            })
            .collect(),
        zones: zones
            .into_iter()
            .map(|row| ShippingZone {
                id: row.id,
                zone_type: row.zone_type,
                fee: row.fee,
                country_codes: row.country_codes,
            })
            .collect(),
    })
}

#[async_trait]
impl ShippingStore for PgDashboardStore {
    async fn shipping_configuration(
        &self,
        brand_id: BrandId,
    ) -> Result<Option<ShippingConfiguration>, RepositoryError> {
        let mut conn = self.pool().acquire().await?;

        let config_id: Option<ShippingConfigId> =
            sqlx::query_scalar("SELECT id FROM maison.shipping_configuration WHERE brand_id = $1")
                .bind(brand_id)
                .fetch_optional(&mut *conn)
                .await?;
        let Some(config_id) = config_id else {
            return Ok(None);
        };

        load_configuration(&mut *conn, config_id, brand_id)
            .await
            .map(Some)
    }

    async fn upsert_shipping(
        &self,
        brand_id: BrandId,
        update: ShippingUpdate,
    ) -> Result<ShippingConfiguration, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        // First use creates the configuration row; concurrent first uses
        // converge on the same row.
        let config_id: ShippingConfigId = sqlx::query_scalar(
            "INSERT INTO maison.shipping_configuration (brand_id) VALUES ($1)
             ON CONFLICT (brand_id) DO UPDATE SET brand_id = EXCLUDED.brand_id
             RETURNING id",
        )
        .bind(brand_id)
        .fetch_one(&mut *tx)
        .await?;

        for method in &update.methods {
            sqlx::query(
                "INSERT INTO maison.shipping_method
                     (configuration_id, method_type, fee, min_transit_days,
                      max_transit_days, enabled)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 ON CONFLICT (configuration_id, method_type) DO UPDATE SET
                     fee = EXCLUDED.fee,
                     min_transit_days = EXCLUDED.min_transit_days,
                     max_transit_days = EXCLUDED.max_transit_days,
                     enabled = EXCLUDED.enabled",
            )
            .bind(config_id)
            .bind(method.method_type)
            .bind(method.fee)
            .bind(method.min_transit_days)
            .bind(method.max_transit_days)
            .bind(method.enabled)
            .execute(&mut *tx)
            .await?;
        }

        for zone in &update.zones {
            sqlx::query(
                "INSERT INTO maison.shipping_zone
                     (configuration_id, zone_type, fee, country_codes)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (configuration_id, zone_type) DO UPDATE SET
                     fee = EXCLUDED.fee,
                     country_codes = EXCLUDED.country_codes",
            )
            .bind(config_id)
            .bind(zone.zone_type)
            .bind(zone.fee)
            .bind(&zone.country_codes)
            .execute(&mut *tx)
            .await?;
        }

        let configuration = load_configuration(&mut *tx, config_id, brand_id).await?;
        tx.commit().await?;
        Ok(configuration)
    }
}
