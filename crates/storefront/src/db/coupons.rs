//! Coupon lookup for the storefront.
//!
//! The storefront only reads coupons; issuing and editing happen in the
//! dashboard. Codes are matched case-insensitively and are globally unique,
//! so a bare code resolves without naming the brand.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use maison_core::{BrandId, CategoryId, Coupon, CouponId, CouponScope, DiscountType, ProductId};

use crate::db::{PgStorefrontStore, RepositoryError};

/// Read access to coupons and their restriction sets.
#[async_trait]
pub trait CouponReader: Send + Sync {
    /// Find a coupon by code (case-insensitive), restriction sets loaded.
    async fn coupon_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError>;
}

/// Row shape of `maison.coupon`.
#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: CouponId,
    brand_id: BrandId,
    code: String,
    description: Option<String>,
    discount_type: DiscountType,
    discount_value: Decimal,
    applies_to: CouponScope,
    starts_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    usage_limit: Option<i32>,
    usage_count: i32,
    min_purchase_amount: Option<Decimal>,
    is_active: bool,
}

#[async_trait]
impl CouponReader for PgStorefrontStore {
    async fn coupon_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let mut conn = self.pool().acquire().await?;
        let row = sqlx::query_as::<_, CouponRow>(
            "SELECT id, brand_id, code, description, discount_type, discount_value,
                    applies_to, starts_at, expires_at, usage_limit, usage_count,
                    min_purchase_amount, is_active
             FROM maison.coupon WHERE lower(code) = lower($1)",
        )
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => Ok(Some(load_associations(&mut conn, row).await?)),
            None => Ok(None),
        }
    }
}

/// Fetch a coupon by id with its restriction sets, on an existing connection.
///
/// Shared with the cart loader so an applied coupon rides along in the same
/// transaction snapshot as the cart it decorates.
pub(crate) async fn coupon_by_id(
    conn: &mut PgConnection,
    coupon_id: CouponId,
) -> Result<Option<Coupon>, RepositoryError> {
    let row = sqlx::query_as::<_, CouponRow>(
        "SELECT id, brand_id, code, description, discount_type, discount_value,
                applies_to, starts_at, expires_at, usage_limit, usage_count,
                min_purchase_amount, is_active
         FROM maison.coupon WHERE id = $1",
    )
    .bind(coupon_id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(Some(load_associations(conn, row).await?)),
        None => Ok(None),
    }
}

/// Attach the three restriction sets to a coupon row.
async fn load_associations(
    conn: &mut PgConnection,
    row: CouponRow,
) -> Result<Coupon, RepositoryError> {
    let product_ids: Vec<ProductId> =
        sqlx::query_scalar("SELECT product_id FROM maison.coupon_product WHERE coupon_id = $1")
            .bind(row.id)
            .fetch_all(&mut *conn)
            .await?;
    let category_ids: Vec<CategoryId> =
        sqlx::query_scalar("SELECT category_id FROM maison.coupon_category WHERE coupon_id = $1")
            .bind(row.id)
            .fetch_all(&mut *conn)
            .await?;
    let country_codes: Vec<String> =
        sqlx::query_scalar("SELECT country_code FROM maison.coupon_country WHERE coupon_id = $1")
            .bind(row.id)
            .fetch_all(&mut *conn)
            .await?;

    Ok(Coupon {
        id: row.id,
        brand_id: row.brand_id,
        code: row.code,
        description: row.description,
        discount_type: row.discount_type,
        discount_value: row.discount_value,
        applies_to: row.applies_to,
        starts_at: row.starts_at,
        expires_at: row.expires_at,
        usage_limit: row.usage_limit,
        usage_count: row.usage_count,
        min_purchase_amount: row.min_purchase_amount,
        is_active: row.is_active,
        product_ids,
        category_ids,
        country_codes,
    })
}
