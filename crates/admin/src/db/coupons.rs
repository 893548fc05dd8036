//! Coupon persistence for the dashboard.
//!
//! Coupon codes are globally unique case-insensitively (enforced by a unique
//! index on `lower(code)`). Updates replace the association sets wholesale:
//! the old rows are deleted and the new ones inserted in the same transaction
//! as the coupon row update, so readers never see a half-replaced set.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use maison_core::{BrandId, CategoryId, Coupon, CouponId, CouponScope, DiscountType, ProductId};

use crate::db::{PgDashboardStore, RepositoryError};

/// Everything needed to create or replace a coupon, ids already resolved.
#[derive(Debug, Clone)]
pub struct CouponDraft {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub applies_to: CouponScope,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub min_purchase_amount: Option<Decimal>,
    pub is_active: bool,
    pub product_ids: Vec<ProductId>,
    pub category_ids: Vec<CategoryId>,
    pub country_codes: Vec<String>,
}

/// Coupon CRUD, scoped to the owning brand.
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Create a coupon with its association rows.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the code is taken.
    async fn create_coupon(
        &self,
        brand_id: BrandId,
        draft: CouponDraft,
    ) -> Result<Coupon, RepositoryError>;

    /// Replace a coupon's fields and association sets.
    ///
    /// `usage_count` is preserved; everything else comes from the draft.
    async fn update_coupon(
        &self,
        brand_id: BrandId,
        coupon_id: CouponId,
        draft: CouponDraft,
    ) -> Result<Coupon, RepositoryError>;

    /// Flip only the active flag.
    async fn set_coupon_active(
        &self,
        brand_id: BrandId,
        coupon_id: CouponId,
        is_active: bool,
    ) -> Result<Coupon, RepositoryError>;

    /// All of the brand's coupons, newest first, associations loaded.
    async fn list_coupons(&self, brand_id: BrandId) -> Result<Vec<Coupon>, RepositoryError>;

    /// One coupon with associations; `None` when it does not exist or belongs
    /// to another brand.
    async fn coupon_details(
        &self,
        brand_id: BrandId,
        coupon_id: CouponId,
    ) -> Result<Option<Coupon>, RepositoryError>;
}

/// Row shape of `maison.coupon` without the association tables.
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

impl CouponRow {
    fn into_coupon(
        self,
        product_ids: Vec<ProductId>,
        category_ids: Vec<CategoryId>,
        country_codes: Vec<String>,
    ) -> Coupon {
        Coupon {
            id: self.id,
            brand_id: self.brand_id,
            code: self.code,
            description: self.description,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            applies_to: self.applies_to,
            starts_at: self.starts_at,
            expires_at: self.expires_at,
            usage_limit: self.usage_limit,
            usage_count: self.usage_count,
            min_purchase_amount: self.min_purchase_amount,
            is_active: self.is_active,
            product_ids,
            category_ids,
            country_codes,
        }
    }
}

const COUPON_COLUMNS: &str = "id, brand_id, code, description, discount_type, discount_value,
                              applies_to, starts_at, expires_at, usage_limit, usage_count,
                              min_purchase_amount, is_active";

async fn insert_associations(
    conn: &mut PgConnection,
    coupon_id: CouponId,
    draft: &CouponDraft,
) -> Result<(), RepositoryError> {
    for product_id in &draft.product_ids {
        sqlx::query("INSERT INTO maison.coupon_product (coupon_id, product_id) VALUES ($1, $2)")
            .bind(coupon_id)
            .bind(product_id)
            .execute(&mut *conn)
            .await?;
    }
    for category_id in &draft.category_ids {
        sqlx::query("INSERT INTO maison.coupon_category (coupon_id, category_id) VALUES ($1, $2)")
            .bind(coupon_id)
            .bind(category_id)
            .execute(&mut *conn)
            .await?;
    }
    for code in &draft.country_codes {
        sqlx::query("INSERT INTO maison.coupon_country (coupon_id, country_code) VALUES ($1, $2)")
            .bind(coupon_id)
            .bind(code)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn load_associations(
    conn: &mut PgConnection,
    coupon_id: CouponId,
) -> Result<(Vec<ProductId>, Vec<CategoryId>, Vec<String>), RepositoryError> {
    let product_ids = sqlx::query_scalar(
        "SELECT product_id FROM maison.coupon_product WHERE coupon_id = $1 ORDER BY product_id",
    )
    .bind(coupon_id)
    .fetch_all(&mut *conn)
    .await?;
    let category_ids = sqlx::query_scalar(
        "SELECT category_id FROM maison.coupon_category WHERE coupon_id = $1 ORDER BY category_id",
    )
    .bind(coupon_id)
    .fetch_all(&mut *conn)
    .await?;
    let country_codes = sqlx::query_scalar(
        "SELECT country_code FROM maison.coupon_country WHERE coupon_id = $1 ORDER BY country_code",
    )
    .bind(coupon_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok((product_ids, category_ids, country_codes))
}

#[async_trait]
impl CouponStore for PgDashboardStore {
    async fn create_coupon(
        &self,
        brand_id: BrandId,
        draft: CouponDraft,
    ) -> Result<Coupon, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query_as::<_, CouponRow>(&format!(
            "INSERT INTO maison.coupon
                 (brand_id, code, description, discount_type, discount_value, applies_to,
                  starts_at, expires_at, usage_limit, min_purchase_amount, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COUPON_COLUMNS}"
        ))
        .bind(brand_id)
        .bind(&draft.code)
        .bind(&draft.description)
        .bind(draft.discount_type)
        .bind(draft.discount_value)
        .bind(draft.applies_to)
        .bind(draft.starts_at)
        .bind(draft.expires_at)
        .bind(draft.usage_limit)
        .bind(draft.min_purchase_amount)
        .bind(draft.is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "a coupon with this code"))?;

        insert_associations(&mut *tx, row.id, &draft).await?;
        tx.commit().await?;

        Ok(row.into_coupon(draft.product_ids, draft.category_ids, draft.country_codes))
    }

    async fn update_coupon(
        &self,
        brand_id: BrandId,
        coupon_id: CouponId,
        draft: CouponDraft,
    ) -> Result<Coupon, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query_as::<_, CouponRow>(&format!(
            "UPDATE maison.coupon SET
                 code = $3, description = $4, discount_type = $5, discount_value = $6,
                 applies_to = $7, starts_at = $8, expires_at = $9, usage_limit = $10,
                 min_purchase_amount = $11, is_active = $12, updated_at = NOW()
             WHERE id = $1 AND brand_id = $2
             RETURNING {COUPON_COLUMNS}"
        ))
        .bind(coupon_id)
        .bind(brand_id)
        .bind(&draft.code)
        .bind(&draft.description)
        .bind(draft.discount_type)
        .bind(draft.discount_value)
        .bind(draft.applies_to)
        .bind(draft.starts_at)
        .bind(draft.expires_at)
        .bind(draft.usage_limit)
        .bind(draft.min_purchase_amount)
        .bind(draft.is_active)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "a coupon with this code"))?
        .ok_or(RepositoryError::NotFound)?;

        // Replace the association sets wholesale.
        for table in ["coupon_product", "coupon_category", "coupon_country"] {
            sqlx::query(&format!("DELETE FROM maison.{table} WHERE coupon_id = $1"))
                .bind(coupon_id)
                .execute(&mut *tx)
                .await?;
        }
        insert_associations(&mut *tx, coupon_id, &draft).await?;
        tx.commit().await?;

        Ok(row.into_coupon(draft.product_ids, draft.category_ids, draft.country_codes))
    }

    async fn set_coupon_active(
        &self,
        brand_id: BrandId,
        coupon_id: CouponId,
        is_active: bool,
    ) -> Result<Coupon, RepositoryError> {
        let mut conn = self.pool().acquire().await?;

        let row = sqlx::query_as::<_, CouponRow>(&format!(
            "UPDATE maison.coupon SET is_active = $3, updated_at = NOW()
             WHERE id = $1 AND brand_id = $2
             RETURNING {COUPON_COLUMNS}"
        ))
        .bind(coupon_id)
        .bind(brand_id)
        .bind(is_active)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let (product_ids, category_ids, country_codes) =
            load_associations(&mut *conn, coupon_id).await?;
        Ok(row.into_coupon(product_ids, category_ids, country_codes))
    }

    async fn list_coupons(&self, brand_id: BrandId) -> Result<Vec<Coupon>, RepositoryError> {
        let mut conn = self.pool().acquire().await?;

        let rows = sqlx::query_as::<_, CouponRow>(&format!(
            "SELECT {COUPON_COLUMNS} FROM maison.coupon
             WHERE brand_id = $1 ORDER BY id DESC"
        ))
        .bind(brand_id)
        .fetch_all(&mut *conn)
        .await?;

        let mut coupons = Vec::with_capacity(rows.len());
        for row in rows {
            let (product_ids, category_ids, country_codes) =
                load_associations(&mut *conn, row.id).await?;
            coupons.push(row.into_coupon(product_ids, category_ids, country_codes));
        }
        Ok(coupons)
    }

    async fn coupon_details(
        &self,
        brand_id: BrandId,
        coupon_id: CouponId,
    ) -> Result<Option<Coupon>, RepositoryError> {
        let mut conn = self.pool().acquire().await?;

        let row = sqlx::query_as::<_, CouponRow>(&format!(
            "SELECT {COUPON_COLUMNS} FROM maison.coupon WHERE id = $1 AND brand_id = $2"
        ))
        .bind(coupon_id)
        .bind(brand_id)
        .fetch_optional(&mut *conn)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let (product_ids, category_ids, country_codes) =
            load_associations(&mut *conn, coupon_id).await?;
        Ok(Some(row.into_coupon(
            product_ids,
            category_ids,
            country_codes,
        )))
    }
}
