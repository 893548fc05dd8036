//! Cart persistence: resolution, line upserts, and total reconciliation.
//!
//! Every mutation runs in one transaction that locks the cart row (the
//! resolving upsert takes the row lock) and, for stock-sensitive paths, the
//! touched `variant_size` row. The denormalized `cart.total_price` is
//! recomputed from the surviving line items before commit, so it can never
//! drift from `SUM(quantity * unit_price)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use maison_core::{
    AnonymousId, BrandId, CartId, CartItemId, CategoryId, CouponId, CustomerId, ProductId,
    ShopperIdentity, SizeId, VariantId,
};

use crate::db::{PgStorefrontStore, RepositoryError, coupons};
use crate::models::{Cart, CartDetail, CartItem, CartLine};

/// Cart persistence operations.
///
/// Mutations return the refreshed [`CartDetail`] read inside the same
/// transaction, so callers respond with exactly the state they committed.
/// Quantities are validated positive by the HTTP layer before reaching the
/// store.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Resolve the shopper's cart, creating an empty one if absent.
    async fn find_or_create_cart(&self, shopper: ShopperIdentity)
    -> Result<Cart, RepositoryError>;

    /// The shopper's cart with lines and the applied coupon loaded.
    async fn cart_detail(&self, shopper: ShopperIdentity) -> Result<CartDetail, RepositoryError>;

    /// Add `quantity` units of `(variant, size)` to the shopper's cart.
    ///
    /// An existing line for the same combination has its quantity
    /// incremented; the unit price captured on first add is kept. Fails with
    /// [`RepositoryError::NotFound`] when the variant does not exist or does
    /// not carry the size, and [`RepositoryError::InsufficientStock`] when
    /// the resulting line quantity would exceed the stock observed under
    /// lock.
    async fn add_item(
        &self,
        shopper: ShopperIdentity,
        variant_id: VariantId,
        size_id: SizeId,
        quantity: i32,
    ) -> Result<CartDetail, RepositoryError>;

    /// Set an existing line to an absolute quantity (always positive;
    /// zero-means-delete is resolved by the caller into [`Self::remove_item`]).
    ///
    /// Increases re-validate stock against the locked `variant_size` row.
    async fn set_item_quantity(
        &self,
        shopper: ShopperIdentity,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<CartDetail, RepositoryError>;

    /// Delete a line from the shopper's cart.
    async fn remove_item(
        &self,
        shopper: ShopperIdentity,
        item_id: CartItemId,
    ) -> Result<CartDetail, RepositoryError>;

    /// Record `coupon_id` as the cart's applied coupon.
    ///
    /// Eligibility is validated by the caller; the discount itself is
    /// recomputed at read time and never folded into `total_price`.
    async fn apply_coupon(
        &self,
        shopper: ShopperIdentity,
        coupon_id: CouponId,
    ) -> Result<CartDetail, RepositoryError>;

    /// Remove the applied coupon, if any.
    async fn clear_coupon(&self, shopper: ShopperIdentity)
    -> Result<CartDetail, RepositoryError>;
}

/// Row shape of `maison.cart`.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: CartId,
    customer_id: Option<CustomerId>,
    anonymous_id: Option<AnonymousId>,
    coupon_id: Option<CouponId>,
    total_price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            anonymous_id: row.anonymous_id,
            coupon_id: row.coupon_id,
            total_price: row.total_price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A cart line joined with the catalog columns shoppers see.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: CartItemId,
    cart_id: CartId,
    variant_id: VariantId,
    size_id: SizeId,
    quantity: i32,
    unit_price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    product_id: ProductId,
    brand_id: BrandId,
    product_name: String,
    category_id: CategoryId,
    sku: String,
    size_name: String,
    image_path: Option<String>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            item: CartItem {
                id: row.id,
                cart_id: row.cart_id,
                variant_id: row.variant_id,
                size_id: row.size_id,
                quantity: row.quantity,
                unit_price: row.unit_price,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            product_id: row.product_id,
            brand_id: row.brand_id,
            product_name: row.product_name,
            sku: row.sku,
            size_name: row.size_name,
            image_path: row.image_path,
            category_id: row.category_id,
        }
    }
}

const LINE_QUERY: &str = r"
    SELECT ci.id, ci.cart_id, ci.variant_id, ci.size_id, ci.quantity, ci.unit_price,
           ci.created_at, ci.updated_at,
           p.id AS product_id, p.brand_id, p.name AS product_name, p.category_id,
           pv.sku, s.name AS size_name,
           (SELECT pi.path FROM maison.product_image pi
             WHERE pi.variant_id = ci.variant_id AND pi.is_main) AS image_path
    FROM maison.cart_item ci
    JOIN maison.product_variant pv ON pv.id = ci.variant_id
    JOIN maison.product p ON p.id = pv.product_id
    JOIN maison.size s ON s.id = ci.size_id
    WHERE ci.cart_id = $1
    ORDER BY ci.created_at, ci.id
";

#[async_trait]
impl CartStore for PgStorefrontStore {
    async fn find_or_create_cart(
        &self,
        shopper: ShopperIdentity,
    ) -> Result<Cart, RepositoryError> {
        let mut conn = self.pool().acquire().await?;
        let row = upsert_cart(&mut conn, shopper).await?;
        Ok(row.into())
    }

    async fn cart_detail(&self, shopper: ShopperIdentity) -> Result<CartDetail, RepositoryError> {
        let mut tx = self.pool().begin().await?;
        let cart = upsert_cart(&mut tx, shopper).await?;
        let detail = load_detail(&mut tx, cart).await?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn add_item(
        &self,
        shopper: ShopperIdentity,
        variant_id: VariantId,
        size_id: SizeId,
        quantity: i32,
    ) -> Result<CartDetail, RepositoryError> {
        let mut tx = self.pool().begin().await?;
        let cart = upsert_cart(&mut tx, shopper).await?;

        // Authoritative price; the variant may have vanished since the
        // caller resolved it.
        let unit_price: Option<Decimal> =
            sqlx::query_scalar("SELECT base_currency_price FROM maison.product_variant WHERE id = $1")
                .bind(variant_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(unit_price) = unit_price else {
            return Err(RepositoryError::NotFound);
        };

        // Lock the stock row so concurrent adds serialize on it.
        let stock: Option<i32> = sqlx::query_scalar(
            "SELECT stock_quantity FROM maison.variant_size
             WHERE variant_id = $1 AND size_id = $2 FOR UPDATE",
        )
        .bind(variant_id)
        .bind(size_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(stock) = stock else {
            return Err(RepositoryError::NotFound);
        };

        let existing: Option<i32> = sqlx::query_scalar(
            "SELECT quantity FROM maison.cart_item
             WHERE cart_id = $1 AND variant_id = $2 AND size_id = $3",
        )
        .bind(cart.id)
        .bind(variant_id)
        .bind(size_id)
        .fetch_optional(&mut *tx)
        .await?;

        let resulting = existing.unwrap_or(0).saturating_add(quantity);
        if resulting > stock {
            return Err(RepositoryError::InsufficientStock { available: stock });
        }

        sqlx::query(
            r"
            INSERT INTO maison.cart_item (cart_id, variant_id, size_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (cart_id, variant_id, size_id)
            DO UPDATE SET quantity = cart_item.quantity + EXCLUDED.quantity,
                          updated_at = now()
            ",
        )
        .bind(cart.id)
        .bind(variant_id)
        .bind(size_id)
        .bind(quantity)
        .bind(unit_price)
        .execute(&mut *tx)
        .await?;

        resum_total(&mut tx, cart.id).await?;
        let detail = load_detail_by_id(&mut tx, cart.id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn set_item_quantity(
        &self,
        shopper: ShopperIdentity,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<CartDetail, RepositoryError> {
        let mut tx = self.pool().begin().await?;
        let cart = upsert_cart(&mut tx, shopper).await?;

        let item: Option<(VariantId, SizeId, i32)> = sqlx::query_as(
            "SELECT variant_id, size_id, quantity FROM maison.cart_item
             WHERE id = $1 AND cart_id = $2",
        )
        .bind(item_id)
        .bind(cart.id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((variant_id, size_id, current)) = item else {
            return Err(RepositoryError::NotFound);
        };

        if quantity > current {
            let stock: i32 = sqlx::query_scalar(
                "SELECT stock_quantity FROM maison.variant_size
                 WHERE variant_id = $1 AND size_id = $2 FOR UPDATE",
            )
            .bind(variant_id)
            .bind(size_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "cart item {item_id} references missing variant size"
                ))
            })?;

            if quantity > stock {
                return Err(RepositoryError::InsufficientStock { available: stock });
            }
        }

        sqlx::query("UPDATE maison.cart_item SET quantity = $1, updated_at = now() WHERE id = $2")
            .bind(quantity)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        resum_total(&mut tx, cart.id).await?;
        let detail = load_detail_by_id(&mut tx, cart.id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn remove_item(
        &self,
        shopper: ShopperIdentity,
        item_id: CartItemId,
    ) -> Result<CartDetail, RepositoryError> {
        let mut tx = self.pool().begin().await?;
        let cart = upsert_cart(&mut tx, shopper).await?;

        let deleted = sqlx::query("DELETE FROM maison.cart_item WHERE id = $1 AND cart_id = $2")
            .bind(item_id)
            .bind(cart.id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        resum_total(&mut tx, cart.id).await?;
        let detail = load_detail_by_id(&mut tx, cart.id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn apply_coupon(
        &self,
        shopper: ShopperIdentity,
        coupon_id: CouponId,
    ) -> Result<CartDetail, RepositoryError> {
        let mut tx = self.pool().begin().await?;
        let cart = upsert_cart(&mut tx, shopper).await?;

        sqlx::query("UPDATE maison.cart SET coupon_id = $1, updated_at = now() WHERE id = $2")
            .bind(coupon_id)
            .bind(cart.id)
            .execute(&mut *tx)
            .await?;

        let detail = load_detail_by_id(&mut tx, cart.id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn clear_coupon(
        &self,
        shopper: ShopperIdentity,
    ) -> Result<CartDetail, RepositoryError> {
        let mut tx = self.pool().begin().await?;
        let cart = upsert_cart(&mut tx, shopper).await?;

        sqlx::query("UPDATE maison.cart SET coupon_id = NULL, updated_at = now() WHERE id = $1")
            .bind(cart.id)
            .execute(&mut *tx)
            .await?;

        let detail = load_detail_by_id(&mut tx, cart.id).await?;
        tx.commit().await?;
        Ok(detail)
    }
}

/// Atomically resolve or create the shopper's cart row.
///
/// The conflicting no-op update both returns the existing row and takes its
/// row lock, serializing concurrent mutations of one cart for the enclosing
/// transaction.
async fn upsert_cart(
    conn: &mut PgConnection,
    shopper: ShopperIdentity,
) -> Result<CartRow, RepositoryError> {
    let row = match shopper {
        ShopperIdentity::Customer(customer_id) => {
            sqlx::query_as::<_, CartRow>(
                "INSERT INTO maison.cart (customer_id) VALUES ($1)
                 ON CONFLICT (customer_id) DO UPDATE SET updated_at = cart.updated_at
                 RETURNING id, customer_id, anonymous_id, coupon_id, total_price,
                           created_at, updated_at",
            )
            .bind(customer_id)
            .fetch_one(&mut *conn)
            .await?
        }
        ShopperIdentity::Anonymous(anonymous_id) => {
            sqlx::query_as::<_, CartRow>(
                "INSERT INTO maison.cart (anonymous_id) VALUES ($1)
                 ON CONFLICT (anonymous_id) DO UPDATE SET updated_at = cart.updated_at
                 RETURNING id, customer_id, anonymous_id, coupon_id, total_price,
                           created_at, updated_at",
            )
            .bind(anonymous_id)
            .fetch_one(&mut *conn)
            .await?
        }
    };
    Ok(row)
}

/// Recompute `cart.total_price` from the current line items.
async fn resum_total(conn: &mut PgConnection, cart_id: CartId) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE maison.cart
        SET total_price = COALESCE(
                (SELECT SUM(quantity * unit_price) FROM maison.cart_item WHERE cart_id = $1), 0),
            updated_at = now()
        WHERE id = $1
        ",
    )
    .bind(cart_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn load_detail_by_id(
    conn: &mut PgConnection,
    cart_id: CartId,
) -> Result<CartDetail, RepositoryError> {
    let cart = sqlx::query_as::<_, CartRow>(
        "SELECT id, customer_id, anonymous_id, coupon_id, total_price, created_at, updated_at
         FROM maison.cart WHERE id = $1",
    )
    .bind(cart_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(RepositoryError::NotFound)?;
    load_detail(conn, cart).await
}

async fn load_detail(
    conn: &mut PgConnection,
    cart: CartRow,
) -> Result<CartDetail, RepositoryError> {
    let lines = sqlx::query_as::<_, CartLineRow>(LINE_QUERY)
        .bind(cart.id)
        .fetch_all(&mut *conn)
        .await?;

    let coupon = match cart.coupon_id {
        Some(coupon_id) => Some(
            coupons::coupon_by_id(&mut *conn, coupon_id)
                .await?
                .ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "cart {} references missing coupon {coupon_id}",
                        cart.id
                    ))
                })?,
        ),
        None => None,
    };

    Ok(CartDetail {
        cart: cart.into(),
        lines: lines.into_iter().map(Into::into).collect(),
        coupon,
    })
}
