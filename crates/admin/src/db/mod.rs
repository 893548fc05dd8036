//! Database operations for the dashboard side of the shared Maison database.
//!
//! # Schema: `maison`
//!
//! The dashboard owns the write side of the catalog plus every brand-scoped
//! configuration table:
//!
//! - `brand` - Tenants
//! - Lookup tables (`category`, `subcategory`, `material`, `color`, `size`,
//!   `tag`, `season`, `gender`, `currency`, `measurement_type`) - created
//!   through atomic `ON CONFLICT` upserts, never check-then-insert
//! - `product`, `product_variant` and their children - Catalog writes
//! - `coupon` and its association tables
//! - `shipping_configuration`, `shipping_method`, `shipping_zone`
//! - `return_policy`, `payout_account`
//!
//! Every store method is declared on an object-safe trait; `PgDashboardStore`
//! is the production implementation and [`memory::MemoryDashboardStore`] the
//! test double.

pub mod brands;
pub mod catalog;
pub mod coupons;
pub mod memory;
pub mod payouts;
pub mod returns;
pub mod shipping;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use brands::BrandStore;
pub use catalog::CatalogStore;
pub use coupons::{CouponDraft, CouponStore};
pub use memory::MemoryDashboardStore;
pub use payouts::PayoutStore;
pub use returns::ReturnPolicyStore;
pub use shipping::ShippingStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated (duplicate name, slug, SKU, or
    /// coupon code).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Wrap a sqlx error, surfacing unique-constraint violations as
    /// [`Self::Conflict`] with `what` as the message.
    pub(crate) fn from_sqlx(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(err)
    }
}

/// Everything the dashboard needs from persistent storage.
pub trait DashboardStore:
    BrandStore
    + CatalogStore
    + CouponStore
    + ShippingStore
    + ReturnPolicyStore
    + PayoutStore
    + Send
    + Sync
{
}

impl<
    T: BrandStore
        + CatalogStore
        + CouponStore
        + ShippingStore
        + ReturnPolicyStore
        + PayoutStore
        + Send
        + Sync,
> DashboardStore for T
{
}

/// `PostgreSQL`-backed store used by the running service.
#[derive(Clone)]
pub struct PgDashboardStore {
    pool: PgPool,
}

impl PgDashboardStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
