//! Database operations for the shared Maison `PostgreSQL` database.
//!
//! # Schema: `maison`
//!
//! The storefront reads the catalog tables and owns the cart tables:
//!
//! ## Tables touched here
//!
//! - `cart`, `cart_item` - Shopper carts (read/write)
//! - `product`, `product_variant`, `variant_size`, `product_image`,
//!   `size_measurement` and the lookup tables - Catalog (read-only)
//! - `coupon` and its association tables - Coupon lookup (read-only)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/cli/migrations/` and run via:
//! ```bash
//! cargo run -p maison-cli -- migrate
//! ```
//!
//! Every store method is declared on an object-safe trait so route handlers
//! and tests run against `dyn StorefrontStore`; `PgStorefrontStore` is the
//! production implementation and [`memory::MemoryStorefrontStore`] the
//! test double.

pub mod carts;
pub mod catalog;
pub mod coupons;
pub mod memory;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartStore;
pub use catalog::CatalogReader;
pub use coupons::CouponReader;
pub use memory::MemoryStorefrontStore;

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

    /// A cart mutation asked for more units than the size has in stock.
    #[error("insufficient stock: {available} available")]
    InsufficientStock {
        /// Units currently in stock for the requested size.
        available: i32,
    },
}

/// Everything the storefront needs from persistent storage.
pub trait StorefrontStore: CartStore + CatalogReader + CouponReader + Send + Sync {}

impl<T: CartStore + CatalogReader + CouponReader + Send + Sync> StorefrontStore for T {}

/// `PostgreSQL`-backed store used by the running service.
#[derive(Clone)]
pub struct PgStorefrontStore {
    pool: PgPool,
}

impl PgStorefrontStore {
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
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
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
