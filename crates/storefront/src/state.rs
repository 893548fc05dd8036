//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{PgStorefrontStore, StorefrontStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; handlers reach the store only through the
/// [`StorefrontStore`] trait so workflow code stays testable without a
/// database.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    store: Arc<dyn StorefrontStore>,
}

impl AppState {
    /// Create the application state around a `PostgreSQL` pool.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let store = Arc::new(PgStorefrontStore::new(pool.clone()));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                store,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    ///
    /// Only the readiness probe touches the pool directly; everything else
    /// goes through [`Self::store`].
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the persistent store.
    #[must_use]
    pub fn store(&self) -> &dyn StorefrontStore {
        self.inner.store.as_ref()
    }
}
