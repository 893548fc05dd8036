//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::db::{DashboardStore, PgDashboardStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; handlers reach the store only through the
/// [`DashboardStore`] trait so workflow code stays testable without a
/// database.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    store: Arc<dyn DashboardStore>,
}

impl AppState {
    /// Create the application state around a `PostgreSQL` pool.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let store = Arc::new(PgDashboardStore::new(pool.clone()));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                store,
            }),
        }
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
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
    pub fn store(&self) -> &dyn DashboardStore {
        self.inner.store.as_ref()
    }
}
