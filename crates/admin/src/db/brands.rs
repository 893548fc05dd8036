//! Brand (tenant) persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use maison_core::BrandId;

use crate::db::{PgDashboardStore, RepositoryError};
use crate::models::Brand;

/// Tenant lookup and creation.
#[async_trait]
pub trait BrandStore: Send + Sync {
    /// Resolve the brand behind a gateway `x-brand-id` header.
    async fn brand_by_id(&self, brand_id: BrandId) -> Result<Option<Brand>, RepositoryError>;

    /// Create a tenant. Fails with [`RepositoryError::Conflict`] when the
    /// name or slug is taken.
    async fn create_brand(&self, name: &str, slug: &str) -> Result<Brand, RepositoryError>;
}

/// Row shape of `maison.brand`.
#[derive(Debug, sqlx::FromRow)]
struct BrandRow {
    id: BrandId,
    name: String,
    slug: String,
    created_at: DateTime<Utc>,
}

impl From<BrandRow> for Brand {
    fn from(row: BrandRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl BrandStore for PgDashboardStore {
    async fn brand_by_id(&self, brand_id: BrandId) -> Result<Option<Brand>, RepositoryError> {
        let row = sqlx::query_as::<_, BrandRow>(
            "SELECT id, name, slug, created_at FROM maison.brand WHERE id = $1",
        )
        .bind(brand_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(Into::into))
    }

    async fn create_brand(&self, name: &str, slug: &str) -> Result<Brand, RepositoryError> {
        let row = sqlx::query_as::<_, BrandRow>(
            "INSERT INTO maison.brand (name, slug) VALUES ($1, $2)
             RETURNING id, name, slug, created_at",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(self.pool())
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "a brand with this name or slug"))?;
        Ok(row.into())
    }
}
