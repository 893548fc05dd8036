//! Return policy persistence.
//!
//! Policies are append-only. Publishing runs in one transaction: the brand's
//! current active row (if any) is locked and deactivated, then the new row is
//! inserted with `version = prior + 1` and `is_active = true`. A partial
//! unique index on `(brand_id) WHERE is_active` backs the one-active-version
//! invariant.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use maison_core::{BrandId, ReturnPolicyId};

use crate::db::{PgDashboardStore, RepositoryError};
use crate::models::{ReturnPolicy, ReturnPolicyDraft};

/// Versioned return policy access.
#[async_trait]
pub trait ReturnPolicyStore: Send + Sync {
    /// Publish a new policy version, deactivating the prior one.
    async fn publish_return_policy(
        &self,
        brand_id: BrandId,
        draft: ReturnPolicyDraft,
    ) -> Result<ReturnPolicy, RepositoryError>;

    /// The brand's active policy, or `None` before the first publish.
    async fn active_return_policy(
        &self,
        brand_id: BrandId,
    ) -> Result<Option<ReturnPolicy>, RepositoryError>;

    /// Every version the brand has published, newest first.
    async fn return_policy_history(
        &self,
        brand_id: BrandId,
    ) -> Result<Vec<ReturnPolicy>, RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct PolicyRow {
    id: ReturnPolicyId,
    brand_id: BrandId,
    version: i32,
    is_active: bool,
    accepts_returns: bool,
    window_days: i32,
    terms: String,
    created_at: DateTime<Utc>,
}

impl From<PolicyRow> for ReturnPolicy {
    fn from(row: PolicyRow) -> Self {
        Self {
            id: row.id,
            brand_id: row.brand_id,
            version: row.version,
            is_active: row.is_active,
            accepts_returns: row.accepts_returns,
            window_days: row.window_days,
            terms: row.terms,
            created_at: row.created_at,
        }
    }
}

const POLICY_COLUMNS: &str =
    "id, brand_id, version, is_active, accepts_returns, window_days, terms, created_at";

#[async_trait]
impl ReturnPolicyStore for PgDashboardStore {
    async fn publish_return_policy(
        &self,
        brand_id: BrandId,
        draft: ReturnPolicyDraft,
    ) -> Result<ReturnPolicy, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        // Lock the brand's version counter against concurrent publishes.
        let prior_version: Option<i32> = sqlx::query_scalar(
            "SELECT version FROM maison.return_policy
             WHERE brand_id = $1 ORDER BY version DESC LIMIT 1
             FOR UPDATE",
        )
        .bind(brand_id)
        .fetch_optional(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE maison.return_policy SET is_active = FALSE
             WHERE brand_id = $1 AND is_active",
        )
        .bind(brand_id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, PolicyRow>(&format!(
            "INSERT INTO maison.return_policy
                 (brand_id, version, is_active, accepts_returns, window_days, terms)
             VALUES ($1, $2, TRUE, $3, $4, $5)
             RETURNING {POLICY_COLUMNS}"
        ))
        .bind(brand_id)
        .bind(prior_version.unwrap_or(0) + 1)
        .bind(draft.accepts_returns)
        .bind(draft.window_days)
        .bind(&draft.terms)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn active_return_policy(
        &self,
        brand_id: BrandId,
    ) -> Result<Option<ReturnPolicy>, RepositoryError> {
        let row = sqlx::query_as::<_, PolicyRow>(&format!(
            "SELECT {POLICY_COLUMNS} FROM maison.return_policy
             WHERE brand_id = $1 AND is_active"
        ))
        .bind(brand_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(Into::into))
    }

    async fn return_policy_history(
        &self,
        brand_id: BrandId,
    ) -> Result<Vec<ReturnPolicy>, RepositoryError> {
        let rows = sqlx::query_as::<_, PolicyRow>(&format!(
            "SELECT {POLICY_COLUMNS} FROM maison.return_policy
             WHERE brand_id = $1 ORDER BY version DESC"
        ))
        .bind(brand_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
