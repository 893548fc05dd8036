//! Payout account persistence. One account per brand, upserted in place.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use maison_core::{BrandId, PayoutAccountId};

use crate::db::{PgDashboardStore, RepositoryError};
use crate::models::{PayoutAccount, PayoutDetails};

/// Payout account reads and upserts.
#[async_trait]
pub trait PayoutStore: Send + Sync {
    /// Create or replace the brand's payout account.
    async fn upsert_payout_account(
        &self,
        brand_id: BrandId,
        details: PayoutDetails,
    ) -> Result<PayoutAccount, RepositoryError>;

    /// The brand's payout account, or `None` before the first upsert.
    async fn payout_account(
        &self,
        brand_id: BrandId,
    ) -> Result<Option<PayoutAccount>, RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: PayoutAccountId,
    brand_id: BrandId,
    holder_name: String,
    bank_name: String,
    iban: String,
    country_code: String,
    currency_code: String,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for PayoutAccount {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            brand_id: row.brand_id,
            holder_name: row.holder_name,
            bank_name: row.bank_name,
            iban: row.iban,
            country_code: row.country_code,
            currency_code: row.currency_code,
            updated_at: row.updated_at,
        }
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, brand_id, holder_name, bank_name, iban, country_code, currency_code, updated_at";

#[async_trait]
impl PayoutStore for PgDashboardStore {
    async fn upsert_payout_account(
        &self,
        brand_id: BrandId,
        details: PayoutDetails,
    ) -> Result<PayoutAccount, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO maison.payout_account
                 (brand_id, holder_name, bank_name, iban, country_code, currency_code)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (brand_id) DO UPDATE SET
                 holder_name = EXCLUDED.holder_name,
                 bank_name = EXCLUDED.bank_name,
                 iban = EXCLUDED.iban,
                 country_code = EXCLUDED.country_code,
                 currency_code = EXCLUDED.currency_code,
                 updated_at = NOW()
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(brand_id)
        .bind(&details.holder_name)
        .bind(&details.bank_name)
        .bind(&details.iban)
        .bind(&details.country_code)
        .bind(&details.currency_code)
        .fetch_one(self.pool())
        .await?;
        Ok(row.into())
    }

    async fn payout_account(
        &self,
        brand_id: BrandId,
    ) -> Result<Option<PayoutAccount>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM maison.payout_account WHERE brand_id = $1"
        ))
        .bind(brand_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(Into::into))
    }
}
