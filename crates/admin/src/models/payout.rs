//! Payout account domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use maison_core::{BrandId, PayoutAccountId};

/// The bank account a brand's payouts settle to; one per brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutAccount {
    pub id: PayoutAccountId,
    pub brand_id: BrandId,
    pub holder_name: String,
    pub bank_name: String,
    /// Stored verbatim; serialized masked (see [`PayoutAccountView`]).
    pub iban: String,
    pub country_code: String,
    pub currency_code: String,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload for a payout account.
#[derive(Debug, Clone)]
pub struct PayoutDetails {
    pub holder_name: String,
    pub bank_name: String,
    pub iban: String,
    pub country_code: String,
    pub currency_code: String,
}

/// What the API returns: the IBAN is masked to its last four characters.
#[derive(Debug, Clone, Serialize)]
pub struct PayoutAccountView {
    pub holder_name: String,
    pub bank_name: String,
    pub iban_masked: String,
    pub country_code: String,
    pub currency_code: String,
    pub updated_at: DateTime<Utc>,
}

impl From<PayoutAccount> for PayoutAccountView {
    fn from(account: PayoutAccount) -> Self {
        Self {
            iban_masked: mask_iban(&account.iban),
            holder_name: account.holder_name,
            bank_name: account.bank_name,
            country_code: account.country_code,
            currency_code: account.currency_code,
            updated_at: account.updated_at,
        }
    }
}

/// Replace all but the last four characters with `*`.
#[must_use]
pub fn mask_iban(iban: &str) -> String {
    let visible = 4;
    let length = iban.chars().count();
    if length <= visible {
        return "*".repeat(length);
    }
    let mut masked: String = "*".repeat(length - visible);
    masked.extend(iban.chars().skip(length - visible));
    masked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_iban_keeps_last_four() {
        assert_eq!(mask_iban("DE89370400440532013000"), "******************3000");
        assert_eq!(mask_iban("X123"), "****");
        assert_eq!(mask_iban(""), "");
    }
}
