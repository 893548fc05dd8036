//! Payout account workflow: validation, then the one-per-brand upsert.

use maison_core::{BrandId, Country, CurrencyCode};

use crate::db::DashboardStore;
use crate::error::{AppError, Result};
use crate::models::{PayoutAccount, PayoutDetails};

/// Validate and upsert the brand's payout account.
pub async fn save_account(
    store: &dyn DashboardStore,
    brand_id: BrandId,
    details: PayoutDetails,
) -> Result<PayoutAccount> {
    check_details(&details)?;
    Ok(store.upsert_payout_account(brand_id, details).await?)
}

fn check_details(details: &PayoutDetails) -> Result<()> {
    if details.holder_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "account holder name must not be empty".to_owned(),
        ));
    }
    if Country::by_code(&details.country_code).is_none() {
        return Err(AppError::BadRequest(format!(
            "unknown country code \"{}\"",
            details.country_code
        )));
    }
    if details.currency_code.parse::<CurrencyCode>().is_err() {
        return Err(AppError::BadRequest(format!(
            "\"{}\" is not a supported payout currency",
            details.currency_code
        )));
    }
    check_iban(&details.iban)
}

/// Shape check only: two-letter country prefix, two check digits, 15-34
/// characters overall. Bank-side validity is the payment provider's concern.
fn check_iban(iban: &str) -> Result<()> {
    let normalized: String = iban.chars().filter(|c| !c.is_whitespace()).collect();
    if !normalized.is_ascii() {
        return Err(AppError::BadRequest("IBAN is not valid".to_owned()));
    }
    let valid_length = (15..=34).contains(&normalized.len());
    let valid_prefix = normalized.len() >= 4
        && normalized[..2].chars().all(|c| c.is_ascii_uppercase())
        && normalized[2..4].chars().all(|c| c.is_ascii_digit())
        && normalized[4..].chars().all(|c| c.is_ascii_alphanumeric());
    if valid_length && valid_prefix {
        Ok(())
    } else {
        Err(AppError::BadRequest("IBAN is not valid".to_owned()))
    }
}
