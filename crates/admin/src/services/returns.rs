//! Return policy workflow: validation, then the versioned publish.

use maison_core::BrandId;

use crate::db::DashboardStore;
use crate::error::{AppError, Result};
use crate::models::{ReturnPolicy, ReturnPolicyDraft};

/// Validate and publish a new policy version, superseding the active one.
pub async fn publish_policy(
    store: &dyn DashboardStore,
    brand_id: BrandId,
    draft: ReturnPolicyDraft,
) -> Result<ReturnPolicy> {
    if draft.accepts_returns && draft.window_days <= 0 {
        return Err(AppError::BadRequest(
            "a brand accepting returns needs a positive return window".to_owned(),
        ));
    }
    if draft.terms.trim().is_empty() {
        return Err(AppError::BadRequest(
            "policy terms must not be empty".to_owned(),
        ));
    }
    Ok(store.publish_return_policy(brand_id, draft).await?)
}

#[cfg(test)]
mod tests {
    use crate::db::{BrandStore, MemoryDashboardStore};

    use super::*;

    #[tokio::test]
    async fn test_zero_window_rejected_when_accepting() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();
        let err = publish_policy(
            &store,
            brand.id,
            ReturnPolicyDraft {
                accepts_returns: true,
                window_days: 0,
                terms: "whenever".to_owned(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_no_returns_policy_allows_zero_window() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();
        let policy = publish_policy(
            &store,
            brand.id,
            ReturnPolicyDraft {
                accepts_returns: false,
                window_days: 0,
                terms: "All sales are final.".to_owned(),
            },
        )
        .await
        .unwrap();
        assert_eq!(policy.version, 1);
        assert!(!policy.accepts_returns);
    }
}
