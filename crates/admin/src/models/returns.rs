//! Return policy domain types.
//!
//! Policies are versioned and append-only: publishing deactivates the prior
//! active row and inserts `version = prior + 1`. Rows are never edited after
//! creation, so the full history is retained.

use chrono::{DateTime, Utc};
use serde::Serialize;

use maison_core::{BrandId, ReturnPolicyId};

/// One published version of a brand's return policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnPolicy {
    pub id: ReturnPolicyId,
    pub brand_id: BrandId,
    /// 1-based, strictly increasing per brand.
    pub version: i32,
    /// Exactly one version per brand is active.
    pub is_active: bool,
    pub accepts_returns: bool,
    /// Days after delivery a return may be initiated.
    pub window_days: i32,
    /// Free-form policy text shown to shoppers.
    pub terms: String,
    pub created_at: DateTime<Utc>,
}

/// Content of a new policy version.
#[derive(Debug, Clone)]
pub struct ReturnPolicyDraft {
    pub accepts_returns: bool,
    pub window_days: i32,
    pub terms: String,
}
