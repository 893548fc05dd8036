//! Coupon domain type shared by the storefront (evaluation) and the
//! dashboard (management).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{BrandId, CategoryId, CouponId, ProductId};
use crate::types::status::{CouponScope, DiscountType};

/// A brand-issued discount coupon with its restriction sets loaded.
///
/// An empty restriction set means that axis is unrestricted; a non-empty set
/// limits the coupon to the listed products, categories, or countries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub brand_id: BrandId,
    /// Globally unique, matched case-insensitively.
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Percentage points for [`DiscountType::Percentage`], an amount in the
    /// brand's base currency otherwise.
    pub discount_value: Decimal,
    pub applies_to: CouponScope,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub min_purchase_amount: Option<Decimal>,
    pub is_active: bool,
    /// Product restriction, meaningful when `applies_to` is `Products`.
    pub product_ids: Vec<ProductId>,
    /// Category restriction, meaningful when `applies_to` is `Categories`.
    pub category_ids: Vec<CategoryId>,
    /// ISO 3166-1 alpha-2 codes; empty means available everywhere.
    pub country_codes: Vec<String>,
}

impl Coupon {
    /// Whether the validity window has opened at `now`.
    #[must_use]
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.starts_at.is_none_or(|starts| starts <= now)
    }

    /// Whether the validity window has closed at `now`.
    #[must_use]
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires < now)
    }

    /// Whether every permitted use has been consumed.
    #[must_use]
    pub fn usage_exhausted(&self) -> bool {
        self.usage_limit
            .is_some_and(|limit| self.usage_count >= limit)
    }

    /// Whether the coupon restricts which countries it can be used from.
    #[must_use]
    pub fn restricts_countries(&self) -> bool {
        !self.country_codes.is_empty()
    }

    /// Whether `country_code` (alpha-2, any case) is permitted.
    #[must_use]
    pub fn allows_country(&self, country_code: &str) -> bool {
        !self.restricts_countries()
            || self
                .country_codes
                .iter()
                .any(|code| code.eq_ignore_ascii_case(country_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn base_coupon() -> Coupon {
        Coupon {
            id: CouponId::new(1),
            brand_id: BrandId::new(1),
            code: "welcome10".to_owned(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: dec!(10),
            applies_to: CouponScope::EntireStore,
            starts_at: None,
            expires_at: None,
            usage_limit: None,
            usage_count: 0,
            min_purchase_amount: None,
            is_active: true,
            product_ids: vec![],
            category_ids: vec![],
            country_codes: vec![],
        }
    }

    #[test]
    fn test_window_open_ended() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let coupon = base_coupon();
        assert!(coupon.has_started(now));
        assert!(!coupon.has_expired(now));
    }

    #[test]
    fn test_window_boundaries() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut coupon = base_coupon();
        coupon.starts_at = Some(now);
        coupon.expires_at = Some(now);
        // Both boundaries are inclusive.
        assert!(coupon.has_started(now));
        assert!(!coupon.has_expired(now));
        assert!(coupon.has_expired(now + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_usage_exhaustion() {
        let mut coupon = base_coupon();
        assert!(!coupon.usage_exhausted());
        coupon.usage_limit = Some(5);
        coupon.usage_count = 4;
        assert!(!coupon.usage_exhausted());
        coupon.usage_count = 5;
        assert!(coupon.usage_exhausted());
    }

    #[test]
    fn test_country_restriction_is_case_insensitive() {
        let mut coupon = base_coupon();
        assert!(coupon.allows_country("FR"));
        coupon.country_codes = vec!["US".to_owned(), "CA".to_owned()];
        assert!(coupon.allows_country("us"));
        assert!(!coupon.allows_country("FR"));
    }
}
