//! Coupon evaluation against a cart.
//!
//! Pure logic, no I/O: given a coupon, the cart lines, and the shopper's
//! country, either produce a discount breakdown or explain why the coupon
//! does not apply. The discount is recomputed from current lines on every
//! read and never folded into the stored cart total.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use maison_core::{Coupon, CouponScope, DiscountType};

use crate::models::CartLine;

/// Why a coupon cannot be applied to the cart as it stands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CouponIssue {
    #[error("this coupon is no longer active")]
    Inactive,
    #[error("this coupon is not valid yet")]
    NotStarted,
    #[error("this coupon has expired")]
    Expired,
    #[error("this coupon has reached its usage limit")]
    UsageExhausted,
    /// The eligible subtotal is below the coupon's minimum purchase amount.
    #[error("a minimum purchase of {required} is needed to use this coupon")]
    MinimumNotMet {
        /// The coupon's `min_purchase_amount`.
        required: Decimal,
    },
    /// The coupon restricts countries but the request named none.
    #[error("this coupon is only valid in certain countries; provide a country")]
    CountryRequired,
    #[error("this coupon is not valid in your country")]
    CountryNotEligible,
    /// Nothing in the cart falls inside the coupon's scope.
    #[error("no items in the cart are eligible for this coupon")]
    NoEligibleItems,
}

/// The outcome of evaluating a coupon against a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountBreakdown {
    /// Sum of line totals the coupon's scope covers.
    pub eligible_subtotal: Decimal,
    /// Amount taken off the cart total.
    pub discount_amount: Decimal,
    /// Whether shipping is waived at checkout.
    pub free_shipping: bool,
}

/// Evaluate `coupon` against the cart's `lines` at `now`.
///
/// Scope always restricts the coupon to the issuing brand's items; the
/// product and category sets narrow further for `Products` and `Categories`
/// coupons. An empty restriction set on any axis means that axis is
/// unrestricted.
///
/// # Errors
///
/// Returns the first [`CouponIssue`] that disqualifies the coupon, checked
/// in order: active flag, validity window, usage limit, country, scope,
/// minimum purchase.
pub fn evaluate(
    coupon: &Coupon,
    lines: &[CartLine],
    country: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DiscountBreakdown, CouponIssue> {
    if !coupon.is_active {
        return Err(CouponIssue::Inactive);
    }
    if !coupon.has_started(now) {
        return Err(CouponIssue::NotStarted);
    }
    if coupon.has_expired(now) {
        return Err(CouponIssue::Expired);
    }
    if coupon.usage_exhausted() {
        return Err(CouponIssue::UsageExhausted);
    }

    if coupon.restricts_countries() {
        let Some(country) = country else {
            return Err(CouponIssue::CountryRequired);
        };
        if !coupon.allows_country(country) {
            return Err(CouponIssue::CountryNotEligible);
        }
    }

    let eligible_subtotal: Decimal = lines
        .iter()
        .filter(|line| line_in_scope(coupon, line))
        .map(|line| line.item.line_total())
        .sum();
    if eligible_subtotal.is_zero() {
        return Err(CouponIssue::NoEligibleItems);
    }

    if let Some(minimum) = coupon.min_purchase_amount
        && eligible_subtotal < minimum
    {
        return Err(CouponIssue::MinimumNotMet { required: minimum });
    }

    let (discount_amount, free_shipping) = match coupon.discount_type {
        DiscountType::Percentage => {
            let fraction = coupon.discount_value / Decimal::ONE_HUNDRED;
            ((eligible_subtotal * fraction).round_dp(2), false)
        }
        // A fixed discount never exceeds what the eligible items cost.
        DiscountType::Fixed => (coupon.discount_value.min(eligible_subtotal), false),
        DiscountType::FreeShipping => (Decimal::ZERO, true),
    };

    Ok(DiscountBreakdown {
        eligible_subtotal,
        discount_amount,
        free_shipping,
    })
}

/// Whether a cart line falls inside the coupon's scope.
fn line_in_scope(coupon: &Coupon, line: &CartLine) -> bool {
    if line.brand_id != coupon.brand_id {
        return false;
    }
    match coupon.applies_to {
        CouponScope::EntireStore => true,
        CouponScope::Products => {
            coupon.product_ids.is_empty() || coupon.product_ids.contains(&line.product_id)
        }
        CouponScope::Categories => {
            coupon.category_ids.is_empty() || coupon.category_ids.contains(&line.category_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use maison_core::{
        BrandId, CartId, CartItemId, CategoryId, CouponId, ProductId, SizeId, VariantId,
    };

    use crate::models::CartItem;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn coupon(discount_type: DiscountType, value: Decimal) -> Coupon {
        Coupon {
            id: CouponId::new(1),
            brand_id: BrandId::new(1),
            code: "summer".to_owned(),
            description: None,
            discount_type,
            discount_value: value,
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

    fn line(brand: i32, product: i32, category: i32, quantity: i32, unit_price: Decimal) -> CartLine {
        CartLine {
            item: CartItem {
                id: CartItemId::new(product),
                cart_id: CartId::new(1),
                variant_id: VariantId::new(product * 10),
                size_id: SizeId::new(1),
                quantity,
                unit_price,
                created_at: now(),
                updated_at: now(),
            },
            product_id: ProductId::new(product),
            brand_id: BrandId::new(brand),
            product_name: format!("product {product}"),
            sku: format!("SKU-{product}"),
            size_name: "M".to_owned(),
            image_path: None,
            category_id: CategoryId::new(category),
        }
    }

    #[test]
    fn test_percentage_discount_rounds_to_cents() {
        let coupon = coupon(DiscountType::Percentage, dec!(15));
        let lines = vec![line(1, 1, 1, 3, dec!(9.99))];

        let breakdown = evaluate(&coupon, &lines, None, now()).expect("applies");
        assert_eq!(breakdown.eligible_subtotal, dec!(29.97));
        assert_eq!(breakdown.discount_amount, dec!(4.50));
        assert!(!breakdown.free_shipping);
    }

    #[test]
    fn test_fixed_discount_capped_at_eligible_subtotal() {
        let coupon = coupon(DiscountType::Fixed, dec!(50));
        let lines = vec![line(1, 1, 1, 1, dec!(30.00))];

        let breakdown = evaluate(&coupon, &lines, None, now()).expect("applies");
        assert_eq!(breakdown.discount_amount, dec!(30.00));
    }

    #[test]
    fn test_free_shipping_leaves_prices_untouched() {
        let coupon = coupon(DiscountType::FreeShipping, dec!(0));
        let lines = vec![line(1, 1, 1, 2, dec!(10.00))];

        let breakdown = evaluate(&coupon, &lines, None, now()).expect("applies");
        assert_eq!(breakdown.discount_amount, dec!(0));
        assert!(breakdown.free_shipping);
    }

    #[test]
    fn test_other_brand_items_never_eligible() {
        let coupon = coupon(DiscountType::Percentage, dec!(10));
        let lines = vec![line(2, 1, 1, 1, dec!(100.00))];

        assert_eq!(
            evaluate(&coupon, &lines, None, now()),
            Err(CouponIssue::NoEligibleItems)
        );
    }

    #[test]
    fn test_product_scope_narrows_to_listed_products() {
        let mut coupon = coupon(DiscountType::Percentage, dec!(10));
        coupon.applies_to = CouponScope::Products;
        coupon.product_ids = vec![ProductId::new(1)];
        let lines = vec![
            line(1, 1, 1, 1, dec!(40.00)),
            line(1, 2, 1, 1, dec!(60.00)),
        ];

        let breakdown = evaluate(&coupon, &lines, None, now()).expect("applies");
        assert_eq!(breakdown.eligible_subtotal, dec!(40.00));
        assert_eq!(breakdown.discount_amount, dec!(4.00));
    }

    #[test]
    fn test_category_scope_narrows_to_listed_categories() {
        let mut coupon = coupon(DiscountType::Fixed, dec!(5));
        coupon.applies_to = CouponScope::Categories;
        coupon.category_ids = vec![CategoryId::new(7)];
        let lines = vec![
            line(1, 1, 7, 1, dec!(20.00)),
            line(1, 2, 8, 1, dec!(20.00)),
        ];

        let breakdown = evaluate(&coupon, &lines, None, now()).expect("applies");
        assert_eq!(breakdown.eligible_subtotal, dec!(20.00));
        assert_eq!(breakdown.discount_amount, dec!(5.00));
    }

    #[test]
    fn test_empty_restriction_set_means_unrestricted() {
        let mut coupon = coupon(DiscountType::Percentage, dec!(10));
        coupon.applies_to = CouponScope::Products;
        let lines = vec![line(1, 3, 1, 1, dec!(10.00))];

        assert!(evaluate(&coupon, &lines, None, now()).is_ok());
    }

    #[test]
    fn test_window_and_activity_checks() {
        let lines = vec![line(1, 1, 1, 1, dec!(10.00))];

        let mut inactive = coupon(DiscountType::Percentage, dec!(10));
        inactive.is_active = false;
        assert_eq!(
            evaluate(&inactive, &lines, None, now()),
            Err(CouponIssue::Inactive)
        );

        let mut early = coupon(DiscountType::Percentage, dec!(10));
        early.starts_at = Some(now() + chrono::Duration::days(1));
        assert_eq!(
            evaluate(&early, &lines, None, now()),
            Err(CouponIssue::NotStarted)
        );

        let mut late = coupon(DiscountType::Percentage, dec!(10));
        late.expires_at = Some(now() - chrono::Duration::days(1));
        assert_eq!(
            evaluate(&late, &lines, None, now()),
            Err(CouponIssue::Expired)
        );

        let mut spent = coupon(DiscountType::Percentage, dec!(10));
        spent.usage_limit = Some(3);
        spent.usage_count = 3;
        assert_eq!(
            evaluate(&spent, &lines, None, now()),
            Err(CouponIssue::UsageExhausted)
        );
    }

    #[test]
    fn test_country_restriction() {
        let mut coupon = coupon(DiscountType::Percentage, dec!(10));
        coupon.country_codes = vec!["US".to_owned(), "CA".to_owned()];
        let lines = vec![line(1, 1, 1, 1, dec!(10.00))];

        assert_eq!(
            evaluate(&coupon, &lines, None, now()),
            Err(CouponIssue::CountryRequired)
        );
        assert_eq!(
            evaluate(&coupon, &lines, Some("FR"), now()),
            Err(CouponIssue::CountryNotEligible)
        );
        assert!(evaluate(&coupon, &lines, Some("ca"), now()).is_ok());
    }

    #[test]
    fn test_minimum_purchase_checked_against_eligible_subtotal() {
        let mut coupon = coupon(DiscountType::Percentage, dec!(10));
        coupon.applies_to = CouponScope::Products;
        coupon.product_ids = vec![ProductId::new(1)];
        coupon.min_purchase_amount = Some(dec!(50));
        // Cart totals 110, but only 10 of it is eligible.
        let lines = vec![
            line(1, 1, 1, 1, dec!(10.00)),
            line(1, 2, 1, 1, dec!(100.00)),
        ];

        assert_eq!(
            evaluate(&coupon, &lines, None, now()),
            Err(CouponIssue::MinimumNotMet {
                required: dec!(50)
            })
        );
    }

    #[test]
    fn test_empty_cart_has_no_eligible_items() {
        let coupon = coupon(DiscountType::Percentage, dec!(10));
        assert_eq!(
            evaluate(&coupon, &[], None, now()),
            Err(CouponIssue::NoEligibleItems)
        );
    }
}
