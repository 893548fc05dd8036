//! The cart workflow: add, quantity change, removal, coupon application.
//!
//! Handlers validate shape; this module owns the sequencing — resolve the
//! size by name, route zero quantities to deletion, check coupon
//! eligibility — and delegates the atomic mutation to the store, which
//! reconciles the cart total inside the same transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use maison_core::{CartItemId, ShopperIdentity, VariantId};

use crate::db::StorefrontStore;
use crate::error::{AppError, Result};
use crate::models::CartDetail;
use crate::services::discount::{self, CouponIssue};

/// Totals a shopper sees for their cart, discount applied at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of `quantity * unit_price` over all lines.
    pub subtotal: Decimal,
    /// Discount from the applied coupon, zero when none applies.
    pub discount: Decimal,
    /// Whether the applied coupon waives shipping.
    pub free_shipping: bool,
    /// `subtotal - discount`.
    pub total: Decimal,
    /// Why the applied coupon currently yields no discount, if it doesn't.
    pub coupon_issue: Option<CouponIssue>,
}

/// Add `quantity` units of `(variant, size-name)` to the shopper's cart.
///
/// # Errors
///
/// - [`AppError::Validation`] when `quantity` is not positive (callers using
///   `validator` normally reject this earlier).
/// - [`AppError::NotFound`] when the variant does not exist or does not
///   carry the size.
/// - [`AppError::InsufficientStock`] when the resulting line quantity
///   exceeds stock.
pub async fn add_item(
    store: &dyn StorefrontStore,
    shopper: ShopperIdentity,
    variant_id: VariantId,
    size: &str,
    quantity: i32,
) -> Result<CartDetail> {
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_owned(),
        ));
    }

    let availability = store
        .size_availability(variant_id, size)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("variant {variant_id} is not available in size {size}"))
        })?;

    // The store re-checks stock under lock; this early check just gives a
    // friendlier answer in the common case.
    if quantity > availability.available {
        return Err(AppError::InsufficientStock {
            available: availability.available,
        });
    }

    let detail = store
        .add_item(shopper, variant_id, availability.size_id, quantity)
        .await?;
    Ok(detail)
}

/// Set a cart line to an absolute quantity.
///
/// Zero routes to deletion so a zero-quantity row can never exist; negative
/// quantities are rejected.
pub async fn set_quantity(
    store: &dyn StorefrontStore,
    shopper: ShopperIdentity,
    item_id: CartItemId,
    quantity: i32,
) -> Result<CartDetail> {
    if quantity < 0 {
        return Err(AppError::BadRequest(
            "quantity must not be negative".to_owned(),
        ));
    }
    if quantity == 0 {
        return remove_item(store, shopper, item_id).await;
    }
    let detail = store.set_item_quantity(shopper, item_id, quantity).await?;
    Ok(detail)
}

/// Delete a line from the shopper's cart.
pub async fn remove_item(
    store: &dyn StorefrontStore,
    shopper: ShopperIdentity,
    item_id: CartItemId,
) -> Result<CartDetail> {
    let detail = store.remove_item(shopper, item_id).await?;
    Ok(detail)
}

/// Apply the coupon with `code` to the shopper's cart.
///
/// Eligibility is checked against the cart as it stands; the coupon id is
/// then recorded on the cart and the discount recomputed on every read.
pub async fn apply_coupon(
    store: &dyn StorefrontStore,
    shopper: ShopperIdentity,
    code: &str,
    country: Option<&str>,
    now: DateTime<Utc>,
) -> Result<CartDetail> {
    let coupon = store
        .coupon_by_code(code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("coupon \"{code}\" not found")))?;

    let detail = store.cart_detail(shopper).await?;
    discount::evaluate(&coupon, &detail.lines, country, now)?;

    let detail = store.apply_coupon(shopper, coupon.id).await?;
    Ok(detail)
}

/// Remove the applied coupon, if any.
pub async fn remove_coupon(
    store: &dyn StorefrontStore,
    shopper: ShopperIdentity,
) -> Result<CartDetail> {
    let detail = store.clear_coupon(shopper).await?;
    Ok(detail)
}

/// Compute the totals for a loaded cart.
///
/// An applied coupon that no longer evaluates (expired, cart changed under
/// its minimum, wrong country) contributes no discount; the issue rides
/// along so the response can say why.
#[must_use]
pub fn compute_totals(detail: &CartDetail, country: Option<&str>, now: DateTime<Utc>) -> CartTotals {
    let subtotal = detail.items_subtotal();

    let (discount, free_shipping, coupon_issue) = match &detail.coupon {
        Some(coupon) => match discount::evaluate(coupon, &detail.lines, country, now) {
            Ok(breakdown) => (breakdown.discount_amount, breakdown.free_shipping, None),
            Err(issue) => (Decimal::ZERO, false, Some(issue)),
        },
        None => (Decimal::ZERO, false, None),
    };

    CartTotals {
        subtotal,
        discount,
        free_shipping,
        total: subtotal - discount,
        coupon_issue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use maison_core::{
        AnonymousId, BrandId, CategoryId, Coupon, CouponId, CouponScope, DiscountType,
    };

    use crate::db::CartStore;
    use crate::db::memory::{MemoryStorefrontStore, VariantFixture};

    fn shopper() -> ShopperIdentity {
        ShopperIdentity::Anonymous(AnonymousId::new(Uuid::new_v4()))
    }

    fn seeded_store() -> (MemoryStorefrontStore, VariantId) {
        let store = MemoryStorefrontStore::new();
        let (_, variant_id) = store.add_variant(VariantFixture {
            brand_id: BrandId::new(1),
            brand_name: "Atelier Nord".to_owned(),
            product_name: "Wool Coat".to_owned(),
            category_id: CategoryId::new(1),
            category_name: "Outerwear".to_owned(),
            sku: "AN-WC-001".to_owned(),
            price: dec!(10.00),
            sizes: vec![("M".to_owned(), 5)],
        });
        (store, variant_id)
    }

    fn percent_coupon(code: &str, value: Decimal) -> Coupon {
        Coupon {
            id: CouponId::new(1),
            brand_id: BrandId::new(1),
            code: code.to_owned(),
            description: None,
            discount_type: DiscountType::Percentage,
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

    #[tokio::test]
    async fn test_add_resolves_size_by_name() {
        let (store, variant_id) = seeded_store();
        let shopper = shopper();

        let detail = add_item(&store, shopper, variant_id, "m", 2)
            .await
            .expect("size names match case-insensitively");
        assert_eq!(detail.lines.len(), 1);
        assert_eq!(detail.cart.total_price, dec!(20.00));
    }

    #[tokio::test]
    async fn test_add_unknown_size_is_not_found() {
        let (store, variant_id) = seeded_store();

        let err = add_item(&store, shopper(), variant_id, "XXL", 1)
            .await
            .expect_err("size not carried");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_rejects_non_positive_quantity() {
        let (store, variant_id) = seeded_store();

        let err = add_item(&store, shopper(), variant_id, "M", 0)
            .await
            .expect_err("zero quantity");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_zero_quantity_update_routes_to_deletion() {
        let (store, variant_id) = seeded_store();
        let shopper = shopper();

        let detail = add_item(&store, shopper, variant_id, "M", 2).await.expect("add");
        let item_id = detail.lines[0].item.id;

        let detail = set_quantity(&store, shopper, item_id, 0)
            .await
            .expect("zero deletes the line");
        assert!(detail.lines.is_empty());
        assert_eq!(detail.cart.total_price, dec!(0));
    }

    #[tokio::test]
    async fn test_negative_quantity_rejected() {
        let (store, variant_id) = seeded_store();
        let shopper = shopper();

        let detail = add_item(&store, shopper, variant_id, "M", 2).await.expect("add");
        let item_id = detail.lines[0].item.id;

        let err = set_quantity(&store, shopper, item_id, -1)
            .await
            .expect_err("negative quantity");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_apply_coupon_records_and_discounts() {
        let (store, variant_id) = seeded_store();
        store.add_coupon(percent_coupon("welcome10", dec!(10)));
        let shopper = shopper();

        add_item(&store, shopper, variant_id, "M", 3).await.expect("add");
        let detail = apply_coupon(&store, shopper, "WELCOME10", None, Utc::now())
            .await
            .expect("codes match case-insensitively");
        assert_eq!(detail.cart.coupon_id, Some(CouponId::new(1)));

        let totals = compute_totals(&detail, None, Utc::now());
        assert_eq!(totals.subtotal, dec!(30.00));
        assert_eq!(totals.discount, dec!(3.00));
        assert_eq!(totals.total, dec!(27.00));
        assert!(totals.coupon_issue.is_none());
    }

    #[tokio::test]
    async fn test_apply_unknown_coupon_is_not_found() {
        let (store, variant_id) = seeded_store();
        let shopper = shopper();
        add_item(&store, shopper, variant_id, "M", 1).await.expect("add");

        let err = apply_coupon(&store, shopper, "nope", None, Utc::now())
            .await
            .expect_err("unknown code");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_apply_ineligible_coupon_is_rejected() {
        let (store, variant_id) = seeded_store();
        let mut coupon = percent_coupon("min50", dec!(10));
        coupon.min_purchase_amount = Some(dec!(50));
        store.add_coupon(coupon);
        let shopper = shopper();
        add_item(&store, shopper, variant_id, "M", 1).await.expect("add");

        let err = apply_coupon(&store, shopper, "min50", None, Utc::now())
            .await
            .expect_err("below minimum");
        assert!(matches!(
            err,
            AppError::Coupon(CouponIssue::MinimumNotMet { .. })
        ));
    }

    #[tokio::test]
    async fn test_stale_coupon_yields_zero_discount_with_issue() {
        let (store, variant_id) = seeded_store();
        let mut coupon = percent_coupon("brief", dec!(10));
        coupon.expires_at = Some(Utc::now() + chrono::Duration::hours(1));
        store.add_coupon(coupon);
        let shopper = shopper();

        add_item(&store, shopper, variant_id, "M", 2).await.expect("add");
        apply_coupon(&store, shopper, "brief", None, Utc::now())
            .await
            .expect("valid now");

        let detail = store.cart_detail(shopper).await.expect("detail");
        let later = Utc::now() + chrono::Duration::hours(2);
        let totals = compute_totals(&detail, None, later);
        assert_eq!(totals.discount, dec!(0));
        assert_eq!(totals.total, totals.subtotal);
        assert_eq!(totals.coupon_issue, Some(CouponIssue::Expired));
    }

    #[tokio::test]
    async fn test_remove_coupon_clears_cart_reference() {
        let (store, variant_id) = seeded_store();
        store.add_coupon(percent_coupon("welcome10", dec!(10)));
        let shopper = shopper();

        add_item(&store, shopper, variant_id, "M", 1).await.expect("add");
        apply_coupon(&store, shopper, "welcome10", None, Utc::now())
            .await
            .expect("apply");
        let detail = remove_coupon(&store, shopper).await.expect("remove");
        assert!(detail.cart.coupon_id.is_none());
        assert!(detail.coupon.is_none());
    }
}
