//! Cart domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use maison_core::{
    AnonymousId, CartId, CartItemId, Coupon, CustomerId, ProductId, SizeId, VariantId,
};

/// A shopper's cart (domain type).
///
/// Exactly one of `customer_id` or `anonymous_id` is set. `total_price` is
/// denormalized and reconciled against the line items on every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning customer, for signed-in shoppers.
    pub customer_id: Option<CustomerId>,
    /// Owning guest token, for anonymous shoppers.
    pub anonymous_id: Option<AnonymousId>,
    /// Coupon currently applied to this cart, if any.
    pub coupon_id: Option<maison_core::CouponId>,
    /// Sum of `quantity * unit_price` over the items, before discounts.
    pub total_price: Decimal,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last mutated.
    pub updated_at: DateTime<Utc>,
}

/// One line in a cart (domain type).
///
/// A line is keyed by `(cart, variant, size)`; adding the same combination
/// again increments `quantity` instead of creating a second line.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    /// Unique cart item ID.
    pub id: CartItemId,
    /// Cart this line belongs to.
    pub cart_id: CartId,
    /// Variant being purchased.
    pub variant_id: VariantId,
    /// Size being purchased.
    pub size_id: SizeId,
    /// Number of units; always positive.
    pub quantity: i32,
    /// Unit price captured when the line was first added.
    pub unit_price: Decimal,
    /// When the line was first added.
    pub created_at: DateTime<Utc>,
    /// When the line was last changed.
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// The line subtotal, `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// A cart line joined with the catalog fields a shopper sees.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    /// The underlying cart item.
    #[serde(flatten)]
    pub item: CartItem,
    /// Product the variant belongs to.
    pub product_id: ProductId,
    /// Brand that owns the product, used for coupon scoping.
    pub brand_id: maison_core::BrandId,
    /// Product display name.
    pub product_name: String,
    /// Variant SKU.
    pub sku: String,
    /// Size display name (e.g., "M").
    pub size_name: String,
    /// Stored path of the variant's main image, if one exists.
    pub image_path: Option<String>,
    /// Category the product belongs to, used for coupon scoping.
    pub category_id: maison_core::CategoryId,
}

/// A cart with its lines and applied coupon fully loaded.
#[derive(Debug, Clone)]
pub struct CartDetail {
    pub cart: Cart,
    pub lines: Vec<CartLine>,
    /// The applied coupon, loaded when `cart.coupon_id` is set.
    pub coupon: Option<Coupon>,
}

impl CartDetail {
    /// Sum of line totals; must equal `cart.total_price` after every
    /// committed mutation.
    #[must_use]
    pub fn items_subtotal(&self) -> Decimal {
        self.lines.iter().map(|line| line.item.line_total()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_total() {
        let item = CartItem {
            id: CartItemId::new(1),
            cart_id: CartId::new(1),
            variant_id: VariantId::new(10),
            size_id: SizeId::new(2),
            quantity: 3,
            unit_price: dec!(10.00),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(item.line_total(), dec!(30.00));
    }
}
