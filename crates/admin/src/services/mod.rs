//! Dashboard workflows on top of the store traits.

pub mod catalog;
pub mod coupons;
pub mod payouts;
pub mod returns;
pub mod shipping;
