//! Core types for Maison.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod coupon;
pub mod id;
pub mod identity;
pub mod money;
pub mod status;

pub use coupon::Coupon;
pub use id::*;
pub use identity::{IdentityError, ShopperIdentity};
pub use money::{CurrencyCode, CurrencyCodeError};
pub use status::*;
