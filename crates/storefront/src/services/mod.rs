//! Business workflows for the storefront.
//!
//! Route handlers stay thin; the sequencing of a cart mutation and the
//! coupon math live here, behind the store trait so they run unchanged
//! against `PostgreSQL` or the in-memory test store.

pub mod cart;
pub mod discount;
