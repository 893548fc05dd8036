//! Maison Core - Shared types library.
//!
//! This crate provides common types used across all Maison components:
//! - `storefront` - Public-facing shopping API
//! - `admin` - Brand dashboard API (behind the auth gateway)
//! - `cli` - Command-line tools for migrations and tenant management
//!
//! # Architecture
//!
//! The core crate contains only types and reference data - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, and domain enums
//! - [`envelope`] - The uniform JSON response envelope shared by both APIs
//! - [`countries`] - Immutable ISO 3166-1 reference table

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod countries;
pub mod envelope;
pub mod types;

pub use countries::Country;
pub use envelope::{ApiEnvelope, FieldErrors};
pub use types::*;
