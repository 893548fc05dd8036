//! Middleware and extractors for the storefront.

pub mod identity;
pub mod request_id;

pub use identity::Shopper;
pub use request_id::request_id_middleware;
