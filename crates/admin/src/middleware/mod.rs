//! Middleware and extractors for the dashboard.

pub mod auth;
pub mod request_id;

pub use auth::BrandAuth;
pub use request_id::request_id_middleware;
