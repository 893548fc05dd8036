//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (pings the database)
//!
//! # Catalog
//! POST /api/products                 - Product upload orchestrator
//! POST /api/products/{id}/variants   - Variant upload (atomic with children)
//! GET  /api/products                 - Brand's products
//! GET  /api/products/{id}            - Product with variants expanded
//!
//! # Coupons
//! POST  /api/coupons                 - Create with association sets
//! PUT   /api/coupons/{id}            - Replace fields and associations
//! PATCH /api/coupons/{id}/active     - Toggle
//! GET   /api/coupons                 - Brand's coupons
//! GET   /api/coupons/{id}            - Details with exact association sets
//!
//! # Configuration
//! PUT  /api/shipping                 - Keyed method/zone upsert
//! GET  /api/shipping
//! PUT  /api/returns                  - Publish a new policy version
//! GET  /api/returns                  - Active policy
//! GET  /api/returns/history
//! PUT  /api/payout-account
//! GET  /api/payout-account           - IBAN masked
//! ```
//!
//! All `/api` routes require the gateway's `x-brand-id` header; all
//! responses use the uniform envelope.

pub mod coupons;
pub mod payouts;
pub mod products;
pub mod returns;
pub mod shipping;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Create the dashboard API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", post(products::create).get(products::list))
        .route("/api/products/{id}", get(products::detail))
        .route("/api/products/{id}/variants", post(products::create_variant))
        .route("/api/coupons", post(coupons::create).get(coupons::list))
        .route(
            "/api/coupons/{id}",
            put(coupons::update).get(coupons::detail),
        )
        .route("/api/coupons/{id}/active", patch(coupons::toggle))
        .route("/api/shipping", put(shipping::update).get(shipping::show))
        .route("/api/returns", put(returns::publish).get(returns::active))
        .route("/api/returns/history", get(returns::history))
        .route("/api/payout-account", put(payouts::save).get(payouts::show))
}
