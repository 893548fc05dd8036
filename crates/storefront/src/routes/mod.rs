//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (pings the database)
//!
//! # Catalog
//! GET  /api/products               - Browse (brand_id, category, search, paging)
//! GET  /api/products/{id}          - Product detail with variants and sizes
//! GET  /api/variants/{id}/stock    - Per-size stock availability
//!
//! # Cart
//! GET    /api/cart                 - Cart with items and totals
//! POST   /api/cart/items           - Add item (upserts the line)
//! PATCH  /api/cart/items/{id}      - Set quantity (0 removes)
//! DELETE /api/cart/items/{id}      - Remove item
//! POST   /api/cart/coupon          - Apply a coupon by code
//! DELETE /api/cart/coupon          - Remove the applied coupon
//! ```
//!
//! All cart routes require the gateway identity headers (`x-customer-id` or
//! `x-anonymous-id`); all responses use the uniform envelope.

pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the storefront API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::list))
        .route("/api/products/{id}", get(products::detail))
        .route("/api/variants/{id}/stock", get(products::stock))
        .route("/api/cart", get(cart::show))
        .route("/api/cart/items", post(cart::add_item))
        .route(
            "/api/cart/items/{id}",
            axum::routing::patch(cart::update_item).delete(cart::remove_item),
        )
        .route(
            "/api/cart/coupon",
            post(cart::apply_coupon).delete(cart::remove_coupon),
        )
}
