//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health     - Liveness check
//!
//! # Cart proxy (JSON)
//! GET    /api/cart   - Fetch cart snapshot (?cartId=), expiry-aware
//! POST   /api/cart   - Create cart / add lines (stale-id fallback)
//! PUT    /api/cart   - Update line quantities
//! DELETE /api/cart   - Remove lines
//! ```

pub mod cart;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the cart proxy router.
pub fn cart_routes() -> Router<AppState> {
    Router::new().route(
        "/api/cart",
        get(cart::show)
            .post(cart::create_or_add)
            .put(cart::update)
            .delete(cart::remove),
    )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new().merge(cart_routes())
}
