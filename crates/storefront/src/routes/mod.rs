//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Health check
//!
//! # Catalog
//! GET    /api/products           - Product listing (?category= filter)
//! GET    /api/products/{id}      - Product detail
//! GET    /api/categories         - Category listing
//!
//! # Cart (scoped to the session's cart)
//! GET    /api/cart               - Cart contents and totals
//! DELETE /api/cart               - Clear cart
//! POST   /api/cart/items         - Add one unit ({"product_id": N})
//! PUT    /api/cart/items/{id}    - Set quantity ({"quantity": N}, <= 0 removes)
//! DELETE /api/cart/items/{id}    - Remove item
//! GET    /api/cart/count         - Cart count badge
//!
//! # Checkout
//! POST   /api/checkout           - Confirm order and start a new cart
//! ```

pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", put(cart::update).delete(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog routes
        .nest("/api/products", product_routes())
        .route("/api/categories", get(products::categories))
        // Cart routes
        .nest("/api/cart", cart_routes())
        // Checkout
        .route("/api/checkout", post(checkout::confirm))
}
