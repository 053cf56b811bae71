//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (DB ping)
//!
//! # Auth (rate limited ~10/min/IP)
//! POST /api/auth/register           - Create account, sets session
//! POST /api/auth/login              - Login, sets session
//! POST /api/auth/logout             - Clear session
//! GET  /api/auth/me                 - Current customer or 401
//!
//! # Catalog
//! GET  /api/products                - Visible wines (wine_type, in_stock, paging)
//! GET  /api/products/{slug}         - Single visible wine
//!
//! # Cart (session-bound)
//! GET    /api/cart                  - Cart with line totals + subtotal
//! POST   /api/cart/items            - Add line (quantity accumulates)
//! PATCH  /api/cart/items/{id}       - Set line quantity (1..=24)
//! DELETE /api/cart/items/{id}       - Remove line
//!
//! # Shipping
//! POST /api/shipping/rates          - Quote rates (rate limited ~30/min/IP)
//! GET  /api/shipping/options        - Static delivery options
//!
//! # Checkout & orders
//! POST /api/checkout                - Place order, returns payment URL
//! GET  /api/orders                  - Customer's orders
//! GET  /api/orders/{order_number}   - Order detail + items
//!
//! # Webhooks
//! POST /api/webhooks/payment        - Payment status change (form `id=`)
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod shipping;
pub mod webhooks;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{auth_rate_limiter, shipping_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .layer(auth_rate_limiter())
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    use axum::routing::{delete, patch};

    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add_item))
        .route("/items/{id}", patch(cart::update_item))
        .route("/items/{id}", delete(cart::remove_item))
}

/// Create the shipping routes router.
pub fn shipping_routes() -> Router<AppState> {
    Router::new()
        .route("/rates", post(shipping::rates).layer(shipping_rate_limiter()))
        .route("/options", get(shipping::options))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{order_number}", get(orders::show))
}

/// Compose all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/shipping", shipping_routes())
        .route("/api/checkout", post(checkout::create))
        .nest("/api/orders", order_routes())
        .route("/api/webhooks/payment", post(webhooks::payment))
}
