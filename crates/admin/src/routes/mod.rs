//! HTTP route handlers for the back-office JSON API.
//!
//! All routes under `/api` require a session except `/api/auth/login`.
//! Mutating routes additionally require a role with write access; viewers
//! get 403.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (DB ping)
//!
//! # Auth
//! POST /api/auth/login                      - Login, sets session
//! POST /api/auth/logout                     - Clear session
//! GET  /api/auth/me                         - Current admin or 401
//!
//! # Dashboard
//! GET  /api/dashboard                       - Order/revenue/stock aggregates
//!
//! # Orders
//! GET   /api/orders                         - List (status, search, paging)
//! GET   /api/orders/{id}                    - Order detail + items
//! PATCH /api/orders/{id}/status             - Lifecycle transition (409 if invalid)
//!
//! # Shipping
//! POST /api/shipping/labels                 - Buy label for order (409/502)
//! GET  /api/shipping/tracking/{number}      - Tracking lookup proxy
//!
//! # Products
//! GET    /api/products                      - All wines, hidden included
//! POST   /api/products                      - Create
//! PATCH  /api/products/{id}                 - Partial update
//! DELETE /api/products/{id}                 - Delete (409 while referenced)
//!
//! # VAT rates
//! GET /api/vat-rates                        - List configured rates
//! PUT /api/vat-rates/{country}              - Upsert a country's rate
//!
//! # Ad catalog
//! POST /api/catalog/sync                    - Push catalog to the ad platform
//! ```

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod shipping;
pub mod vat_rates;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", patch(orders::update_status))
}

/// Create the shipping routes router.
pub fn shipping_routes() -> Router<AppState> {
    Router::new()
        .route("/labels", post(shipping::create_label))
        .route("/tracking/{tracking_number}", get(shipping::tracking))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/", post(products::create))
        .route("/{id}", patch(products::update))
        .route("/{id}", delete(products::delete))
}

/// Create the VAT rate routes router.
pub fn vat_rate_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(vat_rates::index))
        .route("/{country}", put(vat_rates::upsert))
}

/// Compose all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .route("/api/dashboard", get(dashboard::show))
        .nest("/api/orders", order_routes())
        .nest("/api/shipping", shipping_routes())
        .nest("/api/products", product_routes())
        .nest("/api/vat-rates", vat_rate_routes())
        .route("/api/catalog/sync", post(catalog::sync))
}
