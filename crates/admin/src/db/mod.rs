//! Database operations for the admin back office.
//!
//! The admin binary reads and writes both the `admin` schema (admin users,
//! sessions) and the `shop` schema (orders, products, VAT rates). All
//! queries use the runtime `query_as` API with `FromRow` types.
//!
//! # Migrations
//!
//! Admin-schema migrations live in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p valroux-cli -- migrate admin
//! ```

pub mod admin_users;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod vat_rates;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use dashboard::{DashboardData, DashboardRepository};
pub use orders::{AdminOrderRepository, OrderFilter};
pub use products::{AdminProductRepository, NewProduct, ProductPatch};
pub use vat_rates::{VatRate, VatRateRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (duplicate email, referenced product).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
