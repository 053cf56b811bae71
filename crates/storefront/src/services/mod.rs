//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Customer registration and login (argon2 password hashing)
//! - `shipping` - Rate quoting: aggregator reshaping, static fallback, cache
//! - `checkout` - Order placement: re-pricing, totals, payment creation

pub mod auth;
pub mod checkout;
pub mod shipping;

pub use auth::AuthService;
pub use shipping::ShippingService;
