//! Integration tests for the Valroux shop.
//!
//! HTTP-level tests against running binaries; nothing here mocks the
//! servers. All tests are `#[ignore]`-gated so `cargo test` stays green
//! without infrastructure.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, run migrations and seed data
//! cargo run -p valroux-cli -- migrate all
//! cargo run -p valroux-cli -- seed
//!
//! # Start both servers
//! cargo run -p valroux-storefront &
//! cargo run -p valroux-admin &
//!
//! # Run the ignored tests
//! cargo test -p valroux-integration-tests -- --ignored
//! ```

use reqwest::Client;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Client with a cookie store, so sessions survive across requests.
///
/// # Panics
///
/// Panics if the HTTP client fails to build (test-only code).
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Unique email for a test run, so repeated runs never collide.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{prefix}+{nanos}@example.com")
}
