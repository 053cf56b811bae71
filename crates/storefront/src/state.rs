//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::mollie::{MollieClient, PaymentError};
use crate::sendcloud::{ShippingApiError, ShippingClient};
use crate::services::{AuthService, ShippingService};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("payment client: {0}")]
    Payment(#[from] PaymentError),
    #[error("shipping client: {0}")]
    Shipping(#[from] ShippingApiError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    mollie: MollieClient,
    auth: AuthService,
    shipping: ShippingService,
}

impl AppState {
    /// Create the application state, building the outbound API clients.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, StateError> {
        let mollie = MollieClient::new(&config.mollie)?;
        let shipping_client = config
            .sendcloud
            .as_ref()
            .map(ShippingClient::new)
            .transpose()?;
        let shipping = ShippingService::new(shipping_client);
        let auth = AuthService::new(pool.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mollie,
                auth,
                shipping,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the payment provider client.
    #[must_use]
    pub fn mollie(&self) -> &MollieClient {
        &self.inner.mollie
    }

    /// Get a reference to the auth service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the shipping quote service.
    #[must_use]
    pub fn shipping(&self) -> &ShippingService {
        &self.inner.shipping
    }
}
