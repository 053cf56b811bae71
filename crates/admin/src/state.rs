//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::db::{
    AdminOrderRepository, AdminProductRepository, AdminUserRepository, DashboardRepository,
    VatRateRepository,
};
use crate::meta::{CatalogApiError, CatalogClient};
use crate::sendcloud::{ShippingApiError, ShippingClient};
use crate::services::{CatalogSyncService, LabelService};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("shipping client: {0}")]
    Shipping(#[from] ShippingApiError),
    #[error("catalog client: {0}")]
    Catalog(#[from] CatalogApiError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    admin_users: AdminUserRepository,
    orders: AdminOrderRepository,
    products: AdminProductRepository,
    dashboard: DashboardRepository,
    vat_rates: VatRateRepository,
    labels: LabelService,
    catalog: CatalogSyncService,
}

impl AppState {
    /// Create the application state, building the outbound API clients.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, StateError> {
        let shipping_client = config
            .sendcloud
            .as_ref()
            .map(ShippingClient::new)
            .transpose()?;
        let catalog_client = config.meta.as_ref().map(CatalogClient::new).transpose()?;
        let shop_base_url = config
            .meta
            .as_ref()
            .map_or("https://www.valroux.be", |m| m.shop_base_url.as_str())
            .to_string();

        let admin_users = AdminUserRepository::new(pool.clone());
        let orders = AdminOrderRepository::new(pool.clone());
        let products = AdminProductRepository::new(pool.clone());
        let dashboard = DashboardRepository::new(pool.clone());
        let vat_rates = VatRateRepository::new(pool.clone());

        let labels = LabelService::new(orders.clone(), shipping_client);
        let catalog = CatalogSyncService::new(products.clone(), catalog_client, shop_base_url);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                admin_users,
                orders,
                products,
                dashboard,
                vat_rates,
                labels,
                catalog,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the admin user repository.
    #[must_use]
    pub fn admin_users(&self) -> &AdminUserRepository {
        &self.inner.admin_users
    }

    /// Get a reference to the order repository.
    #[must_use]
    pub fn orders(&self) -> &AdminOrderRepository {
        &self.inner.orders
    }

    /// Get a reference to the product repository.
    #[must_use]
    pub fn products(&self) -> &AdminProductRepository {
        &self.inner.products
    }

    /// Get a reference to the dashboard repository.
    #[must_use]
    pub fn dashboard(&self) -> &DashboardRepository {
        &self.inner.dashboard
    }

    /// Get a reference to the VAT rate repository.
    #[must_use]
    pub fn vat_rates(&self) -> &VatRateRepository {
        &self.inner.vat_rates
    }

    /// Get a reference to the label service.
    #[must_use]
    pub fn labels(&self) -> &LabelService {
        &self.inner.labels
    }

    /// Get a reference to the ad-catalog sync service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogSyncService {
        &self.inner.catalog
    }
}
