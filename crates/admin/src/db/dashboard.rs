//! Dashboard aggregate queries.

use serde::Serialize;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{Order, Product};

/// Order count for one status.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: valroux_core::OrderStatus,
    pub count: i64,
}

/// Everything the dashboard endpoint returns.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub total_orders: i64,
    /// Revenue across paid (and later) orders, in cents.
    pub paid_revenue_cents: i64,
    pub orders_by_status: Vec<StatusCount>,
    pub low_stock: Vec<Product>,
    pub recent_orders: Vec<Order>,
}

/// Stock level at or below which a wine counts as low stock.
const LOW_STOCK_THRESHOLD: i32 = 5;

/// Number of recent orders shown.
const RECENT_ORDERS_LIMIT: i64 = 10;

/// Repository for dashboard aggregates.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Collect all dashboard aggregates.
    pub async fn load(&self) -> Result<DashboardData, RepositoryError> {
        let total_orders =
            sqlx::query_scalar::<_, i64>("SELECT count(*) FROM shop.orders")
                .fetch_one(&self.pool)
                .await?;

        let paid_revenue_cents = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COALESCE(sum(total_cents), 0)
            FROM shop.orders
            WHERE payment_status = 'paid'
            ",
        )
        .fetch_one(&self.pool)
        .await?;

        let orders_by_status = sqlx::query_as::<_, StatusCount>(
            r"
            SELECT status, count(*) AS count
            FROM shop.orders
            GROUP BY status
            ORDER BY count DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let low_stock = sqlx::query_as::<_, Product>(
            r"
            SELECT * FROM shop.products
            WHERE visible AND stock <= $1
            ORDER BY stock ASC
            ",
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&self.pool)
        .await?;

        let recent_orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM shop.orders ORDER BY created_at DESC LIMIT $1",
        )
        .bind(RECENT_ORDERS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardData {
            total_orders,
            paid_revenue_cents,
            orders_by_status,
            low_stock,
            recent_orders,
        })
    }
}
