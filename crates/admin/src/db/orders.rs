//! Order queries for the back office.

use sqlx::PgPool;

use valroux_core::{OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

/// Filters for the admin order listing.
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Matches order number or email, case-insensitive substring.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Repository for order management.
#[derive(Debug, Clone)]
pub struct AdminOrderRepository {
    pool: PgPool,
}

impl AdminOrderRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first, with optional status filter and search.
    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let search = filter
            .search
            .as_deref()
            .map(|s| format!("%{}%", s.trim()));

        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT * FROM shop.orders
            WHERE ($1::shop.order_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR order_number ILIKE $2 OR email ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(filter.status)
        .bind(search)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Fetch an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    pub async fn get(&self, id: OrderId) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>("SELECT * FROM shop.orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Fetch the lines of an order.
    pub async fn get_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM shop.order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Set an order's status. The caller validates the transition first.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(
            r"
            UPDATE shop.orders
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Total parcel weight for an order in grams. Lines whose product was
    /// deleted fall back to the standard packed-bottle weight.
    pub async fn weight_grams(&self, order_id: OrderId) -> Result<i64, RepositoryError> {
        let grams = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COALESCE(sum(oi.quantity * COALESCE(p.weight_grams, 1300)), 0)
            FROM shop.order_items oi
            LEFT JOIN shop.products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ",
        )
        .bind(order_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(grams)
    }

    /// Persist a created shipping label on the order.
    pub async fn set_label(
        &self,
        id: OrderId,
        label_id: i64,
        tracking_number: &str,
        tracking_url: Option<&str>,
    ) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(
            r"
            UPDATE shop.orders
            SET label_id = $2, tracking_number = $3, tracking_url = $4,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(label_id)
        .bind(tracking_number)
        .bind(tracking_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
