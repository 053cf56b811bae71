//! Order queries.
//!
//! Order creation is transactional: stock is decremented with a guarded
//! update before the order rows are written, so two concurrent checkouts can
//! never oversell the same bottle.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use valroux_core::{Cents, CustomerId, OrderId, OrderStatus, PaymentStatus, ProductId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, ShippingAddress};

/// One line of a new order, priced from the database at checkout time.
#[derive(Debug)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub vintage: Option<i32>,
    pub unit_price: Decimal,
    pub unit_price_cents: Cents,
    pub quantity: i32,
    pub total_cents: Cents,
}

/// Everything needed to insert an order with its lines.
#[derive(Debug)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: Option<CustomerId>,
    pub email: String,
    pub currency: String,
    pub subtotal_cents: Cents,
    pub shipping_cents: Cents,
    pub vat_rate: Decimal,
    pub vat_cents: Cents,
    pub total_cents: Cents,
    pub shipping_carrier: String,
    pub shipping_method_name: String,
    pub shipping_method_id: String,
    pub address: ShippingAddress,
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// Repository for orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and its lines, decrementing stock in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming the wine if any line has
    /// insufficient stock; nothing is written in that case.
    pub async fn create(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for item in &new.items {
            Self::take_stock(&mut tx, item).await?;
        }

        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO shop.orders
                (order_number, customer_id, email, status, payment_status,
                 currency, subtotal_cents, shipping_cents, vat_rate, vat_cents,
                 total_cents, shipping_carrier, shipping_method_name,
                 shipping_method_id, ship_to_name, ship_to_street,
                 ship_to_house_number, ship_to_postal_code, ship_to_city,
                 ship_to_country, phone, company_name, vat_number)
            VALUES ($1, $2, $3, 'pending', 'open', $4, $5, $6, $7, $8, $9,
                    $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING *
            ",
        )
        .bind(&new.order_number)
        .bind(new.customer_id)
        .bind(&new.email)
        .bind(&new.currency)
        .bind(new.subtotal_cents)
        .bind(new.shipping_cents)
        .bind(new.vat_rate)
        .bind(new.vat_cents)
        .bind(new.total_cents)
        .bind(&new.shipping_carrier)
        .bind(&new.shipping_method_name)
        .bind(&new.shipping_method_id)
        .bind(&new.address.name)
        .bind(&new.address.street)
        .bind(new.address.house_number.as_deref())
        .bind(&new.address.postal_code)
        .bind(&new.address.city)
        .bind(&new.address.country)
        .bind(new.address.phone.as_deref())
        .bind(new.company_name.as_deref())
        .bind(new.vat_number.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        for item in &new.items {
            sqlx::query(
                r"
                INSERT INTO shop.order_items
                    (order_id, product_id, product_name, vintage, unit_price,
                     unit_price_cents, quantity, total_cents)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.vintage)
            .bind(item.unit_price)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.total_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    async fn take_stock(
        tx: &mut Transaction<'_, Postgres>,
        item: &NewOrderItem,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.products SET stock = stock - $2 WHERE id = $1 AND stock >= $2",
        )
        .bind(item.product_id)
        .bind(item.quantity)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(format!(
                "insufficient stock for {}",
                item.product_name
            )));
        }
        Ok(())
    }

    /// Record the payment provider's payment id on a freshly created order.
    pub async fn set_payment_id(
        &self,
        order_id: OrderId,
        payment_id: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE shop.orders SET payment_id = $2, updated_at = now() WHERE id = $1")
            .bind(order_id)
            .bind(payment_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Find the order carrying a given payment id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown payment id.
    pub async fn find_by_payment_id(&self, payment_id: &str) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>("SELECT * FROM shop.orders WHERE payment_id = $1")
            .bind(payment_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Update the payment status and, where given, the order status.
    pub async fn update_payment_status(
        &self,
        order_id: OrderId,
        payment_status: PaymentStatus,
        status: Option<OrderStatus>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE shop.orders
            SET payment_status = $2,
                status = COALESCE($3, status),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(order_id)
        .bind(payment_status)
        .bind(status)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Cancel a pending order and return its reserved stock.
    ///
    /// Only acts on orders still in `pending`, so a webhook retry cannot
    /// restore the same stock twice. Returns whether anything changed.
    pub async fn cancel_and_restore_stock(
        &self,
        order_id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE shop.orders
            SET status = 'cancelled', payment_status = $2, updated_at = now()
            WHERE id = $1 AND status = 'pending'
            ",
        )
        .bind(order_id)
        .bind(payment_status)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r"
            UPDATE shop.products p
            SET stock = p.stock + oi.quantity
            FROM shop.order_items oi
            WHERE oi.order_id = $1 AND oi.product_id = p.id
            ",
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// List a customer's orders, newest first.
    pub async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM shop.orders WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    /// Fetch one of the customer's orders by order number.
    ///
    /// Scoped to the customer so one customer cannot read another's order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist or
    /// belongs to someone else.
    pub async fn get_by_number_for_customer(
        &self,
        customer_id: CustomerId,
        order_number: &str,
    ) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(
            "SELECT * FROM shop.orders WHERE customer_id = $1 AND order_number = $2",
        )
        .bind(customer_id)
        .bind(order_number)
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
}
