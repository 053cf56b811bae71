//! Order models as seen by the back office.
//!
//! Same `shop.orders` rows as the storefront writes; the admin reads every
//! column including the label fields it maintains.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use valroux_core::{Cents, CustomerId, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId};

/// An order header row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer_id: Option<CustomerId>,
    pub email: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub currency: String,
    pub subtotal_cents: Cents,
    pub shipping_cents: Cents,
    #[serde(with = "rust_decimal::serde::str")]
    pub vat_rate: Decimal,
    pub vat_cents: Cents,
    pub total_cents: Cents,
    pub shipping_carrier: String,
    pub shipping_method_name: String,
    pub shipping_method_id: String,
    pub ship_to_name: String,
    pub ship_to_street: String,
    pub ship_to_house_number: Option<String>,
    pub ship_to_postal_code: String,
    pub ship_to_city: String,
    pub ship_to_country: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
    pub tracking_number: Option<String>,
    pub tracking_url: Option<String>,
    pub label_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order line row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub vintage: Option<i32>,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    pub unit_price_cents: Cents,
    pub quantity: i32,
    pub total_cents: Cents,
}
