//! Order models.
//!
//! Orders snapshot everything needed to fulfil and account for the purchase:
//! product name and unit price at purchase time, the chosen shipping method,
//! and the destination address. Later catalog edits never change an order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use valroux_core::{Cents, CustomerId, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId};

/// An order header row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    /// Human-facing order number, `VLX-XXXXXX`.
    pub order_number: String,
    pub customer_id: Option<CustomerId>,
    pub email: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Payment provider's payment id, set once payment creation succeeds.
    pub payment_id: Option<String>,
    pub currency: String,
    pub subtotal_cents: Cents,
    pub shipping_cents: Cents,
    #[serde(with = "rust_decimal::serde::str")]
    pub vat_rate: Decimal,
    pub vat_cents: Cents,
    pub total_cents: Cents,
    // Shipping method snapshot
    pub shipping_carrier: String,
    pub shipping_method_name: String,
    pub shipping_method_id: String,
    // Destination snapshot
    pub ship_to_name: String,
    pub ship_to_street: String,
    pub ship_to_house_number: Option<String>,
    pub ship_to_postal_code: String,
    pub ship_to_city: String,
    pub ship_to_country: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
    // Label fields, set by the back office
    pub tracking_number: Option<String>,
    pub tracking_url: Option<String>,
    pub label_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order line row with purchase-time snapshots.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    /// Null if the product was later deleted.
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub vintage: Option<i32>,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    pub unit_price_cents: Cents,
    pub quantity: i32,
    pub total_cents: Cents,
}

/// Destination address as submitted at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub street: String,
    pub house_number: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub phone: Option<String>,
}

/// The shipping rate the customer selected at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingSelection {
    /// Method id as quoted (aggregator id or fallback id).
    pub id: String,
    pub carrier: String,
    pub name: String,
    /// Price in cents, exactly as quoted.
    pub price_cents: i64,
}
