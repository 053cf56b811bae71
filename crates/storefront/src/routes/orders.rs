//! Order history route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireCustomer;
use crate::models::{Order, OrderItem};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// `GET /api/orders`
pub async fn index(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool().clone());
    Ok(Json(orders.list_by_customer(customer.id).await?))
}

/// `GET /api/orders/{order_number}`
///
/// Scoped to the logged-in customer; other customers' orders 404.
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Path(order_number): Path<String>,
) -> Result<Json<OrderDetail>> {
    let orders = OrderRepository::new(state.pool().clone());
    let order = orders
        .get_by_number_for_customer(customer.id, &order_number)
        .await?;
    let items = orders.get_items(order.id).await?;
    Ok(Json(OrderDetail { order, items }))
}
