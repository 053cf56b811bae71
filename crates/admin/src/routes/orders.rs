//! Order management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use valroux_core::{OrderId, OrderStatus};

use crate::db::OrderFilter;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireWriter};
use crate::models::{Order, OrderItem};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /api/orders`
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>> {
    let filter = OrderFilter {
        status: query.status,
        search: query.search.filter(|s| !s.trim().is_empty()),
        limit: query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE),
        offset: query.offset.unwrap_or(0).max(0),
    };

    let orders = state.orders().list(&filter).await?;
    Ok(Json(orders))
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// `GET /api/orders/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetail>> {
    let id = OrderId::new(id);
    let order = state.orders().get(id).await?;
    let items = state.orders().get_items(id).await?;
    Ok(Json(OrderDetail { order, items }))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// `PATCH /api/orders/{id}/status`
///
/// Rejects transitions outside the lifecycle with 409.
pub async fn update_status(
    State(state): State<AppState>,
    RequireWriter(admin): RequireWriter,
    Path(id): Path<i32>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<Order>> {
    let id = OrderId::new(id);
    let order = state.orders().get(id).await?;

    if !order.status.can_transition_to(req.status) {
        return Err(AppError::Conflict(format!(
            "cannot transition order from {} to {}",
            order.status, req.status
        )));
    }

    let updated = state.orders().set_status(id, req.status).await?;

    info!(
        order_number = %updated.order_number,
        from = %order.status,
        to = %updated.status,
        admin_id = admin.id.as_i32(),
        "Order status changed"
    );

    Ok(Json(updated))
}
