//! Shipping label and tracking route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use valroux_core::OrderId;

use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireWriter};
use crate::models::Order;
use crate::sendcloud::TrackingInfo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateLabelRequest {
    pub order_id: i32,
}

/// `POST /api/shipping/labels`
///
/// 409 if the order already has a label, 502 if the aggregator fails.
pub async fn create_label(
    State(state): State<AppState>,
    RequireWriter(_admin): RequireWriter,
    Json(req): Json<CreateLabelRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state
        .labels()
        .create_label(OrderId::new(req.order_id))
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/shipping/tracking/{tracking_number}`
pub async fn tracking(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(tracking_number): Path<String>,
) -> Result<Json<TrackingInfo>> {
    let info = state.labels().tracking(&tracking_number).await?;
    Ok(Json(info))
}
