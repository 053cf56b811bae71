//! Cart route handlers.
//!
//! The cart id lives in the session; the cart itself is database rows so it
//! survives session-store sweeps of expired sessions' data.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use valroux_core::{CartId, CartItemId, Cents, ProductId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::{CartLine, session_keys};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// One cart line with its computed total.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLine,
    pub line_total_cents: i64,
}

/// Cart payload returned by every cart endpoint.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLineView>,
    pub subtotal_cents: i64,
    pub item_count: i32,
}

/// `GET /api/cart`
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartResponse>> {
    let carts = CartRepository::new(state.pool().clone());
    let Some(cart_id) = session_cart_id(&session).await? else {
        return Ok(Json(empty_cart()));
    };
    let lines = carts.get_lines(cart_id).await?;
    cart_response(lines).map(Json)
}

/// `POST /api/cart/items`
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartResponse>)> {
    let carts = CartRepository::new(state.pool().clone());
    let products = ProductRepository::new(state.pool().clone());

    let catalog = products.get_by_ids(&[req.product_id]).await?;
    let Some(product) = catalog.first().filter(|p| p.visible) else {
        return Err(AppError::NotFound("product".to_string()));
    };
    if product.stock < req.quantity {
        return Err(AppError::Conflict(format!(
            "only {} bottles of {} in stock",
            product.stock, product.name
        )));
    }

    let cart_id = get_or_create_cart(&session, &carts).await?;
    carts.upsert_item(cart_id, req.product_id, req.quantity).await?;

    let lines = carts.get_lines(cart_id).await?;
    Ok((StatusCode::CREATED, Json(cart_response(lines)?)))
}

/// `PATCH /api/cart/items/{id}`
pub async fn update_item(
    State(state): State<AppState>,
    session: Session,
    Path(item_id): Path<CartItemId>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<CartResponse>> {
    let carts = CartRepository::new(state.pool().clone());
    let cart_id = session_cart_id(&session)
        .await?
        .ok_or_else(|| AppError::NotFound("cart".to_string()))?;

    carts.set_quantity(cart_id, item_id, req.quantity).await?;
    let lines = carts.get_lines(cart_id).await?;
    cart_response(lines).map(Json)
}

/// `DELETE /api/cart/items/{id}`
pub async fn remove_item(
    State(state): State<AppState>,
    session: Session,
    Path(item_id): Path<CartItemId>,
) -> Result<Json<CartResponse>> {
    let carts = CartRepository::new(state.pool().clone());
    let cart_id = session_cart_id(&session)
        .await?
        .ok_or_else(|| AppError::NotFound("cart".to_string()))?;

    carts.delete_item(cart_id, item_id).await?;
    let lines = carts.get_lines(cart_id).await?;
    cart_response(lines).map(Json)
}

/// Read the session's cart id, if any.
pub async fn session_cart_id(session: &Session) -> Result<Option<CartId>> {
    session
        .get::<CartId>(session_keys::CART_ID)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Read the session's cart id, creating a cart on first use.
pub async fn get_or_create_cart(session: &Session, carts: &CartRepository) -> Result<CartId> {
    if let Some(cart_id) = session_cart_id(session).await? {
        return Ok(cart_id);
    }
    let cart_id = carts.create().await?;
    session
        .insert(session_keys::CART_ID, cart_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(cart_id)
}

fn empty_cart() -> CartResponse {
    CartResponse {
        items: Vec::new(),
        subtotal_cents: 0,
        item_count: 0,
    }
}

fn cart_response(lines: Vec<CartLine>) -> Result<CartResponse> {
    let subtotal = valroux_core::subtotal_cents(
        lines
            .iter()
            .map(|l| (l.unit_price, u32::try_from(l.quantity).unwrap_or(0))),
    )
    .map_err(|e| AppError::Internal(e.to_string()))?;

    let item_count = lines.iter().map(|l| l.quantity).sum();
    let items = lines
        .into_iter()
        .map(|line| {
            let line_total = line.unit_price * rust_decimal::Decimal::from(line.quantity);
            let line_total_cents = Cents::from_decimal_euros(line_total)
                .map_err(|e| AppError::Internal(e.to_string()))?
                .value();
            Ok(CartLineView {
                line,
                line_total_cents,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CartResponse {
        items,
        subtotal_cents: subtotal.value(),
        item_count,
    })
}
