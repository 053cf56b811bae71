//! Cart models.

use rust_decimal::Decimal;
use serde::Serialize;

use valroux_core::{CartId, CartItemId, ProductId, WineType};

/// A bare cart line as stored in `shop.cart_items`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i32,
}

/// A cart line joined with its product, as returned to the frontend.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub slug: String,
    pub name: String,
    pub vintage: Option<i32>,
    pub wine_type: WineType,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    pub quantity: i32,
    pub stock: i32,
    pub weight_grams: i32,
    pub image_url: Option<String>,
}
