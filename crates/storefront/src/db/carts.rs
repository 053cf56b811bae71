//! Cart queries.
//!
//! Carts are keyed by UUID and referenced from the session. Quantities are
//! clamped to 1..=24 bottles per line at the repository boundary so no route
//! can write an out-of-range value.

use sqlx::PgPool;

use valroux_core::{CartId, CartItemId, ProductId};

use super::RepositoryError;
use crate::models::CartLine;

/// Maximum bottles of one wine per cart line.
pub const MAX_LINE_QUANTITY: i32 = 24;

/// Repository for session carts.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an empty cart and return its id.
    pub async fn create(&self) -> Result<CartId, RepositoryError> {
        let id = CartId::generate();
        sqlx::query("INSERT INTO shop.carts (id) VALUES ($1)")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    /// Fetch the cart's lines joined with their products.
    ///
    /// Lines whose product has been hidden since it was added are still
    /// returned; checkout rejects them, the cart view flags them.
    pub async fn get_lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r"
            SELECT ci.id, ci.product_id, p.slug, p.name, p.vintage, p.wine_type,
                   p.price AS unit_price, ci.quantity, p.stock, p.weight_grams,
                   p.image_url
            FROM shop.cart_items ci
            JOIN shop.products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.id
            ",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Add a product to the cart, accumulating quantity on an existing line.
    ///
    /// The accumulated quantity is capped at [`MAX_LINE_QUANTITY`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if `quantity` is out of range.
    pub async fn upsert_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(RepositoryError::Conflict(format!(
                "quantity must be between 1 and {MAX_LINE_QUANTITY}"
            )));
        }

        sqlx::query(
            r"
            INSERT INTO shop.cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = LEAST(shop.cart_items.quantity + EXCLUDED.quantity, $4)
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(MAX_LINE_QUANTITY)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Set the quantity on an existing cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` for an out-of-range quantity and
    /// `RepositoryError::NotFound` if the line is not in this cart.
    pub async fn set_quantity(
        &self,
        cart_id: CartId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(RepositoryError::Conflict(format!(
                "quantity must be between 1 and {MAX_LINE_QUANTITY}"
            )));
        }

        let result = sqlx::query(
            "UPDATE shop.cart_items SET quantity = $3 WHERE cart_id = $1 AND id = $2",
        )
        .bind(cart_id)
        .bind(item_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line is not in this cart.
    pub async fn delete_item(
        &self,
        cart_id: CartId,
        item_id: CartItemId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.cart_items WHERE cart_id = $1 AND id = $2")
            .bind(cart_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Empty the cart. Called after a successful checkout.
    pub async fn clear(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM shop.cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
