//! Product catalog management queries.

use rust_decimal::Decimal;
use sqlx::PgPool;

use valroux_core::{ProductId, WineType};

use super::RepositoryError;
use crate::models::Product;

/// Fields for creating a product.
#[derive(Debug)]
pub struct NewProduct {
    pub slug: String,
    pub name: String,
    pub vintage: Option<i32>,
    pub grape_variety: String,
    pub region: String,
    pub wine_type: WineType,
    pub volume_ml: i32,
    pub alcohol_percent: Option<Decimal>,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub weight_grams: i32,
    pub image_url: Option<String>,
    pub visible: bool,
}

/// Partial update; `None` fields stay unchanged.
#[derive(Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub vintage: Option<Option<i32>>,
    pub grape_variety: Option<String>,
    pub region: Option<String>,
    pub wine_type: Option<WineType>,
    pub volume_ml: Option<i32>,
    pub alcohol_percent: Option<Option<Decimal>>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub weight_grams: Option<i32>,
    pub image_url: Option<Option<String>>,
    pub visible: Option<bool>,
}

/// Repository for catalog management (hidden wines included).
#[derive(Debug, Clone)]
pub struct AdminProductRepository {
    pool: PgPool,
}

impl AdminProductRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every product, newest first.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM shop.products ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    pub async fn get(&self, id: ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>("SELECT * FROM shop.products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate slug.
    pub async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            INSERT INTO shop.products
                (slug, name, vintage, grape_variety, region, wine_type,
                 volume_ml, alcohol_percent, description, price, stock,
                 weight_grams, image_url, visible)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            ",
        )
        .bind(&new.slug)
        .bind(&new.name)
        .bind(new.vintage)
        .bind(&new.grape_variety)
        .bind(&new.region)
        .bind(new.wine_type)
        .bind(new.volume_ml)
        .bind(new.alcohol_percent)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.stock)
        .bind(new.weight_grams)
        .bind(new.image_url.as_deref())
        .bind(new.visible)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict("slug already in use".to_string())
            }
            other => RepositoryError::Database(other),
        })
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    pub async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            UPDATE shop.products SET
                name = COALESCE($2, name),
                vintage = CASE WHEN $3 THEN $4 ELSE vintage END,
                grape_variety = COALESCE($5, grape_variety),
                region = COALESCE($6, region),
                wine_type = COALESCE($7, wine_type),
                volume_ml = COALESCE($8, volume_ml),
                alcohol_percent = CASE WHEN $9 THEN $10 ELSE alcohol_percent END,
                description = COALESCE($11, description),
                price = COALESCE($12, price),
                stock = COALESCE($13, stock),
                weight_grams = COALESCE($14, weight_grams),
                image_url = CASE WHEN $15 THEN $16 ELSE image_url END,
                visible = COALESCE($17, visible),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.vintage.is_some())
        .bind(patch.vintage.flatten())
        .bind(patch.grape_variety)
        .bind(patch.region)
        .bind(patch.wine_type)
        .bind(patch.volume_ml)
        .bind(patch.alcohol_percent.is_some())
        .bind(patch.alcohol_percent.flatten())
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.stock)
        .bind(patch.weight_grams)
        .bind(patch.image_url.is_some())
        .bind(patch.image_url.flatten())
        .bind(patch.visible)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` while order items reference the
    /// product; the caller hides it instead of deleting.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let referenced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM shop.order_items WHERE product_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if referenced {
            return Err(RepositoryError::Conflict(
                "product is referenced by orders; hide it instead".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM shop.products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
