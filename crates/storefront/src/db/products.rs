//! Wine catalog queries.

use sqlx::PgPool;

use valroux_core::{ProductId, WineType};

use super::RepositoryError;
use crate::models::Product;

/// Filters for the public catalog listing.
#[derive(Debug, Default, Clone)]
pub struct CatalogFilter {
    pub wine_type: Option<WineType>,
    /// Only wines with stock remaining.
    pub in_stock: bool,
    pub limit: i64,
    pub offset: i64,
}

/// Repository for the public product catalog.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List visible wines, newest first.
    pub async fn list_visible(&self, filter: &CatalogFilter) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, slug, name, vintage, grape_variety, region, wine_type,
                   volume_ml, alcohol_percent, description, price, stock,
                   weight_grams, image_url, visible, created_at, updated_at
            FROM shop.products
            WHERE visible
              AND ($1::shop.wine_type IS NULL OR wine_type = $1)
              AND (NOT $2 OR stock > 0)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(filter.wine_type)
        .bind(filter.in_stock)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Fetch a single visible wine by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown or hidden wines; the
    /// public API does not distinguish the two cases.
    pub async fn get_visible_by_slug(&self, slug: &str) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, slug, name, vintage, grape_variety, region, wine_type,
                   volume_ml, alcohol_percent, description, price, stock,
                   weight_grams, image_url, visible, created_at, updated_at
            FROM shop.products
            WHERE slug = $1 AND visible
            ",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(product)
    }

    /// Fetch products by id, in no particular order.
    ///
    /// Used at checkout to re-price cart lines from the database.
    pub async fn get_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, slug, name, vintage, grape_variety, region, wine_type,
                   volume_ml, alcohol_percent, description, price, stock,
                   weight_grams, image_url, visible, created_at, updated_at
            FROM shop.products
            WHERE id = ANY($1)
            ",
        )
        .bind(&raw)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}
