//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use valroux_core::WineType;

use crate::db::ProductRepository;
use crate::db::products::CatalogFilter;
use crate::error::Result;
use crate::models::Product;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 24;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub wine_type: Option<WineType>,
    #[serde(default)]
    pub in_stock: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /api/products`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool().clone());
    let filter = CatalogFilter {
        wine_type: query.wine_type,
        in_stock: query.in_stock,
        limit: query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE),
        offset: query.offset.unwrap_or(0).max(0),
    };
    Ok(Json(products.list_visible(&filter).await?))
}

/// `GET /api/products/{slug}`
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let products = ProductRepository::new(state.pool().clone());
    Ok(Json(products.get_visible_by_slug(&slug).await?))
}
