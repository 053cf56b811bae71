//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::info;

use valroux_core::{ProductId, WineType};

use crate::db::{NewProduct, ProductPatch};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireWriter};
use crate::models::Product;
use crate::state::AppState;

/// Oldest vintage we accept; the estate's first bottling was much later but
/// resold library wines do turn up.
const MIN_VINTAGE: i32 = 1900;
const MAX_VINTAGE: i32 = 2100;

/// `GET /api/products` (hidden wines included)
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Product>>> {
    let products = state.products().list().await?;
    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub slug: String,
    pub name: String,
    pub vintage: Option<i32>,
    pub grape_variety: String,
    pub region: String,
    pub wine_type: WineType,
    pub volume_ml: i32,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub alcohol_percent: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub stock: i32,
    #[serde(default = "default_weight_grams")]
    pub weight_grams: i32,
    pub image_url: Option<String>,
    #[serde(default)]
    pub visible: bool,
}

const fn default_weight_grams() -> i32 {
    1300
}

/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    RequireWriter(admin): RequireWriter,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let mut details = Vec::new();
    validate_name(&req.name, &mut details);
    validate_slug(&req.slug, &mut details);
    validate_price(req.price, &mut details);
    validate_stock(req.stock, &mut details);
    validate_vintage(req.vintage, &mut details);
    validate_volume(req.volume_ml, &mut details);
    if req.weight_grams <= 0 {
        details.push("weight_grams must be positive".to_string());
    }
    if !details.is_empty() {
        return Err(AppError::Validation(details));
    }

    let product = state
        .products()
        .create(NewProduct {
            slug: req.slug,
            name: req.name.trim().to_string(),
            vintage: req.vintage,
            grape_variety: req.grape_variety,
            region: req.region,
            wine_type: req.wine_type,
            volume_ml: req.volume_ml,
            alcohol_percent: req.alcohol_percent,
            description: req.description,
            price: req.price,
            stock: req.stock,
            weight_grams: req.weight_grams,
            image_url: req.image_url.filter(|s| !s.trim().is_empty()),
            visible: req.visible,
        })
        .await?;

    info!(
        slug = %product.slug,
        admin_id = admin.id.as_i32(),
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

/// Distinguishes an absent field (leave unchanged) from an explicit null
/// (clear the value).
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub vintage: Option<Option<i32>>,
    pub grape_variety: Option<String>,
    pub region: Option<String>,
    pub wine_type: Option<WineType>,
    pub volume_ml: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub alcohol_percent: Option<Option<Decimal>>,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub weight_grams: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    pub visible: Option<bool>,
}

/// `PATCH /api/products/{id}`
pub async fn update(
    State(state): State<AppState>,
    RequireWriter(admin): RequireWriter,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let mut details = Vec::new();
    if let Some(name) = req.name.as_deref() {
        validate_name(name, &mut details);
    }
    if let Some(price) = req.price {
        validate_price(price, &mut details);
    }
    if let Some(stock) = req.stock {
        validate_stock(stock, &mut details);
    }
    if let Some(vintage) = req.vintage {
        validate_vintage(vintage, &mut details);
    }
    if let Some(volume_ml) = req.volume_ml {
        validate_volume(volume_ml, &mut details);
    }
    if let Some(weight_grams) = req.weight_grams
        && weight_grams <= 0
    {
        details.push("weight_grams must be positive".to_string());
    }
    if !details.is_empty() {
        return Err(AppError::Validation(details));
    }

    let product = state
        .products()
        .update(
            ProductId::new(id),
            ProductPatch {
                name: req.name.map(|n| n.trim().to_string()),
                vintage: req.vintage,
                grape_variety: req.grape_variety,
                region: req.region,
                wine_type: req.wine_type,
                volume_ml: req.volume_ml,
                alcohol_percent: req.alcohol_percent,
                description: req.description,
                price: req.price,
                stock: req.stock,
                weight_grams: req.weight_grams,
                image_url: req.image_url,
                visible: req.visible,
            },
        )
        .await?;

    info!(
        slug = %product.slug,
        admin_id = admin.id.as_i32(),
        "Product updated"
    );

    Ok(Json(product))
}

/// `DELETE /api/products/{id}`
///
/// 409 while the product is referenced by order items; hide it instead.
pub async fn delete(
    State(state): State<AppState>,
    RequireWriter(admin): RequireWriter,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state.products().delete(ProductId::new(id)).await?;
    info!(product_id = id, admin_id = admin.id.as_i32(), "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Validation
// =============================================================================

fn validate_name(name: &str, details: &mut Vec<String>) {
    if name.trim().is_empty() {
        details.push("name is required".to_string());
    }
}

/// Slug format: lowercase alphanumerics and hyphens, no leading/trailing or
/// doubled hyphen.
fn validate_slug(slug: &str, details: &mut Vec<String>) {
    let shape_ok = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--");
    if !shape_ok {
        details.push("slug must be lowercase alphanumerics separated by hyphens".to_string());
    }
}

fn validate_price(price: Decimal, details: &mut Vec<String>) {
    if price <= Decimal::ZERO {
        details.push("price must be positive".to_string());
    }
}

fn validate_stock(stock: i32, details: &mut Vec<String>) {
    if stock < 0 {
        details.push("stock cannot be negative".to_string());
    }
}

fn validate_vintage(vintage: Option<i32>, details: &mut Vec<String>) {
    if let Some(vintage) = vintage
        && !(MIN_VINTAGE..=MAX_VINTAGE).contains(&vintage)
    {
        details.push(format!(
            "vintage must be between {MIN_VINTAGE} and {MAX_VINTAGE}"
        ));
    }
}

fn validate_volume(volume_ml: i32, details: &mut Vec<String>) {
    if volume_ml <= 0 {
        details.push("volume_ml must be positive".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug_ok(slug: &str) -> bool {
        let mut details = Vec::new();
        validate_slug(slug, &mut details);
        details.is_empty()
    }

    #[test]
    fn test_slug_validation() {
        assert!(slug_ok("cuvee-des-anges-2022"));
        assert!(slug_ok("rose"));
        assert!(!slug_ok(""));
        assert!(!slug_ok("Cuvee"));
        assert!(!slug_ok("-leading"));
        assert!(!slug_ok("trailing-"));
        assert!(!slug_ok("double--hyphen"));
        assert!(!slug_ok("with space"));
    }

    #[test]
    fn test_vintage_validation() {
        let mut details = Vec::new();
        validate_vintage(Some(2022), &mut details);
        validate_vintage(None, &mut details);
        assert!(details.is_empty());

        validate_vintage(Some(1850), &mut details);
        assert_eq!(details.len(), 1);
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let patch: UpdateProductRequest =
            serde_json::from_str(r#"{"vintage": null, "stock": 6}"#).unwrap();
        assert_eq!(patch.vintage, Some(None));
        assert_eq!(patch.stock, Some(6));
        assert!(patch.image_url.is_none());
    }
}
