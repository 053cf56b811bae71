//! Ad-catalog synchronization.
//!
//! Visible wines are pushed as UPDATE items, hidden wines as DELETE items,
//! in batches of at most 100 requests. The catalog item id is the product id
//! so re-syncs overwrite in place.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::db::AdminProductRepository;
use crate::error::{AppError, Result};
use crate::meta::{CatalogClient, ItemData, ItemMethod, ItemRequest, MAX_BATCH_SIZE};
use crate::models::Product;

/// Result of one catalog sync run.
#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub updated: usize,
    pub deleted: usize,
    pub batches: usize,
    pub handles: Vec<String>,
}

/// Service that pushes the product catalog to the ad-catalog API.
#[derive(Debug, Clone)]
pub struct CatalogSyncService {
    products: AdminProductRepository,
    client: Option<CatalogClient>,
    shop_base_url: String,
}

impl CatalogSyncService {
    pub fn new(
        products: AdminProductRepository,
        client: Option<CatalogClient>,
        shop_base_url: impl Into<String>,
    ) -> Self {
        Self {
            products,
            client,
            shop_base_url: shop_base_url.into(),
        }
    }

    /// Push the full catalog.
    pub async fn sync(&self) -> Result<SyncReport> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| AppError::BadGateway("ad-catalog sync not configured".to_string()))?;

        let products = self.products.list().await?;
        let requests = build_item_requests(&products, &self.shop_base_url);

        let updated = requests
            .iter()
            .filter(|r| r.method == ItemMethod::Update)
            .count();
        let deleted = requests.len() - updated;

        let mut handles = Vec::new();
        let mut batches = 0_usize;
        for chunk in requests.chunks(MAX_BATCH_SIZE) {
            let batch_handles = client
                .push_batch(chunk)
                .await
                .map_err(|e| AppError::BadGateway(e.to_string()))?;
            handles.extend(batch_handles);
            batches += 1;
        }

        info!(updated, deleted, batches, "Ad-catalog sync complete");

        Ok(SyncReport {
            updated,
            deleted,
            batches,
            handles,
        })
    }
}

/// Map the catalog to item requests: visible wines become UPDATE items,
/// hidden ones DELETE items.
fn build_item_requests(products: &[Product], shop_base_url: &str) -> Vec<ItemRequest> {
    products
        .iter()
        .map(|product| {
            if product.visible {
                ItemRequest {
                    method: ItemMethod::Update,
                    data: item_data(product, shop_base_url),
                }
            } else {
                ItemRequest {
                    method: ItemMethod::Delete,
                    data: ItemData {
                        id: product.id.as_i32().to_string(),
                        ..ItemData::default()
                    },
                }
            }
        })
        .collect()
}

fn item_data(product: &Product, shop_base_url: &str) -> ItemData {
    let title = product.vintage.map_or_else(
        || product.name.clone(),
        |vintage| format!("{} {vintage}", product.name),
    );
    let availability = if product.stock > 0 {
        "in stock"
    } else {
        "out of stock"
    };

    ItemData {
        id: product.id.as_i32().to_string(),
        title: Some(title),
        description: Some(product.description.clone()),
        availability: Some(availability.to_string()),
        condition: Some("new".to_string()),
        price: Some(format_catalog_price(product.price)),
        link: Some(format!(
            "{}/wines/{}",
            shop_base_url.trim_end_matches('/'),
            product.slug
        )),
        image_link: product.image_url.clone(),
        brand: Some("Valroux".to_string()),
    }
}

/// Format a price the way the catalog API expects: "17.50 EUR".
fn format_catalog_price(price: Decimal) -> String {
    format!("{:.2} EUR", price.round_dp(2))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use valroux_core::{ProductId, WineType};

    use super::*;

    fn wine(id: i32, slug: &str, visible: bool, stock: i32) -> Product {
        Product {
            id: ProductId::new(id),
            slug: slug.to_string(),
            name: "Cuvée des Anges".to_string(),
            vintage: Some(2022),
            grape_variety: "Pinot Noir".to_string(),
            region: "Gaume".to_string(),
            wine_type: WineType::Red,
            volume_ml: 750,
            alcohol_percent: None,
            description: "Structured red from the southern slopes".to_string(),
            price: Decimal::new(1750, 2),
            stock,
            weight_grams: 1300,
            image_url: Some("https://cdn.example.com/cuvee.jpg".to_string()),
            visible,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_visible_product_maps_to_update() {
        let requests = build_item_requests(&[wine(7, "cuvee-des-anges", true, 12)], "https://www.valroux.be");

        assert_eq!(requests.len(), 1);
        let request = requests.first().unwrap();
        assert_eq!(request.method, ItemMethod::Update);
        assert_eq!(request.data.id, "7");
        assert_eq!(request.data.title.as_deref(), Some("Cuvée des Anges 2022"));
        assert_eq!(request.data.price.as_deref(), Some("17.50 EUR"));
        assert_eq!(
            request.data.link.as_deref(),
            Some("https://www.valroux.be/wines/cuvee-des-anges")
        );
        assert_eq!(request.data.availability.as_deref(), Some("in stock"));
    }

    #[test]
    fn test_hidden_product_maps_to_delete() {
        let requests = build_item_requests(&[wine(9, "retired", false, 0)], "https://www.valroux.be");

        let request = requests.first().unwrap();
        assert_eq!(request.method, ItemMethod::Delete);
        assert_eq!(request.data.id, "9");
        assert!(request.data.title.is_none());
    }

    #[test]
    fn test_out_of_stock_still_updates() {
        let requests = build_item_requests(&[wine(3, "sold-out", true, 0)], "https://www.valroux.be");

        let request = requests.first().unwrap();
        assert_eq!(request.method, ItemMethod::Update);
        assert_eq!(request.data.availability.as_deref(), Some("out of stock"));
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_catalog_price(Decimal::new(1750, 2)), "17.50 EUR");
        assert_eq!(format_catalog_price(Decimal::new(9, 0)), "9.00 EUR");
        assert_eq!(format_catalog_price(Decimal::new(12345, 3)), "12.35 EUR");
    }

    #[test]
    fn test_chunking_respects_batch_limit() {
        let products: Vec<Product> = (1..=250)
            .map(|i| wine(i, &format!("wine-{i}"), true, 5))
            .collect();
        let requests = build_item_requests(&products, "https://www.valroux.be");

        let chunks: Vec<_> = requests.chunks(MAX_BATCH_SIZE).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.first().unwrap().len(), 100);
        assert_eq!(chunks.last().unwrap().len(), 50);
    }
}
