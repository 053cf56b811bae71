//! Product model as seen by the back office (hidden wines included).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use valroux_core::{ProductId, WineType};

/// A wine in the catalog.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub vintage: Option<i32>,
    pub grape_variety: String,
    pub region: String,
    pub wine_type: WineType,
    pub volume_ml: i32,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub alcohol_percent: Option<Decimal>,
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub stock: i32,
    pub weight_grams: i32,
    pub image_url: Option<String>,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
