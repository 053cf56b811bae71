//! Seed the demo wine catalog and default VAT rates.
//!
//! Idempotent: wines upsert by slug, VAT rates by country code, so the
//! command is safe to re-run after editing the data below.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

struct SeedWine {
    slug: &'static str,
    name: &'static str,
    vintage: Option<i32>,
    grape_variety: &'static str,
    region: &'static str,
    wine_type: &'static str,
    volume_ml: i32,
    alcohol_percent: Decimal,
    description: &'static str,
    price: Decimal,
    stock: i32,
}

fn demo_wines() -> Vec<SeedWine> {
    vec![
        SeedWine {
            slug: "cuvee-des-anges-2022",
            name: "Cuvée des Anges",
            vintage: Some(2022),
            grape_variety: "Pinot Noir",
            region: "Gaume",
            wine_type: "red",
            volume_ml: 750,
            alcohol_percent: Decimal::new(125, 1),
            description: "Structured red from the southern slopes, twelve months in oak.",
            price: Decimal::new(1750, 2),
            stock: 96,
        },
        SeedWine {
            slug: "les-terrasses-blanc-2023",
            name: "Les Terrasses Blanc",
            vintage: Some(2023),
            grape_variety: "Chardonnay",
            region: "Gaume",
            wine_type: "white",
            volume_ml: 750,
            alcohol_percent: Decimal::new(120, 1),
            description: "Unoaked chardonnay, citrus and wet stone.",
            price: Decimal::new(1450, 2),
            stock: 120,
        },
        SeedWine {
            slug: "rose-de-torgny-2023",
            name: "Rosé de Torgny",
            vintage: Some(2023),
            grape_variety: "Pinot Noir",
            region: "Gaume",
            wine_type: "rose",
            volume_ml: 750,
            alcohol_percent: Decimal::new(115, 1),
            description: "Pale saignée rosé, summer drinking.",
            price: Decimal::new(1250, 2),
            stock: 60,
        },
        SeedWine {
            slug: "brut-nature-nv",
            name: "Brut Nature",
            vintage: None,
            grape_variety: "Chardonnay, Pinot Noir",
            region: "Gaume",
            wine_type: "sparkling",
            volume_ml: 750,
            alcohol_percent: Decimal::new(120, 1),
            description: "Traditional method, zero dosage, 24 months on lees.",
            price: Decimal::new(2400, 2),
            stock: 48,
        },
        SeedWine {
            slug: "vendange-tardive-2021",
            name: "Vendange Tardive",
            vintage: Some(2021),
            grape_variety: "Gewurztraminer",
            region: "Gaume",
            wine_type: "dessert",
            volume_ml: 375,
            alcohol_percent: Decimal::new(110, 1),
            description: "Late harvest half-bottle, apricot and honey.",
            price: Decimal::new(1950, 2),
            stock: 36,
        },
    ]
}

/// Default VAT rates: domestic plus the neighbouring countries we ship to
/// most. Other EU destinations fall back to the domestic rate until
/// configured in the back office.
const DEFAULT_VAT_RATES: &[(&str, Decimal)] = &[
    ("BE", Decimal::from_parts(2100, 0, 0, false, 2)),
    ("NL", Decimal::from_parts(2100, 0, 0, false, 2)),
    ("FR", Decimal::from_parts(2000, 0, 0, false, 2)),
    ("DE", Decimal::from_parts(1900, 0, 0, false, 2)),
    ("LU", Decimal::from_parts(1700, 0, 0, false, 2)),
];

/// Seed the catalog and VAT rates.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| SeedError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(&database_url).await?;

    let wines = demo_wines();
    tracing::info!("Seeding {} wines...", wines.len());
    for wine in &wines {
        upsert_wine(&pool, wine).await?;
    }

    tracing::info!("Seeding {} VAT rates...", DEFAULT_VAT_RATES.len());
    for (country, rate) in DEFAULT_VAT_RATES {
        sqlx::query(
            r"
            INSERT INTO shop.vat_rates (country_code, rate)
            VALUES ($1, $2)
            ON CONFLICT (country_code)
            DO UPDATE SET rate = EXCLUDED.rate, updated_at = now()
            ",
        )
        .bind(country)
        .bind(rate)
        .execute(&pool)
        .await?;
    }

    tracing::info!("Seeding complete!");
    Ok(())
}

async fn upsert_wine(pool: &PgPool, wine: &SeedWine) -> Result<(), SeedError> {
    sqlx::query(
        r"
        INSERT INTO shop.products
            (slug, name, vintage, grape_variety, region, wine_type,
             volume_ml, alcohol_percent, description, price, stock, visible)
        VALUES ($1, $2, $3, $4, $5, $6::shop.wine_type, $7, $8, $9, $10, $11, TRUE)
        ON CONFLICT (slug) DO UPDATE SET
            name = EXCLUDED.name,
            vintage = EXCLUDED.vintage,
            grape_variety = EXCLUDED.grape_variety,
            region = EXCLUDED.region,
            wine_type = EXCLUDED.wine_type,
            volume_ml = EXCLUDED.volume_ml,
            alcohol_percent = EXCLUDED.alcohol_percent,
            description = EXCLUDED.description,
            price = EXCLUDED.price,
            updated_at = now()
        ",
    )
    .bind(wine.slug)
    .bind(wine.name)
    .bind(wine.vintage)
    .bind(wine.grape_variety)
    .bind(wine.region)
    .bind(wine.wine_type)
    .bind(wine.volume_ml)
    .bind(wine.alcohol_percent)
    .bind(wine.description)
    .bind(wine.price)
    .bind(wine.stock)
    .execute(pool)
    .await?;
    Ok(())
}
