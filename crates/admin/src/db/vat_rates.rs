//! VAT rate maintenance queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use valroux_core::CountryCode;

use super::RepositoryError;

/// A configured VAT rate.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VatRate {
    pub country_code: CountryCode,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Repository for VAT rate maintenance.
#[derive(Debug, Clone)]
pub struct VatRateRepository {
    pool: PgPool,
}

impl VatRateRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all configured rates.
    pub async fn list(&self) -> Result<Vec<VatRate>, RepositoryError> {
        let rates = sqlx::query_as::<_, VatRate>(
            "SELECT country_code, rate, updated_at FROM shop.vat_rates ORDER BY country_code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rates)
    }

    /// Insert or update a country's rate.
    pub async fn upsert(
        &self,
        country: &CountryCode,
        rate: Decimal,
    ) -> Result<VatRate, RepositoryError> {
        let row = sqlx::query_as::<_, VatRate>(
            r"
            INSERT INTO shop.vat_rates (country_code, rate)
            VALUES ($1, $2)
            ON CONFLICT (country_code)
            DO UPDATE SET rate = EXCLUDED.rate, updated_at = now()
            RETURNING country_code, rate, updated_at
            ",
        )
        .bind(country)
        .bind(rate)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
