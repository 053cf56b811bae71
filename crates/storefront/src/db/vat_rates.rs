//! VAT rate lookup.

use rust_decimal::Decimal;
use sqlx::PgPool;

use valroux_core::CountryCode;

use super::RepositoryError;

/// Repository for per-country VAT percentages.
#[derive(Debug, Clone)]
pub struct VatRateRepository {
    pool: PgPool,
}

impl VatRateRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The VAT percentage for a destination country, if one is configured.
    ///
    /// Callers fall back to the domestic rate for unknown countries.
    pub async fn rate_for_country(
        &self,
        country: &CountryCode,
    ) -> Result<Option<Decimal>, RepositoryError> {
        let rate = sqlx::query_scalar::<_, Decimal>(
            "SELECT rate FROM shop.vat_rates WHERE country_code = $1",
        )
        .bind(country)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rate)
    }
}
