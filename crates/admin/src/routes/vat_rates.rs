//! VAT rate maintenance route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use valroux_core::CountryCode;

use crate::db::VatRate;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireWriter};
use crate::state::AppState;

/// `GET /api/vat-rates`
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<VatRate>>> {
    let rates = state.vat_rates().list().await?;
    Ok(Json(rates))
}

#[derive(Debug, Deserialize)]
pub struct VatRateRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
}

/// `PUT /api/vat-rates/{country}`
pub async fn upsert(
    State(state): State<AppState>,
    RequireWriter(admin): RequireWriter,
    Path(country): Path<String>,
    Json(req): Json<VatRateRequest>,
) -> Result<Json<VatRate>> {
    let country = CountryCode::parse(&country)
        .map_err(|_| AppError::validation("country must be a two-letter ISO code"))?;

    if req.rate < Decimal::ZERO || req.rate > Decimal::ONE_HUNDRED {
        return Err(AppError::validation("rate must be between 0 and 100"));
    }

    let rate = state.vat_rates().upsert(&country, req.rate).await?;

    info!(
        country = %rate.country_code,
        rate = %rate.rate,
        admin_id = admin.id.as_i32(),
        "VAT rate updated"
    );

    Ok(Json(rate))
}
