//! Shipping route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use valroux_core::{CountryCode, validate_postal_code};

use crate::db::CartRepository;
use crate::error::{AppError, Result};
use crate::routes::cart::session_cart_id;
use crate::services::shipping::ShippingQuote;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RatesRequest {
    pub country: String,
    pub postal_code: String,
    #[allow(dead_code)]
    pub city: Option<String>,
}

/// A static delivery option, independent of carrier rates.
#[derive(Debug, Serialize)]
pub struct DeliveryOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<i64>,
}

/// `POST /api/shipping/rates`
///
/// Quotes rates for the session cart's weight at the given destination.
pub async fn rates(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<RatesRequest>,
) -> Result<Json<Vec<ShippingQuote>>> {
    let mut details = Vec::new();

    let country = match CountryCode::parse(&req.country) {
        Ok(country) => Some(country),
        Err(err) => {
            details.push(format!("country: {err}"));
            None
        }
    };
    if let Some(country) = &country
        && !validate_postal_code(country, &req.postal_code)
    {
        details.push(format!(
            "postal_code is not valid for {}",
            country.as_str()
        ));
    }
    let Some(country) = country else {
        return Err(AppError::Validation(details));
    };
    if !details.is_empty() {
        return Err(AppError::Validation(details));
    }

    let carts = CartRepository::new(state.pool().clone());
    let cart_id = session_cart_id(&session)
        .await?
        .ok_or_else(|| AppError::validation("Cart is empty"))?;
    let lines = carts.get_lines(cart_id).await?;
    if lines.is_empty() {
        return Err(AppError::validation("Cart is empty"));
    }

    let weight_grams: i64 = lines
        .iter()
        .map(|l| i64::from(l.weight_grams) * i64::from(l.quantity))
        .sum();

    let quotes = state
        .shipping()
        .quote(&country, req.postal_code.trim(), weight_grams)
        .await;
    Ok(Json(quotes))
}

/// `GET /api/shipping/options`
///
/// Static delivery options; rate-dependent options carry no price here.
pub async fn options() -> Json<Vec<DeliveryOption>> {
    Json(vec![
        DeliveryOption {
            id: "home_delivery",
            name: "Home delivery",
            description: "Carrier delivery to your address; rates via /api/shipping/rates",
            price_cents: None,
        },
        DeliveryOption {
            id: "pickup_point",
            name: "Pickup point",
            description: "Carrier delivery to a pickup point near you",
            price_cents: None,
        },
        DeliveryOption {
            id: "estate_pickup",
            name: "Estate pickup",
            description: "Collect your order at the estate in Torgny, free of charge",
            price_cents: Some(0),
        },
    ])
}
