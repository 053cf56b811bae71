//! Checkout route handler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use valroux_core::{CountryCode, Email, validate_postal_code};

use crate::error::{AppError, Result};
use crate::middleware::OptionalCustomer;
use crate::models::{ShippingAddress, ShippingSelection};
use crate::routes::cart::session_cart_id;
use crate::services::checkout::{self, CheckoutInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub email: String,
    pub address: ShippingAddress,
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
    /// Customer confirms they are of legal drinking age.
    #[serde(default)]
    pub age_confirmed: bool,
    pub shipping: ShippingSelection,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_number: String,
    pub total_cents: i64,
    pub checkout_url: String,
}

/// `POST /api/checkout`
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let details = validate(&req);
    if !details.is_empty() {
        return Err(AppError::Validation(details));
    }

    let cart_id = session_cart_id(&session)
        .await?
        .ok_or_else(|| AppError::validation("Cart is empty"))?;

    let outcome = checkout::place_order(
        &state,
        cart_id,
        CheckoutInput {
            customer_id: customer.as_ref().map(|c| c.id),
            email: req.email.trim().to_lowercase(),
            address: req.address,
            company_name: req.company_name.filter(|s| !s.trim().is_empty()),
            vat_number: req.vat_number.filter(|s| !s.trim().is_empty()),
            shipping: req.shipping,
        },
    )
    .await?;

    Ok(Json(CheckoutResponse {
        order_number: outcome.order_number,
        total_cents: outcome.total_cents,
        checkout_url: outcome.checkout_url,
    }))
}

fn validate(req: &CheckoutRequest) -> Vec<String> {
    let mut details = Vec::new();

    if Email::parse(&req.email).is_err() {
        details.push("email is not a valid address".to_string());
    }
    if !req.age_confirmed {
        details.push("age_confirmed must be true".to_string());
    }
    if req.address.name.trim().is_empty() {
        details.push("address.name is required".to_string());
    }
    if req.address.street.trim().is_empty() {
        details.push("address.street is required".to_string());
    }
    if req.address.city.trim().is_empty() {
        details.push("address.city is required".to_string());
    }
    match CountryCode::parse(&req.address.country) {
        Ok(country) => {
            if !validate_postal_code(&country, &req.address.postal_code) {
                details.push(format!(
                    "address.postal_code is not valid for {}",
                    country.as_str()
                ));
            }
        }
        Err(err) => details.push(format!("address.country: {err}")),
    }
    if req.shipping.price_cents < 0 {
        details.push("shipping.price_cents must not be negative".to_string());
    }
    if req.shipping.carrier.trim().is_empty() || req.shipping.name.trim().is_empty() {
        details.push("shipping selection is incomplete".to_string());
    }

    details
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CheckoutRequest {
        CheckoutRequest {
            email: "anna@example.com".to_string(),
            address: ShippingAddress {
                name: "Anna Peeters".to_string(),
                street: "Rue Grande".to_string(),
                house_number: Some("12".to_string()),
                postal_code: "6767".to_string(),
                city: "Torgny".to_string(),
                country: "BE".to_string(),
                phone: None,
            },
            company_name: None,
            vat_number: None,
            age_confirmed: true,
            shipping: ShippingSelection {
                id: "fallback-be-bpost-home".to_string(),
                carrier: "bpost".to_string(),
                name: "bpost Home Delivery".to_string(),
                price_cents: 690,
            },
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate(&valid_request()).is_empty());
    }

    #[test]
    fn test_age_confirmation_required() {
        let mut req = valid_request();
        req.age_confirmed = false;
        let details = validate(&req);
        assert!(details.iter().any(|d| d.contains("age_confirmed")));
    }

    #[test]
    fn test_postal_code_checked_per_country() {
        let mut req = valid_request();
        req.address.postal_code = "ABC".to_string();
        let details = validate(&req);
        assert!(details.iter().any(|d| d.contains("postal_code")));
    }

    #[test]
    fn test_multiple_issues_reported_together() {
        let mut req = valid_request();
        req.email = "nope".to_string();
        req.address.name.clear();
        req.age_confirmed = false;
        assert!(validate(&req).len() >= 3);
    }
}
