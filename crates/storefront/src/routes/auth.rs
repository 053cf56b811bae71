//! Auth route handlers.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireCustomer, clear_current_customer, set_current_customer};
use crate::models::{CurrentCustomer, Customer};
use crate::services::auth::RegisterInput;
use crate::state::AppState;

/// Minimum age to buy wine.
const MINIMUM_AGE_YEARS: u32 = 18;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub marketing_consent: bool,
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Customer>)> {
    let mut details = Vec::new();

    if req.first_name.trim().is_empty() {
        details.push("first_name is required".to_string());
    }
    if req.last_name.trim().is_empty() {
        details.push("last_name is required".to_string());
    }
    if !is_adult(req.birth_date) {
        details.push(format!("you must be at least {MINIMUM_AGE_YEARS} years old"));
    }
    if let Some(vat) = req.vat_number.as_deref()
        && !is_plausible_vat_number(vat)
    {
        details.push("vat_number is not a valid EU VAT number".to_string());
    }
    if !details.is_empty() {
        return Err(AppError::Validation(details));
    }

    let customer = state
        .auth()
        .register(RegisterInput {
            email: req.email,
            password: req.password,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            birth_date: req.birth_date,
            marketing_consent: req.marketing_consent,
            company_name: req.company_name.filter(|s| !s.trim().is_empty()),
            vat_number: req.vat_number.filter(|s| !s.trim().is_empty()),
        })
        .await?;

    start_session(&session, &customer).await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Customer>> {
    let customer = state.auth().login(&req.email, &req.password).await?;
    start_session(&session, &customer).await?;
    Ok(Json(customer))
}

/// `POST /api/auth/logout`
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_customer(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`
pub async fn me(
    State(state): State<AppState>,
    RequireCustomer(current): RequireCustomer,
) -> Result<Json<Customer>> {
    let customer = state.auth().get_customer(current.id).await?;
    Ok(Json(customer))
}

async fn start_session(session: &Session, customer: &Customer) -> Result<()> {
    // Rotate the session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    set_current_customer(
        session,
        &CurrentCustomer {
            id: customer.id,
            email: customer.email.clone(),
        },
    )
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;
    set_sentry_user(&customer.id, Some(customer.email.as_ref()));
    Ok(())
}

/// Age check against today's date.
fn is_adult(birth_date: NaiveDate) -> bool {
    Utc::now()
        .date_naive()
        .years_since(birth_date)
        .is_some_and(|years| years >= MINIMUM_AGE_YEARS)
}

/// Basic EU VAT number shape: two letters then 2..=12 alphanumerics.
///
/// Real validation (VIES) is out of scope; this only rejects obvious typos.
fn is_plausible_vat_number(vat: &str) -> bool {
    let vat = vat.trim().replace([' ', '.'], "");
    let mut chars = vat.chars();
    let prefix_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest: Vec<char> = chars.collect();
    prefix_ok
        && (2..=12).contains(&rest.len())
        && rest.iter().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vat_number_shapes() {
        assert!(is_plausible_vat_number("BE0123456789"));
        assert!(is_plausible_vat_number("NL999999999B01"));
        assert!(is_plausible_vat_number("be 0123.456.789"));
        assert!(!is_plausible_vat_number("0123456789"));
        assert!(!is_plausible_vat_number("B"));
        assert!(!is_plausible_vat_number("BE"));
        assert!(!is_plausible_vat_number("BE0123456789012345"));
    }

    #[test]
    fn test_age_check() {
        let today = Utc::now().date_naive();
        let adult = today - chrono::Days::new(19 * 366);
        let minor = today - chrono::Days::new(10 * 365);
        assert!(is_adult(adult));
        assert!(!is_adult(minor));
    }
}
