//! Payment provider API client (Mollie).
//!
//! The storefront never touches card data: it creates a payment, redirects
//! the customer to the provider's hosted checkout page, and learns the
//! outcome via webhook.
//!
//! # API Reference
//!
//! - Base URL: `https://api.mollie.com` (overridable for tests)
//! - Authentication: `Authorization: Bearer <api key>`
//! - Endpoints used: `POST /v2/payments`, `GET /v2/payments/{id}`

mod types;

pub use types::{Payment, PaymentAmount, PaymentLink, PaymentLinks, PaymentMetadata};

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;
use thiserror::Error;

use valroux_core::{Cents, PaymentStatus};

use crate::config::MollieConfig;

/// Errors that can occur when talking to the payment provider.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {detail}")]
    Api { status: u16, detail: String },

    /// Unauthorized (invalid API key).
    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    /// The created payment carried no hosted checkout URL.
    #[error("payment response missing checkout URL")]
    MissingCheckoutUrl,

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Payment provider API client.
#[derive(Clone)]
pub struct MollieClient {
    inner: Arc<MollieClientInner>,
}

struct MollieClientInner {
    client: reqwest::Client,
    api_base: String,
}

impl std::fmt::Debug for MollieClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MollieClient")
            .field("api_base", &self.inner.api_base)
            .finish_non_exhaustive()
    }
}

/// A freshly created payment, with the URL to send the customer to.
#[derive(Debug, Clone)]
pub struct CreatedPayment {
    pub id: String,
    pub status: PaymentStatus,
    pub checkout_url: String,
}

impl MollieClient {
    /// Create a new payment provider client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &MollieConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| PaymentError::Parse(format!("Invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(MollieClientInner {
                client,
                api_base: config.api_base.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Create a payment for an order.
    ///
    /// The amount is formatted as the decimal string the API requires
    /// (`{"currency": "EUR", "value": "80.23"}`); the order number travels in
    /// the metadata so webhooks can be correlated in the provider dashboard.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::MissingCheckoutUrl` when the provider accepts
    /// the payment but returns no hosted checkout link.
    #[instrument(skip(self, redirect_url, webhook_url), fields(order_number = %order_number))]
    pub async fn create_payment(
        &self,
        amount: Cents,
        description: &str,
        order_number: &str,
        redirect_url: &str,
        webhook_url: &str,
    ) -> Result<CreatedPayment, PaymentError> {
        let body = serde_json::json!({
            "amount": {
                "currency": "EUR",
                "value": amount.format_euros(),
            },
            "description": description,
            "redirectUrl": redirect_url,
            "webhookUrl": webhook_url,
            "metadata": {
                "order_number": order_number,
            },
        });

        let url = format!("{}/v2/payments", self.inner.api_base);
        let response = self.inner.client.post(&url).json(&body).send().await?;
        let payment = Self::read_payment(response).await?;

        let checkout_url = payment
            .links
            .and_then(|links| links.checkout)
            .map(|link| link.href)
            .ok_or(PaymentError::MissingCheckoutUrl)?;

        Ok(CreatedPayment {
            id: payment.id,
            status: payment.status,
            checkout_url,
        })
    }

    /// Fetch the current state of a payment.
    ///
    /// Webhooks only carry the payment id; the status is always re-fetched
    /// here rather than trusted from the request body.
    #[instrument(skip(self))]
    pub async fn get_payment(&self, payment_id: &str) -> Result<Payment, PaymentError> {
        let url = format!("{}/v2/payments/{payment_id}", self.inner.api_base);
        let response = self.inner.client.get(&url).send().await?;
        Self::read_payment(response).await
    }

    async fn read_payment(response: reqwest::Response) -> Result<Payment, PaymentError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PaymentError::Unauthorized);
        }

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let payment = response
            .json::<Payment>()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;
        Ok(payment)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_created_payment_response() {
        let json = r#"{
            "resource": "payment",
            "id": "tr_WDqYK6vllg",
            "status": "open",
            "amount": {"currency": "EUR", "value": "80.23"},
            "metadata": {"order_number": "VLX-4F7K2Q"},
            "_links": {
                "checkout": {
                    "href": "https://www.mollie.com/checkout/select-method/WDqYK6vllg",
                    "type": "text/html"
                }
            }
        }"#;

        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.id, "tr_WDqYK6vllg");
        assert_eq!(payment.status, PaymentStatus::Open);
        assert_eq!(
            payment.metadata.unwrap().order_number.as_deref(),
            Some("VLX-4F7K2Q")
        );
        let href = payment.links.unwrap().checkout.unwrap().href;
        assert!(href.contains("select-method"));
    }

    #[test]
    fn test_parse_payment_without_checkout_link() {
        // Fetched payments in a terminal state no longer carry a checkout link
        let json = r#"{
            "resource": "payment",
            "id": "tr_WDqYK6vllg",
            "status": "expired",
            "amount": {"currency": "EUR", "value": "63.00"}
        }"#;

        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.status, PaymentStatus::Expired);
        assert!(payment.status.is_terminal_failure());
        assert!(payment.links.is_none());
    }
}
