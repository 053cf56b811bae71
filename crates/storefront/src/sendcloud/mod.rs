//! Shipping aggregator API client (Sendcloud), storefront side.
//!
//! The storefront only quotes rates; parcel creation and labels live in the
//! back office.
//!
//! # API Reference
//!
//! - Base URL: `https://panel.sendcloud.sc/api` (overridable for tests)
//! - Authentication: HTTP basic auth, public key as username and secret key
//!   as password
//! - Endpoint used: `GET /v2/shipping_methods`

mod types;

pub use types::{MethodCountry, ShippingMethod, ShippingMethodsResponse};

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use valroux_core::CountryCode;

use crate::config::SendcloudConfig;

/// Errors from the shipping aggregator.
#[derive(Debug, Error)]
pub enum ShippingApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {detail}")]
    Api { status: u16, detail: String },

    /// Unauthorized (invalid credentials).
    #[error("Unauthorized: invalid aggregator credentials")]
    Unauthorized,

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Shipping aggregator API client.
#[derive(Clone)]
pub struct ShippingClient {
    inner: Arc<ShippingClientInner>,
}

struct ShippingClientInner {
    client: reqwest::Client,
    api_base: String,
}

impl std::fmt::Debug for ShippingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShippingClient")
            .field("api_base", &self.inner.api_base)
            .finish_non_exhaustive()
    }
}

impl ShippingClient {
    /// Create a new aggregator client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &SendcloudConfig) -> Result<Self, ShippingApiError> {
        let mut headers = HeaderMap::new();

        let credentials = format!(
            "{}:{}",
            config.public_key,
            config.secret_key.expose_secret()
        );
        let auth_value = format!("Basic {}", BASE64.encode(credentials));
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| ShippingApiError::Parse(format!("Invalid credentials: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ShippingClientInner {
                client,
                api_base: config.api_base.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// List the shipping methods that can deliver to a country.
    #[instrument(skip(self), fields(to_country = %to_country))]
    pub async fn shipping_methods(
        &self,
        to_country: &CountryCode,
    ) -> Result<Vec<ShippingMethod>, ShippingApiError> {
        let url = format!("{}/v2/shipping_methods", self.inner.api_base);
        let response = self
            .inner
            .client
            .get(&url)
            .query(&[("to_country", to_country.as_str()), ("from_country", "BE")])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ShippingApiError::Unauthorized);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ShippingApiError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response
            .json::<ShippingMethodsResponse>()
            .await
            .map_err(|e| ShippingApiError::Parse(e.to_string()))?;
        Ok(body.shipping_methods)
    }
}
