//! Shipping aggregator API client (Sendcloud), back-office side.
//!
//! The back office announces parcels and buys labels; rate quoting lives in
//! the storefront.
//!
//! # API Reference
//!
//! - Base URL: `https://panel.sendcloud.sc/api` (overridable for tests)
//! - Authentication: HTTP basic auth, public key as username and secret key
//!   as password
//! - Endpoints used: `POST /v2/parcels`, `GET /v2/tracking/{tracking_number}`

mod types;

pub use types::{
    CreateParcelRequest, NewParcel, Parcel, ParcelLabel, ParcelResponse, ParcelStatus,
    ShipmentMethod, TrackingInfo, TrackingState,
};

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

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

    /// Announce a parcel and request a label for it.
    #[instrument(skip(self, request), fields(order_number = %request.parcel.order_number))]
    pub async fn create_parcel(
        &self,
        request: &CreateParcelRequest,
    ) -> Result<Parcel, ShippingApiError> {
        let url = format!("{}/v2/parcels", self.inner.api_base);
        let response = self.inner.client.post(&url).json(request).send().await?;
        let body = self.read_response(response).await?;

        let parsed: ParcelResponse =
            serde_json::from_str(&body).map_err(|e| ShippingApiError::Parse(e.to_string()))?;
        Ok(parsed.parcel)
    }

    /// Fetch the tracking history for a parcel.
    #[instrument(skip(self))]
    pub async fn tracking(
        &self,
        tracking_number: &str,
    ) -> Result<TrackingInfo, ShippingApiError> {
        let url = format!("{}/v2/tracking/{tracking_number}", self.inner.api_base);
        let response = self.inner.client.get(&url).send().await?;
        let body = self.read_response(response).await?;

        serde_json::from_str(&body).map_err(|e| ShippingApiError::Parse(e.to_string()))
    }

    async fn read_response(
        &self,
        response: reqwest::Response,
    ) -> Result<String, ShippingApiError> {
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
        Ok(response.text().await?)
    }
}
