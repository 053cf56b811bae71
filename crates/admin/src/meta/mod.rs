//! Social ad-catalog API client (Meta graph API).
//!
//! Pushes the wine catalog into an ad catalog so product ads stay in sync
//! with visibility and stock.
//!
//! # API Reference
//!
//! - Base URL: `https://graph.facebook.com/v19.0` (overridable for tests)
//! - Authentication: bearer access token
//! - Endpoint used: `POST /{catalog_id}/items_batch`

mod types;

pub use types::{ItemData, ItemMethod, ItemRequest, ItemsBatchRequest, ItemsBatchResponse};

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use crate::config::MetaConfig;

/// Maximum number of item requests per batch call.
pub const MAX_BATCH_SIZE: usize = 100;

/// Errors from the ad-catalog API.
#[derive(Debug, Error)]
pub enum CatalogApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {detail}")]
    Api { status: u16, detail: String },

    /// Unauthorized (invalid or expired access token).
    #[error("Unauthorized: invalid ad-catalog access token")]
    Unauthorized,

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Ad-catalog API client.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    graph_base: String,
    catalog_id: String,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("graph_base", &self.inner.graph_base)
            .field("catalog_id", &self.inner.catalog_id)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new ad-catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &MetaConfig) -> Result<Self, CatalogApiError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.access_token.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| CatalogApiError::Parse(format!("Invalid access token: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                graph_base: config.graph_base.trim_end_matches('/').to_string(),
                catalog_id: config.catalog_id.clone(),
            }),
        })
    }

    /// Push one batch of item requests (at most [`MAX_BATCH_SIZE`]).
    #[instrument(skip(self, requests), fields(batch_size = requests.len()))]
    pub async fn push_batch(
        &self,
        requests: &[ItemRequest],
    ) -> Result<Vec<String>, CatalogApiError> {
        let url = format!(
            "{}/{}/items_batch",
            self.inner.graph_base, self.inner.catalog_id
        );
        let body = ItemsBatchRequest {
            item_type: "PRODUCT_ITEM",
            requests,
        };

        let response = self.inner.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CatalogApiError::Unauthorized);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CatalogApiError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed = response
            .json::<ItemsBatchResponse>()
            .await
            .map_err(|e| CatalogApiError::Parse(e.to_string()))?;
        Ok(parsed.handles)
    }
}
