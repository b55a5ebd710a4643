//! Overseerr request tracker client.
//!
//! The request list is scanned for a matching catalog id; any lifecycle
//! status counts as an existing request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::OverseerrConfig;

use super::types::TrackerEntry;
use super::{ProviderError, RequestTracker};

/// Page size for the request list scan.
const REQUEST_PAGE_SIZE: u32 = 100;

/// Overseerr HTTP API client.
pub struct OverseerrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OverseerrClient {
    /// Create a new Overseerr client.
    pub fn new(config: OverseerrConfig) -> Result<Self, ProviderError> {
        if !config.is_configured() {
            return Err(ProviderError::NotConfigured(
                "Overseerr url and api_key are required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(20)).build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl RequestTracker for OverseerrClient {
    async fn find_by_catalog_id(
        &self,
        catalog_id: u32,
    ) -> Result<Option<TrackerEntry>, ProviderError> {
        let url = format!("{}/api/v1/request", self.base_url);

        debug!(catalog_id, "Overseerr request lookup");

        let response = self
            .client
            .get(&url)
            .query(&[("take", REQUEST_PAGE_SIZE.to_string())])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == 401 || status == 403 {
            return Err(ProviderError::NotConfigured(
                "Invalid Overseerr API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let listing: RequestListResponse = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse request list: {}", e))
        })?;

        let entry = listing
            .results
            .into_iter()
            .find(|r| r.media.tmdb_id == Some(catalog_id))
            .map(|r| TrackerEntry {
                title: r.media.title.or(r.media.name),
                status: r.status,
            });

        Ok(entry)
    }
}

// ============================================================================
// Overseerr API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct RequestListResponse {
    #[serde(default)]
    results: Vec<TrackedRequest>,
}

#[derive(Debug, Deserialize)]
struct TrackedRequest {
    #[serde(default)]
    status: Option<i64>,
    media: TrackedMedia,
}

#[derive(Debug, Deserialize, Default)]
struct TrackedMedia {
    #[serde(rename = "tmdbId", default)]
    tmdb_id: Option<u32>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
}
