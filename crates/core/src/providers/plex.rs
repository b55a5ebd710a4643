//! Plex media server client.
//!
//! Only the global search endpoint is used; an item counts as playable
//! when the server attaches at least one media part to it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::PlexConfig;

use super::types::LibraryItem;
use super::{LibraryService, ProviderError};

/// Plex HTTP API client.
pub struct PlexClient {
    client: Client,
    base_url: String,
    token: String,
}

impl PlexClient {
    /// Create a new Plex client.
    pub fn new(config: PlexConfig) -> Result<Self, ProviderError> {
        if !config.is_configured() {
            return Err(ProviderError::NotConfigured(
                "Plex url and token are required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(20)).build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    async fn get_container<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("X-Plex-Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(ProviderError::NotConfigured(
                "Invalid Plex token".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Plex response: {}", e)))
    }

    /// Server display name, from the server's root resource.
    async fn friendly_name(&self) -> Option<String> {
        let url = format!("{}/", self.base_url);
        match self
            .get_container::<IdentityResponse>(&url, &[])
            .await
        {
            Ok(identity) => identity.media_container.friendly_name,
            Err(e) => {
                warn!(error = %e, "Could not fetch Plex server name");
                None
            }
        }
    }
}

#[async_trait]
impl LibraryService for PlexClient {
    async fn search(&self, title: &str) -> Result<Vec<LibraryItem>, ProviderError> {
        let url = format!("{}/search", self.base_url);

        debug!(title, "Plex search");

        let response: SearchResponse = self.get_container(&url, &[("query", title)]).await?;

        let server_name = self
            .friendly_name()
            .await
            .unwrap_or_else(|| "Plex".to_string());

        let items = response
            .media_container
            .metadata
            .into_iter()
            .map(|m| LibraryItem {
                title: m.title,
                year: m.year,
                has_media: !m.media.is_empty(),
                server_name: server_name.clone(),
            })
            .collect();

        Ok(items)
    }
}

// ============================================================================
// Plex API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "MediaContainer")]
    media_container: SearchContainer,
}

#[derive(Debug, Deserialize, Default)]
struct SearchContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<PlexMetadata>,
}

#[derive(Debug, Deserialize)]
struct PlexMetadata {
    title: String,
    #[serde(default)]
    year: Option<i32>,
    #[serde(rename = "Media", default)]
    media: Vec<PlexMedia>,
}

/// Only presence matters; the part details are irrelevant here.
#[derive(Debug, Deserialize)]
struct PlexMedia {}

#[derive(Debug, Deserialize)]
struct IdentityResponse {
    #[serde(rename = "MediaContainer")]
    media_container: IdentityContainer,
}

#[derive(Debug, Deserialize, Default)]
struct IdentityContainer {
    #[serde(rename = "friendlyName", default)]
    friendly_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parses_media_presence() {
        let json = r#"{
            "MediaContainer": {
                "Metadata": [
                    {"title": "Arrival", "year": 2016, "Media": [{"id": 1}]},
                    {"title": "Arrival", "year": 2016}
                ]
            }
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let metadata = &response.media_container.metadata;
        assert!(!metadata[0].media.is_empty());
        assert!(metadata[1].media.is_empty());
    }

    #[test]
    fn test_empty_container_parses() {
        let json = r#"{"MediaContainer": {}}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.media_container.metadata.is_empty());
    }

    #[test]
    fn test_unconfigured_client_rejected() {
        let err = PlexClient::new(PlexConfig::default()).unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
