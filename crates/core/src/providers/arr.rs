//! Radarr and Sonarr acquisition service clients.
//!
//! Both speak the same v3 API shape apart from the resource path and a
//! couple of payload fields, so the HTTP plumbing is shared.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::{RadarrConfig, SonarrConfig};
use crate::media::MediaKind;

use super::types::{AddItem, SubmitReply};
use super::{AcquisitionService, ProviderError};

/// Shared HTTP plumbing for the v3 API.
struct ArrEndpoint {
    client: Client,
    base_url: String,
    api_key: String,
    /// Resource path: "movie" for Radarr, "series" for Sonarr.
    resource: &'static str,
}

impl ArrEndpoint {
    fn new(
        url: &str,
        api_key: &str,
        resource: &'static str,
        service: &str,
    ) -> Result<Self, ProviderError> {
        if url.is_empty() || api_key.is_empty() {
            return Err(ProviderError::NotConfigured(format!(
                "{} url and api_key are required",
                service
            )));
        }

        let client = Client::builder().timeout(Duration::from_secs(20)).build()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            resource,
        })
    }

    fn resource_url(&self) -> String {
        format!("{}/api/v3/{}", self.base_url, self.resource)
    }

    async fn existing_catalog_ids(&self) -> Result<Vec<u32>, ProviderError> {
        let response = self
            .client
            .get(self.resource_url())
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(ProviderError::NotConfigured("Invalid API key".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<ManagedItem> = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse {} list: {}", self.resource, e))
        })?;

        Ok(items.into_iter().filter_map(|i| i.tmdb_id).collect())
    }

    async fn submit<P: Serialize>(&self, payload: &P) -> Result<SubmitReply, ProviderError> {
        let response = self
            .client
            .post(self.resource_url())
            .header("X-Api-Key", &self.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            let value: Value = serde_json::from_str(&body).map_err(|e| {
                ProviderError::ParseError(format!("Failed to parse add reply: {}", e))
            })?;
            let title = value
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string);
            return Ok(SubmitReply {
                title,
                errors: Vec::new(),
            });
        }

        // Rejections arrive as structured validation failures; collect the
        // messages so the caller can classify duplicates.
        debug!(status = status.as_u16(), body = %body, "add request rejected");
        Ok(SubmitReply {
            title: None,
            errors: extract_error_messages(&body),
        })
    }
}

/// Pull human-readable messages out of a rejection body, whatever its shape.
fn extract_error_messages(body: &str) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return vec![body.to_string()];
    };

    let mut messages = Vec::new();
    match &value {
        Value::Array(failures) => {
            for failure in failures {
                if let Some(msg) = failure.get("errorMessage").and_then(Value::as_str) {
                    messages.push(msg.to_string());
                }
            }
        }
        Value::Object(map) => {
            for key in ["errorMessage", "message", "error"] {
                if let Some(msg) = map.get(key).and_then(Value::as_str) {
                    messages.push(msg.to_string());
                }
            }
        }
        _ => {}
    }

    if messages.is_empty() {
        messages.push(body.to_string());
    }
    messages
}

#[derive(Debug, Deserialize)]
struct ManagedItem {
    #[serde(rename = "tmdbId", default)]
    tmdb_id: Option<u32>,
}

// ============================================================================
// Radarr
// ============================================================================

/// Radarr movie acquisition client.
pub struct RadarrClient {
    endpoint: ArrEndpoint,
}

impl RadarrClient {
    pub fn new(config: RadarrConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            endpoint: ArrEndpoint::new(&config.url, &config.api_key, "movie", "Radarr")?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RadarrAddPayload<'a> {
    title: &'a str,
    quality_profile_id: i64,
    root_folder_path: &'a str,
    monitored: bool,
    tmdb_id: u32,
    add_options: RadarrAddOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RadarrAddOptions {
    search_for_movie: bool,
}

#[async_trait]
impl AcquisitionService for RadarrClient {
    fn name(&self) -> &str {
        "Radarr"
    }

    fn kind(&self) -> MediaKind {
        MediaKind::Movie
    }

    async fn existing_catalog_ids(&self) -> Result<Vec<u32>, ProviderError> {
        self.endpoint.existing_catalog_ids().await
    }

    async fn submit(&self, item: &AddItem) -> Result<SubmitReply, ProviderError> {
        debug!(title = %item.title, catalog_id = item.catalog_id, "Radarr add");
        let payload = RadarrAddPayload {
            title: &item.title,
            quality_profile_id: item.quality_profile_id,
            root_folder_path: &item.root_folder_path,
            monitored: true,
            tmdb_id: item.catalog_id,
            add_options: RadarrAddOptions {
                search_for_movie: true,
            },
        };
        self.endpoint.submit(&payload).await
    }
}

// ============================================================================
// Sonarr
// ============================================================================

/// Sonarr show acquisition client.
pub struct SonarrClient {
    endpoint: ArrEndpoint,
}

impl SonarrClient {
    pub fn new(config: SonarrConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            endpoint: ArrEndpoint::new(&config.url, &config.api_key, "series", "Sonarr")?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SonarrAddPayload<'a> {
    title: &'a str,
    quality_profile_id: i64,
    language_profile_id: i64,
    root_folder_path: &'a str,
    monitored: bool,
    tmdb_id: u32,
    tvdb_id: i64,
    add_options: SonarrAddOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SonarrAddOptions {
    search_for_missing_episodes: bool,
}

#[async_trait]
impl AcquisitionService for SonarrClient {
    fn name(&self) -> &str {
        "Sonarr"
    }

    fn kind(&self) -> MediaKind {
        MediaKind::Show
    }

    async fn existing_catalog_ids(&self) -> Result<Vec<u32>, ProviderError> {
        self.endpoint.existing_catalog_ids().await
    }

    async fn submit(&self, item: &AddItem) -> Result<SubmitReply, ProviderError> {
        let tvdb_id = item.tvdb_id.ok_or_else(|| {
            ProviderError::ParseError("Sonarr submission requires a tvdb_id".to_string())
        })?;

        debug!(title = %item.title, catalog_id = item.catalog_id, tvdb_id, "Sonarr add");
        let payload = SonarrAddPayload {
            title: &item.title,
            quality_profile_id: item.quality_profile_id,
            language_profile_id: item.language_profile_id.unwrap_or(1),
            root_folder_path: &item.root_folder_path,
            monitored: true,
            tmdb_id: item.catalog_id,
            tvdb_id,
            add_options: SonarrAddOptions {
                search_for_missing_episodes: true,
            },
        };
        self.endpoint.submit(&payload).await
    }
}
