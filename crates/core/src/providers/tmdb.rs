//! TMDB (The Movie Database) catalog client.
//!
//! TMDB requires an API key for access. Watch-provider listings are
//! region-scoped and grouped by offer class.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::TmdbConfig;
use crate::media::MediaKind;

use super::types::{CatalogEntry, ExternalIds};
use super::{CatalogService, ProviderError};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Absolute poster URL for a catalog poster path.
pub fn poster_url(poster_path: &str) -> String {
    format!("{IMAGE_BASE_URL}{poster_path}")
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    search_language: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(20)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            search_language: config.search_language,
        })
    }

    /// TMDB path segment for a media kind.
    fn kind_path(kind: MediaKind) -> &'static str {
        match kind {
            MediaKind::Movie => "movie",
            MediaKind::Show => "tv",
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, ProviderError> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if status == 401 {
            return Err(ProviderError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 404 {
            return Err(ProviderError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse {} response: {}", what, e))
        })
    }
}

#[async_trait]
impl CatalogService for TmdbClient {
    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogEntry>, ProviderError> {
        let url = format!("{}/search/{}", self.base_url, Self::kind_path(kind));

        debug!(query, kind = kind.as_str(), "TMDB search");

        let response: TmdbSearchResponse = self
            .get_json(
                &url,
                &[
                    ("api_key", self.api_key.as_str()),
                    ("query", query),
                    ("language", self.search_language.as_str()),
                    ("include_adult", "false"),
                ],
                "search",
            )
            .await?;

        Ok(response.results.into_iter().map(|r| r.into()).collect())
    }

    async fn entry(&self, catalog_id: u32, kind: MediaKind) -> Result<CatalogEntry, ProviderError> {
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            Self::kind_path(kind),
            catalog_id
        );

        debug!(catalog_id, kind = kind.as_str(), "TMDB entry lookup");

        let result: TmdbResult = self
            .get_json(
                &url,
                &[
                    ("api_key", self.api_key.as_str()),
                    ("language", self.search_language.as_str()),
                ],
                "entry",
            )
            .await?;

        Ok(result.into())
    }

    async fn watch_providers(
        &self,
        catalog_id: u32,
        kind: MediaKind,
        region: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let url = format!(
            "{}/{}/{}/watch/providers",
            self.base_url,
            Self::kind_path(kind),
            catalog_id
        );

        debug!(catalog_id, region, "TMDB watch providers");

        let response: WatchProvidersResponse = self
            .get_json(&url, &[("api_key", self.api_key.as_str())], "watch providers")
            .await?;

        let Some(listing) = response.results.get(region) else {
            return Ok(Vec::new());
        };

        let mut names = Vec::new();
        for class in [&listing.flatrate, &listing.ads, &listing.free] {
            names.extend(class.iter().map(|p| p.provider_name.clone()));
        }
        Ok(names)
    }

    async fn external_ids(&self, catalog_id: u32) -> Result<ExternalIds, ProviderError> {
        let url = format!("{}/tv/{}/external_ids", self.base_url, catalog_id);

        debug!(catalog_id, "TMDB external ids");

        let response: ExternalIdsResponse = self
            .get_json(&url, &[("api_key", self.api_key.as_str())], "external ids")
            .await?;

        Ok(ExternalIds {
            tvdb_id: response.tvdb_id,
        })
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbResult>,
}

/// One search/detail result; movies carry `title`/`release_date`, shows
/// carry `name`/`first_air_date`.
#[derive(Debug, Deserialize)]
struct TmdbResult {
    id: u32,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
}

impl From<TmdbResult> for CatalogEntry {
    fn from(r: TmdbResult) -> Self {
        let title = r.title.or(r.name).unwrap_or_default();
        let year = r
            .release_date
            .or(r.first_air_date)
            .as_deref()
            .and_then(parse_year);
        Self {
            id: r.id,
            title,
            year,
            overview: r.overview,
            poster_path: r.poster_path,
        }
    }
}

fn parse_year(date: &str) -> Option<i32> {
    date.split('-').next().and_then(|y| y.parse().ok())
}

#[derive(Debug, Deserialize)]
struct WatchProvidersResponse {
    #[serde(default)]
    results: std::collections::HashMap<String, RegionListing>,
}

#[derive(Debug, Deserialize, Default)]
struct RegionListing {
    #[serde(default)]
    flatrate: Vec<WatchProvider>,
    #[serde(default)]
    ads: Vec<WatchProvider>,
    #[serde(default)]
    free: Vec<WatchProvider>,
}

#[derive(Debug, Deserialize)]
struct WatchProvider {
    provider_name: String,
}

#[derive(Debug, Deserialize)]
struct ExternalIdsResponse {
    #[serde(default)]
    tvdb_id: Option<i64>,
}
