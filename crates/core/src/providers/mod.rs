//! Adapters for the external media services.
//!
//! Each adapter wraps one provider behind a narrow trait and translates
//! the provider's payloads into the small shapes the core depends on.
//! Callers treat any adapter failure as a miss for that cascade stage.

mod arr;
mod overseerr;
mod plex;
mod tmdb;
mod types;

pub use arr::{RadarrClient, SonarrClient};
pub use overseerr::OverseerrClient;
pub use plex::PlexClient;
pub use tmdb::{poster_url, TmdbClient};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::media::MediaKind;

/// Errors that can occur when talking to a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Provider returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse a response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing URL, key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// The user's own media server: what is already downloaded and playable.
#[async_trait]
pub trait LibraryService: Send + Sync {
    /// Search the library by title.
    async fn search(&self, title: &str) -> Result<Vec<LibraryItem>, ProviderError>;
}

/// The metadata catalog: free-text search, streaming availability and
/// cross-reference ids.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Resolve a free-text query to catalog entries, best match first.
    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogEntry>, ProviderError>;

    /// Fetch a single entry by catalog id.
    async fn entry(&self, catalog_id: u32, kind: MediaKind) -> Result<CatalogEntry, ProviderError>;

    /// Streaming provider display names for a title in a region, across
    /// the subscription, ad-supported and free classes.
    async fn watch_providers(
        &self,
        catalog_id: u32,
        kind: MediaKind,
        region: &str,
    ) -> Result<Vec<String>, ProviderError>;

    /// External ids for a show; only the TVDB id is consumed.
    async fn external_ids(&self, catalog_id: u32) -> Result<ExternalIds, ProviderError>;
}

/// The request tracker: previously submitted media requests.
#[async_trait]
pub trait RequestTracker: Send + Sync {
    /// Find an existing request for a catalog id, whatever its status.
    async fn find_by_catalog_id(
        &self,
        catalog_id: u32,
    ) -> Result<Option<TrackerEntry>, ProviderError>;
}

/// An acquisition service (one instance per media kind).
#[async_trait]
pub trait AcquisitionService: Send + Sync {
    /// Service name for logs and user messages ("Radarr", "Sonarr").
    fn name(&self) -> &str;

    /// The media kind this instance acquires.
    fn kind(&self) -> MediaKind;

    /// Catalog ids of everything the service already manages.
    async fn existing_catalog_ids(&self) -> Result<Vec<u32>, ProviderError>;

    /// Submit a new item. The reply is classified by the caller.
    async fn submit(&self, item: &AddItem) -> Result<SubmitReply, ProviderError>;
}
