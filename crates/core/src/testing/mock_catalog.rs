//! Mock catalog service for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::media::MediaKind;
use crate::providers::{CatalogEntry, CatalogService, ExternalIds, ProviderError};

/// A recorded catalog call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogCall {
    Search { query: String, kind: MediaKind },
    Entry { catalog_id: u32, kind: MediaKind },
    WatchProviders { catalog_id: u32, region: String },
    ExternalIds { catalog_id: u32 },
}

/// Mock implementation of the `CatalogService` trait.
///
/// Search results, per-id entries, watch-provider listings and external
/// ids are all configured independently; every call is recorded.
#[derive(Debug, Default)]
pub struct MockCatalog {
    search_results: Arc<RwLock<Vec<CatalogEntry>>>,
    entries: Arc<RwLock<HashMap<u32, CatalogEntry>>>,
    watch_providers: Arc<RwLock<HashMap<u32, Vec<String>>>>,
    external_ids: Arc<RwLock<HashMap<u32, ExternalIds>>>,
    calls: Arc<RwLock<Vec<RecordedCatalogCall>>>,
    next_error: Arc<RwLock<Option<String>>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results returned by `search`, best match first.
    pub async fn set_search_results(&self, results: Vec<CatalogEntry>) {
        *self.search_results.write().await = results;
    }

    /// Entry returned by `entry` for its id. Also appended to the search
    /// results so lookups and searches stay consistent.
    pub async fn add_entry(&self, entry: CatalogEntry) {
        self.entries.write().await.insert(entry.id, entry.clone());
        self.search_results.write().await.push(entry);
    }

    pub async fn set_watch_providers(&self, catalog_id: u32, names: Vec<String>) {
        self.watch_providers.write().await.insert(catalog_id, names);
    }

    pub async fn set_tvdb_id(&self, catalog_id: u32, tvdb_id: Option<i64>) {
        self.external_ids
            .write()
            .await
            .insert(catalog_id, ExternalIds { tvdb_id });
    }

    /// Fail the next call with an API error.
    pub async fn fail_next(&self, message: &str) {
        *self.next_error.write().await = Some(message.to_string());
    }

    pub async fn calls(&self) -> Vec<RecordedCatalogCall> {
        self.calls.read().await.clone()
    }

    pub async fn search_calls(&self) -> usize {
        self.count(|c| matches!(c, RecordedCatalogCall::Search { .. }))
            .await
    }

    pub async fn watch_provider_calls(&self) -> usize {
        self.count(|c| matches!(c, RecordedCatalogCall::WatchProviders { .. }))
            .await
    }

    pub async fn external_id_calls(&self) -> usize {
        self.count(|c| matches!(c, RecordedCatalogCall::ExternalIds { .. }))
            .await
    }

    async fn count(&self, pred: impl Fn(&RecordedCatalogCall) -> bool) -> usize {
        self.calls.read().await.iter().filter(|c| pred(c)).count()
    }

    async fn take_error(&self) -> Option<ProviderError> {
        self.next_error
            .write()
            .await
            .take()
            .map(|message| ProviderError::ApiError {
                status: 503,
                message,
            })
    }
}

#[async_trait]
impl CatalogService for MockCatalog {
    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogEntry>, ProviderError> {
        self.calls.write().await.push(RecordedCatalogCall::Search {
            query: query.to_string(),
            kind,
        });
        if let Some(e) = self.take_error().await {
            return Err(e);
        }

        let query_lower = query.to_lowercase();
        Ok(self
            .search_results
            .read()
            .await
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&query_lower))
            .cloned()
            .collect())
    }

    async fn entry(&self, catalog_id: u32, kind: MediaKind) -> Result<CatalogEntry, ProviderError> {
        self.calls
            .write()
            .await
            .push(RecordedCatalogCall::Entry { catalog_id, kind });
        if let Some(e) = self.take_error().await {
            return Err(e);
        }

        self.entries
            .read()
            .await
            .get(&catalog_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("entry {}", catalog_id)))
    }

    async fn watch_providers(
        &self,
        catalog_id: u32,
        _kind: MediaKind,
        region: &str,
    ) -> Result<Vec<String>, ProviderError> {
        self.calls
            .write()
            .await
            .push(RecordedCatalogCall::WatchProviders {
                catalog_id,
                region: region.to_string(),
            });
        if let Some(e) = self.take_error().await {
            return Err(e);
        }

        Ok(self
            .watch_providers
            .read()
            .await
            .get(&catalog_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn external_ids(&self, catalog_id: u32) -> Result<ExternalIds, ProviderError> {
        self.calls
            .write()
            .await
            .push(RecordedCatalogCall::ExternalIds { catalog_id });
        if let Some(e) = self.take_error().await {
            return Err(e);
        }

        Ok(self
            .external_ids
            .read()
            .await
            .get(&catalog_id)
            .cloned()
            .unwrap_or_default())
    }
}
