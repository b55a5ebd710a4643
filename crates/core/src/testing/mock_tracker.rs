//! Mock request tracker for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::providers::{ProviderError, RequestTracker, TrackerEntry};

/// Mock implementation of the `RequestTracker` trait.
#[derive(Debug, Default)]
pub struct MockTracker {
    entries: Arc<RwLock<HashMap<u32, TrackerEntry>>>,
    lookups: Arc<RwLock<Vec<u32>>>,
    next_error: Arc<RwLock<Option<String>>>,
}

impl MockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_entry(&self, catalog_id: u32, entry: TrackerEntry) {
        self.entries.write().await.insert(catalog_id, entry);
    }

    /// Fail the next lookup with an API error.
    pub async fn fail_next(&self, message: &str) {
        *self.next_error.write().await = Some(message.to_string());
    }

    pub async fn lookup_calls(&self) -> usize {
        self.lookups.read().await.len()
    }
}

#[async_trait]
impl RequestTracker for MockTracker {
    async fn find_by_catalog_id(
        &self,
        catalog_id: u32,
    ) -> Result<Option<TrackerEntry>, ProviderError> {
        self.lookups.write().await.push(catalog_id);

        if let Some(message) = self.next_error.write().await.take() {
            return Err(ProviderError::ApiError {
                status: 503,
                message,
            });
        }

        Ok(self.entries.read().await.get(&catalog_id).cloned())
    }
}
