//! Mock library service for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::providers::{LibraryItem, LibraryService, ProviderError};

/// Mock implementation of the `LibraryService` trait.
///
/// Returns configured items, records every search for call-count
/// assertions, and can fail the next call on demand.
#[derive(Debug, Default)]
pub struct MockLibrary {
    items: Arc<RwLock<Vec<LibraryItem>>>,
    searches: Arc<RwLock<Vec<String>>>,
    next_error: Arc<RwLock<Option<String>>>,
}

impl MockLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_item(&self, item: LibraryItem) {
        self.items.write().await.push(item);
    }

    /// Fail the next search with an API error.
    pub async fn fail_next(&self, message: &str) {
        *self.next_error.write().await = Some(message.to_string());
    }

    pub async fn search_calls(&self) -> usize {
        self.searches.read().await.len()
    }

    pub async fn recorded_searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }
}

#[async_trait]
impl LibraryService for MockLibrary {
    async fn search(&self, title: &str) -> Result<Vec<LibraryItem>, ProviderError> {
        self.searches.write().await.push(title.to_string());

        if let Some(message) = self.next_error.write().await.take() {
            return Err(ProviderError::ApiError {
                status: 503,
                message,
            });
        }

        let title_lower = title.to_lowercase();
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|item| item.title.to_lowercase().contains(&title_lower))
            .cloned()
            .collect())
    }
}
