//! Mock acquisition service for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::media::MediaKind;
use crate::providers::{AcquisitionService, AddItem, ProviderError, SubmitReply};

/// Mock implementation of the `AcquisitionService` trait.
///
/// By default a submission is accepted: the reply echoes the submitted
/// title and the catalog id joins the existing set, so a second identical
/// submission is caught by the duplicate check — the same behavior a real
/// service exhibits.
#[derive(Debug)]
pub struct MockAcquisition {
    name: &'static str,
    kind: MediaKind,
    existing: Arc<RwLock<Vec<u32>>>,
    submissions: Arc<RwLock<Vec<AddItem>>>,
    next_rejection: Arc<RwLock<Option<Vec<String>>>>,
    next_error: Arc<RwLock<Option<String>>>,
    next_submit_error: Arc<RwLock<Option<String>>>,
}

impl MockAcquisition {
    /// A mock Radarr.
    pub fn movies() -> Self {
        Self::new("Radarr", MediaKind::Movie)
    }

    /// A mock Sonarr.
    pub fn shows() -> Self {
        Self::new("Sonarr", MediaKind::Show)
    }

    fn new(name: &'static str, kind: MediaKind) -> Self {
        Self {
            name,
            kind,
            existing: Arc::new(RwLock::new(Vec::new())),
            submissions: Arc::new(RwLock::new(Vec::new())),
            next_rejection: Arc::new(RwLock::new(None)),
            next_error: Arc::new(RwLock::new(None)),
            next_submit_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Seed the set of already-managed catalog ids.
    pub async fn add_existing(&self, catalog_id: u32) {
        self.existing.write().await.push(catalog_id);
    }

    /// Reject the next submission with the given error messages.
    pub async fn reject_next(&self, messages: Vec<String>) {
        *self.next_rejection.write().await = Some(messages);
    }

    /// Fail the next existing-items lookup with a transport-level error.
    pub async fn fail_next_lookup(&self, message: &str) {
        *self.next_error.write().await = Some(message.to_string());
    }

    /// Fail the next submission with a transport-level error.
    pub async fn fail_next_submit(&self, message: &str) {
        *self.next_submit_error.write().await = Some(message.to_string());
    }

    pub async fn submissions(&self) -> Vec<AddItem> {
        self.submissions.read().await.clone()
    }
}

#[async_trait]
impl AcquisitionService for MockAcquisition {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> MediaKind {
        self.kind
    }

    async fn existing_catalog_ids(&self) -> Result<Vec<u32>, ProviderError> {
        if let Some(message) = self.next_error.write().await.take() {
            return Err(ProviderError::ApiError {
                status: 503,
                message,
            });
        }
        Ok(self.existing.read().await.clone())
    }

    async fn submit(&self, item: &AddItem) -> Result<SubmitReply, ProviderError> {
        if let Some(message) = self.next_submit_error.write().await.take() {
            return Err(ProviderError::ApiError {
                status: 503,
                message,
            });
        }

        self.submissions.write().await.push(item.clone());

        if let Some(errors) = self.next_rejection.write().await.take() {
            return Ok(SubmitReply {
                title: None,
                errors,
            });
        }

        self.existing.write().await.push(item.catalog_id);
        Ok(SubmitReply {
            title: Some(item.title.clone()),
            errors: Vec::new(),
        })
    }
}
