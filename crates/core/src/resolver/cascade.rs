//! The availability verification cascade.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::media::{Availability, MediaQuery};
use crate::metrics;
use crate::providers::{CatalogService, LibraryService, RequestTracker};

use super::keywords::matching_providers;

/// Runs the fixed-order availability checks for one `MediaQuery`.
///
/// Stage order is library -> streaming -> tracker and must not be
/// reordered: a positive streaming match must win over a later tracker
/// "pending" match. Every stage failure degrades to a miss; an
/// unconfigured adapter (`None`) is an automatic miss for its stage.
pub struct AvailabilityResolver {
    library: Option<Arc<dyn LibraryService>>,
    catalog: Option<Arc<dyn CatalogService>>,
    tracker: Option<Arc<dyn RequestTracker>>,
    region: String,
    subscribed: Vec<String>,
}

impl AvailabilityResolver {
    pub fn new(
        library: Option<Arc<dyn LibraryService>>,
        catalog: Option<Arc<dyn CatalogService>>,
        tracker: Option<Arc<dyn RequestTracker>>,
        config: &Config,
    ) -> Self {
        Self {
            library,
            catalog,
            tracker,
            region: config.tmdb.region.clone(),
            subscribed: config.subscribed_services.clone(),
        }
    }

    /// Run the full cascade. Exactly one `Availability` per call.
    pub async fn verify(&self, query: &MediaQuery) -> Availability {
        let result = self.run_cascade(query).await;
        metrics::CASCADE_OUTCOMES
            .with_label_values(&[result.stage()])
            .inc();
        debug!(
            title = %query.title,
            catalog_id = query.catalog_id,
            stage = result.stage(),
            "cascade finished"
        );
        result
    }

    /// Library stage only, for flows where streaming and tracker hits are
    /// irrelevant (a friend asking for acquisition).
    pub async fn check_library_only(&self, query: &MediaQuery) -> Availability {
        self.check_library(query)
            .await
            .unwrap_or(Availability::NotFound)
    }

    async fn run_cascade(&self, query: &MediaQuery) -> Availability {
        if let Some(found) = self.check_library(query).await {
            return found;
        }
        if let Some(found) = self.check_streaming(query).await {
            return found;
        }
        if let Some(found) = self.check_tracker(query).await {
            return found;
        }
        Availability::NotFound
    }

    /// Stage 1: an item counts only with matching title and year and at
    /// least one attached media file.
    async fn check_library(&self, query: &MediaQuery) -> Option<Availability> {
        let library = self.library.as_ref()?;

        let items = match library.search(&query.title).await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, title = %query.title, "library check failed, treating as miss");
                return None;
            }
        };

        items
            .into_iter()
            .find(|item| {
                item.has_media
                    && query.year.is_some()
                    && item.year == query.year
                    && item.title.eq_ignore_ascii_case(&query.title)
            })
            .map(|item| Availability::FoundInLibrary {
                server_name: item.server_name,
            })
    }

    /// Stage 2: watch-provider names filtered through the subscription
    /// keyword map.
    async fn check_streaming(&self, query: &MediaQuery) -> Option<Availability> {
        let catalog = self.catalog.as_ref()?;
        if self.subscribed.is_empty() {
            return None;
        }

        let names = match catalog
            .watch_providers(query.catalog_id, query.kind, &self.region)
            .await
        {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, catalog_id = query.catalog_id, "streaming check failed, treating as miss");
                return None;
            }
        };

        let providers = matching_providers(&names, &self.subscribed);
        if providers.is_empty() {
            None
        } else {
            Some(Availability::FoundOnStreaming { providers })
        }
    }

    /// Stage 3: any tracked request counts, whatever its status.
    async fn check_tracker(&self, query: &MediaQuery) -> Option<Availability> {
        let tracker = self.tracker.as_ref()?;

        let entry = match tracker.find_by_catalog_id(query.catalog_id).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, catalog_id = query.catalog_id, "tracker check failed, treating as miss");
                return None;
            }
        };

        entry.map(|entry| Availability::PendingRequest {
            tracker_title: entry.title.unwrap_or_else(|| query.title.clone()),
        })
    }
}
