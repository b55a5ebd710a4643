//! Acquisition trigger.
//!
//! Submits a new item to the acquisition service for its media kind and
//! classifies the reply. Quality-profile ids live as opaque strings in
//! configuration and are coerced to integers only here.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::media::{AcquisitionOutcome, MediaKind, MediaQuery, QualityTier};
use crate::metrics;
use crate::providers::{AcquisitionService, AddItem, CatalogService};

/// Marker in the provider's rejection payload for a duplicate add.
const DUPLICATE_MARKER: &str = "already been added";

/// Resolved submission parameters for one tier.
struct TierTarget {
    quality_profile_id: i64,
    root_folder_path: String,
    language_profile_id: Option<i64>,
}

/// Submits add/search commands to the right acquisition service.
pub struct AcquisitionTrigger {
    movies: Option<Arc<dyn AcquisitionService>>,
    shows: Option<Arc<dyn AcquisitionService>>,
    catalog: Option<Arc<dyn CatalogService>>,
    config: Arc<Config>,
}

impl AcquisitionTrigger {
    pub fn new(
        movies: Option<Arc<dyn AcquisitionService>>,
        shows: Option<Arc<dyn AcquisitionService>>,
        catalog: Option<Arc<dyn CatalogService>>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            movies,
            shows,
            catalog,
            config,
        }
    }

    /// Submit `query` for acquisition at the requested tier.
    ///
    /// Never raises for expected negative outcomes; everything is a
    /// variant of [`AcquisitionOutcome`].
    pub async fn acquire(&self, query: &MediaQuery, tier: QualityTier) -> AcquisitionOutcome {
        let outcome = self.run(query, tier).await;
        metrics::ACQUISITION_ATTEMPTS
            .with_label_values(&[section_name(query.kind), outcome.label()])
            .inc();
        outcome
    }

    async fn run(&self, query: &MediaQuery, tier: QualityTier) -> AcquisitionOutcome {
        let section = section_name(query.kind);
        let service = match query.kind {
            MediaKind::Movie => self.movies.as_ref(),
            MediaKind::Show => self.shows.as_ref(),
        };
        let Some(service) = service else {
            return AcquisitionOutcome::NotConfigured {
                detail: format!("{section} is not configured"),
            };
        };

        let target = match self.resolve_tier(query.kind, tier) {
            Ok(target) => target,
            Err(outcome) => return outcome,
        };

        // Duplicate check before submission avoids provider-side
        // duplicate-add errors; a failed lookup is not fatal.
        match service.existing_catalog_ids().await {
            Ok(ids) if ids.contains(&query.catalog_id) => {
                return AcquisitionOutcome::AlreadyPresent;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, service = service.name(), "existing-items lookup failed, submitting anyway");
            }
        }

        let tvdb_id = match query.kind {
            MediaKind::Movie => None,
            MediaKind::Show => match self.resolve_tvdb_id(query.catalog_id).await {
                Some(id) => Some(id),
                None => return AcquisitionOutcome::MissingCrossReference,
            },
        };

        let item = AddItem {
            title: query.title.clone(),
            catalog_id: query.catalog_id,
            quality_profile_id: target.quality_profile_id,
            root_folder_path: target.root_folder_path,
            language_profile_id: target.language_profile_id,
            tvdb_id,
        };

        let reply = match service.submit(&item).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, service = service.name(), title = %query.title, "submission failed");
                return AcquisitionOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        if reply.title.as_deref() == Some(query.title.as_str()) {
            info!(service = service.name(), title = %query.title, "submitted, search started");
            return AcquisitionOutcome::Submitted;
        }
        if reply.errors.iter().any(|m| m.contains(DUPLICATE_MARKER)) {
            return AcquisitionOutcome::AlreadyPresent;
        }

        let reason = if reply.errors.is_empty() {
            "unexpected reply from acquisition service".to_string()
        } else {
            reply.errors.join("; ")
        };
        warn!(service = service.name(), title = %query.title, reason = %reason, "add rejected");
        AcquisitionOutcome::Failed { reason }
    }

    /// Resolve the profile/folder pair for a tier, coercing the opaque
    /// profile strings to integers.
    fn resolve_tier(
        &self,
        kind: MediaKind,
        tier: QualityTier,
    ) -> Result<TierTarget, AcquisitionOutcome> {
        let section = section_name(kind);
        let (profile, folder, language) = match (kind, tier) {
            (MediaKind::Movie, QualityTier::Standard) => (
                &self.config.radarr.quality_profile_id,
                &self.config.radarr.root_folder_path,
                None,
            ),
            (MediaKind::Movie, QualityTier::UltraHd) => (
                &self.config.radarr.quality_profile_id_4k,
                &self.config.radarr.root_folder_path_4k,
                None,
            ),
            (MediaKind::Show, QualityTier::Standard) => (
                &self.config.sonarr.quality_profile_id,
                &self.config.sonarr.root_folder_path,
                Some(&self.config.sonarr.language_profile_id),
            ),
            (MediaKind::Show, QualityTier::UltraHd) => (
                &self.config.sonarr.quality_profile_id_4k,
                &self.config.sonarr.root_folder_path_4k,
                Some(&self.config.sonarr.language_profile_id),
            ),
        };

        if profile.is_empty() || folder.is_empty() {
            return Err(AcquisitionOutcome::NotConfigured {
                detail: format!("{section} has no profile/folder for this tier"),
            });
        }

        let quality_profile_id = profile.parse().map_err(|_| {
            AcquisitionOutcome::NotConfigured {
                detail: format!("{section} quality profile id '{profile}' is not numeric"),
            }
        })?;

        let language_profile_id = match language {
            None => None,
            Some(raw) => Some(raw.parse().map_err(|_| {
                AcquisitionOutcome::NotConfigured {
                    detail: format!("{section} language profile id '{raw}' is not numeric"),
                }
            })?),
        };

        Ok(TierTarget {
            quality_profile_id,
            root_folder_path: folder.clone(),
            language_profile_id,
        })
    }

    /// Cross-reference lookup for the TV service. `None` means the id
    /// could not be resolved and nothing must be submitted.
    async fn resolve_tvdb_id(&self, catalog_id: u32) -> Option<i64> {
        let Some(catalog) = self.catalog.as_ref() else {
            warn!(catalog_id, "no catalog configured for the TVDB cross-reference");
            return None;
        };
        match catalog.external_ids(catalog_id).await {
            Ok(ids) => {
                if ids.tvdb_id.is_none() {
                    warn!(catalog_id, "catalog has no TVDB id for this entry");
                }
                ids.tvdb_id
            }
            Err(e) => {
                warn!(error = %e, catalog_id, "external-ids lookup failed");
                None
            }
        }
    }
}

fn section_name(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "radarr",
        MediaKind::Show => "sonarr",
    }
}
