//! Core media domain types shared across the resolver, the acquisition
//! trigger and the friend request workflow.

use serde::{Deserialize, Serialize};

/// What kind of media a query refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Show,
}

impl MediaKind {
    /// Stable wire name, used in callback tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "show",
        }
    }

    /// Parse the wire name back. Returns `None` for anything else.
    pub fn from_str_strict(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(MediaKind::Movie),
            "show" => Some(MediaKind::Show),
            _ => None,
        }
    }
}

/// Acquisition quality tier. UltraHd is only meaningful when a distinct
/// 4K quality-profile/root-folder pair is configured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Standard,
    UltraHd,
}

/// A resolved title to run the availability cascade against.
///
/// Produced by a catalog search; immutable once it enters the cascade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaQuery {
    /// Display title from the catalog.
    pub title: String,
    /// Release year, if the catalog reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Catalog (TMDB) id.
    pub catalog_id: u32,
    /// Movie or show.
    pub kind: MediaKind,
}

/// Result of one cascade run. Exactly one variant per run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Availability {
    /// Already in the library with at least one playable file.
    FoundInLibrary { server_name: String },
    /// Watchable on at least one subscribed streaming provider.
    /// Names are deduplicated case-insensitively, original casing kept.
    FoundOnStreaming { providers: Vec<String> },
    /// An existing request is already tracked, whatever its status.
    PendingRequest { tracker_title: String },
    /// All three checks missed.
    NotFound,
}

impl Availability {
    /// Stage label for metrics and logs.
    pub fn stage(&self) -> &'static str {
        match self {
            Availability::FoundInLibrary { .. } => "library",
            Availability::FoundOnStreaming { .. } => "streaming",
            Availability::PendingRequest { .. } => "tracker",
            Availability::NotFound => "not_found",
        }
    }
}

/// Classified result of an acquisition submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AcquisitionOutcome {
    /// Accepted by the service, search started.
    Submitted,
    /// The service already has this catalog id.
    AlreadyPresent,
    /// Submission was attempted and rejected, or the transport failed.
    Failed { reason: String },
    /// The secondary id the TV service needs could not be resolved.
    /// Nothing was submitted.
    MissingCrossReference,
    /// The target service section is incomplete or invalid.
    NotConfigured { detail: String },
}

impl AcquisitionOutcome {
    /// Result label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            AcquisitionOutcome::Submitted => "submitted",
            AcquisitionOutcome::AlreadyPresent => "already_present",
            AcquisitionOutcome::Failed { .. } => "failed",
            AcquisitionOutcome::MissingCrossReference => "missing_cross_reference",
            AcquisitionOutcome::NotConfigured { .. } => "not_configured",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_wire_names_round_trip() {
        for kind in [MediaKind::Movie, MediaKind::Show] {
            assert_eq!(MediaKind::from_str_strict(kind.as_str()), Some(kind));
        }
        assert_eq!(MediaKind::from_str_strict("series"), None);
    }

    #[test]
    fn test_availability_serialization() {
        let found = Availability::FoundOnStreaming {
            providers: vec!["Netflix".to_string()],
        };
        let json = serde_json::to_string(&found).unwrap();
        let parsed: Availability = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, found);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(AcquisitionOutcome::Submitted.label(), "submitted");
        assert_eq!(
            AcquisitionOutcome::Failed {
                reason: "x".to_string()
            }
            .label(),
            "failed"
        );
    }
}
