//! Result shapes shared by the provider traits.

use serde::{Deserialize, Serialize};

/// An item found in the user's library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Whether at least one playable media file is attached. A bare
    /// catalog entry without files does not count as available.
    pub has_media: bool,
    /// Display name of the serving library.
    pub server_name: String,
}

/// A catalog search/detail result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Catalog (TMDB) id.
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Poster path relative to the catalog's image base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
}

/// Cross-reference identifiers for a show.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExternalIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb_id: Option<i64>,
}

/// An existing entry in the request tracker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackerEntry {
    /// Title as recorded by the tracker, when it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Tracker-side lifecycle status code; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
}

/// Payload for an acquisition submission, already resolved to concrete
/// profile ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddItem {
    pub title: String,
    pub catalog_id: u32,
    pub quality_profile_id: i64,
    pub root_folder_path: String,
    /// Sonarr only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_profile_id: Option<i64>,
    /// Sonarr only; resolved via the catalog's external-ids lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb_id: Option<i64>,
}

/// Raw classification material from an acquisition submission.
///
/// A reply that echoes the submitted title means the item was created;
/// error strings are matched for the provider's duplicate marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitReply {
    pub title: Option<String>,
    pub errors: Vec<String>,
}
