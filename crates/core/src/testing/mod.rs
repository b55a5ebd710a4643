//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of all external service
//! traits, so the cascade, the trigger and the friend workflow can be
//! exercised end to end without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelbot_core::testing::{fixtures, MockCatalog, MockLibrary, MockTracker};
//!
//! let library = MockLibrary::new();
//! library.add_item(fixtures::library_item("Arrival", 2016, true)).await;
//!
//! // Build a resolver over the mocks and assert on recorded calls...
//! ```

mod mock_acquisition;
mod mock_catalog;
mod mock_library;
mod mock_notifier;
mod mock_tracker;

pub use mock_acquisition::MockAcquisition;
pub use mock_catalog::{MockCatalog, RecordedCatalogCall};
pub use mock_library::MockLibrary;
pub use mock_notifier::{MockNotifier, RecordedRewrite};
pub use mock_tracker::MockTracker;

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::requests::Clock;

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
        }
    }
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("manual clock poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("manual clock poisoned")
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::media::{MediaKind, MediaQuery};
    use crate::providers::{CatalogEntry, LibraryItem, TrackerEntry};

    /// A movie query with reasonable defaults.
    pub fn media_query(title: &str, year: i32, catalog_id: u32) -> MediaQuery {
        MediaQuery {
            title: title.to_string(),
            year: Some(year),
            catalog_id,
            kind: MediaKind::Movie,
        }
    }

    /// A show query with reasonable defaults.
    pub fn show_query(title: &str, year: i32, catalog_id: u32) -> MediaQuery {
        MediaQuery {
            kind: MediaKind::Show,
            ..media_query(title, year, catalog_id)
        }
    }

    /// A library item served by "home-plex".
    pub fn library_item(title: &str, year: i32, has_media: bool) -> LibraryItem {
        LibraryItem {
            title: title.to_string(),
            year: Some(year),
            has_media,
            server_name: "home-plex".to_string(),
        }
    }

    /// A catalog entry with overview and poster.
    pub fn catalog_entry(title: &str, year: i32, catalog_id: u32) -> CatalogEntry {
        CatalogEntry {
            id: catalog_id,
            title: title.to_string(),
            year: Some(year),
            overview: Some(format!("A story about {}.", title.to_lowercase())),
            poster_path: Some("/poster.jpg".to_string()),
        }
    }

    /// A tracker entry with a recorded title.
    pub fn tracker_entry(title: &str) -> TrackerEntry {
        TrackerEntry {
            title: Some(title.to_string()),
            status: Some(1),
        }
    }
}
