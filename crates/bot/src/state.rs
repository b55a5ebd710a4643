//! Shared application state for the dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use teloxide::Bot;
use tokio::sync::RwLock;
use tracing::info;

use reelbot_core::{
    AcquisitionService, AcquisitionTrigger, AvailabilityResolver, CatalogEntry, CatalogService,
    Config, FriendRequestWorkflow, LibraryService, MediaKind, OverseerrClient, PlexClient,
    ProviderError, RadarrClient, RateLimitLedger, RequestTracker, SonarrClient, SystemClock,
    TmdbClient,
};

use crate::notifier::TelegramNotifier;

/// Per-chat search result navigation state.
#[derive(Debug, Clone)]
pub struct SearchSession {
    pub kind: MediaKind,
    pub results: Vec<CatalogEntry>,
    pub index: usize,
    /// Message id of the card currently shown, so navigation can replace it.
    pub card_message_id: Option<i32>,
}

/// Everything the handlers need, built once from a config snapshot.
pub struct AppState {
    pub config: Arc<Config>,
    pub library: Option<Arc<dyn LibraryService>>,
    pub catalog: Option<Arc<dyn CatalogService>>,
    pub tracker: Option<Arc<dyn RequestTracker>>,
    pub resolver: Arc<AvailabilityResolver>,
    pub trigger: Arc<AcquisitionTrigger>,
    pub workflow: Arc<FriendRequestWorkflow>,
    pub sessions: RwLock<HashMap<i64, SearchSession>>,
    /// Client for poster downloads.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Arc<Config>, bot: Bot) -> Self {
        let library = build_adapter("plex", PlexClient::new(config.plex.clone()))
            .map(|c| c as Arc<dyn LibraryService>);
        let catalog = build_adapter("tmdb", TmdbClient::new(config.tmdb.clone()))
            .map(|c| c as Arc<dyn CatalogService>);
        let tracker = build_adapter("overseerr", OverseerrClient::new(config.overseerr.clone()))
            .map(|c| c as Arc<dyn RequestTracker>);
        let movies = build_adapter("radarr", RadarrClient::new(config.radarr.clone()))
            .map(|c| c as Arc<dyn AcquisitionService>);
        let shows = build_adapter("sonarr", SonarrClient::new(config.sonarr.clone()))
            .map(|c| c as Arc<dyn AcquisitionService>);

        let resolver = Arc::new(AvailabilityResolver::new(
            library.clone(),
            catalog.clone(),
            tracker.clone(),
            &config,
        ));
        let trigger = Arc::new(AcquisitionTrigger::new(
            movies,
            shows,
            catalog.clone(),
            config.clone(),
        ));
        let ledger = Arc::new(RateLimitLedger::new(Arc::new(SystemClock)));
        let notifier = Arc::new(TelegramNotifier::new(bot));
        let workflow = Arc::new(FriendRequestWorkflow::new(
            catalog.clone(),
            resolver.clone(),
            trigger.clone(),
            ledger,
            notifier,
            &config,
        ));

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            library,
            catalog,
            tracker,
            resolver,
            trigger,
            workflow,
            sessions: RwLock::new(HashMap::new()),
            http,
        }
    }
}

/// An unconfigured section is a quiet miss, not a startup failure.
fn build_adapter<T>(section: &str, result: Result<T, ProviderError>) -> Option<Arc<T>> {
    match result {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            info!("{} adapter disabled: {}", section, e);
            None
        }
    }
}
