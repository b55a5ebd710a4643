pub mod acquire;
pub mod config;
pub mod media;
pub mod metrics;
pub mod notify;
pub mod providers;
pub mod requests;
pub mod resolver;
pub mod session;
pub mod testing;
pub mod texts;

pub use acquire::AcquisitionTrigger;
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError, ConfigStore};
pub use media::{AcquisitionOutcome, Availability, MediaKind, MediaQuery, QualityTier};
pub use notify::{ApprovalButton, ApprovalPrompt, Notifier, NotifyError};
pub use providers::{
    poster_url, AcquisitionService, AddItem, CatalogEntry, CatalogService, ExternalIds,
    LibraryItem, LibraryService, OverseerrClient, PlexClient, ProviderError, RadarrClient,
    RequestTracker, SonarrClient, SubmitReply, TmdbClient, TrackerEntry,
};
pub use requests::{
    ApprovalAction, ApprovalToken, Clock, DecisionOutcome, FriendRequestWorkflow,
    RateLimitLedger, RequestReception, SystemClock, TokenError,
};
pub use resolver::AvailabilityResolver;
pub use session::{authenticate, require_admin, AccessDenied, Caller, Role};
pub use texts::Lang;
