//! Friend request workflow integration tests.
//!
//! Cover the quota rules, the reduced library-only check, the admin
//! forward and both sides of the decision path against mocked adapters.

use std::sync::Arc;

use chrono::Duration;

use reelbot_core::testing::{
    fixtures, ManualClock, MockAcquisition, MockCatalog, MockLibrary, MockNotifier, MockTracker,
};
use reelbot_core::{
    AcquisitionOutcome, AcquisitionService, AcquisitionTrigger, ApprovalAction, ApprovalToken,
    AvailabilityResolver, CatalogService, Config, DecisionOutcome, FriendRequestWorkflow,
    LibraryService, MediaKind, QualityTier, RateLimitLedger, RequestReception, RequestTracker,
};

const ADMIN_ID: i64 = 42;
const FRIEND_ID: i64 = 555;
const ADMIN_MSG_ID: i32 = 9001;

struct TestHarness {
    library: Arc<MockLibrary>,
    catalog: Arc<MockCatalog>,
    movies: Arc<MockAcquisition>,
    shows: Arc<MockAcquisition>,
    notifier: Arc<MockNotifier>,
    clock: Arc<ManualClock>,
    config: Arc<Config>,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_admin(Some(ADMIN_ID))
    }

    fn with_admin(admin_user_id: Option<i64>) -> Self {
        let mut config = Config::default();
        config.admin_user_id = admin_user_id;
        config.friend_user_ids = vec![FRIEND_ID];
        config.radarr.url = "http://radarr:7878".to_string();
        config.radarr.api_key = "key".to_string();
        config.radarr.quality_profile_id = "4".to_string();
        config.radarr.root_folder_path = "/movies".to_string();
        config.radarr.quality_profile_id_4k = "9".to_string();
        config.radarr.root_folder_path_4k = "/movies-4k".to_string();
        config.sonarr.url = "http://sonarr:8989".to_string();
        config.sonarr.api_key = "key".to_string();
        config.sonarr.quality_profile_id = "6".to_string();
        config.sonarr.root_folder_path = "/shows".to_string();

        Self {
            library: Arc::new(MockLibrary::new()),
            catalog: Arc::new(MockCatalog::new()),
            movies: Arc::new(MockAcquisition::movies()),
            shows: Arc::new(MockAcquisition::shows()),
            notifier: Arc::new(MockNotifier::new()),
            clock: Arc::new(ManualClock::default()),
            config: Arc::new(config),
        }
    }

    fn workflow(&self) -> FriendRequestWorkflow {
        let resolver = Arc::new(AvailabilityResolver::new(
            Some(self.library.clone() as Arc<dyn LibraryService>),
            Some(self.catalog.clone() as Arc<dyn CatalogService>),
            None::<Arc<dyn RequestTracker>>,
            &self.config,
        ));
        let trigger = Arc::new(AcquisitionTrigger::new(
            Some(self.movies.clone() as Arc<dyn AcquisitionService>),
            Some(self.shows.clone() as Arc<dyn AcquisitionService>),
            Some(self.catalog.clone() as Arc<dyn CatalogService>),
            self.config.clone(),
        ));
        let ledger = Arc::new(RateLimitLedger::new(self.clock.clone()));
        FriendRequestWorkflow::new(
            Some(self.catalog.clone() as Arc<dyn CatalogService>),
            resolver,
            trigger,
            ledger,
            self.notifier.clone(),
            &self.config,
        )
    }
}

#[tokio::test]
async fn fourth_request_in_a_day_is_rate_limited_without_a_search() {
    let harness = TestHarness::new();
    harness
        .catalog
        .add_entry(fixtures::catalog_entry("Arrival", 2016, 329865))
        .await;
    let workflow = harness.workflow();

    for _ in 0..3 {
        let reception = workflow
            .handle_request(FRIEND_ID, "Ana", MediaKind::Movie, "Arrival")
            .await;
        assert!(matches!(reception, RequestReception::Forwarded { .. }));
    }

    let searches_before = harness.catalog.search_calls().await;
    let reception = workflow
        .handle_request(FRIEND_ID, "Ana", MediaKind::Movie, "Arrival")
        .await;

    assert_eq!(reception, RequestReception::RateLimited);
    // The cheapest rejection path: no catalog lookup happened.
    assert_eq!(harness.catalog.search_calls().await, searches_before);
}

#[tokio::test]
async fn quota_frees_up_after_the_window_passes() {
    let harness = TestHarness::new();
    harness
        .catalog
        .add_entry(fixtures::catalog_entry("Arrival", 2016, 329865))
        .await;
    let workflow = harness.workflow();

    for _ in 0..3 {
        workflow
            .handle_request(FRIEND_ID, "Ana", MediaKind::Movie, "Arrival")
            .await;
    }
    assert_eq!(
        workflow
            .handle_request(FRIEND_ID, "Ana", MediaKind::Movie, "Arrival")
            .await,
        RequestReception::RateLimited
    );

    harness.clock.advance(Duration::hours(25));
    let reception = workflow
        .handle_request(FRIEND_ID, "Ana", MediaKind::Movie, "Arrival")
        .await;
    assert!(matches!(reception, RequestReception::Forwarded { .. }));
}

#[tokio::test]
async fn library_hits_never_consume_quota() {
    let harness = TestHarness::new();
    harness
        .catalog
        .add_entry(fixtures::catalog_entry("Arrival", 2016, 329865))
        .await;
    harness
        .library
        .add_item(fixtures::library_item("Arrival", 2016, true))
        .await;
    let workflow = harness.workflow();

    for _ in 0..5 {
        let reception = workflow
            .handle_request(FRIEND_ID, "Ana", MediaKind::Movie, "Arrival")
            .await;
        assert_eq!(
            reception,
            RequestReception::AlreadyInLibrary {
                title: "Arrival".to_string(),
                server_name: "home-plex".to_string(),
            }
        );
    }
}

#[tokio::test]
async fn zero_catalog_results_do_not_consume_quota() {
    let harness = TestHarness::new();
    harness
        .catalog
        .add_entry(fixtures::catalog_entry("Arrival", 2016, 329865))
        .await;
    let workflow = harness.workflow();

    for _ in 0..5 {
        let reception = workflow
            .handle_request(FRIEND_ID, "Ana", MediaKind::Movie, "Nonexistent Film")
            .await;
        assert_eq!(reception, RequestReception::NoResults);
    }

    // The quota is untouched; a real request still goes through.
    let reception = workflow
        .handle_request(FRIEND_ID, "Ana", MediaKind::Movie, "Arrival")
        .await;
    assert!(matches!(reception, RequestReception::Forwarded { .. }));
}

#[tokio::test]
async fn forwarded_prompt_carries_three_decodable_actions() {
    let harness = TestHarness::new();
    harness
        .catalog
        .add_entry(fixtures::catalog_entry("Arrival", 2016, 329865))
        .await;

    let reception = harness
        .workflow()
        .handle_request(FRIEND_ID, "Ana", MediaKind::Movie, "Arrival")
        .await;
    assert_eq!(
        reception,
        RequestReception::Forwarded {
            title: "Arrival".to_string()
        }
    );

    let prompts = harness.notifier.sent_prompts().await;
    assert_eq!(prompts.len(), 1);
    let (chat_id, prompt) = &prompts[0];
    assert_eq!(*chat_id, ADMIN_ID);
    assert!(prompt.caption.contains("Arrival (2016)"));
    assert!(prompt.caption.contains("Ana"));
    assert_eq!(
        prompt.poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/poster.jpg")
    );
    assert_eq!(prompt.actions.len(), 3);

    let tokens: Vec<ApprovalToken> = prompt
        .actions
        .iter()
        .map(|a| ApprovalToken::decode(&a.token).unwrap())
        .collect();
    assert_eq!(
        tokens[0].action,
        ApprovalAction::Approve(QualityTier::Standard)
    );
    assert_eq!(
        tokens[1].action,
        ApprovalAction::Approve(QualityTier::UltraHd)
    );
    assert_eq!(tokens[2].action, ApprovalAction::Decline);
    for token in &tokens {
        assert_eq!(token.catalog_id, 329865);
        assert_eq!(token.requester, FRIEND_ID);
        assert_eq!(token.kind, MediaKind::Movie);
    }

    // The requester gets no direct notification from the workflow here;
    // the caller-facing layer renders the "request sent" reply.
    assert!(harness.notifier.sent_texts().await.is_empty());
}

#[tokio::test]
async fn missing_admin_rejects_before_consuming_quota() {
    let harness = TestHarness::with_admin(None);
    harness
        .catalog
        .add_entry(fixtures::catalog_entry("Arrival", 2016, 329865))
        .await;
    let workflow = harness.workflow();

    for _ in 0..5 {
        let reception = workflow
            .handle_request(FRIEND_ID, "Ana", MediaKind::Movie, "Arrival")
            .await;
        assert_eq!(reception, RequestReception::AdminNotConfigured);
    }
    assert!(harness.notifier.sent_prompts().await.is_empty());
}

#[tokio::test]
async fn decline_notifies_requester_and_skips_acquisition() {
    let harness = TestHarness::new();
    harness
        .catalog
        .add_entry(fixtures::catalog_entry("Game of Thrones", 2011, 1399))
        .await;

    let token = ApprovalToken {
        action: ApprovalAction::Decline,
        kind: MediaKind::Show,
        catalog_id: 1399,
        requester: FRIEND_ID,
    };
    let outcome = harness
        .workflow()
        .handle_decision(&token, ADMIN_ID, ADMIN_MSG_ID, "request card")
        .await;

    assert_eq!(
        outcome,
        DecisionOutcome::Declined {
            title: "Game of Thrones".to_string()
        }
    );

    // No acquisition call of any kind.
    assert!(harness.shows.submissions().await.is_empty());
    assert!(harness.movies.submissions().await.is_empty());

    // The admin card was rewritten in place.
    let rewrites = harness.notifier.rewrites().await;
    assert_eq!(rewrites.len(), 1);
    assert_eq!(rewrites[0].chat_id, ADMIN_ID);
    assert_eq!(rewrites[0].message_id, ADMIN_MSG_ID);
    assert!(rewrites[0].text.starts_with("request card"));
    assert!(rewrites[0].text.contains("Declined"));

    // The requester heard about it exactly once.
    let texts = harness.notifier.sent_texts().await;
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].0, FRIEND_ID);
    assert!(texts[0].1.contains("declined"));
}

#[tokio::test]
async fn approval_runs_the_trigger_and_notifies_requester() {
    let harness = TestHarness::new();
    harness
        .catalog
        .add_entry(fixtures::catalog_entry("Arrival", 2016, 329865))
        .await;

    let token = ApprovalToken {
        action: ApprovalAction::Approve(QualityTier::Standard),
        kind: MediaKind::Movie,
        catalog_id: 329865,
        requester: FRIEND_ID,
    };
    let outcome = harness
        .workflow()
        .handle_decision(&token, ADMIN_ID, ADMIN_MSG_ID, "request card")
        .await;

    assert_eq!(
        outcome,
        DecisionOutcome::Approved {
            title: "Arrival".to_string(),
            outcome: AcquisitionOutcome::Submitted,
        }
    );

    let submissions = harness.movies.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].quality_profile_id, 4);

    let rewrites = harness.notifier.rewrites().await;
    assert_eq!(rewrites.len(), 1);
    assert!(rewrites[0].text.contains("Radarr"));

    let texts = harness.notifier.sent_texts().await;
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].0, FRIEND_ID);
    assert!(texts[0].1.contains("approved"));
}

#[tokio::test]
async fn ultra_hd_approval_uses_the_4k_pair() {
    let harness = TestHarness::new();
    harness
        .catalog
        .add_entry(fixtures::catalog_entry("Arrival", 2016, 329865))
        .await;

    let token = ApprovalToken {
        action: ApprovalAction::Approve(QualityTier::UltraHd),
        kind: MediaKind::Movie,
        catalog_id: 329865,
        requester: FRIEND_ID,
    };
    harness
        .workflow()
        .handle_decision(&token, ADMIN_ID, ADMIN_MSG_ID, "request card")
        .await;

    let submissions = harness.movies.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].quality_profile_id, 9);
    assert_eq!(submissions[0].root_folder_path, "/movies-4k");
}

#[tokio::test]
async fn unfetchable_details_fail_safely() {
    let harness = TestHarness::new();
    // No entry with this id exists in the mock catalog.
    let token = ApprovalToken {
        action: ApprovalAction::Approve(QualityTier::Standard),
        kind: MediaKind::Movie,
        catalog_id: 777,
        requester: FRIEND_ID,
    };
    let outcome = harness
        .workflow()
        .handle_decision(&token, ADMIN_ID, ADMIN_MSG_ID, "request card")
        .await;

    assert_eq!(outcome, DecisionOutcome::DetailsUnavailable);
    assert!(harness.movies.submissions().await.is_empty());
    // Admin card updated, requester informed once.
    assert_eq!(harness.notifier.rewrites().await.len(), 1);
    assert_eq!(harness.notifier.sent_texts().await.len(), 1);
}

#[tokio::test]
async fn undeliverable_prompt_is_reported_as_forward_failure() {
    let harness = TestHarness::new();
    harness
        .catalog
        .add_entry(fixtures::catalog_entry("Arrival", 2016, 329865))
        .await;
    harness.notifier.set_fail_all(true).await;

    let reception = harness
        .workflow()
        .handle_request(FRIEND_ID, "Ana", MediaKind::Movie, "Arrival")
        .await;

    assert_eq!(reception, RequestReception::ForwardFailed);
}
