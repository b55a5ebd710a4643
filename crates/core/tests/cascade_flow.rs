//! Availability cascade and acquisition trigger integration tests.
//!
//! These verify the fixed stage order, the short-circuit behavior and
//! the trigger's classification against mocked adapters.

use std::sync::Arc;

use reelbot_core::testing::{fixtures, MockAcquisition, MockCatalog, MockLibrary, MockTracker};
use reelbot_core::{
    AcquisitionOutcome, AcquisitionService, AcquisitionTrigger, Availability,
    AvailabilityResolver, CatalogService, Config, LibraryService, QualityTier, RequestTracker,
};

/// All mocked adapters plus the config they are wired with.
struct TestHarness {
    library: Arc<MockLibrary>,
    catalog: Arc<MockCatalog>,
    tracker: Arc<MockTracker>,
    movies: Arc<MockAcquisition>,
    shows: Arc<MockAcquisition>,
    config: Arc<Config>,
}

impl TestHarness {
    fn new() -> Self {
        let mut config = Config::default();
        config.subscribed_services = vec!["nfx".to_string(), "max".to_string()];
        config.radarr.url = "http://radarr:7878".to_string();
        config.radarr.api_key = "key".to_string();
        config.radarr.quality_profile_id = "4".to_string();
        config.radarr.root_folder_path = "/movies".to_string();
        config.sonarr.url = "http://sonarr:8989".to_string();
        config.sonarr.api_key = "key".to_string();
        config.sonarr.quality_profile_id = "6".to_string();
        config.sonarr.root_folder_path = "/shows".to_string();

        Self {
            library: Arc::new(MockLibrary::new()),
            catalog: Arc::new(MockCatalog::new()),
            tracker: Arc::new(MockTracker::new()),
            movies: Arc::new(MockAcquisition::movies()),
            shows: Arc::new(MockAcquisition::shows()),
            config: Arc::new(config),
        }
    }

    fn resolver(&self) -> AvailabilityResolver {
        AvailabilityResolver::new(
            Some(self.library.clone() as Arc<dyn LibraryService>),
            Some(self.catalog.clone() as Arc<dyn CatalogService>),
            Some(self.tracker.clone() as Arc<dyn RequestTracker>),
            &self.config,
        )
    }

    fn trigger(&self) -> AcquisitionTrigger {
        AcquisitionTrigger::new(
            Some(self.movies.clone() as Arc<dyn AcquisitionService>),
            Some(self.shows.clone() as Arc<dyn AcquisitionService>),
            Some(self.catalog.clone() as Arc<dyn CatalogService>),
            self.config.clone(),
        )
    }
}

#[tokio::test]
async fn library_hit_short_circuits_later_stages() {
    let harness = TestHarness::new();
    harness
        .library
        .add_item(fixtures::library_item("Arrival", 2016, true))
        .await;
    // Both later stages would also match; they must never be consulted.
    harness
        .catalog
        .set_watch_providers(329865, vec!["Netflix".to_string()])
        .await;
    harness
        .tracker
        .add_entry(329865, fixtures::tracker_entry("Arrival"))
        .await;

    let result = harness
        .resolver()
        .verify(&fixtures::media_query("Arrival", 2016, 329865))
        .await;

    assert!(matches!(result, Availability::FoundInLibrary { .. }));
    assert_eq!(harness.catalog.watch_provider_calls().await, 0);
    assert_eq!(harness.tracker.lookup_calls().await, 0);
}

#[tokio::test]
async fn streaming_match_wins_over_tracker_match() {
    let harness = TestHarness::new();
    harness
        .catalog
        .set_watch_providers(329865, vec!["Netflix".to_string()])
        .await;
    harness
        .tracker
        .add_entry(329865, fixtures::tracker_entry("Arrival"))
        .await;

    let result = harness
        .resolver()
        .verify(&fixtures::media_query("Arrival", 2016, 329865))
        .await;

    assert_eq!(
        result,
        Availability::FoundOnStreaming {
            providers: vec!["Netflix".to_string()]
        }
    );
    assert_eq!(harness.tracker.lookup_calls().await, 0);
}

#[tokio::test]
async fn streaming_names_matched_through_subscriptions_only() {
    let harness = TestHarness::new();
    harness
        .catalog
        .set_watch_providers(
            329865,
            vec![
                "HBO Max".to_string(),
                "Hulu".to_string(),
                "Netflix Standard with Ads".to_string(),
            ],
        )
        .await;

    let result = harness
        .resolver()
        .verify(&fixtures::media_query("Arrival", 2016, 329865))
        .await;

    // Subscribed to nfx and max; Hulu is filtered out.
    assert_eq!(
        result,
        Availability::FoundOnStreaming {
            providers: vec!["HBO Max".to_string(), "Netflix Standard with Ads".to_string()]
        }
    );
}

#[tokio::test]
async fn clean_not_found_path_submits_for_admin() {
    let harness = TestHarness::new();
    let query = fixtures::media_query("Arrival", 2016, 329865);

    let result = harness.resolver().verify(&query).await;
    assert_eq!(result, Availability::NotFound);

    let outcome = harness.trigger().acquire(&query, QualityTier::Standard).await;
    assert_eq!(outcome, AcquisitionOutcome::Submitted);

    let submissions = harness.movies.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].title, "Arrival");
    assert_eq!(submissions[0].catalog_id, 329865);
    assert_eq!(submissions[0].quality_profile_id, 4);
    assert_eq!(submissions[0].root_folder_path, "/movies");
    assert_eq!(submissions[0].tvdb_id, None);
}

#[tokio::test]
async fn duplicate_add_is_idempotent() {
    let harness = TestHarness::new();
    let trigger = harness.trigger();
    let query = fixtures::media_query("Arrival", 2016, 329865);

    let first = trigger.acquire(&query, QualityTier::Standard).await;
    let second = trigger.acquire(&query, QualityTier::Standard).await;

    assert_eq!(first, AcquisitionOutcome::Submitted);
    assert_eq!(second, AcquisitionOutcome::AlreadyPresent);
    // The duplicate is caught before submission.
    assert_eq!(harness.movies.submissions().await.len(), 1);
}

#[tokio::test]
async fn already_managed_item_is_not_resubmitted() {
    let harness = TestHarness::new();
    harness.movies.add_existing(329865).await;

    let outcome = harness
        .trigger()
        .acquire(&fixtures::media_query("Arrival", 2016, 329865), QualityTier::Standard)
        .await;

    assert_eq!(outcome, AcquisitionOutcome::AlreadyPresent);
    assert_eq!(harness.movies.submissions().await.len(), 0);
}

#[tokio::test]
async fn missing_cross_reference_blocks_show_submission() {
    let harness = TestHarness::new();
    harness.catalog.set_tvdb_id(1399, None).await;

    let outcome = harness
        .trigger()
        .acquire(
            &fixtures::show_query("Game of Thrones", 2011, 1399),
            QualityTier::Standard,
        )
        .await;

    assert_eq!(outcome, AcquisitionOutcome::MissingCrossReference);
    assert_eq!(harness.shows.submissions().await.len(), 0);
}

#[tokio::test]
async fn show_submission_carries_resolved_tvdb_id() {
    let harness = TestHarness::new();
    harness.catalog.set_tvdb_id(1399, Some(121361)).await;

    let outcome = harness
        .trigger()
        .acquire(
            &fixtures::show_query("Game of Thrones", 2011, 1399),
            QualityTier::Standard,
        )
        .await;

    assert_eq!(outcome, AcquisitionOutcome::Submitted);
    let submissions = harness.shows.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].tvdb_id, Some(121361));
    assert_eq!(submissions[0].language_profile_id, Some(1));
}

#[tokio::test]
async fn failed_library_stage_degrades_to_streaming() {
    let harness = TestHarness::new();
    harness.library.fail_next("plex unreachable").await;
    harness
        .catalog
        .set_watch_providers(329865, vec!["Netflix".to_string()])
        .await;

    let result = harness
        .resolver()
        .verify(&fixtures::media_query("Arrival", 2016, 329865))
        .await;

    assert!(matches!(result, Availability::FoundOnStreaming { .. }));
}

#[tokio::test]
async fn all_stages_failing_is_a_plain_not_found() {
    let harness = TestHarness::new();
    harness.library.fail_next("plex down").await;
    harness.catalog.fail_next("tmdb down").await;
    harness.tracker.fail_next("overseerr down").await;

    let result = harness
        .resolver()
        .verify(&fixtures::media_query("Arrival", 2016, 329865))
        .await;

    assert_eq!(result, Availability::NotFound);
}

#[tokio::test]
async fn transport_failure_on_submit_is_classified_as_failed() {
    let harness = TestHarness::new();
    harness.movies.fail_next_submit("connection reset").await;

    let outcome = harness
        .trigger()
        .acquire(&fixtures::media_query("Arrival", 2016, 329865), QualityTier::Standard)
        .await;

    match outcome {
        AcquisitionOutcome::Failed { reason } => assert!(reason.contains("connection reset")),
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn failed_existing_lookup_still_submits() {
    let harness = TestHarness::new();
    harness.movies.fail_next_lookup("timeout").await;

    let outcome = harness
        .trigger()
        .acquire(&fixtures::media_query("Arrival", 2016, 329865), QualityTier::Standard)
        .await;

    assert_eq!(outcome, AcquisitionOutcome::Submitted);
    assert_eq!(harness.movies.submissions().await.len(), 1);
}
