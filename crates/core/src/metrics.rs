//! Prometheus metrics for core components.
//!
//! This module provides counters for:
//! - Cascade outcomes (which stage resolved a query)
//! - Acquisition attempts by service and result
//! - Friend request outcomes

use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts, Registry};

/// Global metrics registry, exposed by the bot's /metrics endpoint.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Cascade runs by resolving stage ("library", "streaming", "tracker",
/// "not_found").
pub static CASCADE_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("reelbot_cascade_outcomes_total", "Cascade runs by outcome"),
        &["stage"],
    )
    .unwrap()
});

/// Acquisition attempts by service and classified result.
pub static ACQUISITION_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reelbot_acquisition_attempts_total",
            "Acquisition attempts by service and result",
        ),
        &["service", "result"],
    )
    .unwrap()
});

/// Friend requests by terminal outcome.
pub static FRIEND_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reelbot_friend_requests_total",
            "Friend requests by terminal outcome",
        ),
        &["outcome"],
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(CASCADE_OUTCOMES.clone()))
        .expect("register cascade outcomes");
    registry
        .register(Box::new(ACQUISITION_ATTEMPTS.clone()))
        .expect("register acquisition attempts");
    registry
        .register(Box::new(FRIEND_REQUESTS.clone()))
        .expect("register friend requests");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_gathers_after_increment() {
        CASCADE_OUTCOMES.with_label_values(&["library"]).inc();
        let families = REGISTRY.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "reelbot_cascade_outcomes_total"));
    }
}
