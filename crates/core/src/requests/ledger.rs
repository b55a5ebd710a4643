//! In-memory daily rate limiting for friend requests.
//!
//! Intentionally non-durable: the ledger restarts empty with the process.
//! Wall-clock access goes through the `Clock` trait so the window logic
//! is testable without sleeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Time source for the ledger.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Per-requester request timestamps over a rolling window.
///
/// Entries older than the window are pruned lazily on each check; empty
/// requesters are dropped entirely. A single coarse lock is plenty at
/// human request rates.
pub struct RateLimitLedger {
    window: Duration,
    max_requests: usize,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<i64, Vec<DateTime<Utc>>>>,
}

impl RateLimitLedger {
    /// Default policy: 3 requests per rolling 24 hours.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(clock, Duration::hours(24), 3)
    }

    pub fn with_policy(clock: Arc<dyn Clock>, window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Prune, then report whether `requester` may make another request.
    /// Does not consume a slot.
    pub fn check(&self, requester: i64) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("ledger poisoned");
        Self::prune(&mut entries, now, self.window);
        entries
            .get(&requester)
            .map(|stamps| stamps.len() < self.max_requests)
            .unwrap_or(true)
    }

    /// Consume a slot for `requester`.
    ///
    /// Called only once a request is confirmed non-trivial, so free
    /// outcomes (already in library, no results) never count.
    pub fn record(&self, requester: i64) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("ledger poisoned");
        entries.entry(requester).or_default().push(now);
    }

    fn prune(entries: &mut HashMap<i64, Vec<DateTime<Utc>>>, now: DateTime<Utc>, window: Duration) {
        entries.retain(|_, stamps| {
            stamps.retain(|stamp| now - *stamp < window);
            !stamps.is_empty()
        });
    }

    #[cfg(test)]
    fn tracked_requesters(&self) -> usize {
        self.entries.lock().expect("ledger poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;

    fn ledger_with_clock() -> (RateLimitLedger, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let ledger = RateLimitLedger::new(clock.clone());
        (ledger, clock)
    }

    #[test]
    fn test_fresh_requester_is_allowed() {
        let (ledger, _clock) = ledger_with_clock();
        assert!(ledger.check(555));
    }

    #[test]
    fn test_fourth_request_within_window_rejected() {
        let (ledger, _clock) = ledger_with_clock();
        for _ in 0..3 {
            assert!(ledger.check(555));
            ledger.record(555);
        }
        assert!(!ledger.check(555));
    }

    #[test]
    fn test_expired_stamps_free_the_quota() {
        let (ledger, clock) = ledger_with_clock();
        for _ in 0..3 {
            ledger.record(555);
        }
        assert!(!ledger.check(555));

        clock.advance(Duration::hours(25));
        assert!(ledger.check(555));
    }

    #[test]
    fn test_boundary_stamp_still_counts_just_inside_window() {
        let (ledger, clock) = ledger_with_clock();
        ledger.record(555);
        ledger.record(555);
        ledger.record(555);

        // 23h59m later the three stamps are still inside the window.
        clock.advance(Duration::hours(23) + Duration::minutes(59));
        assert!(!ledger.check(555));
    }

    #[test]
    fn test_requesters_are_independent() {
        let (ledger, _clock) = ledger_with_clock();
        for _ in 0..3 {
            ledger.record(555);
        }
        assert!(!ledger.check(555));
        assert!(ledger.check(777));
    }

    #[test]
    fn test_prune_drops_empty_requesters() {
        let (ledger, clock) = ledger_with_clock();
        ledger.record(555);
        ledger.record(777);
        assert_eq!(ledger.tracked_requesters(), 2);

        clock.advance(Duration::hours(25));
        ledger.check(1);
        assert_eq!(ledger.tracked_requesters(), 0);
    }
}
