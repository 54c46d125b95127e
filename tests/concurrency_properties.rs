//! Concurrency properties of the discovery engine under synthetic load.
//!
//! The fetcher here never touches the network; it records in-flight counts,
//! injects failures and lets the tests observe slot usage directly.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cam_core::discovery::{
    BackoffPolicy, DiscoveryEngine, FetchError, FetchOutcome, ItemFetcher,
};

const CONCURRENCY: usize = 4;

/// Synthetic fetcher: ids divisible by 3 have a locked achievement, ids
/// divisible by 7 fail their first attempt with an undecodable body.
#[derive(Default)]
struct SyntheticFetcher {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
    failed_once: Mutex<HashSet<u64>>,
}

impl SyntheticFetcher {
    fn qualifies(app_id: u64) -> bool {
        app_id % 3 == 0
    }
}

#[async_trait]
impl ItemFetcher for SyntheticFetcher {
    async fn fetch(&self, app_id: u64) -> Result<FetchOutcome, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(1)).await;

        let first_failure = app_id % 7 == 0
            && self
                .failed_once
                .lock()
                .map(|mut seen| seen.insert(app_id))
                .unwrap_or(false);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if first_failure {
            let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
            return Err(FetchError::decode(app_id, 200, source));
        }

        let unsatisfied = usize::from(Self::qualifies(app_id));
        Ok(FetchOutcome {
            app_id,
            total: 2,
            unsatisfied,
        })
    }
}

fn fast_backoff() -> BackoffPolicy {
    BackoffPolicy::new(Duration::from_millis(3), Duration::from_millis(1))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_thousand_entries_complete_without_lost_updates() {
    let catalog: Vec<u64> = (1..=1000).collect();
    let fetcher = Arc::new(SyntheticFetcher::default());
    let engine = DiscoveryEngine::new(CONCURRENCY, fast_backoff()).unwrap();

    let report = engine.run(&catalog, fetcher.clone()).await.unwrap();

    let expected: HashSet<u64> = catalog
        .iter()
        .copied()
        .filter(|&id| SyntheticFetcher::qualifies(id))
        .collect();
    assert_eq!(report.qualified().len(), 333);
    assert_eq!(report.qualified(), &expected);

    let failures = catalog.iter().filter(|&&id| id % 7 == 0).count();
    let summary = report.summary();
    assert_eq!(summary.completed, 1000);
    assert_eq!(summary.qualified, 333);
    assert_eq!(summary.failed_attempts, failures);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1000 + failures);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_in_flight_lookups_never_exceed_limit() {
    let catalog: Vec<u64> = (1..=1000).collect();
    let fetcher = Arc::new(SyntheticFetcher::default());
    let engine = DiscoveryEngine::new(CONCURRENCY, fast_backoff()).unwrap();

    engine.run(&catalog, fetcher.clone()).await.unwrap();

    let peak = fetcher.peak.load(Ordering::SeqCst);
    assert!(peak <= CONCURRENCY, "peak {peak} exceeded {CONCURRENCY}");
    assert_eq!(peak, CONCURRENCY, "load should saturate every slot");
    assert_eq!(fetcher.in_flight.load(Ordering::SeqCst), 0);
}

/// Fails one entry once with a long backoff; records completion order.
struct OrderRecorder {
    slow_id: u64,
    failed: AtomicUsize,
    completed: Mutex<Vec<u64>>,
}

#[async_trait]
impl ItemFetcher for OrderRecorder {
    async fn fetch(&self, app_id: u64) -> Result<FetchOutcome, FetchError> {
        if app_id == self.slow_id && self.failed.fetch_add(1, Ordering::SeqCst) == 0 {
            let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
            return Err(FetchError::decode(app_id, 200, source));
        }
        if let Ok(mut completed) = self.completed.lock() {
            completed.push(app_id);
        }
        Ok(FetchOutcome {
            app_id,
            total: 1,
            unsatisfied: 0,
        })
    }
}

#[tokio::test]
async fn test_backoff_sleep_releases_slot() {
    let fetcher = Arc::new(OrderRecorder {
        slow_id: 1,
        failed: AtomicUsize::new(0),
        completed: Mutex::new(Vec::new()),
    });
    // One slot: if the sleeping entry kept it, entries 2 and 3 would wait 200ms behind it
    let engine = DiscoveryEngine::new(
        1,
        BackoffPolicy::new(Duration::from_millis(200), Duration::from_millis(200)),
    )
    .unwrap();

    let report = engine.run(&[1, 2, 3], fetcher.clone()).await.unwrap();

    assert_eq!(report.summary().completed, 3);
    let completed = fetcher.completed.lock().unwrap().clone();
    assert_eq!(completed.last(), Some(&1), "order was {completed:?}");
}

/// Always fails; with the default unbounded policy the run never finishes.
struct AlwaysFailing;

#[async_trait]
impl ItemFetcher for AlwaysFailing {
    async fn fetch(&self, app_id: u64) -> Result<FetchOutcome, FetchError> {
        Err(FetchError::http_status(app_id, 503))
    }
}

#[tokio::test]
async fn test_unbounded_retry_keeps_run_pending_on_permanent_failure() {
    let engine = DiscoveryEngine::new(CONCURRENCY, fast_backoff()).unwrap();

    let outcome = tokio::time::timeout(
        Duration::from_millis(300),
        engine.run(&[99], Arc::new(AlwaysFailing)),
    )
    .await;

    assert!(
        outcome.is_err(),
        "a permanently failing entry must keep the run pending under the default policy"
    );
}
