//! Discovery engine: bounded-concurrency lookups over a whole catalog.
//!
//! The engine launches one Tokio task per catalog entry. Each task acquires a
//! slot from a semaphore before every lookup attempt and releases it as soon
//! as the lookup returns, so backoff sleeps never hold a slot. Failed lookups
//! are classified and retried until they succeed; there is no per-entry
//! ceiling unless one is configured on the [`BackoffPolicy`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cam_core::discovery::{DiscoveryConfig, DiscoveryEngine, StatsApiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DiscoveryConfig::new("WEBAPI_KEY", "76561198000000000");
//! let client = Arc::new(StatsApiClient::new(&config)?);
//! let catalog = client.owned_games().await?;
//!
//! let engine = DiscoveryEngine::from_config(&config)?;
//! let report = engine.run(&catalog, client).await?;
//! println!("{} entries qualify", report.qualified().len());
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::aggregator::QualificationSet;
use super::backoff::{BackoffPolicy, RetryDecision, classify_error};
use super::config::DiscoveryConfig;
use super::error::DiscoveryError;
use super::fetcher::ItemFetcher;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 100;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Counters from a discovery run, updated concurrently by lookup tasks.
#[derive(Debug, Default)]
pub struct DiscoveryStats {
    completed: AtomicUsize,
    qualified: AtomicUsize,
    failed_attempts: AtomicUsize,
    abandoned: AtomicUsize,
}

impl DiscoveryStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> DiscoverySummary {
        DiscoverySummary {
            completed: self.completed.load(Ordering::SeqCst),
            qualified: self.qualified.load(Ordering::SeqCst),
            failed_attempts: self.failed_attempts.load(Ordering::SeqCst),
            abandoned: self.abandoned.load(Ordering::SeqCst),
        }
    }

    fn increment_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_qualified(&self) {
        self.qualified.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_failed_attempts(&self) {
        self.failed_attempts.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_abandoned(&self) {
        self.abandoned.fetch_add(1, Ordering::SeqCst);
    }
}

/// Point-in-time copy of [`DiscoveryStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    /// Entries whose lookup eventually succeeded.
    pub completed: usize,
    /// Entries added to the qualification set.
    pub qualified: usize,
    /// Lookup attempts that failed (and were retried or abandoned).
    pub failed_attempts: usize,
    /// Entries dropped after hitting a configured ceiling or a task panic.
    pub abandoned: usize,
}

/// Output of a discovery run.
#[derive(Debug)]
pub struct DiscoveryReport {
    qualified: HashSet<u64>,
    summary: DiscoverySummary,
}

impl DiscoveryReport {
    /// Entries with at least one unsatisfied sub-record, in no particular order.
    #[must_use]
    pub fn qualified(&self) -> &HashSet<u64> {
        &self.qualified
    }

    /// Counters for the run.
    #[must_use]
    pub fn summary(&self) -> DiscoverySummary {
        self.summary
    }

    /// Consumes the report, returning the qualification set.
    #[must_use]
    pub fn into_qualified(self) -> HashSet<u64> {
        self.qualified
    }
}

/// State shared by every task of one run. Created per run, dropped with it.
struct RunContext {
    fetcher: Arc<dyn ItemFetcher>,
    slots: Semaphore,
    results: QualificationSet,
    stats: DiscoveryStats,
    backoff: BackoffPolicy,
}

impl RunContext {
    fn into_report(self) -> DiscoveryReport {
        DiscoveryReport {
            summary: self.stats.snapshot(),
            qualified: self.results.into_inner(),
        }
    }

    fn snapshot_report(&self) -> DiscoveryReport {
        DiscoveryReport {
            summary: self.stats.snapshot(),
            qualified: self.results.snapshot(),
        }
    }
}

/// Engine that looks up every catalog entry with at most `concurrency`
/// lookups in flight.
///
/// # Concurrency Model
///
/// - Each entry runs in its own Tokio task
/// - A slot (semaphore permit) is held only for the duration of one lookup
/// - Backoff sleeps happen without a slot, so other entries keep progressing
/// - The run completes once every task has joined
///
/// No ordering holds between entries.
#[derive(Debug, Clone)]
pub struct DiscoveryEngine {
    concurrency: usize,
    backoff: BackoffPolicy,
}

impl DiscoveryEngine {
    /// Creates an engine with the given concurrency limit and backoff policy.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    #[instrument(level = "debug", skip(backoff))]
    pub fn new(concurrency: usize, backoff: BackoffPolicy) -> Result<Self, DiscoveryError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(DiscoveryError::InvalidConcurrency {
                value: concurrency,
                min: MIN_CONCURRENCY,
                max: MAX_CONCURRENCY,
            });
        }

        debug!(
            concurrency,
            max_attempts = ?backoff.max_attempts(),
            "creating discovery engine"
        );

        Ok(Self {
            concurrency,
            backoff,
        })
    }

    /// Creates an engine from a run configuration.
    ///
    /// # Errors
    ///
    /// Same as [`DiscoveryEngine::new`].
    pub fn from_config(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        Self::new(config.concurrency, config.backoff.clone())
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the configured backoff policy.
    #[must_use]
    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    /// Looks up every entry in `catalog` and collects the qualifying ones.
    ///
    /// Per-entry failures never fail the run. With the default unbounded
    /// policy an entry that keeps failing keeps this future pending.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::SlotPoolClosed`] if the slot pool is closed.
    #[instrument(skip(self, catalog, fetcher), fields(entries = catalog.len(), concurrency = self.concurrency))]
    pub async fn run(
        &self,
        catalog: &[u64],
        fetcher: Arc<dyn ItemFetcher>,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let ctx = Arc::new(RunContext {
            fetcher,
            slots: Semaphore::new(self.concurrency),
            results: QualificationSet::new(),
            stats: DiscoveryStats::new(),
            backoff: self.backoff.clone(),
        });

        info!("starting discovery");

        let handles: Vec<_> = catalog
            .iter()
            .map(|&app_id| {
                let ctx = Arc::clone(&ctx);
                (app_id, tokio::spawn(discover_entry(ctx, app_id)))
            })
            .collect();

        debug!(task_count = handles.len(), "waiting for lookups to complete");

        let mut first_error = None;
        for (app_id, handle) in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(app_id, error = %e, "lookup task aborted");
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    warn!(app_id, error = %e, "lookup task panicked");
                    ctx.stats.increment_abandoned();
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let report = match Arc::try_unwrap(ctx) {
            Ok(ctx) => ctx.into_report(),
            Err(shared) => shared.snapshot_report(),
        };

        let summary = report.summary();
        info!(
            completed = summary.completed,
            qualified = summary.qualified,
            failed_attempts = summary.failed_attempts,
            abandoned = summary.abandoned,
            "discovery complete"
        );

        Ok(report)
    }
}

/// Looks up one entry until it succeeds (or a configured ceiling is hit).
async fn discover_entry(ctx: Arc<RunContext>, app_id: u64) -> Result<(), DiscoveryError> {
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        let result = {
            let _slot = ctx
                .slots
                .acquire()
                .await
                .map_err(|_| DiscoveryError::SlotPoolClosed)?;
            debug!(app_id, attempt, "sent request");
            ctx.fetcher.fetch(app_id).await
        };

        let error = match result {
            Ok(outcome) => {
                if outcome.qualifies() && ctx.results.record(app_id) {
                    ctx.stats.increment_qualified();
                }
                ctx.stats.increment_completed();
                info!(
                    app_id,
                    attempt,
                    achievements = outcome.total,
                    locked = outcome.unsatisfied,
                    "OK"
                );
                return Ok(());
            }
            Err(e) => e,
        };

        ctx.stats.increment_failed_attempts();
        let failure_type = classify_error(&error);

        match ctx.backoff.decide(failure_type, attempt) {
            RetryDecision::Retry {
                delay,
                attempt: next_attempt,
            } => {
                warn!(
                    app_id,
                    attempt = next_attempt,
                    ?failure_type,
                    delay_ms = delay.as_millis(),
                    error = %error,
                    "lookup failed, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            RetryDecision::GiveUp { reason } => {
                warn!(app_id, attempt, %reason, error = %error, "lookup abandoned");
                ctx.stats.increment_abandoned();
                return Ok(());
            }
        }
    }
}
