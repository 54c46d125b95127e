//! Remote discovery of catalog entries with locked achievements.
//!
//! This module lists an account's catalog through the Web API, looks up the
//! achievement record of every entry with bounded concurrency, and collects
//! the entries that still have something left to unlock.
//!
//! # Features
//!
//! - One Tokio task per entry, at most `concurrency` lookups in flight
//! - Typed lookup errors classified into long (throttled) and short backoff
//! - Unbounded per-entry retry by default, optional ceiling
//! - Race-free, deduplicated aggregation
//! - Append-only ids file output
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use cam_core::discovery::{DiscoveryConfig, DiscoveryEngine, IdsFile, StatsApiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DiscoveryConfig::new("WEBAPI_KEY", "76561198000000000");
//! config.validate()?;
//! let mut ids = IdsFile::open(Path::new("ids.txt")).await?;
//! let client = Arc::new(StatsApiClient::new(&config)?);
//! let catalog = client.owned_games().await?;
//! let report = DiscoveryEngine::from_config(&config)?.run(&catalog, client).await?;
//! ids.append(report.into_qualified()).await?;
//! # Ok(())
//! # }
//! ```

mod aggregator;
mod backoff;
mod client;
mod config;
pub mod constants;
mod engine;
mod error;
mod fetcher;
mod output;

pub use aggregator::QualificationSet;
pub use backoff::{
    BackoffPolicy, DECODE_FAILURE_MARKERS, FailureType, RetryDecision, classify_error,
    classify_message,
};
pub use client::StatsApiClient;
pub use config::DiscoveryConfig;
pub use engine::{
    DEFAULT_CONCURRENCY, DiscoveryEngine, DiscoveryReport, DiscoveryStats, DiscoverySummary,
    MAX_CONCURRENCY, MIN_CONCURRENCY,
};
pub use error::{DiscoveryError, FetchError};
pub use fetcher::{AchievementState, DetailRecord, FetchOutcome, ItemFetcher, PlayerStats};
pub use output::{DEFAULT_IDS_FILE, IdsFile};
