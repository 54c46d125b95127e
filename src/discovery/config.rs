//! Runtime configuration for a discovery run.

use std::time::Duration;

use super::backoff::BackoffPolicy;
use super::constants::{DEFAULT_API_BASE, REQUEST_TIMEOUT};
use super::engine::{DEFAULT_CONCURRENCY, MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::error::DiscoveryError;

/// Everything a discovery run needs, passed explicitly to the client and engine.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Web API base URL (overridable for tests and proxies).
    pub api_base: String,
    /// Web API key.
    pub api_key: String,
    /// Numeric account identifier the catalog and stats belong to.
    pub steam_id: String,
    /// Maximum in-flight detail lookups.
    pub concurrency: usize,
    /// Overall timeout of a single request.
    pub request_timeout: Duration,
    /// Backoff applied between per-entry attempts.
    pub backoff: BackoffPolicy,
}

impl DiscoveryConfig {
    /// Creates a configuration with default endpoint, concurrency and backoff.
    pub fn new(api_key: impl Into<String>, steam_id: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            steam_id: steam_id.into(),
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout: REQUEST_TIMEOUT,
            backoff: BackoffPolicy::default(),
        }
    }

    /// Checks required values and ranges.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::MissingConfig`] for an empty key or account id
    /// and [`DiscoveryError::InvalidConcurrency`] for an out-of-range limit.
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if self.api_key.trim().is_empty() {
            return Err(DiscoveryError::MissingConfig { name: "api key" });
        }
        if self.steam_id.trim().is_empty() {
            return Err(DiscoveryError::MissingConfig { name: "steam id" });
        }
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&self.concurrency) {
            return Err(DiscoveryError::InvalidConcurrency {
                value: self.concurrency,
                min: MIN_CONCURRENCY,
                max: MAX_CONCURRENCY,
            });
        }
        Ok(())
    }
}
