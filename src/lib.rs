//! CAM Core Library
//!
//! This library finds the games of an account that still have locked
//! achievements and drives the local stats provider that unlocks them.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`discovery`] - Web API client, bounded-concurrency discovery engine,
//!   backoff classification and the ids file
//! - [`provider`] - Local stats provider contract, bounded retry loop,
//!   handshake and achievement agent

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod discovery;
pub mod provider;
mod user_agent;

// Re-export commonly used types
pub use discovery::{
    BackoffPolicy, DEFAULT_CONCURRENCY, DiscoveryConfig, DiscoveryEngine, DiscoveryError,
    DiscoveryReport, FailureType, FetchError, IdsFile, ItemFetcher, StatsApiClient,
    classify_error, classify_message,
};
pub use provider::{
    AgentOptions, AgentSummary, HandshakeError, ProviderError, RetryLimiter, StatsProvider,
    open_user_stats, resolve_steam_id, run_agent,
};
