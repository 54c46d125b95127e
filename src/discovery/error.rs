//! Error types for the discovery module.
//!
//! Errors are split by tier: [`FetchError`] covers a single per-entry lookup
//! and is always retried by the engine, while [`DiscoveryError`] covers
//! preconditions whose failure aborts the whole run.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of one detail lookup for one catalog entry.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, reset, etc.)
    #[error("network error fetching app {app_id}: {source}")]
    Network {
        /// The entry being fetched.
        app_id: u64,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the per-request timeout.
    #[error("timeout fetching app {app_id}")]
    Timeout {
        /// The entry being fetched.
        app_id: u64,
    },

    /// Non-2xx response with an empty body.
    #[error("HTTP {status} fetching app {app_id}")]
    HttpStatus {
        /// The entry being fetched.
        app_id: u64,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body was not a detail record (usually an HTML error page).
    ///
    /// Raised for any status; throttle pages arrive as both 200 and 429.
    #[error("failed to decode response for app {app_id} (HTTP {status}): {source}")]
    Decode {
        /// The entry being fetched.
        app_id: u64,
        /// The HTTP status the body came with.
        status: u16,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Creates a network error, folding reqwest timeouts into [`FetchError::Timeout`].
    pub fn network(app_id: u64, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { app_id }
        } else {
            Self::Network { app_id, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(app_id: u64, status: u16) -> Self {
        Self::HttpStatus { app_id, status }
    }

    /// Creates a decode error.
    pub fn decode(app_id: u64, status: u16, source: serde_json::Error) -> Self {
        Self::Decode {
            app_id,
            status,
            source,
        }
    }

    /// Returns the entry this error belongs to.
    #[must_use]
    pub fn app_id(&self) -> u64 {
        match self {
            Self::Network { app_id, .. }
            | Self::Timeout { app_id }
            | Self::HttpStatus { app_id, .. }
            | Self::Decode { app_id, .. } => *app_id,
        }
    }
}

/// Fatal errors that abort a discovery run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Invalid concurrency value provided.
    #[error("invalid concurrency value {value}: must be between {min} and {max}")]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value.
        max: usize,
    },

    /// A required configuration value is missing or empty.
    #[error("missing required configuration: {name}")]
    MissingConfig {
        /// Name of the missing value.
        name: &'static str,
    },

    /// The configured API base URL could not be parsed.
    #[error("invalid API base URL {url}: {source}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// The parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The catalog request failed.
    #[error("catalog request failed: {0}")]
    CatalogRequest(#[source] reqwest::Error),

    /// The catalog endpoint answered with a non-2xx status.
    #[error("catalog request returned HTTP {status}")]
    CatalogStatus {
        /// The HTTP status code.
        status: u16,
    },

    /// The catalog body could not be decoded.
    #[error("failed to decode catalog: {0}")]
    CatalogDecode(#[source] serde_json::Error),

    /// Slot pool was closed unexpectedly.
    #[error("slot pool closed unexpectedly")]
    SlotPoolClosed,

    /// The output file could not be opened or written.
    #[error("IO error on {path}: {source}")]
    Output {
        /// The output file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DiscoveryError {
    /// Creates an output file error.
    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}
