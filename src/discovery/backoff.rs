//! Failure classification and backoff selection for detail lookups.
//!
//! When a lookup fails, the error is classified into a [`FailureType`]:
//! - [`FailureType::Throttled`] - the body was not a detail record, which under
//!   load almost always means the API served an HTML/text error page
//! - [`FailureType::Transient`] - anything else (network, timeout, an error
//!   status with an empty body)
//!
//! The [`BackoffPolicy`] maps the failure type to a wait. It never gives up on
//! its own unless an attempt ceiling was configured explicitly.
//!
//! # Example
//!
//! ```
//! use cam_core::discovery::{BackoffPolicy, FailureType, RetryDecision, classify_message};
//!
//! let policy = BackoffPolicy::default();
//! let failure = classify_message("invalid character '<' looking for beginning of value");
//! assert_eq!(failure, FailureType::Throttled);
//!
//! match policy.decide(failure, 1) {
//!     RetryDecision::Retry { delay, attempt } => println!("retry {attempt} in {delay:?}"),
//!     RetryDecision::GiveUp { reason } => println!("giving up: {reason}"),
//! }
//! ```

use std::time::Duration;

use tracing::debug;

use super::FetchError;
use super::constants::{THROTTLED_BACKOFF, TRANSIENT_BACKOFF};

/// Substrings that identify a payload-decoding failure in free-form error text.
///
/// Covers both the wording of JSON decoders in other clients ("invalid
/// character") and the wording produced by `serde_json` and `reqwest`.
pub const DECODE_FAILURE_MARKERS: [&str; 4] = [
    "invalid character",
    "expected value",
    "EOF while parsing",
    "error decoding response body",
];

/// Classification of a lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Undecodable payload; the API is most likely throttling us.
    Throttled,

    /// Network failure, timeout, bodiless error status or anything unrecognised.
    Transient,
}

/// Decision on whether to retry a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the lookup after the specified delay.
    Retry {
        /// How long to wait before retrying.
        delay: Duration,
        /// Which attempt number this will be (first retry is attempt 2).
        attempt: u32,
    },

    /// Stop retrying this entry. Only produced when a ceiling is configured.
    GiveUp {
        /// Human-readable reason.
        reason: String,
    },
}

/// Backoff configuration for the discovery engine.
///
/// # Default Values
///
/// - `throttled_delay`: 60 seconds
/// - `transient_delay`: 10 seconds
/// - `max_attempts`: unbounded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    throttled_delay: Duration,
    transient_delay: Duration,
    max_attempts: Option<u32>,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            throttled_delay: THROTTLED_BACKOFF,
            transient_delay: TRANSIENT_BACKOFF,
            max_attempts: None,
        }
    }
}

impl BackoffPolicy {
    /// Creates an unbounded policy with custom delays.
    #[must_use]
    pub fn new(throttled_delay: Duration, transient_delay: Duration) -> Self {
        Self {
            throttled_delay,
            transient_delay,
            max_attempts: None,
        }
    }

    /// Caps the number of attempts per entry (including the first, minimum 1).
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts.max(1));
        self
    }

    /// Returns the per-entry attempt ceiling, if any.
    #[must_use]
    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Returns the wait associated with a failure type.
    #[must_use]
    pub fn delay_for(&self, failure_type: FailureType) -> Duration {
        match failure_type {
            FailureType::Throttled => self.throttled_delay,
            FailureType::Transient => self.transient_delay,
        }
    }

    /// Decides what to do after `attempt` (1-indexed) failed with `failure_type`.
    #[must_use]
    pub fn decide(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if let Some(max) = self.max_attempts
            && attempt >= max
        {
            debug!(attempt, max, "max attempts reached");
            return RetryDecision::GiveUp {
                reason: format!("max attempts ({max}) exhausted"),
            };
        }

        RetryDecision::Retry {
            delay: self.delay_for(failure_type),
            attempt: attempt + 1,
        }
    }
}

/// Classifies a lookup error.
///
/// Only [`FetchError::Decode`] counts as throttling, whatever status the body
/// came with; every other variant is transient.
#[must_use]
pub fn classify_error(error: &FetchError) -> FailureType {
    match error {
        FetchError::Decode { .. } => FailureType::Throttled,
        FetchError::Network { .. } | FetchError::Timeout { .. } | FetchError::HttpStatus { .. } => {
            FailureType::Transient
        }
    }
}

/// Classifies free-form error text, e.g. a message reported by a collaborator.
#[must_use]
pub fn classify_message(message: &str) -> FailureType {
    if DECODE_FAILURE_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
    {
        FailureType::Throttled
    } else {
        FailureType::Transient
    }
}
