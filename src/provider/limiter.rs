//! Bounded retry loop for local provider steps.
//!
//! The provider frequently fails to initialise, hand out its stats interface
//! or report an achievement count on the first try. [`RetryLimiter`] repeats
//! such a step with a short constant delay until it succeeds or the ceiling is
//! exceeded. Unlike the discovery backoff this loop is blocking and runs one
//! operation at a time.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use cam_core::provider::{ProviderError, RetryLimiter};
//!
//! let limiter = RetryLimiter::new(3, Duration::from_millis(1));
//! let mut calls = 0;
//! let value = limiter.run("warm_up", || {
//!     calls += 1;
//!     if calls < 3 {
//!         Err(ProviderError::new("warm_up", "not ready"))
//!     } else {
//!         Ok(calls)
//!     }
//! });
//! assert_eq!(value.unwrap(), 3);
//! ```

use std::thread;
use std::time::Duration;

use tracing::{error, instrument, trace};

use super::error::{HandshakeError, ProviderError};
use crate::discovery::classify_message;

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRY_CEILING: u32 = 128;

/// Default delay between attempts (300 milliseconds).
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(300);

/// Retry-until-success driver with a fixed delay and an attempt ceiling.
///
/// With a ceiling of `n` an always-failing step runs `n + 1` times (the first
/// attempt plus `n` retries) before [`HandshakeError::RetryCeilingExceeded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryLimiter {
    ceiling: u32,
    delay: Duration,
}

impl Default for RetryLimiter {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_RETRY_CEILING,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryLimiter {
    /// Creates a limiter with a custom ceiling and delay.
    #[must_use]
    pub fn new(ceiling: u32, delay: Duration) -> Self {
        Self { ceiling, delay }
    }

    /// Returns the retry ceiling.
    #[must_use]
    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Returns the delay between attempts.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `op` until it succeeds or the ceiling is exceeded.
    ///
    /// # Errors
    ///
    /// Returns [`HandshakeError::RetryCeilingExceeded`] carrying the last
    /// provider error. Callers treat this as fatal.
    #[instrument(level = "debug", skip(self, op), fields(ceiling = self.ceiling))]
    pub fn run<T, F>(&self, step: &'static str, mut op: F) -> Result<T, HandshakeError>
    where
        F: FnMut() -> Result<T, ProviderError>,
    {
        let mut retries = 0u32;

        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    error!(
                        step,
                        attempt = retries + 1,
                        failure = ?classify_message(&e.message),
                        error = %e,
                        "provider step failed"
                    );

                    if retries >= self.ceiling {
                        return Err(HandshakeError::RetryCeilingExceeded {
                            step,
                            attempts: retries + 1,
                            last: e,
                        });
                    }

                    trace!(delay_ms = self.delay.as_millis(), "sleeping before retry");
                    thread::sleep(self.delay);
                    retries += 1;
                }
            }
        }
    }
}
