//! Error types for the provider module.

use thiserror::Error;

/// A provider operation failed; `message` is the provider's own text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{operation}(): {message}")]
pub struct ProviderError {
    /// Operation that failed.
    pub operation: &'static str,
    /// Provider-reported message.
    pub message: String,
}

impl ProviderError {
    /// Creates a provider error.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// A handshake step could not be completed.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// A step kept failing past the retry ceiling. The caller must exit;
    /// later steps depend on this one.
    #[error("{step} failed after {attempts} attempts: {last}")]
    RetryCeilingExceeded {
        /// The step that failed.
        step: &'static str,
        /// Attempts made, including the first.
        attempts: u32,
        /// The final failure.
        #[source]
        last: ProviderError,
    },
}

impl HandshakeError {
    /// Process exit status for this error.
    ///
    /// The library never exits on its own. A binary that drives a real
    /// provider ends the process with this status when a handshake gives up;
    /// `idgen` takes the account id on the command line and has no such path.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RetryCeilingExceeded { .. } => 1,
        }
    }
}
