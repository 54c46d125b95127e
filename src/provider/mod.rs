//! Local stats provider contract and the flows that drive it.
//!
//! The provider is the native stats library of the running client. Loading
//! that library and binding its symbols is left to implementors of
//! [`StatsProvider`]; everything in this module only talks to the trait, so it
//! runs unchanged against a test double.
//!
//! # Architecture
//!
//! - [`StatsProvider`] - blocking, sequential provider operations
//! - [`RetryLimiter`] - retry-until-success with a fixed delay and a hard ceiling
//! - [`open_user_stats`] - init -> user stats handle -> request current stats
//! - [`resolve_steam_id`] - reads the logged-in account id
//! - [`run_agent`] - unlocks (or clears) every achievement of one app

mod agent;
mod error;
mod handshake;
mod limiter;

pub use agent::{AgentOptions, AgentSummary, run_agent};
pub use error::{HandshakeError, ProviderError};
pub use handshake::{open_user_stats, resolve_steam_id};
pub use limiter::{DEFAULT_RETRY_CEILING, DEFAULT_RETRY_DELAY, RetryLimiter};

/// Opaque handle to the provider's user stats interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserStatsHandle(pub usize);

/// Operations exposed by the local stats provider.
///
/// All calls are blocking and must be issued from one thread, in order.
pub trait StatsProvider {
    /// Initialises the provider for the current app.
    ///
    /// # Errors
    ///
    /// Returns the provider's error message when initialisation fails.
    fn init(&mut self) -> Result<(), ProviderError>;

    /// Resolves the user stats handle.
    ///
    /// # Errors
    ///
    /// Fails while the provider has no stats interface available yet.
    fn user_stats(&mut self) -> Result<UserStatsHandle, ProviderError>;

    /// Requests the current user's stats and achievements.
    ///
    /// # Errors
    ///
    /// Fails when the request could not be issued.
    fn request_current_stats(&mut self, stats: UserStatsHandle) -> Result<(), ProviderError>;

    /// Number of achievements the app defines.
    ///
    /// # Errors
    ///
    /// Fails when the count is unavailable.
    fn achievement_count(&mut self, stats: UserStatsHandle) -> Result<u32, ProviderError>;

    /// API name of the achievement at `index`.
    ///
    /// # Errors
    ///
    /// Fails for an out-of-range index.
    fn achievement_name(
        &mut self,
        stats: UserStatsHandle,
        index: u32,
    ) -> Result<String, ProviderError>;

    /// Whether the named achievement is unlocked.
    ///
    /// # Errors
    ///
    /// Fails for an unknown name.
    fn achievement(&mut self, stats: UserStatsHandle, name: &str) -> Result<bool, ProviderError>;

    /// Unlocks the named achievement.
    ///
    /// # Errors
    ///
    /// Fails when the provider rejects the change.
    fn set_achievement(&mut self, stats: UserStatsHandle, name: &str)
    -> Result<(), ProviderError>;

    /// Locks the named achievement again.
    ///
    /// # Errors
    ///
    /// Fails when the provider rejects the change.
    fn clear_achievement(
        &mut self,
        stats: UserStatsHandle,
        name: &str,
    ) -> Result<(), ProviderError>;

    /// Persists pending achievement changes.
    ///
    /// # Errors
    ///
    /// Fails when the provider could not store the stats.
    fn store_stats(&mut self, stats: UserStatsHandle) -> Result<(), ProviderError>;

    /// Numeric id of the logged-in account.
    ///
    /// # Errors
    ///
    /// Fails when no user is available.
    fn steam_id(&mut self) -> Result<u64, ProviderError>;

    /// Shuts the provider down. Safe to call after a failed init.
    fn shutdown(&mut self);
}
