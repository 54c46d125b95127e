//! Ordered provider handshakes.

use tracing::{debug, info, instrument};

use super::error::HandshakeError;
use super::limiter::RetryLimiter;
use super::{StatsProvider, UserStatsHandle};

/// Runs init -> user stats handle -> request current stats, in that order.
///
/// Each step is retried through `limiter`; a later step never starts before
/// the previous one succeeded. If a step after init gives up, the provider is
/// shut down before the error is returned.
///
/// # Errors
///
/// Returns [`HandshakeError::RetryCeilingExceeded`] for the first step that
/// exhausts the limiter.
#[instrument(skip(provider, limiter))]
pub fn open_user_stats<P>(
    provider: &mut P,
    limiter: &RetryLimiter,
) -> Result<UserStatsHandle, HandshakeError>
where
    P: StatsProvider + ?Sized,
{
    limiter.run("init", || provider.init())?;
    debug!("provider initialised");

    let handle = match limiter.run("user_stats", || provider.user_stats()) {
        Ok(handle) => handle,
        Err(e) => {
            provider.shutdown();
            return Err(e);
        }
    };

    if let Err(e) = limiter.run("request_current_stats", || {
        provider.request_current_stats(handle)
    }) {
        provider.shutdown();
        return Err(e);
    }

    info!(?handle, "user stats ready");
    Ok(handle)
}

/// Reads the logged-in account id, then shuts the provider down.
///
/// # Errors
///
/// Returns [`HandshakeError::RetryCeilingExceeded`] if init or the id lookup
/// exhausts the limiter.
#[instrument(skip(provider, limiter))]
pub fn resolve_steam_id<P>(provider: &mut P, limiter: &RetryLimiter) -> Result<u64, HandshakeError>
where
    P: StatsProvider + ?Sized,
{
    limiter.run("init", || provider.init())?;
    let result = limiter.run("steam_id", || provider.steam_id());
    provider.shutdown();

    let steam_id = result?;
    debug!(steam_id, "resolved steam id");
    Ok(steam_id)
}
