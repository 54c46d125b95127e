//! Achievement agent: unlock or clear every achievement of one app.

use tracing::{debug, error, info, instrument, warn};

use super::error::{HandshakeError, ProviderError};
use super::handshake::open_user_stats;
use super::limiter::RetryLimiter;
use super::{StatsProvider, UserStatsHandle};

/// What the agent does with each achievement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentOptions {
    /// Clear unlocked achievements instead of unlocking locked ones.
    pub clear: bool,
    /// Treat a reported count of zero as a provider hiccup and retry it.
    pub zero_should_fail: bool,
}

/// Per-app result of an agent pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentSummary {
    /// Achievements the provider reported.
    pub total: u32,
    /// Achievements set (or cleared).
    pub changed: u32,
    /// Achievements already in the target state.
    pub skipped: u32,
    /// Achievements whose read or write failed.
    pub failed: u32,
    /// Whether the final store succeeded.
    pub stored: bool,
}

enum ItemOutcome {
    Changed,
    Skipped,
}

/// Runs the handshake, then walks every achievement of the app.
///
/// Per-achievement failures are logged and counted; they never abort the pass.
/// A failed final store is reported in [`AgentSummary::stored`].
///
/// # Errors
///
/// Returns [`HandshakeError`] if the handshake, or the zero-count retry with
/// `zero_should_fail`, exhausts the limiter.
#[instrument(skip(provider, limiter, options), fields(clear = options.clear))]
pub fn run_agent<P>(
    provider: &mut P,
    limiter: &RetryLimiter,
    app_id: u64,
    options: AgentOptions,
) -> Result<AgentSummary, HandshakeError>
where
    P: StatsProvider + ?Sized,
{
    let handle = open_user_stats(provider, limiter)?;

    let mut count = provider.achievement_count(handle).unwrap_or_else(|e| {
        warn!(error = %e, "achievement count unavailable");
        0
    });

    if count == 0 {
        if !options.zero_should_fail {
            info!(app_id, "no achievements reported");
            provider.shutdown();
            return Ok(AgentSummary::default());
        }

        let retried = limiter.run("achievement_count", || {
            match provider.achievement_count(handle) {
                Ok(0) => Err(ProviderError::new(
                    "achievement_count",
                    format!("reported 0 achievements for app {app_id}"),
                )),
                other => other,
            }
        });
        count = match retried {
            Ok(count) => count,
            Err(e) => {
                provider.shutdown();
                return Err(e);
            }
        };
    }

    info!(app_id, count, "achievements reported");

    let mut summary = AgentSummary {
        total: count,
        ..AgentSummary::default()
    };

    for index in 0..count {
        match apply_one(provider, handle, index, options.clear) {
            Ok(ItemOutcome::Changed) => summary.changed += 1,
            Ok(ItemOutcome::Skipped) => summary.skipped += 1,
            Err(e) => {
                error!(index = index + 1, error = %e, "failed");
                summary.failed += 1;
            }
        }
    }

    debug!("storing stats");
    match provider.store_stats(handle) {
        Ok(()) => {
            info!("stats stored");
            summary.stored = true;
        }
        Err(e) => error!(error = %e, "failed to store stats"),
    }

    debug!("finished, shutting down");
    provider.shutdown();

    info!(
        app_id,
        changed = summary.changed,
        skipped = summary.skipped,
        failed = summary.failed,
        "agent pass complete"
    );
    Ok(summary)
}

fn apply_one<P>(
    provider: &mut P,
    handle: UserStatsHandle,
    index: u32,
    clear: bool,
) -> Result<ItemOutcome, ProviderError>
where
    P: StatsProvider + ?Sized,
{
    let name = provider.achievement_name(handle, index)?;
    let achieved = provider.achievement(handle, &name)?;

    if clear {
        debug!(index = index + 1, %name, "clearing achievement");
        if !achieved {
            warn!(%name, "not achieved");
            return Ok(ItemOutcome::Skipped);
        }
        provider.clear_achievement(handle, &name)?;
    } else {
        debug!(index = index + 1, %name, "setting achievement");
        if achieved {
            warn!(%name, "already achieved");
            return Ok(ItemOutcome::Skipped);
        }
        provider.set_achievement(handle, &name)?;
    }

    info!(%name, "OK");
    Ok(ItemOutcome::Changed)
}
