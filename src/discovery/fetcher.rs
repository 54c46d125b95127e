//! Per-entry lookup contract and the decoded detail record.

use async_trait::async_trait;
use serde::Deserialize;

use super::FetchError;

/// Decoded per-entry response body.
///
/// Every field is optional: any well-formed JSON object decodes, and one
/// without a `playerstats` section is an entry with no sub-records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailRecord {
    /// Player stats section.
    #[serde(rename = "playerstats", default)]
    pub player_stats: PlayerStats,
}

/// The `playerstats` section of a [`DetailRecord`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerStats {
    /// Sub-records, one per achievement.
    #[serde(default)]
    pub achievements: Vec<AchievementState>,
    /// API-reported success flag, absent on most successful responses.
    #[serde(default)]
    pub success: Option<bool>,
    /// API-reported error text (e.g. "Requested app has no stats").
    #[serde(default)]
    pub error: Option<String>,
}

/// One sub-record of a [`DetailRecord`].
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AchievementState {
    /// 0 when not yet achieved.
    pub achieved: i64,
}

impl AchievementState {
    /// Returns true when the sub-record is not satisfied.
    #[must_use]
    pub fn is_unsatisfied(self) -> bool {
        self.achieved == 0
    }
}

/// Result of one successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The entry that was looked up.
    pub app_id: u64,
    /// Number of sub-records in the record.
    pub total: usize,
    /// Number of unsatisfied sub-records.
    pub unsatisfied: usize,
}

impl FetchOutcome {
    /// Summarises a decoded record; the record is not retained.
    #[must_use]
    pub fn from_record(app_id: u64, record: &DetailRecord) -> Self {
        let achievements = &record.player_stats.achievements;
        Self {
            app_id,
            total: achievements.len(),
            unsatisfied: achievements
                .iter()
                .filter(|state| state.is_unsatisfied())
                .count(),
        }
    }

    /// Returns true when the entry belongs in the qualification set.
    #[must_use]
    pub fn qualifies(&self) -> bool {
        self.unsatisfied > 0
    }
}

/// Performs exactly one lookup for one entry. Implementations never retry.
#[async_trait]
pub trait ItemFetcher: Send + Sync {
    /// Looks up `app_id` and reports its unsatisfied sub-record count.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] that the engine classifies and retries.
    async fn fetch(&self, app_id: u64) -> Result<FetchOutcome, FetchError>;
}
