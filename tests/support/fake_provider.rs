//! Scripted in-memory stats provider.

use std::collections::HashSet;

use cam_core::provider::{ProviderError, StatsProvider, UserStatsHandle};

/// In-memory provider with per-step failure scripts and per-item faults.
#[derive(Debug, Default)]
pub struct FakeProvider {
    /// Achievement names and their unlocked state, in index order.
    pub achievements: Vec<(String, bool)>,
    /// Remaining init failures (`u32::MAX` for "always").
    pub init_failures: u32,
    /// Remaining user stats handle failures.
    pub handle_failures: u32,
    /// Remaining stats request failures.
    pub request_failures: u32,
    /// How many count queries report zero before the real count.
    pub zero_counts: u32,
    /// Names whose state read fails.
    pub unreadable: HashSet<String>,
    /// Names whose set/clear is rejected.
    pub read_only: HashSet<String>,
    /// Whether `store_stats` fails.
    pub store_fails: bool,
    /// Call log.
    pub calls: Vec<String>,
    /// Whether pending changes were stored.
    pub stored: bool,
    /// Whether `shutdown` ran.
    pub shut_down: bool,
}

impl FakeProvider {
    pub fn with_achievements(states: &[(&str, bool)]) -> Self {
        Self {
            achievements: states
                .iter()
                .map(|&(name, achieved)| (name.to_string(), achieved))
                .collect(),
            ..Self::default()
        }
    }

    pub fn count_calls(&self, name: &str) -> usize {
        self.calls.iter().filter(|call| *call == name).count()
    }

    pub fn is_achieved(&self, name: &str) -> Option<bool> {
        self.achievements
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, achieved)| achieved)
    }

    fn step(counter: &mut u32, op: &'static str) -> Result<(), ProviderError> {
        if *counter == 0 {
            return Ok(());
        }
        if *counter != u32::MAX {
            *counter -= 1;
        }
        Err(ProviderError::new(op, "provider not ready"))
    }

    fn position(&self, name: &str, op: &'static str) -> Result<usize, ProviderError> {
        self.achievements
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| ProviderError::new(op, format!("unknown achievement {name}")))
    }

    fn write(&mut self, name: &str, achieved: bool, op: &'static str) -> Result<(), ProviderError> {
        if self.read_only.contains(name) {
            return Err(ProviderError::new(op, "rejected"));
        }
        let index = self.position(name, op)?;
        self.achievements[index].1 = achieved;
        Ok(())
    }
}

impl StatsProvider for FakeProvider {
    fn init(&mut self) -> Result<(), ProviderError> {
        self.calls.push("init".into());
        Self::step(&mut self.init_failures, "init")
    }

    fn user_stats(&mut self) -> Result<UserStatsHandle, ProviderError> {
        self.calls.push("user_stats".into());
        Self::step(&mut self.handle_failures, "user_stats").map(|()| UserStatsHandle(1))
    }

    fn request_current_stats(&mut self, _stats: UserStatsHandle) -> Result<(), ProviderError> {
        self.calls.push("request_current_stats".into());
        Self::step(&mut self.request_failures, "request_current_stats")
    }

    fn achievement_count(&mut self, _stats: UserStatsHandle) -> Result<u32, ProviderError> {
        self.calls.push("achievement_count".into());
        if self.zero_counts > 0 {
            if self.zero_counts != u32::MAX {
                self.zero_counts -= 1;
            }
            return Ok(0);
        }
        u32::try_from(self.achievements.len())
            .map_err(|_| ProviderError::new("achievement_count", "too many achievements"))
    }

    fn achievement_name(
        &mut self,
        _stats: UserStatsHandle,
        index: u32,
    ) -> Result<String, ProviderError> {
        self.achievements
            .get(index as usize)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| ProviderError::new("achievement_name", "index out of range"))
    }

    fn achievement(&mut self, _stats: UserStatsHandle, name: &str) -> Result<bool, ProviderError> {
        if self.unreadable.contains(name) {
            return Err(ProviderError::new("achievement", "read failed"));
        }
        let index = self.position(name, "achievement")?;
        Ok(self.achievements[index].1)
    }

    fn set_achievement(&mut self, _stats: UserStatsHandle, name: &str) -> Result<(), ProviderError> {
        self.write(name, true, "set_achievement")
    }

    fn clear_achievement(
        &mut self,
        _stats: UserStatsHandle,
        name: &str,
    ) -> Result<(), ProviderError> {
        self.write(name, false, "clear_achievement")
    }

    fn store_stats(&mut self, _stats: UserStatsHandle) -> Result<(), ProviderError> {
        self.calls.push("store_stats".into());
        if self.store_fails {
            return Err(ProviderError::new("store_stats", "store failed"));
        }
        self.stored = true;
        Ok(())
    }

    fn steam_id(&mut self) -> Result<u64, ProviderError> {
        self.calls.push("steam_id".into());
        Ok(76_561_198_000_000_042)
    }

    fn shutdown(&mut self) {
        self.calls.push("shutdown".into());
        self.shut_down = true;
    }
}
