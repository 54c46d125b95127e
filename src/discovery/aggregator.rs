//! Qualification set shared by all lookup tasks of one run.

use std::collections::HashSet;
use std::sync::Mutex;

/// Set of entries with at least one unsatisfied sub-record.
///
/// Inserts are serialised by a single mutex; the lock is never held across an
/// await point. At the default fan-out of 4 contention is negligible; sharding
/// would only pay off at much higher concurrency.
#[derive(Debug, Default)]
pub struct QualificationSet {
    inner: Mutex<HashSet<u64>>,
}

impl QualificationSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a qualifying entry. Returns false if it was already present.
    pub fn record(&self, app_id: u64) -> bool {
        // A poisoned lock only means another task panicked mid-insert; the set
        // itself is still consistent.
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.insert(app_id)
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Returns true when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the current contents.
    #[must_use]
    pub fn snapshot(&self) -> HashSet<u64> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Consumes the set once all tasks have joined.
    #[must_use]
    pub fn into_inner(self) -> HashSet<u64> {
        self.inner
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
