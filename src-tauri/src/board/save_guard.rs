//! Save Guard
//!
//! Serializes counter saves per pattern and drops snapshots older than the
//! last one written.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{Counter, DomainResult};
use crate::repository::CounterStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// A newer or equal revision was already persisted
    Skipped,
}

/// Last persisted revision per pattern, each behind its own lock
#[derive(Default)]
pub struct SaveGuard {
    slots: Mutex<HashMap<String, Arc<Mutex<Option<u64>>>>>,
}

impl SaveGuard {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, pattern_id: &str) -> Arc<Mutex<Option<u64>>> {
        let mut slots = self.slots.lock().await;
        Arc::clone(slots.entry(pattern_id.to_string()).or_default())
    }

    pub async fn persisted(&self, pattern_id: &str) -> Option<u64> {
        let slot = self.slots.lock().await.get(pattern_id).cloned()?;
        let last = *slot.lock().await;
        last
    }

    /// Drop a pattern's slot. A save already holding it still finishes.
    pub async fn forget(&self, pattern_id: &str) {
        self.slots.lock().await.remove(pattern_id);
    }

    #[cfg(test)]
    pub(crate) async fn tracked(&self) -> usize {
        self.slots.lock().await.len()
    }

    /// Record a revision known to match storage, e.g. one just loaded
    pub async fn mark_persisted(&self, pattern_id: &str, revision: u64) {
        let slot = self.slot(pattern_id).await;
        let mut last = slot.lock().await;
        if last.map_or(true, |l| revision > l) {
            *last = Some(revision);
        }
    }

    /// Write `counters` unless a snapshot at least as new is already stored.
    /// Holds the pattern's lock for the whole write.
    pub async fn save(
        &self,
        store: &dyn CounterStore,
        pattern_id: &str,
        revision: u64,
        counters: &[Counter],
    ) -> DomainResult<SaveOutcome> {
        let slot = self.slot(pattern_id).await;
        let mut last = slot.lock().await;

        if matches!(*last, Some(l) if l >= revision) {
            log::debug!("Skipping stale save of {} at revision {}", pattern_id, revision);
            return Ok(SaveOutcome::Skipped);
        }

        store.save_counters(pattern_id, counters).await?;
        *last = Some(revision);
        Ok(SaveOutcome::Saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::service::tests::MemoryStore;
    use crate::domain::RowCounter;

    #[tokio::test]
    async fn test_stale_revision_is_skipped() {
        let store = MemoryStore::default();
        let guard = SaveGuard::new();
        let newer = vec![Counter::from(RowCounter::starter())];

        let outcome = guard.save(&store, "p1", 5, &newer).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Saved);

        let outcome = guard.save(&store, "p1", 4, &[]).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Skipped);
        let outcome = guard.save(&store, "p1", 5, &[]).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Skipped);

        assert_eq!(store.get_counters("p1").await.unwrap(), newer);
        assert_eq!(guard.persisted("p1").await, Some(5));
    }

    #[tokio::test]
    async fn test_patterns_are_independent() {
        let store = MemoryStore::default();
        let guard = SaveGuard::new();
        guard.mark_persisted("p1", 9).await;

        let outcome = guard.save(&store, "p2", 1, &[]).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Saved);
        assert_eq!(guard.persisted("p2").await, Some(1));

        // Marking never moves backwards
        guard.mark_persisted("p1", 3).await;
        assert_eq!(guard.persisted("p1").await, Some(9));
    }

    #[tokio::test]
    async fn test_forget_drops_slot() {
        let store = MemoryStore::default();
        let guard = SaveGuard::new();
        guard.save(&store, "p1", 3, &[]).await.unwrap();
        guard.mark_persisted("p2", 1).await;
        assert_eq!(guard.tracked().await, 2);

        guard.forget("p1").await;
        assert_eq!(guard.tracked().await, 1);
        assert_eq!(guard.persisted("p1").await, None);

        // Reading an unknown pattern does not create a slot
        assert_eq!(guard.persisted("p3").await, None);
        assert_eq!(guard.tracked().await, 1);
    }

    #[tokio::test]
    async fn test_failed_save_does_not_advance() {
        let store = crate::board::service::tests::FailingStore;
        let guard = SaveGuard::new();

        assert!(guard.save(&store, "p1", 1, &[]).await.is_err());
        assert_eq!(guard.persisted("p1").await, None);
    }
}
