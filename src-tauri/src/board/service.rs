//! Counter Service
//!
//! Owns the open counter boards. Mutations apply in memory first and are
//! written to storage in the background.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};
use crate::repository::CounterStore;
use super::action::CounterAction;
use super::counter_board::CounterBoard;
use super::save_guard::{SaveGuard, SaveOutcome};

pub struct CounterService {
    store: Arc<dyn CounterStore>,
    boards: Mutex<HashMap<String, CounterBoard>>,
    guard: Arc<SaveGuard>,
}

impl CounterService {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self {
            store,
            boards: Mutex::new(HashMap::new()),
            guard: Arc::new(SaveGuard::new()),
        }
    }

    /// Load a pattern's counters, seeding the starter counter if it has none.
    /// Reopening an open board returns it as is.
    pub async fn open(&self, pattern_id: &str) -> DomainResult<CounterBoard> {
        if let Some(board) = self.boards.lock().await.get(pattern_id) {
            return Ok(board.clone());
        }

        let counters = self.store.get_counters(pattern_id).await?;
        let base = self.guard.persisted(pattern_id).await.unwrap_or(0);
        let mut board = CounterBoard::seeded(pattern_id, counters);
        let seeded = board.revision > 0;
        // Revisions keep increasing across sessions so old saves stay stale
        board.revision += base;

        if seeded {
            self.spawn_save(&board);
        } else {
            self.guard.mark_persisted(pattern_id, board.revision).await;
        }

        let mut boards = self.boards.lock().await;
        let board = boards
            .entry(pattern_id.to_string())
            .or_insert(board)
            .clone();
        Ok(board)
    }

    /// Apply an action to an open board and persist the result in the background
    pub async fn apply(&self, pattern_id: &str, action: CounterAction) -> DomainResult<CounterBoard> {
        let mut boards = self.boards.lock().await;
        let board = boards
            .get_mut(pattern_id)
            .ok_or_else(|| DomainError::NotFound(format!("Board {} is not open", pattern_id)))?;

        if board.apply(action)? {
            self.spawn_save(board);
        }
        Ok(board.clone())
    }

    /// Run `f` against an open board's panel or dialog state
    pub async fn with_board<R>(
        &self,
        pattern_id: &str,
        f: impl FnOnce(&mut CounterBoard) -> R,
    ) -> DomainResult<R> {
        let mut boards = self.boards.lock().await;
        let board = boards
            .get_mut(pattern_id)
            .ok_or_else(|| DomainError::NotFound(format!("Board {} is not open", pattern_id)))?;
        Ok(f(board))
    }

    /// Write the board's current state and wait for it
    pub async fn flush(&self, pattern_id: &str) -> DomainResult<SaveOutcome> {
        let board = {
            let boards = self.boards.lock().await;
            boards
                .get(pattern_id)
                .cloned()
                .ok_or_else(|| DomainError::NotFound(format!("Board {} is not open", pattern_id)))?
        };
        self.guard
            .save(self.store.as_ref(), pattern_id, board.revision, &board.counters)
            .await
    }

    /// Flush and forget a board. The board stays open if the flush fails.
    pub async fn close(&self, pattern_id: &str) -> DomainResult<()> {
        self.flush(pattern_id).await?;
        self.boards.lock().await.remove(pattern_id);
        log::info!("Closed counter board {}", pattern_id);
        Ok(())
    }

    /// Drop a board without saving, e.g. after its pattern was deleted
    pub async fn discard(&self, pattern_id: &str) {
        self.boards.lock().await.remove(pattern_id);
        self.guard.forget(pattern_id).await;
    }

    /// Flush every open board, e.g. on shutdown
    pub async fn flush_all(&self) {
        let ids: Vec<String> = self.boards.lock().await.keys().cloned().collect();
        for id in ids {
            if let Err(e) = self.flush(&id).await {
                log::error!("Failed to save counters for {}: {}", id, e);
            }
        }
    }

    fn spawn_save(&self, board: &CounterBoard) {
        let store = Arc::clone(&self.store);
        let guard = Arc::clone(&self.guard);
        let pattern_id = board.pattern_id.clone();
        let revision = board.revision;
        let counters = board.counters.clone();

        tokio::spawn(async move {
            if let Err(e) = guard.save(store.as_ref(), &pattern_id, revision, &counters).await {
                log::error!("Failed to save counters for {}: {}", pattern_id, e);
            }
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::board::form::ShapeCounterForm;
    use crate::domain::{Counter, RowCounter};
    use async_trait::async_trait;

    /// In-memory counter storage
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        data: std::sync::Mutex<HashMap<String, Vec<Counter>>>,
    }

    #[async_trait]
    impl CounterStore for MemoryStore {
        async fn get_counters(&self, pattern_id: &str) -> DomainResult<Vec<Counter>> {
            Ok(self
                .data
                .lock()
                .unwrap()
                .get(pattern_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn save_counters(&self, pattern_id: &str, counters: &[Counter]) -> DomainResult<()> {
            self.data
                .lock()
                .unwrap()
                .insert(pattern_id.to_string(), counters.to_vec());
            Ok(())
        }
    }

    /// Storage that loads nothing and refuses every write
    pub(crate) struct FailingStore;

    #[async_trait]
    impl CounterStore for FailingStore {
        async fn get_counters(&self, _pattern_id: &str) -> DomainResult<Vec<Counter>> {
            Ok(Vec::new())
        }

        async fn save_counters(&self, _pattern_id: &str, _counters: &[Counter]) -> DomainResult<()> {
            Err(DomainError::Internal("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_open_seeds_and_persists_starter() {
        let store = Arc::new(MemoryStore::default());
        let service = CounterService::new(store.clone());

        let board = service.open("p1").await.unwrap();
        assert_eq!(board.counters.len(), 1);

        service.flush("p1").await.unwrap();
        assert_eq!(store.get_counters("p1").await.unwrap(), board.counters);
    }

    #[tokio::test]
    async fn test_apply_then_flush_persists_latest() {
        let store = Arc::new(MemoryStore::default());
        let service = CounterService::new(store.clone());
        let board = service.open("p1").await.unwrap();
        let id = board.counters[0].id_str().to_string();

        for _ in 0..3 {
            service
                .apply("p1", CounterAction::IncrementRow { id: id.clone() })
                .await
                .unwrap();
        }
        service.flush("p1").await.unwrap();

        match &store.get_counters("p1").await.unwrap()[0] {
            Counter::Row(row) => assert_eq!(row.current_row, 4),
            other => panic!("unexpected counter {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unchanged_loaded_board_is_not_rewritten() {
        let store = Arc::new(MemoryStore::default());
        store
            .save_counters("p1", &[RowCounter::starter().into()])
            .await
            .unwrap();
        let service = CounterService::new(store);

        service.open("p1").await.unwrap();
        assert_eq!(service.flush("p1").await.unwrap(), SaveOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_reopen_after_close_keeps_saving() {
        let store = Arc::new(MemoryStore::default());
        let service = CounterService::new(store.clone());
        service.open("p1").await.unwrap();
        service.close("p1").await.unwrap();

        let board = service.open("p1").await.unwrap();
        let added = service
            .apply(
                "p1",
                CounterAction::AddShape {
                    form: ShapeCounterForm {
                        name: "Cables".to_string(),
                        times: "4".to_string(),
                        rows: "8".to_string(),
                        is_linked: true,
                    },
                },
            )
            .await
            .unwrap();
        assert!(added.revision > board.revision);

        service.close("p1").await.unwrap();
        assert_eq!(store.get_counters("p1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_memory_state() {
        let service = CounterService::new(Arc::new(FailingStore));
        let board = service.open("p1").await.unwrap();
        let id = board.counters[0].id_str().to_string();

        let after = service
            .apply("p1", CounterAction::IncrementRow { id })
            .await
            .unwrap();
        assert!(service.flush("p1").await.is_err());
        assert!(service.close("p1").await.is_err());

        let still_open = service.open("p1").await.unwrap();
        assert_eq!(still_open.counters, after.counters);
    }

    #[tokio::test]
    async fn test_apply_requires_open_board() {
        let service = CounterService::new(Arc::new(MemoryStore::default()));
        let err = service
            .apply("p1", CounterAction::Delete { id: "x".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_discard_forgets_board() {
        let store = Arc::new(MemoryStore::default());
        for id in ["p1", "p2"] {
            store.save_counters(id, &[RowCounter::starter().into()]).await.unwrap();
        }
        let service = CounterService::new(store);
        service.open("p1").await.unwrap();
        service.open("p2").await.unwrap();
        assert_eq!(service.guard.tracked().await, 2);

        service.discard("p1").await;
        assert!(matches!(service.flush("p1").await, Err(DomainError::NotFound(_))));
        assert_eq!(service.guard.tracked().await, 1);
        assert_eq!(service.guard.persisted("p1").await, None);
    }

    #[tokio::test]
    async fn test_with_board_updates_panel() {
        let service = CounterService::new(Arc::new(MemoryStore::default()));
        service.open("p1").await.unwrap();

        let visible = service
            .with_board("p1", |board| {
                board.swipe(120.0);
                board.visible().len()
            })
            .await
            .unwrap();
        assert_eq!(visible, 0);
    }
}
