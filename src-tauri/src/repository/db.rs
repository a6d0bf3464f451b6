//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Connection shared by all repositories. `None` once closed.
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
///
/// Opened once on start-up with [`init_db`] and closed on teardown.
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
}

impl DbState {
    pub fn new() -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Handle for repositories
    pub fn shared(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }

    pub async fn is_open(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Close the connection. Repositories report "Database not initialized" afterwards.
    pub async fn close(&self) {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.take() {
            if let Err((_, e)) = conn.close() {
                log::warn!("Failed to close database cleanly: {}", e);
            }
        }
    }
}

impl Default for DbState {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrow the live connection out of a locked guard
pub(crate) fn connection(guard: &Option<Connection>) -> DomainResult<&Connection> {
    guard
        .as_ref()
        .ok_or_else(|| DomainError::Internal("Database not initialized".to_string()))
}

pub(crate) fn db_err(e: rusqlite::Error) -> DomainError {
    DomainError::Internal(e.to_string())
}

/// Initialize database with path. `:memory:` opens a private in-memory database.
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = if db_path.as_os_str() == ":memory:" {
        Connection::open_in_memory()
    } else {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DomainError::Internal(format!("Failed to create db dir: {}", e)))?;
            }
        }
        Connection::open(db_path)
    }
    .map_err(|e| DomainError::Internal(format!("Failed to open db: {}", e)))?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(db_err)?;

    run_migrations(&conn)?;
    log::info!("Database ready at {}", db_path.display());

    let state = DbState::new();
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table))
        .map_err(db_err)?;
    let mut rows = stmt.query([]).map_err(db_err)?;
    while let Some(row) = rows.next().map_err(db_err)? {
        let name: String = row.get(1).map_err(db_err)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS patterns (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            project_name TEXT NOT NULL DEFAULT '',
            needle_size TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS pattern_images (
            id TEXT PRIMARY KEY,
            pattern_id TEXT NOT NULL REFERENCES patterns(id) ON DELETE CASCADE,
            image_uri TEXT NOT NULL,
            sort_order INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_photos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            pattern_id TEXT NOT NULL REFERENCES patterns(id) ON DELETE CASCADE,
            photo_uri TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY,
            pattern_id TEXT NOT NULL REFERENCES patterns(id) ON DELETE CASCADE,
            content TEXT NOT NULL DEFAULT '',
            updated_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS counters (
            id TEXT PRIMARY KEY,
            pattern_id TEXT NOT NULL REFERENCES patterns(id) ON DELETE CASCADE,
            name TEXT NOT NULL DEFAULT '',
            type TEXT NOT NULL CHECK(type IN ('row', 'shape')),
            sort_order INTEGER NOT NULL,
            current_row INTEGER,
            start_row INTEGER,
            end_row INTEGER,
            current_times INTEGER,
            max_times INTEGER,
            current_rows INTEGER,
            max_rows INTEGER,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );",
    )
    .map_err(db_err)?;

    // Linked mode was added after the first schema
    if !column_exists(conn, "counters", "is_linked")? {
        conn.execute(
            "ALTER TABLE counters ADD COLUMN is_linked INTEGER NOT NULL DEFAULT 0",
            [],
        )
        .map_err(|e| DomainError::Internal(format!("Failed to add is_linked: {}", e)))?;
    }

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_counters_pattern ON counters(pattern_id, sort_order);
         CREATE INDEX IF NOT EXISTS idx_images_pattern ON pattern_images(pattern_id, sort_order);
         CREATE INDEX IF NOT EXISTS idx_photos_pattern ON user_photos(pattern_id);
         CREATE INDEX IF NOT EXISTS idx_notes_pattern ON notes(pattern_id);",
    )
    .map_err(db_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_backed_db_reopens_with_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("knitting.db");

        let state = init_db(&path).await.expect("first open");
        assert!(state.is_open().await);
        state.close().await;
        assert!(!state.is_open().await);

        // Migrations are idempotent
        let state = init_db(&path).await.expect("second open");
        let guard = state.conn.lock().await;
        let conn = connection(&guard).unwrap();
        assert!(column_exists(conn, "counters", "is_linked").unwrap());
    }

    #[tokio::test]
    async fn test_closed_state_reports_not_initialized() {
        let state = DbState::new();
        let guard = state.conn.lock().await;
        let err = connection(&guard).unwrap_err();
        assert_eq!(err, DomainError::Internal("Database not initialized".to_string()));
    }
}
