//! Note Repository

use rusqlite::params;

use crate::domain::{now_millis, DomainError, DomainResult, Note};
use super::db::{connection, db_err, SharedConnection};

pub struct NoteRepository {
    conn: SharedConnection,
}

impl NoteRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub async fn add_note(&self, pattern_id: &str, content: &str) -> DomainResult<Note> {
        let note = Note::new(pattern_id, content);
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute(
            "INSERT INTO notes (id, pattern_id, content, updated_at) VALUES (?, ?, ?, ?)",
            params![note.id, note.pattern_id, note.content, note.updated_at],
        )
        .map_err(db_err)?;
        Ok(note)
    }

    /// Notes of a pattern, most recently edited first
    pub async fn list_notes(&self, pattern_id: &str) -> DomainResult<Vec<Note>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn
            .prepare(
                "SELECT id, pattern_id, content, updated_at FROM notes
                 WHERE pattern_id = ? ORDER BY updated_at DESC",
            )
            .map_err(db_err)?;
        let mut rows = stmt.query(params![pattern_id]).map_err(db_err)?;

        let mut notes = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            notes.push(Note {
                id: row.get(0).map_err(db_err)?,
                pattern_id: row.get(1).map_err(db_err)?,
                content: row.get(2).map_err(db_err)?,
                updated_at: row.get(3).map_err(db_err)?,
            });
        }
        Ok(notes)
    }

    pub async fn update_note(&self, id: &str, content: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let changed = conn
            .execute(
                "UPDATE notes SET content = ?, updated_at = ? WHERE id = ?",
                params![content, now_millis(), id],
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Note {} not found", id)));
        }
        Ok(())
    }

    pub async fn delete_note(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;
        conn.execute("DELETE FROM notes WHERE id = ?", params![id])
            .map_err(db_err)?;
        Ok(())
    }
}
