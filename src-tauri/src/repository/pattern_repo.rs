//! Pattern Repository
//!
//! SQLite-backed pattern library. Page images live in `pattern_images` with an
//! explicit sort order; deleting a pattern cascades to images, counters,
//! photos and notes through the foreign keys.

use async_trait::async_trait;
use rusqlite::{params, Connection, Row};

use crate::domain::{now_millis, DomainError, DomainResult, Pattern, PatternChanges};
use super::db::{connection, db_err, SharedConnection};
use super::traits::Repository;

const PATTERN_COLUMNS: &str = "id, name, project_name, needle_size, created_at, updated_at";

/// SQLite implementation of Pattern repository
pub struct PatternRepository {
    conn: SharedConnection,
}

impl PatternRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Apply `changes` to a stored pattern and persist it
    pub async fn edit(&self, id: &str, changes: &PatternChanges) -> DomainResult<Pattern> {
        let mut pattern = self
            .find_by_id(id.to_string())
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Pattern {} not found", id)))?;
        changes.apply_to(&mut pattern)?;
        self.update(&pattern).await
    }
}

#[async_trait]
impl Repository<Pattern> for PatternRepository {
    /// Insert the pattern and its ordered images in one transaction
    async fn create(&self, entity: &Pattern) -> DomainResult<Pattern> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let tx = conn.unchecked_transaction().map_err(db_err)?;
        tx.execute(
            "INSERT INTO patterns (id, name, project_name, needle_size, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                entity.id,
                entity.name,
                entity.project_name,
                entity.needle_size,
                entity.created_at,
                entity.updated_at
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DomainError::Conflict(format!("Pattern {} already exists", entity.id))
            }
            other => db_err(other),
        })?;
        insert_images(&tx, &entity.id, &entity.images)?;
        tx.commit().map_err(db_err)?;

        log::info!("Saved pattern {} with {} images", entity.id, entity.images.len());
        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: String) -> DomainResult<Option<Pattern>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM patterns WHERE id = ?", PATTERN_COLUMNS))
            .map_err(db_err)?;
        let mut rows = stmt.query(params![id]).map_err(db_err)?;

        match rows.next().map_err(db_err)? {
            Some(row) => {
                let mut pattern = row_to_pattern(row)?;
                pattern.images = load_images(conn, &pattern.id)?;
                Ok(Some(pattern))
            }
            None => Ok(None),
        }
    }

    /// All patterns, most recently updated first
    async fn list(&self) -> DomainResult<Vec<Pattern>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut patterns = Vec::new();
        {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM patterns ORDER BY updated_at DESC, created_at DESC",
                    PATTERN_COLUMNS
                ))
                .map_err(db_err)?;
            let mut rows = stmt.query([]).map_err(db_err)?;
            while let Some(row) = rows.next().map_err(db_err)? {
                patterns.push(row_to_pattern(row)?);
            }
        }

        for pattern in patterns.iter_mut() {
            pattern.images = load_images(conn, &pattern.id)?;
        }
        Ok(patterns)
    }

    /// Update metadata and replace the image list
    async fn update(&self, entity: &Pattern) -> DomainResult<Pattern> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;
        let now = now_millis();

        let tx = conn.unchecked_transaction().map_err(db_err)?;
        let changed = tx
            .execute(
                "UPDATE patterns SET name = ?, project_name = ?, needle_size = ?, updated_at = ? WHERE id = ?",
                params![entity.name, entity.project_name, entity.needle_size, now, entity.id],
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Pattern {} not found", entity.id)));
        }

        tx.execute("DELETE FROM pattern_images WHERE pattern_id = ?", params![entity.id])
            .map_err(db_err)?;
        insert_images(&tx, &entity.id, &entity.images)?;
        tx.commit().map_err(db_err)?;

        let mut updated = entity.clone();
        updated.updated_at = now;
        Ok(updated)
    }

    async fn delete(&self, id: String) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let changed = conn
            .execute("DELETE FROM patterns WHERE id = ?", params![id])
            .map_err(db_err)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Pattern {} not found", id)));
        }
        log::info!("Deleted pattern {}", id);
        Ok(())
    }
}

/// Mark a pattern as recently worked on
pub(super) fn touch(conn: &Connection, id: &str, now: i64) -> DomainResult<()> {
    let changed = conn
        .execute(
            "UPDATE patterns SET updated_at = ? WHERE id = ?",
            params![now, id],
        )
        .map_err(db_err)?;
    if changed == 0 {
        return Err(DomainError::NotFound(format!("Pattern {} not found", id)));
    }
    Ok(())
}

fn insert_images(conn: &Connection, pattern_id: &str, images: &[String]) -> DomainResult<()> {
    for (index, uri) in images.iter().enumerate() {
        conn.execute(
            "INSERT INTO pattern_images (id, pattern_id, image_uri, sort_order) VALUES (?, ?, ?, ?)",
            params![format!("{}_img_{}", pattern_id, index), pattern_id, uri, index as i64],
        )
        .map_err(db_err)?;
    }
    Ok(())
}

fn load_images(conn: &Connection, pattern_id: &str) -> DomainResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT image_uri FROM pattern_images WHERE pattern_id = ? ORDER BY sort_order")
        .map_err(db_err)?;
    let mut rows = stmt.query(params![pattern_id]).map_err(db_err)?;

    let mut images = Vec::new();
    while let Some(row) = rows.next().map_err(db_err)? {
        images.push(row.get(0).map_err(db_err)?);
    }
    Ok(images)
}

/// Convert a database row to Pattern (without images)
fn row_to_pattern(row: &Row<'_>) -> DomainResult<Pattern> {
    Ok(Pattern {
        id: row.get(0).map_err(db_err)?,
        name: row.get(1).map_err(db_err)?,
        project_name: row.get(2).map_err(db_err)?,
        needle_size: row.get(3).map_err(db_err)?,
        images: Vec::new(),
        created_at: row.get(4).map_err(db_err)?,
        updated_at: row.get(5).map_err(db_err)?,
    })
}
