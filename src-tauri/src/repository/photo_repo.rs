//! Photo Repository
//!
//! User-captured progress photos, kept in capture order.

use rusqlite::params;

use crate::domain::{now_millis, DomainResult, Photo};
use super::db::{connection, db_err, SharedConnection};

pub struct PhotoRepository {
    conn: SharedConnection,
}

impl PhotoRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub async fn save_photo(&self, pattern_id: &str, uri: &str) -> DomainResult<Photo> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;
        let now = now_millis();

        conn.execute(
            "INSERT INTO user_photos (pattern_id, photo_uri, created_at) VALUES (?, ?, ?)",
            params![pattern_id, uri, now],
        )
        .map_err(db_err)?;

        Ok(Photo {
            id: conn.last_insert_rowid(),
            pattern_id: pattern_id.to_string(),
            uri: uri.to_string(),
            created_at: now,
        })
    }

    /// Photo URIs of a pattern, oldest first
    pub async fn get_photos(&self, pattern_id: &str) -> DomainResult<Vec<String>> {
        Ok(self
            .list(pattern_id)
            .await?
            .into_iter()
            .map(|photo| photo.uri)
            .collect())
    }

    pub async fn list(&self, pattern_id: &str) -> DomainResult<Vec<Photo>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn
            .prepare(
                "SELECT id, pattern_id, photo_uri, created_at FROM user_photos
                 WHERE pattern_id = ? ORDER BY created_at ASC, id ASC",
            )
            .map_err(db_err)?;
        let mut rows = stmt.query(params![pattern_id]).map_err(db_err)?;

        let mut photos = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            photos.push(Photo {
                id: row.get(0).map_err(db_err)?,
                pattern_id: row.get(1).map_err(db_err)?,
                uri: row.get(2).map_err(db_err)?,
                created_at: row.get(3).map_err(db_err)?,
            });
        }
        Ok(photos)
    }

    /// Remove a photo by URI. Deleting an unknown URI is not an error.
    pub async fn delete_photo(&self, pattern_id: &str, uri: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;
        conn.execute(
            "DELETE FROM user_photos WHERE pattern_id = ? AND photo_uri = ?",
            params![pattern_id, uri],
        )
        .map_err(db_err)?;
        Ok(())
    }
}
