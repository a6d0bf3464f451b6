//! Counter Repository
//!
//! Stores each pattern's counters as one ordered set. Saving replaces the whole
//! set inside a transaction; `sort_order` keeps the display order.

use async_trait::async_trait;
use rusqlite::{params, Row};

use crate::domain::{now_millis, Counter, CounterKind, DomainError, DomainResult, RowCounter, ShapeCounter};
use super::db::{connection, db_err, SharedConnection};
use super::pattern_repo;
use super::traits::CounterStore;

const COUNTER_COLUMNS: &str = "id, name, type, current_row, start_row, end_row, \
     current_times, max_times, current_rows, max_rows, is_linked";

/// SQLite implementation of counter storage
pub struct CounterRepository {
    conn: SharedConnection,
}

impl CounterRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Counters of a pattern in display order
    pub async fn get_counters(&self, pattern_id: &str) -> DomainResult<Vec<Counter>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM counters WHERE pattern_id = ? ORDER BY sort_order",
                COUNTER_COLUMNS
            ))
            .map_err(db_err)?;
        let mut rows = stmt.query(params![pattern_id]).map_err(db_err)?;

        let mut counters = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            counters.push(row_to_counter(row)?);
        }
        Ok(counters)
    }

    /// Replace the pattern's counters and bump the pattern's `updated_at`
    pub async fn save_counters(&self, pattern_id: &str, counters: &[Counter]) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;
        let now = now_millis();

        let tx = conn.unchecked_transaction().map_err(db_err)?;
        tx.execute("DELETE FROM counters WHERE pattern_id = ?", params![pattern_id])
            .map_err(db_err)?;

        for (index, counter) in counters.iter().enumerate() {
            let sort_order = index as i64;
            match counter {
                Counter::Row(row) => {
                    tx.execute(
                        "INSERT INTO counters (id, pattern_id, name, type, sort_order, current_row, start_row, end_row, is_linked, created_at, updated_at)
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
                        params![
                            row.id,
                            pattern_id,
                            row.name,
                            CounterKind::Row.as_str(),
                            sort_order,
                            row.current_row,
                            row.start_row,
                            row.end_row,
                            now,
                            now
                        ],
                    )
                    .map_err(db_err)?;
                }
                Counter::Shape(shape) => {
                    tx.execute(
                        "INSERT INTO counters (id, pattern_id, name, type, sort_order, current_times, max_times, current_rows, max_rows, is_linked, created_at, updated_at)
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                        params![
                            shape.id,
                            pattern_id,
                            shape.name,
                            CounterKind::Shape.as_str(),
                            sort_order,
                            shape.current_times,
                            shape.max_times,
                            shape.current_rows,
                            shape.max_rows,
                            shape.is_linked,
                            now,
                            now
                        ],
                    )
                    .map_err(db_err)?;
                }
            }
        }

        pattern_repo::touch(&tx, pattern_id, now)?;

        tx.commit().map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl CounterStore for CounterRepository {
    async fn get_counters(&self, pattern_id: &str) -> DomainResult<Vec<Counter>> {
        CounterRepository::get_counters(self, pattern_id).await
    }

    async fn save_counters(&self, pattern_id: &str, counters: &[Counter]) -> DomainResult<()> {
        CounterRepository::save_counters(self, pattern_id, counters).await
    }
}

/// Convert a database row to Counter
fn row_to_counter(row: &Row<'_>) -> DomainResult<Counter> {
    let id: String = row.get(0).map_err(db_err)?;
    let name: String = row.get(1).map_err(db_err)?;
    let kind: String = row.get(2).map_err(db_err)?;

    match CounterKind::parse(&kind) {
        Some(CounterKind::Row) => Ok(Counter::Row(RowCounter {
            id,
            name,
            current_row: row.get(3).map_err(db_err)?,
            start_row: row.get(4).map_err(db_err)?,
            end_row: row.get(5).map_err(db_err)?,
        })),
        Some(CounterKind::Shape) => Ok(Counter::Shape(ShapeCounter {
            id,
            name,
            current_times: row.get(6).map_err(db_err)?,
            max_times: row.get(7).map_err(db_err)?,
            current_rows: row.get(8).map_err(db_err)?,
            max_rows: row.get(9).map_err(db_err)?,
            is_linked: row.get(10).map_err(db_err)?,
        })),
        None => Err(DomainError::Internal(format!(
            "Counter {} has unknown type '{}'",
            id, kind
        ))),
    }
}
