//! Tauri Commands for the Pattern Library

use tauri::State;
use crate::domain::{NewPattern, Pattern, PatternChanges};
use crate::repository::Repository;
use crate::AppState;

/// Save a new pattern with its page images
#[tauri::command]
pub async fn save_pattern(state: State<'_, AppState>, pattern: NewPattern) -> Result<Pattern, String> {
    let pattern = pattern.into_pattern().map_err(|e| e.to_string())?;
    state.patterns.create(&pattern).await.map_err(|e| e.to_string())
}

/// All patterns, most recently worked on first
#[tauri::command]
pub async fn get_all_patterns(state: State<'_, AppState>) -> Result<Vec<Pattern>, String> {
    state.patterns.list().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_pattern(state: State<'_, AppState>, id: String) -> Result<Option<Pattern>, String> {
    state.patterns.find_by_id(id).await.map_err(|e| e.to_string())
}

/// Rename, change needle sizes or replace the page images
#[tauri::command]
pub async fn update_pattern(
    state: State<'_, AppState>,
    id: String,
    changes: PatternChanges,
) -> Result<Pattern, String> {
    state.patterns.edit(&id, &changes).await.map_err(|e| e.to_string())
}

/// Delete a pattern with its counters, photos and notes
#[tauri::command]
pub async fn delete_pattern(state: State<'_, AppState>, id: String) -> Result<(), String> {
    state.counters.discard(&id).await;
    state.patterns.delete(id).await.map_err(|e| e.to_string())
}
