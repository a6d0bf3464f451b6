//! Tauri Commands for Pattern Notes

use tauri::State;
use crate::domain::Note;
use crate::AppState;

#[tauri::command]
pub async fn add_note(
    state: State<'_, AppState>,
    pattern_id: String,
    content: String,
) -> Result<Note, String> {
    state
        .notes
        .add_note(&pattern_id, &content)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_notes(state: State<'_, AppState>, pattern_id: String) -> Result<Vec<Note>, String> {
    state.notes.list_notes(&pattern_id).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn update_note(state: State<'_, AppState>, id: String, content: String) -> Result<(), String> {
    state
        .notes
        .update_note(&id, &content)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_note(state: State<'_, AppState>, id: String) -> Result<(), String> {
    state.notes.delete_note(&id).await.map_err(|e| e.to_string())
}
