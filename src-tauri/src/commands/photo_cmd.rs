//! Tauri Commands for Progress Photos

use tauri::State;
use crate::domain::Photo;
use crate::AppState;

#[tauri::command]
pub async fn save_photo(
    state: State<'_, AppState>,
    pattern_id: String,
    uri: String,
) -> Result<Photo, String> {
    state
        .photos
        .save_photo(&pattern_id, &uri)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_photos(state: State<'_, AppState>, pattern_id: String) -> Result<Vec<String>, String> {
    state.photos.get_photos(&pattern_id).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_photo(
    state: State<'_, AppState>,
    pattern_id: String,
    uri: String,
) -> Result<(), String> {
    state
        .photos
        .delete_photo(&pattern_id, &uri)
        .await
        .map_err(|e| e.to_string())
}
