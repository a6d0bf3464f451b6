//! Tauri Commands for Pattern Import

use std::path::PathBuf;
use tauri::State;
use crate::import::ConvertedPage;
use crate::AppState;

/// Image URLs from a shared post link
#[tauri::command]
pub async fn fetch_link_images(state: State<'_, AppState>, url: String) -> Result<Vec<String>, String> {
    state
        .importer
        .fetch_link_images(&url)
        .await
        .map_err(|e| e.to_string())
}

/// Upload a local PDF and get its rendered pages
#[tauri::command]
pub async fn convert_pdf(state: State<'_, AppState>, path: String) -> Result<Vec<ConvertedPage>, String> {
    let path = PathBuf::from(path);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("pattern.pdf")
        .to_string();

    state
        .importer
        .convert_pdf(&file_name, bytes)
        .await
        .map_err(|e| e.to_string())
}

/// Where the frontend can load a converted page from
#[tauri::command]
pub fn converted_image_url(state: State<'_, AppState>, path: String) -> String {
    state.importer.image_url(&path)
}
