//! Tauri Commands for Counter Boards
//!
//! Every command returns the board snapshot so the frontend can re-render.

use tauri::State;
use crate::board::{CounterAction, CounterBoard, DialogEvent, EditForm};
use crate::AppState;

/// Load a pattern's counters for the pattern screen
#[tauri::command]
pub async fn open_counter_board(
    state: State<'_, AppState>,
    pattern_id: String,
) -> Result<CounterBoard, String> {
    state.counters.open(&pattern_id).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn apply_counter_action(
    state: State<'_, AppState>,
    pattern_id: String,
    action: CounterAction,
) -> Result<CounterBoard, String> {
    state
        .counters
        .apply(&pattern_id, action)
        .await
        .map_err(|e| e.to_string())
}

/// Navigate the add counter dialog
#[tauri::command]
pub async fn update_counter_dialog(
    state: State<'_, AppState>,
    pattern_id: String,
    event: DialogEvent,
) -> Result<CounterBoard, String> {
    state
        .counters
        .with_board(&pattern_id, |board| {
            board.mode.handle(event);
            board.clone()
        })
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn begin_edit_counter(
    state: State<'_, AppState>,
    pattern_id: String,
    counter_id: String,
) -> Result<EditForm, String> {
    state
        .counters
        .with_board(&pattern_id, |board| board.begin_edit(&counter_id))
        .await
        .and_then(|form| form)
        .map_err(|e| e.to_string())
}

/// Vertical swipe on the counter panel; negative `dy` is upward
#[tauri::command]
pub async fn swipe_counter_panel(
    state: State<'_, AppState>,
    pattern_id: String,
    dy: f64,
) -> Result<CounterBoard, String> {
    state
        .counters
        .with_board(&pattern_id, |board| {
            board.swipe(dy);
            board.clone()
        })
        .await
        .map_err(|e| e.to_string())
}

/// Save and release the board when leaving the pattern screen
#[tauri::command]
pub async fn close_counter_board(state: State<'_, AppState>, pattern_id: String) -> Result<(), String> {
    state.counters.close(&pattern_id).await.map_err(|e| e.to_string())
}
