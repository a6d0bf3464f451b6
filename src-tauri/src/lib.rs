//! Knit Tracker Backend
//!
//! Layered architecture:
//! - domain: Counter model, patterns and validation rules
//! - repository: SQLite storage
//! - board: In-memory counter boards with background saving
//! - import: Client for the pattern import server
//! - commands: Tauri command handlers (feature `shell`)

use std::path::PathBuf;
use std::sync::Arc;

pub mod board;
pub mod config;
pub mod domain;
pub mod import;
pub mod repository;

#[cfg(feature = "shell")]
mod commands;

use board::CounterService;
use config::AppConfig;
use domain::{DomainError, DomainResult};
use import::ImportClient;
use repository::{CounterRepository, DbState, NoteRepository, PatternRepository, PhotoRepository};

/// Application state shared across commands
pub struct AppState {
    pub db_state: DbState,
    pub db_path: PathBuf,
    pub config: AppConfig,
    pub patterns: PatternRepository,
    pub photos: PhotoRepository,
    pub notes: NoteRepository,
    pub counters: CounterService,
    pub importer: ImportClient,
}

impl AppState {
    /// Wire repositories and services onto an opened database
    pub fn new(db_state: DbState, db_path: PathBuf, config: AppConfig) -> DomainResult<Self> {
        let importer = ImportClient::new(config.import_base_url.clone(), config.request_timeout())
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let counter_repo = Arc::new(CounterRepository::new(db_state.shared()));

        Ok(Self {
            patterns: PatternRepository::new(db_state.shared()),
            photos: PhotoRepository::new(db_state.shared()),
            notes: NoteRepository::new(db_state.shared()),
            counters: CounterService::new(counter_repo),
            importer,
            db_state,
            db_path,
            config,
        })
    }

    /// Save open boards and close the database
    pub async fn shutdown(&self) {
        self.counters.flush_all().await;
        self.db_state.close().await;
        log::info!("Closed database {}", self.db_path.display());
    }
}

#[cfg(feature = "shell")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::Manager;

    let app = tauri::Builder::default()
        .setup(|app| {
            let app_handle = app.handle().clone();
            let data_dir = app_handle.path().app_data_dir()?;
            std::fs::create_dir_all(&data_dir)?;

            let config = AppConfig::load_or_default(&data_dir)?;

            // Initialize logging
            let mut log_config = rolling_logger::LoggerConfig::new(
                app_handle.path().app_log_dir()?,
                "KnitTracker",
            );
            log_config.retention = config.log_retention;
            rolling_logger::init_with(log_config)?;

            let db_path = config.database_path(&data_dir);
            let db_state = tauri::async_runtime::block_on(repository::init_db(&db_path))?;
            let _ = rolling_logger::info("Database initialized");

            app.manage(AppState::new(db_state, db_path, config)?);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Patterns
            commands::save_pattern,
            commands::get_all_patterns,
            commands::get_pattern,
            commands::update_pattern,
            commands::delete_pattern,
            // Counter boards
            commands::open_counter_board,
            commands::apply_counter_action,
            commands::update_counter_dialog,
            commands::begin_edit_counter,
            commands::swipe_counter_panel,
            commands::close_counter_board,
            // Photos
            commands::save_photo,
            commands::get_photos,
            commands::delete_photo,
            // Notes
            commands::add_note,
            commands::list_notes,
            commands::update_note,
            commands::delete_note,
            // Import
            commands::fetch_link_images,
            commands::convert_pdf,
            commands::converted_image_url,
            // Logs
            commands::get_recent_logs,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let tauri::RunEvent::Exit = event {
            if let Some(state) = app_handle.try_state::<AppState>() {
                tauri::async_runtime::block_on(state.shutdown());
            }
        }
    });
}
