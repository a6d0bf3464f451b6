//! Commands Layer
//!
//! Tauri command handlers that bridge frontend to backend services.

mod counter_cmd;
mod import_cmd;
mod log_cmd;
mod note_cmd;
mod pattern_cmd;
mod photo_cmd;

pub use counter_cmd::*;
pub use import_cmd::*;
pub use log_cmd::*;
pub use note_cmd::*;
pub use pattern_cmd::*;
pub use photo_cmd::*;
