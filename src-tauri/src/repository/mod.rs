//! Repository Layer
//!
//! Data access abstractions and implementations.

mod counter_repo;
mod db;
mod note_repo;
mod pattern_repo;
mod photo_repo;
mod traits;


pub use counter_repo::CounterRepository;
pub use db::{init_db, DbState, SharedConnection};
pub use note_repo::NoteRepository;
pub use pattern_repo::PatternRepository;
pub use photo_repo::PhotoRepository;
pub use traits::{CounterStore, Repository};
