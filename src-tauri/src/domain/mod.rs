//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has no storage or transport dependencies.

mod counter;
mod entity;
mod note;
mod pattern;
mod photo;
mod reorder;
mod row_counter;
mod shape_counter;
mod validation;

pub use counter::{Counter, CounterKind};
pub use entity::{new_id, now_millis, DomainError, DomainResult, Entity};
pub use note::Note;
pub use pattern::{NewPattern, Pattern, PatternChanges, DEFAULT_PROJECT_NAME};
pub use photo::Photo;
pub use reorder::{reorder, reorder_in_place};
pub use row_counter::{RowCounter, DEFAULT_ROW_COUNTER_NAME, UNBOUNDED_LABEL};
pub use shape_counter::{ShapeCounter, DEFAULT_SHAPE_COUNTER_NAME};
pub use validation::{
    parse_positive, validate_row_bounds, validate_shape_bounds, RowBounds, ShapeBounds,
    ValidationError,
};
