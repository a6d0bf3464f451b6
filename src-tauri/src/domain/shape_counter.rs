//! Shape Counter
//!
//! Two sub-counters: repeats ("times") and rows within the current repeat.
//! When linked, rows carry into times on the way up and borrow from times on
//! the way down, so the pair walks a grid of (times, rows) states.

use serde::{Deserialize, Serialize};

use super::entity::new_id;
use super::validation::{validate_shape_bounds, ValidationError};

/// Label shown when a shape counter has no name
pub const DEFAULT_SHAPE_COUNTER_NAME: &str = "shape counter";

/// A shape counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCounter {
    /// Unique identifier
    pub id: String,
    /// Free text label, may be empty
    pub name: String,
    /// Current repeat, >= 1. Linked carries may take it past `max_times`.
    pub current_times: u32,
    /// Number of repeats, > 0
    pub max_times: u32,
    /// Current row within the repeat, >= 1
    pub current_rows: u32,
    /// Rows per repeat, > 0
    pub max_rows: u32,
    /// Whether rows carry into / borrow from times
    #[serde(default)]
    pub is_linked: bool,
}

impl ShapeCounter {
    /// Create a counter from raw form inputs. Progress starts at (1, 1).
    pub fn create(
        name: impl Into<String>,
        times_input: &str,
        rows_input: &str,
        is_linked: bool,
    ) -> Result<Self, ValidationError> {
        let bounds = validate_shape_bounds(times_input, rows_input)?;
        Ok(Self {
            id: new_id(),
            name: name.into(),
            current_times: 1,
            max_times: bounds.max_times,
            current_rows: 1,
            max_rows: bounds.max_rows,
            is_linked,
        })
    }

    /// Replace name and maxima. Progress and linking are kept.
    pub fn edit(
        &mut self,
        name: impl Into<String>,
        times_input: &str,
        rows_input: &str,
    ) -> Result<(), ValidationError> {
        let bounds = validate_shape_bounds(times_input, rows_input)?;
        self.name = name.into();
        self.max_times = bounds.max_times;
        self.max_rows = bounds.max_rows;
        Ok(())
    }

    /// Next repeat, saturating at `max_times`.
    ///
    /// A value already past the maximum (from linked carries) is left alone.
    pub fn increment_times(&mut self) {
        if self.current_times < self.max_times {
            self.current_times += 1;
        }
    }

    pub fn decrement_times(&mut self) {
        self.current_times = self.current_times.saturating_sub(1).max(1);
    }

    /// Next row. Linked: finishing the last row starts the next repeat at row 1.
    /// Unlinked: saturates at `max_rows`.
    pub fn increment_rows(&mut self) {
        if self.is_linked {
            if self.current_rows.saturating_add(1) > self.max_rows {
                self.current_times = self.current_times.saturating_add(1);
                self.current_rows = 1;
            } else {
                self.current_rows += 1;
            }
        } else if self.current_rows < self.max_rows {
            self.current_rows += 1;
        }
    }

    /// Previous row. Linked: stepping back from row 1 lands on the last row of
    /// the previous repeat, unless this is the first repeat.
    pub fn decrement_rows(&mut self) {
        if self.is_linked && self.current_rows == 1 && self.current_times > 1 {
            self.current_times -= 1;
            self.current_rows = self.max_rows;
        } else {
            self.current_rows = self.current_rows.saturating_sub(1).max(1);
        }
    }

    /// Flip linking. Current values are not touched.
    pub fn toggle_linked(&mut self) {
        self.is_linked = !self.is_linked;
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_SHAPE_COUNTER_NAME
        } else {
            &self.name
        }
    }
}
