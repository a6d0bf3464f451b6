//! Row Counter
//!
//! Tracks the knitter's current row between a start row and an optional end row.

use serde::{Deserialize, Serialize};

use super::entity::new_id;
use super::validation::{validate_row_bounds, ValidationError};

/// Label shown when a row counter has no name
pub const DEFAULT_ROW_COUNTER_NAME: &str = "row counter";

/// Label shown in place of an end row for unbounded counters
pub const UNBOUNDED_LABEL: &str = "∞";

/// A row counter
///
/// `end_row == None` means the counter is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounter {
    /// Unique identifier
    pub id: String,
    /// Free text label, may be empty
    pub name: String,
    /// Current position
    pub current_row: u32,
    /// Inclusive lower bound, always > 0
    pub start_row: u32,
    /// Inclusive upper bound, always > start_row when present
    pub end_row: Option<u32>,
}

impl RowCounter {
    /// Create a counter from raw form inputs. Progress starts at the start row.
    pub fn create(
        name: impl Into<String>,
        start_input: &str,
        end_input: &str,
    ) -> Result<Self, ValidationError> {
        let bounds = validate_row_bounds(start_input, end_input)?;
        Ok(Self {
            id: new_id(),
            name: name.into(),
            current_row: bounds.start_row,
            start_row: bounds.start_row,
            end_row: bounds.end_row,
        })
    }

    /// The counter every pattern starts with: rows 1 to 100
    pub fn starter() -> Self {
        Self {
            id: new_id(),
            name: String::new(),
            current_row: 1,
            start_row: 1,
            end_row: Some(100),
        }
    }

    /// Replace name and bounds. Keeps the id and the current row.
    pub fn edit(
        &mut self,
        name: impl Into<String>,
        start_input: &str,
        end_input: &str,
    ) -> Result<(), ValidationError> {
        let bounds = validate_row_bounds(start_input, end_input)?;
        self.name = name.into();
        self.start_row = bounds.start_row;
        self.end_row = bounds.end_row;
        Ok(())
    }

    /// Advance one row. Overshooting the end row is allowed.
    pub fn increment(&mut self) {
        self.current_row = self.current_row.saturating_add(1);
    }

    /// Go back one row, never below 0
    pub fn decrement(&mut self) {
        self.current_row = self.current_row.saturating_sub(1);
    }

    pub fn is_unbounded(&self) -> bool {
        self.end_row.is_none()
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_ROW_COUNTER_NAME
        } else {
            &self.name
        }
    }

    pub fn end_label(&self) -> String {
        match self.end_row {
            Some(end) => end.to_string(),
            None => UNBOUNDED_LABEL.to_string(),
        }
    }

    /// Fraction of the range covered, in [0, 1]. Unbounded counters report full.
    pub fn progress(&self) -> f64 {
        let Some(end) = self.end_row else {
            return 1.0;
        };
        let total = f64::from(end) - f64::from(self.start_row);
        if total <= 0.0 {
            return 1.0;
        }
        let done = f64::from(self.current_row) - f64::from(self.start_row);
        (done / total).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(current_row: u32, start_row: u32, end_row: Option<u32>) -> RowCounter {
        RowCounter {
            id: "c1".to_string(),
            name: String::new(),
            current_row,
            start_row,
            end_row,
        }
    }

    #[test]
    fn test_create_without_end_is_unbounded() {
        for start in 1..50u32 {
            let created = RowCounter::create("Body", &start.to_string(), "").unwrap();
            assert_eq!(created.end_row, None);
            assert_eq!(created.current_row, start);
            assert_eq!(created.start_row, start);
            assert!(created.is_unbounded());
        }
    }

    #[test]
    fn test_create_rejects_bad_bounds() {
        assert_eq!(
            RowCounter::create("", "0", "").unwrap_err(),
            ValidationError::StartNotPositive
        );
        assert_eq!(
            RowCounter::create("", "5", "5").unwrap_err(),
            ValidationError::EndNotAfterStart
        );
        assert_eq!(
            RowCounter::create("", "5", "0").unwrap_err(),
            ValidationError::EndNotPositive
        );
    }

    #[test]
    fn test_increment_overshoots_end() {
        let mut c = counter(10, 1, Some(10));
        c.increment();
        assert_eq!(c.current_row, 11);
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let mut c = counter(1, 1, None);
        c.decrement();
        assert_eq!(c.current_row, 0);
        c.decrement();
        assert_eq!(c.current_row, 0);

        for start in 0..5u32 {
            let mut c = counter(start, 1, Some(20));
            for _ in 0..10 {
                c.decrement();
            }
            assert_eq!(c.current_row, 0);
        }
    }

    #[test]
    fn test_edit_keeps_progress_and_id() {
        let mut c = RowCounter::create("Sleeve", "1", "40").unwrap();
        let id = c.id.clone();
        for _ in 0..6 {
            c.increment();
        }
        c.edit("Left sleeve", "2", "").unwrap();
        assert_eq!(c.id, id);
        assert_eq!(c.current_row, 7);
        assert_eq!(c.start_row, 2);
        assert_eq!(c.end_row, None);
        assert_eq!(c.name, "Left sleeve");
    }

    #[test]
    fn test_failed_edit_leaves_counter_untouched() {
        let mut c = RowCounter::create("Sleeve", "1", "40").unwrap();
        let before = c.clone();
        assert_eq!(c.edit("x", "10", "2"), Err(ValidationError::EndNotAfterStart));
        assert_eq!(c, before);
    }

    #[test]
    fn test_edit_with_own_values_is_idempotent() {
        let cases = [("Yoke", "1", "60"), ("", "3", ""), ("Cuff", "12", "13")];
        for (name, start, end) in cases {
            let created = RowCounter::create(name, start, end).unwrap();
            let mut edited = created.clone();
            edited.edit(name, start, end).unwrap();
            assert_eq!(edited, created);
        }
    }

    #[test]
    fn test_display_name_and_end_label() {
        let mut c = counter(1, 1, None);
        assert_eq!(c.display_name(), "row counter");
        assert_eq!(c.end_label(), "∞");
        c.name = "Hem".to_string();
        c.end_row = Some(30);
        assert_eq!(c.display_name(), "Hem");
        assert_eq!(c.end_label(), "30");
    }

    #[test]
    fn test_progress() {
        assert_eq!(counter(5, 1, None).progress(), 1.0);
        assert_eq!(counter(1, 1, Some(11)).progress(), 0.0);
        assert_eq!(counter(6, 1, Some(11)).progress(), 0.5);
        assert_eq!(counter(20, 1, Some(11)).progress(), 1.0);
        assert_eq!(counter(0, 1, Some(11)).progress(), 0.0);
    }
}
