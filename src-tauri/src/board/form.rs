//! Counter Forms
//!
//! Raw text inputs for the add/edit dialogs. Values stay as strings until
//! the counter model validates them.

use serde::{Deserialize, Serialize};

use crate::domain::{Counter, RowCounter, ShapeCounter};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounterForm {
    pub name: String,
    pub start_row: String,
    /// Empty means unbounded
    pub end_row: String,
}

impl RowCounterForm {
    /// Pre-fill the edit dialog. An unbounded end becomes an empty field.
    pub fn from_counter(counter: &RowCounter) -> Self {
        Self {
            name: counter.name.clone(),
            start_row: counter.start_row.to_string(),
            end_row: counter.end_row.map(|end| end.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCounterForm {
    pub name: String,
    pub times: String,
    pub rows: String,
    /// Only read when adding; editing keeps the counter's link state
    #[serde(default)]
    pub is_linked: bool,
}

impl ShapeCounterForm {
    pub fn from_counter(counter: &ShapeCounter) -> Self {
        Self {
            name: counter.name.clone(),
            times: counter.max_times.to_string(),
            rows: counter.max_rows.to_string(),
            is_linked: counter.is_linked,
        }
    }
}

/// Pre-filled edit dialog for either counter kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EditForm {
    Row(RowCounterForm),
    Shape(ShapeCounterForm),
}

impl EditForm {
    pub fn from_counter(counter: &Counter) -> Self {
        match counter {
            Counter::Row(row) => EditForm::Row(RowCounterForm::from_counter(row)),
            Counter::Shape(shape) => EditForm::Shape(ShapeCounterForm::from_counter(shape)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_end_prefills_empty() {
        let counter = RowCounter::create("Sleeve", "3", "").unwrap();
        let form = RowCounterForm::from_counter(&counter);
        assert_eq!(form.start_row, "3");
        assert_eq!(form.end_row, "");
    }

    #[test]
    fn test_untouched_row_form_round_trips() {
        let mut counter = RowCounter::create("Body", "1", "80").unwrap();
        counter.increment();
        let before = counter.clone();

        let form = RowCounterForm::from_counter(&counter);
        counter.edit(form.name, &form.start_row, &form.end_row).unwrap();
        assert_eq!(counter, before);
    }

    #[test]
    fn test_shape_form_prefills_maxima() {
        let counter = ShapeCounter::create("", "6", "4", true).unwrap();
        let form = ShapeCounterForm::from_counter(&counter);
        assert_eq!((form.times.as_str(), form.rows.as_str()), ("6", "4"));
        assert!(form.is_linked);
    }
}
