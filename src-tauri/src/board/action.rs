//! Counter Actions
//!
//! Every user gesture on the counter board, as data. Sent over IPC as
//! `{ "action": "increment_row", "id": "..." }` and friends.

use serde::{Deserialize, Serialize};

use super::form::{RowCounterForm, ShapeCounterForm};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CounterAction {
    IncrementRow { id: String },
    DecrementRow { id: String },
    IncrementTimes { id: String },
    DecrementTimes { id: String },
    IncrementRows { id: String },
    DecrementRows { id: String },
    ToggleLinked { id: String },
    AddRow { form: RowCounterForm },
    AddShape { form: ShapeCounterForm },
    EditRow { id: String, form: RowCounterForm },
    EditShape { id: String, form: ShapeCounterForm },
    Delete { id: String },
    Reorder { from: usize, to: isize },
}

impl CounterAction {
    /// Add and edit actions close their dialog when they succeed
    pub fn closes_dialog(&self) -> bool {
        matches!(
            self,
            CounterAction::AddRow { .. }
                | CounterAction::AddShape { .. }
                | CounterAction::EditRow { .. }
                | CounterAction::EditShape { .. }
        )
    }
}
