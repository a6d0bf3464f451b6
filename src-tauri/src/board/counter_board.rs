//! Counter Board
//!
//! One pattern's counters held in memory together with the panel and dialog
//! state. Actions apply atomically: on error nothing changes.

use serde::Serialize;

use crate::domain::{reorder_in_place, Counter, DomainError, DomainResult, RowCounter, ShapeCounter};
use super::action::CounterAction;
use super::form::EditForm;
use super::ui::{CounterMode, PanelState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterBoard {
    pub pattern_id: String,
    pub counters: Vec<Counter>,
    pub mode: CounterMode,
    pub panel: PanelState,
    /// Bumped on every change to `counters`
    pub revision: u64,
}

impl CounterBoard {
    pub fn new(pattern_id: impl Into<String>, counters: Vec<Counter>) -> Self {
        Self {
            pattern_id: pattern_id.into(),
            counters,
            mode: CounterMode::Idle,
            panel: PanelState::default(),
            revision: 0,
        }
    }

    /// Board for a freshly opened pattern. A pattern with no counters gets the
    /// starter row counter, which counts as an unsaved change.
    pub fn seeded(pattern_id: impl Into<String>, counters: Vec<Counter>) -> Self {
        let mut board = Self::new(pattern_id, counters);
        if board.counters.is_empty() {
            board.counters.push(RowCounter::starter().into());
            board.revision = 1;
        }
        board
    }

    pub fn get(&self, id: &str) -> Option<&Counter> {
        self.counters.iter().find(|c| c.id_str() == id)
    }

    pub fn swipe(&mut self, dy: f64) {
        self.panel = self.panel.swipe(dy);
    }

    /// Counters rendered at the current panel height
    pub fn visible(&self) -> &[Counter] {
        let count = self.panel.visible_count().min(self.counters.len());
        &self.counters[..count]
    }

    /// Open the edit dialog for a counter and return its pre-filled form
    pub fn begin_edit(&mut self, id: &str) -> DomainResult<EditForm> {
        let counter = self
            .counters
            .iter()
            .find(|c| c.id_str() == id)
            .ok_or_else(|| DomainError::NotFound(format!("Counter {} not found", id)))?;
        let form = EditForm::from_counter(counter);
        self.mode.begin_edit(counter);
        Ok(form)
    }

    /// Apply a user action. Returns whether the counters changed.
    pub fn apply(&mut self, action: CounterAction) -> DomainResult<bool> {
        let closes_dialog = action.closes_dialog();
        let mut next = self.counters.clone();
        apply_to(&mut next, action)?;

        if closes_dialog {
            self.mode.cancel();
        }
        if next == self.counters {
            return Ok(false);
        }
        self.counters = next;
        self.revision += 1;
        Ok(true)
    }
}

fn position(counters: &[Counter], id: &str) -> DomainResult<usize> {
    counters
        .iter()
        .position(|c| c.id_str() == id)
        .ok_or_else(|| DomainError::NotFound(format!("Counter {} not found", id)))
}

fn row_mut<'a>(counters: &'a mut [Counter], id: &str) -> DomainResult<&'a mut RowCounter> {
    let index = position(counters, id)?;
    match &mut counters[index] {
        Counter::Row(row) => Ok(row),
        Counter::Shape(_) => Err(DomainError::InvalidInput(format!(
            "Counter {} is not a row counter",
            id
        ))),
    }
}

fn shape_mut<'a>(counters: &'a mut [Counter], id: &str) -> DomainResult<&'a mut ShapeCounter> {
    let index = position(counters, id)?;
    match &mut counters[index] {
        Counter::Shape(shape) => Ok(shape),
        Counter::Row(_) => Err(DomainError::InvalidInput(format!(
            "Counter {} is not a shape counter",
            id
        ))),
    }
}

fn apply_to(counters: &mut Vec<Counter>, action: CounterAction) -> DomainResult<()> {
    match action {
        CounterAction::IncrementRow { id } => row_mut(counters, &id)?.increment(),
        CounterAction::DecrementRow { id } => row_mut(counters, &id)?.decrement(),
        CounterAction::IncrementTimes { id } => shape_mut(counters, &id)?.increment_times(),
        CounterAction::DecrementTimes { id } => shape_mut(counters, &id)?.decrement_times(),
        CounterAction::IncrementRows { id } => shape_mut(counters, &id)?.increment_rows(),
        CounterAction::DecrementRows { id } => shape_mut(counters, &id)?.decrement_rows(),
        CounterAction::ToggleLinked { id } => shape_mut(counters, &id)?.toggle_linked(),
        CounterAction::AddRow { form } => {
            let row = RowCounter::create(form.name, &form.start_row, &form.end_row)?;
            counters.push(row.into());
        }
        CounterAction::AddShape { form } => {
            let shape = ShapeCounter::create(form.name, &form.times, &form.rows, form.is_linked)?;
            counters.push(shape.into());
        }
        CounterAction::EditRow { id, form } => {
            row_mut(counters, &id)?.edit(form.name, &form.start_row, &form.end_row)?;
        }
        CounterAction::EditShape { id, form } => {
            shape_mut(counters, &id)?.edit(form.name, &form.times, &form.rows)?;
        }
        CounterAction::Delete { id } => {
            let index = position(counters, &id)?;
            counters.remove(index);
        }
        CounterAction::Reorder { from, to } => {
            if from >= counters.len() {
                return Err(DomainError::InvalidInput(format!(
                    "Cannot move counter {} of {}",
                    from,
                    counters.len()
                )));
            }
            reorder_in_place(counters, from, to);
        }
    }
    Ok(())
}
