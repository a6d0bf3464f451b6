//! Board UI State
//!
//! The counter panel's height and the add/edit dialog flow.

use serde::{Deserialize, Serialize};

use crate::domain::Counter;

/// Vertical drag distance (in px) a swipe must exceed to change the panel
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// Counters shown before the expanded panel starts scrolling
const EXPANDED_VISIBLE: usize = 3;

/// Height of the counter panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    Collapsed,
    #[default]
    Partial,
    Expanded,
}

impl PanelState {
    /// Next state after a vertical drag of `dy` px. Negative is upward.
    pub fn swipe(self, dy: f64) -> Self {
        if dy < -SWIPE_THRESHOLD {
            match self {
                PanelState::Collapsed => PanelState::Partial,
                PanelState::Partial | PanelState::Expanded => PanelState::Expanded,
            }
        } else if dy > SWIPE_THRESHOLD {
            match self {
                PanelState::Expanded => PanelState::Partial,
                PanelState::Partial | PanelState::Collapsed => PanelState::Collapsed,
            }
        } else {
            self
        }
    }

    /// Number of counters rendered
    pub fn visible_count(self) -> usize {
        match self {
            PanelState::Collapsed => 0,
            PanelState::Partial => 1,
            PanelState::Expanded => EXPANDED_VISIBLE,
        }
    }

    pub fn scrolls(self, len: usize) -> bool {
        self == PanelState::Expanded && len > EXPANDED_VISIBLE
    }
}

/// Which dialog, if any, is open
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum CounterMode {
    #[default]
    Idle,
    /// Choosing between a row and a shape counter
    Menu,
    AddRow,
    AddShape,
    EditRow(String),
    EditShape(String),
}

impl CounterMode {
    pub fn open_menu(&mut self) {
        *self = CounterMode::Menu;
    }

    pub fn choose_row(&mut self) {
        if *self == CounterMode::Menu {
            *self = CounterMode::AddRow;
        }
    }

    pub fn choose_shape(&mut self) {
        if *self == CounterMode::Menu {
            *self = CounterMode::AddShape;
        }
    }

    pub fn begin_edit(&mut self, counter: &Counter) {
        *self = match counter {
            Counter::Row(row) => CounterMode::EditRow(row.id.clone()),
            Counter::Shape(shape) => CounterMode::EditShape(shape.id.clone()),
        };
    }

    pub fn cancel(&mut self) {
        *self = CounterMode::Idle;
    }

    pub fn is_idle(&self) -> bool {
        *self == CounterMode::Idle
    }

    /// Apply a dialog event that needs no counter lookup
    pub fn handle(&mut self, event: DialogEvent) {
        match event {
            DialogEvent::OpenMenu => self.open_menu(),
            DialogEvent::ChooseRow => self.choose_row(),
            DialogEvent::ChooseShape => self.choose_shape(),
            DialogEvent::Cancel => self.cancel(),
        }
    }
}

/// Dialog navigation sent from the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogEvent {
    OpenMenu,
    ChooseRow,
    ChooseShape,
    Cancel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RowCounter, ShapeCounter};

    #[test]
    fn test_small_swipes_are_ignored() {
        for state in [PanelState::Collapsed, PanelState::Partial, PanelState::Expanded] {
            assert_eq!(state.swipe(50.0), state);
            assert_eq!(state.swipe(-50.0), state);
            assert_eq!(state.swipe(0.0), state);
        }
    }

    #[test]
    fn test_swipe_up_expands_one_step() {
        assert_eq!(PanelState::Collapsed.swipe(-80.0), PanelState::Partial);
        assert_eq!(PanelState::Partial.swipe(-80.0), PanelState::Expanded);
        assert_eq!(PanelState::Expanded.swipe(-80.0), PanelState::Expanded);
    }

    #[test]
    fn test_swipe_down_collapses_one_step() {
        assert_eq!(PanelState::Expanded.swipe(51.0), PanelState::Partial);
        assert_eq!(PanelState::Partial.swipe(51.0), PanelState::Collapsed);
        assert_eq!(PanelState::Collapsed.swipe(51.0), PanelState::Collapsed);
    }

    #[test]
    fn test_visible_counts() {
        assert_eq!(PanelState::Collapsed.visible_count(), 0);
        assert_eq!(PanelState::Partial.visible_count(), 1);
        assert_eq!(PanelState::Expanded.visible_count(), 3);
        assert!(PanelState::Expanded.scrolls(4));
        assert!(!PanelState::Expanded.scrolls(3));
        assert!(!PanelState::Partial.scrolls(10));
    }

    #[test]
    fn test_mode_flow() {
        let mut mode = CounterMode::default();
        mode.choose_row();
        assert!(mode.is_idle());

        mode.open_menu();
        mode.choose_shape();
        assert_eq!(mode, CounterMode::AddShape);

        let shape = Counter::from(ShapeCounter::create("", "2", "2", false).unwrap());
        mode.begin_edit(&shape);
        assert_eq!(mode, CounterMode::EditShape(shape.id_str().to_string()));

        let row = Counter::from(RowCounter::starter());
        mode.begin_edit(&row);
        assert!(matches!(mode, CounterMode::EditRow(_)));

        mode.cancel();
        assert!(mode.is_idle());

        mode.handle(DialogEvent::OpenMenu);
        mode.handle(DialogEvent::ChooseRow);
        assert_eq!(mode, CounterMode::AddRow);
        mode.handle(DialogEvent::Cancel);
        assert!(mode.is_idle());
    }
}
