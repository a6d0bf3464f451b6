//! Counter Board
//!
//! In-memory counter editing for an open pattern, with background persistence.

mod action;
mod counter_board;
mod form;
mod save_guard;
mod service;
mod ui;

pub use action::CounterAction;
pub use counter_board::CounterBoard;
pub use form::{EditForm, RowCounterForm, ShapeCounterForm};
pub use save_guard::{SaveGuard, SaveOutcome};
pub use service::CounterService;
pub use ui::{CounterMode, DialogEvent, PanelState, SWIPE_THRESHOLD};
