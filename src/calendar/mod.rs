mod month;
mod widget;
pub(crate) use self::month::{step_days, MonthPage};
pub(crate) use self::widget::{MonthView, TOTAL_WIDTH};
use ratatui::style::Color;
use time::Date;

/// What a day cell shows besides its number: one tinted mark per event
/// plus a todo mark.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct DayMarks {
    /// One tint per event on the day, in start-time order.
    pub(crate) events: Vec<Color>,
    pub(crate) pending_todos: usize,
    pub(crate) completed_todos: usize,
}

/// Supplies per-day decorations to the month view.  Implemented by the
/// record store; tests substitute a stub.
pub(crate) trait MarkSource {
    fn day_marks(&self, date: Date) -> DayMarks;
}
