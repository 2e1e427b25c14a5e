use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TODAY_STYLE: Style = Style::new()
    .fg(Color::LightYellow)
    .add_modifier(Modifier::BOLD);

pub(crate) const SELECTED_DAY_STYLE: Style = Style::new().fg(Color::Black).bg(Color::LightCyan);

/// Tint for events whose category is unset or has been deleted.
pub(crate) const DEFAULT_EVENT_COLOR: Color = Color::LightGreen;

pub(crate) const TODO_PENDING_STYLE: Style = Style::new().fg(Color::Yellow);

pub(crate) const TODO_DONE_STYLE: Style = Style::new()
    .fg(Color::DarkGray)
    .add_modifier(Modifier::CROSSED_OUT);

pub(crate) const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);

pub(crate) const ERROR_STYLE: Style = Style::new().fg(Color::LightRed);

pub(crate) const CURSOR_LINE_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

pub(crate) const ACTIVE_TAB_STYLE: Style = Style::new()
    .add_modifier(Modifier::BOLD)
    .add_modifier(Modifier::UNDERLINED);

pub(crate) mod forms {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = Style::new().fg(Color::DarkGray);

    pub(crate) const FOCUSED_LABEL_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

    pub(crate) const FOCUSED_VALUE_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);
}
