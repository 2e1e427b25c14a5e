use crate::store::Store;
use crate::theme::{
    ACTIVE_TAB_STYLE, CURSOR_LINE_STYLE, DEFAULT_EVENT_COLOR, DIM_STYLE, TODO_DONE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Widget},
};
use time::Date;

/// Which list the day pane is showing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Tab {
    #[default]
    Events,
    Todos,
}

impl Tab {
    pub(crate) fn other(self) -> Tab {
        match self {
            Tab::Events => Tab::Todos,
            Tab::Todos => Tab::Events,
        }
    }
}

/// The selected day's events and todos, beside the month grid.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DayPane<'a> {
    store: &'a Store,
    date: Option<Date>,
    tab: Tab,
    cursor: usize,
}

impl<'a> DayPane<'a> {
    pub(crate) fn new(store: &'a Store, date: Option<Date>, tab: Tab, cursor: usize) -> DayPane<'a> {
        DayPane {
            store,
            date,
            tab,
            cursor,
        }
    }

    fn tab_bar(&self) -> Line<'static> {
        let style = |tab| {
            if self.tab == tab {
                ACTIVE_TAB_STYLE
            } else {
                DIM_STYLE
            }
        };
        Line::from_iter([
            Span::styled("Events", style(Tab::Events)),
            Span::raw("  │  "),
            Span::styled("Todos", style(Tab::Todos)),
        ])
    }

    fn event_lines(&self, date: Date) -> Vec<Line<'static>> {
        let events = self.store.events_on(date);
        if events.is_empty() {
            return vec![Line::styled("no events", DIM_STYLE)];
        }
        let cursor = self.cursor.min(events.len() - 1);
        events
            .iter()
            .enumerate()
            .map(|(i, event)| {
                let color = event
                    .category
                    .and_then(|id| self.store.category(id))
                    .map_or(DEFAULT_EVENT_COLOR, |c| c.color.color());
                let line = Line::from_iter([
                    Span::styled("• ", Style::new().fg(color)),
                    Span::raw(format!("{}  {}", event.time_range(), event.content)),
                ]);
                if self.tab == Tab::Events && i == cursor {
                    line.style(CURSOR_LINE_STYLE)
                } else {
                    line
                }
            })
            .collect()
    }

    fn todo_lines(&self, date: Date) -> Vec<Line<'static>> {
        let todos = self.store.todos_on(date);
        if todos.is_empty() {
            return vec![Line::styled("no todos", DIM_STYLE)];
        }
        let cursor = self.cursor.min(todos.len() - 1);
        todos
            .iter()
            .enumerate()
            .map(|(i, todo)| {
                let line = if todo.completed {
                    Line::from_iter([
                        Span::raw("[x] "),
                        Span::styled(todo.content.clone(), TODO_DONE_STYLE),
                    ])
                } else {
                    Line::from_iter([Span::raw("[ ] "), Span::raw(todo.content.clone())])
                };
                if self.tab == Tab::Todos && i == cursor {
                    line.style(CURSOR_LINE_STYLE)
                } else {
                    line
                }
            })
            .collect()
    }
}

impl Widget for DayPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.date {
            Some(date) => format!(" {}, {} {} ", date.weekday(), date.month(), date.day()),
            None => " Planner ".to_owned(),
        };
        let block = Block::bordered().title(title);
        let inner = block.inner(area);
        block.render(area, buf);
        let Some(date) = self.date else {
            Paragraph::new("Select a day with the arrow keys.")
                .style(DIM_STYLE)
                .render(inner, buf);
            return;
        };
        let mut lines = vec![self.tab_bar(), Line::raw("")];
        match self.tab {
            Tab::Events => lines.extend(self.event_lines(date)),
            Tab::Todos => lines.extend(self.todo_lines(date)),
        }
        Paragraph::new(Text::from_iter(lines)).render(inner, buf);
    }
}
