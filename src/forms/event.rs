use super::{error_line, field_line, footer_line, render_modal, DateInput, TextInput, TimeInput};
use crate::model::{Event, Id};
use crate::store::EventDraft;
use crate::theme::DIM_STYLE;
use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use time::Date;

const OUTER_WIDTH: u16 = 46;

const REQUIRED_MSG: &str = "date, start time, and content are required";
const BAD_DATE_MSG: &str = "date must be a real calendar date";
const BAD_TIME_MSG: &str = "times must be valid HH:MM";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    Date,
    Start,
    End,
    Content,
    Category,
}

impl Field {
    fn next(self) -> Field {
        match self {
            Field::Date => Field::Start,
            Field::Start => Field::End,
            Field::End => Field::Content,
            Field::Content => Field::Category,
            Field::Category => Field::Date,
        }
    }

    fn previous(self) -> Field {
        match self {
            Field::Date => Field::Category,
            Field::Start => Field::Date,
            Field::End => Field::Start,
            Field::Content => Field::End,
            Field::Category => Field::Content,
        }
    }
}

/// The add/edit-event modal.  `categories` is a snapshot of the store's
/// category table taken when the form opens.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventForm {
    editing: Option<Id>,
    date: DateInput,
    start: TimeInput,
    end: TimeInput,
    content: TextInput,
    category: Option<usize>,
    categories: Vec<(Id, String)>,
    field: Field,
    error: Option<&'static str>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum EventFormOutput {
    Ok,
    Invalid,
    Cancel,
    Submit(EventDraft),
}

impl EventForm {
    pub(crate) fn create(date: Date, categories: Vec<(Id, String)>) -> EventForm {
        EventForm {
            editing: None,
            date: DateInput::from_date(date),
            start: TimeInput::default(),
            end: TimeInput::default(),
            content: TextInput::default(),
            category: None,
            categories,
            field: Field::Date,
            error: None,
        }
    }

    pub(crate) fn edit(event: &Event, categories: Vec<(Id, String)>) -> EventForm {
        let category = event
            .category
            .and_then(|id| categories.iter().position(|&(cid, _)| cid == id));
        EventForm {
            editing: Some(event.id),
            date: DateInput::from_date(event.date),
            start: TimeInput::from_time(event.start),
            end: event.end.map(TimeInput::from_time).unwrap_or_default(),
            content: TextInput::from_text(&event.content),
            category,
            categories,
            field: Field::Date,
            error: None,
        }
    }

    pub(crate) fn editing(&self) -> Option<Id> {
        self.editing
    }

    fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Event"
        } else {
            "New Event"
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyCode) -> EventFormOutput {
        match key {
            KeyCode::Esc => EventFormOutput::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.field = self.field.next();
                self.error = None;
                EventFormOutput::Ok
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = self.field.previous();
                self.error = None;
                EventFormOutput::Ok
            }
            KeyCode::Enter => self.submit(),
            key => {
                let handled = match self.field {
                    Field::Date => handle_masked_key(key, &mut self.date),
                    Field::Start => handle_time_key(key, &mut self.start),
                    Field::End => handle_time_key(key, &mut self.end),
                    Field::Content => handle_text_key(key, &mut self.content),
                    Field::Category => self.handle_category_key(key),
                };
                if handled {
                    self.error = None;
                    EventFormOutput::Ok
                } else {
                    EventFormOutput::Invalid
                }
            }
        }
    }

    // Cycle None -> first -> ... -> last -> None.
    fn handle_category_key(&mut self, key: KeyCode) -> bool {
        if self.categories.is_empty() {
            return false;
        }
        match key {
            KeyCode::Right | KeyCode::Char(' ') => {
                self.category = match self.category {
                    None => Some(0),
                    Some(i) if i + 1 < self.categories.len() => Some(i + 1),
                    Some(_) => None,
                };
                true
            }
            KeyCode::Left => {
                self.category = match self.category {
                    None => Some(self.categories.len() - 1),
                    Some(0) => None,
                    Some(i) => Some(i - 1),
                };
                true
            }
            _ => false,
        }
    }

    fn submit(&mut self) -> EventFormOutput {
        if !self.date.is_complete() || self.start.is_empty() || self.content.is_blank() {
            self.error = Some(REQUIRED_MSG);
            return EventFormOutput::Invalid;
        }
        let Some(date) = self.date.value() else {
            self.error = Some(BAD_DATE_MSG);
            return EventFormOutput::Invalid;
        };
        let Some(start) = self.start.value() else {
            self.error = Some(BAD_TIME_MSG);
            return EventFormOutput::Invalid;
        };
        let end = if self.end.is_empty() {
            None
        } else {
            match self.end.value() {
                Some(end) => Some(end),
                None => {
                    self.error = Some(BAD_TIME_MSG);
                    return EventFormOutput::Invalid;
                }
            }
        };
        EventFormOutput::Submit(EventDraft {
            date,
            start,
            end,
            content: self.content.trimmed(),
            category: self.category.map(|i| self.categories[i].0),
        })
    }

    fn category_spans(&self) -> Vec<Span<'static>> {
        let focused = self.field == Field::Category;
        let label = match self.category {
            None => "(none)".to_owned(),
            Some(i) => self.categories[i].1.clone(),
        };
        let mut spans = TextInput::from_text(&label).spans(false);
        if focused {
            spans.push(Span::styled("  ◂ ▸", DIM_STYLE));
        }
        spans
    }
}

impl Widget for &EventForm {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line<'static>> = vec![
            field_line("Date", self.field == Field::Date, self.date.spans(self.field == Field::Date)),
            field_line("Start", self.field == Field::Start, self.start.spans(self.field == Field::Start)),
            field_line("End", self.field == Field::End, self.end.spans(self.field == Field::End)),
            field_line("Content", self.field == Field::Content, self.content.spans(self.field == Field::Content)),
            field_line("Category", self.field == Field::Category, self.category_spans()),
            Line::raw(""),
            error_line(self.error),
            footer_line(),
        ];
        render_modal(self.title(), lines, OUTER_WIDTH, area, buf);
    }
}

pub(super) fn handle_masked_key(key: KeyCode, input: &mut DateInput) -> bool {
    match key {
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            let digit = u8::try_from(ch.to_digit(10).expect("checked ascii digit"))
                .expect("decimal digit fits in u8");
            input.push_digit(digit)
        }
        KeyCode::Backspace | KeyCode::Delete => input.backspace(),
        _ => false,
    }
}

pub(super) fn handle_time_key(key: KeyCode, input: &mut TimeInput) -> bool {
    match key {
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            let digit = u8::try_from(ch.to_digit(10).expect("checked ascii digit"))
                .expect("decimal digit fits in u8");
            input.push_digit(digit)
        }
        KeyCode::Backspace | KeyCode::Delete => input.backspace(),
        _ => false,
    }
}

pub(super) fn handle_text_key(key: KeyCode, input: &mut TextInput) -> bool {
    match key {
        KeyCode::Char(ch) => {
            input.push_char(ch);
            true
        }
        KeyCode::Backspace => input.backspace(),
        _ => false,
    }
}
