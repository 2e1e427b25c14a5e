use super::event::{handle_masked_key, handle_text_key};
use super::{error_line, field_line, footer_line, render_modal, DateInput, TextInput};
use crate::model::{Id, Todo};
use crate::store::TodoDraft;
use crossterm::event::KeyCode;
use ratatui::{buffer::Buffer, layout::Rect, text::Line, widgets::Widget};
use time::Date;

const OUTER_WIDTH: u16 = 46;

const REQUIRED_MSG: &str = "date and content are required";
const BAD_DATE_MSG: &str = "date must be a real calendar date";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    Date,
    Content,
}

/// The add/edit-todo modal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct TodoForm {
    editing: Option<Id>,
    date: DateInput,
    content: TextInput,
    field: Field,
    error: Option<&'static str>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum TodoFormOutput {
    Ok,
    Invalid,
    Cancel,
    Submit(TodoDraft),
}

impl TodoForm {
    pub(crate) fn create(date: Date) -> TodoForm {
        TodoForm {
            editing: None,
            date: DateInput::from_date(date),
            content: TextInput::default(),
            field: Field::Content,
            error: None,
        }
    }

    pub(crate) fn edit(todo: &Todo) -> TodoForm {
        TodoForm {
            editing: Some(todo.id),
            date: DateInput::from_date(todo.date),
            content: TextInput::from_text(&todo.content),
            field: Field::Content,
            error: None,
        }
    }

    pub(crate) fn editing(&self) -> Option<Id> {
        self.editing
    }

    fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Todo"
        } else {
            "New Todo"
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyCode) -> TodoFormOutput {
        match key {
            KeyCode::Esc => TodoFormOutput::Cancel,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.field = match self.field {
                    Field::Date => Field::Content,
                    Field::Content => Field::Date,
                };
                self.error = None;
                TodoFormOutput::Ok
            }
            KeyCode::Enter => self.submit(),
            key => {
                let handled = match self.field {
                    Field::Date => handle_masked_key(key, &mut self.date),
                    Field::Content => handle_text_key(key, &mut self.content),
                };
                if handled {
                    self.error = None;
                    TodoFormOutput::Ok
                } else {
                    TodoFormOutput::Invalid
                }
            }
        }
    }

    fn submit(&mut self) -> TodoFormOutput {
        if !self.date.is_complete() || self.content.is_blank() {
            self.error = Some(REQUIRED_MSG);
            return TodoFormOutput::Invalid;
        }
        let Some(date) = self.date.value() else {
            self.error = Some(BAD_DATE_MSG);
            return TodoFormOutput::Invalid;
        };
        TodoFormOutput::Submit(TodoDraft {
            date,
            content: self.content.trimmed(),
        })
    }
}

impl Widget for &TodoForm {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line<'static>> = vec![
            field_line("Date", self.field == Field::Date, self.date.spans(self.field == Field::Date)),
            field_line("Content", self.field == Field::Content, self.content.spans(self.field == Field::Content)),
            Line::raw(""),
            error_line(self.error),
            footer_line(),
        ];
        render_modal(self.title(), lines, OUTER_WIDTH, area, buf);
    }
}
