use super::event::handle_text_key;
use super::{error_line, field_line, footer_line, render_modal, TextInput};
use crate::model::{Category, Id, Swatch};
use crate::store::CategoryDraft;
use crate::theme::DIM_STYLE;
use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

const OUTER_WIDTH: u16 = 40;

const REQUIRED_MSG: &str = "a name is required";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    Name,
    Color,
}

/// The add/edit-category modal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CategoryForm {
    editing: Option<Id>,
    name: TextInput,
    color: Swatch,
    field: Field,
    error: Option<&'static str>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum CategoryFormOutput {
    Ok,
    Invalid,
    Cancel,
    Submit(CategoryDraft),
}

impl CategoryForm {
    pub(crate) fn create() -> CategoryForm {
        CategoryForm {
            editing: None,
            name: TextInput::default(),
            color: Swatch::Green,
            field: Field::Name,
            error: None,
        }
    }

    pub(crate) fn edit(category: &Category) -> CategoryForm {
        CategoryForm {
            editing: Some(category.id),
            name: TextInput::from_text(&category.name),
            color: category.color,
            field: Field::Name,
            error: None,
        }
    }

    pub(crate) fn editing(&self) -> Option<Id> {
        self.editing
    }

    fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Category"
        } else {
            "New Category"
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyCode) -> CategoryFormOutput {
        match key {
            KeyCode::Esc => CategoryFormOutput::Cancel,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.field = match self.field {
                    Field::Name => Field::Color,
                    Field::Color => Field::Name,
                };
                self.error = None;
                CategoryFormOutput::Ok
            }
            KeyCode::Enter => self.submit(),
            key => {
                let handled = match self.field {
                    Field::Name => handle_text_key(key, &mut self.name),
                    Field::Color => self.handle_color_key(key),
                };
                if handled {
                    self.error = None;
                    CategoryFormOutput::Ok
                } else {
                    CategoryFormOutput::Invalid
                }
            }
        }
    }

    fn handle_color_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Right | KeyCode::Char(' ') => {
                self.color = self.color.next();
                true
            }
            KeyCode::Left => {
                self.color = self.color.previous();
                true
            }
            _ => false,
        }
    }

    fn submit(&mut self) -> CategoryFormOutput {
        if self.name.is_blank() {
            self.error = Some(REQUIRED_MSG);
            return CategoryFormOutput::Invalid;
        }
        CategoryFormOutput::Submit(CategoryDraft {
            name: self.name.trimmed(),
            color: self.color,
        })
    }

    fn color_spans(&self) -> Vec<Span<'static>> {
        let mut spans = vec![
            Span::styled("■ ", Style::new().fg(self.color.color())),
            Span::raw(self.color.name()),
        ];
        if self.field == Field::Color {
            spans.push(Span::styled("  ◂ ▸", DIM_STYLE));
        }
        spans
    }
}

impl Widget for &CategoryForm {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line<'static>> = vec![
            field_line("Name", self.field == Field::Name, self.name.spans(self.field == Field::Name)),
            field_line("Color", self.field == Field::Color, self.color_spans()),
            Line::raw(""),
            error_line(self.error),
            footer_line(),
        ];
        render_modal(self.title(), lines, OUTER_WIDTH, area, buf);
    }
}
