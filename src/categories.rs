use crate::forms::render_modal;
use crate::store::Store;
use crate::theme::{CURSOR_LINE_STYLE, DIM_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

const OUTER_WIDTH: u16 = 40;

/// Cursor state for the category manager modal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct CategoryManager {
    cursor: usize,
}

impl CategoryManager {
    pub(crate) fn new() -> CategoryManager {
        CategoryManager::default()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn up(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn down(&mut self, len: usize) -> bool {
        if self.cursor + 1 < len {
            self.cursor += 1;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct CategoryManagerView<'a> {
    pub(crate) manager: &'a CategoryManager,
    pub(crate) store: &'a Store,
}

impl Widget for CategoryManagerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let categories = self.store.categories();
        let mut lines: Vec<Line<'static>> = Vec::new();
        if categories.is_empty() {
            lines.push(Line::styled("no categories yet", DIM_STYLE));
        }
        let cursor = self.manager.cursor().min(categories.len().saturating_sub(1));
        for (i, category) in categories.iter().enumerate() {
            let line = Line::from_iter([
                Span::styled("■ ", Style::new().fg(category.color.color())),
                Span::raw(category.name.clone()),
            ]);
            lines.push(if i == cursor {
                line.style(CURSOR_LINE_STYLE)
            } else {
                line
            });
        }
        lines.push(Line::raw(""));
        lines.push(
            Line::from(Span::styled("[a] add  [e] edit  [d] delete  [ESC] close", DIM_STYLE))
                .centered(),
        );
        render_modal("Categories", lines, OUTER_WIDTH, area, buf);
    }
}
