use crate::forms::render_modal;
use crate::model::Id;
use crate::theme::DIM_STYLE;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

const OUTER_WIDTH: u16 = 44;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DeleteTarget {
    Event(Id),
    Todo(Id),
    Category(Id),
}

/// The yes/no dialog shown before any deletion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ConfirmDelete {
    target: DeleteTarget,
    label: String,
}

impl ConfirmDelete {
    pub(crate) fn new(target: DeleteTarget, label: String) -> ConfirmDelete {
        ConfirmDelete { target, label }
    }

    pub(crate) fn target(&self) -> DeleteTarget {
        self.target
    }
}

impl Widget for &ConfirmDelete {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::raw(format!("Delete {}?", self.label)),
            Line::raw(""),
            Line::from(Span::styled("[y] delete   [n] keep", DIM_STYLE)).centered(),
        ];
        render_modal("Confirm", lines, OUTER_WIDTH, area, buf);
    }
}
