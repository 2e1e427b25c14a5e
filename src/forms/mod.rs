//! Modal entry forms: shared field inputs plus one module per form.

mod category;
mod event;
mod todo;
pub(crate) use self::category::{CategoryForm, CategoryFormOutput};
pub(crate) use self::event::{EventForm, EventFormOutput};
pub(crate) use self::todo::{TodoForm, TodoFormOutput};

use crate::theme::forms::{FOCUSED_LABEL_STYLE, FOCUSED_VALUE_STYLE, UNFILLED_CELL_STYLE};
use crate::theme::{BASE_STYLE, DIM_STYLE, ERROR_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Widget},
};
use time::{Date, Month, Time};

/// Masked YYYY-MM-DD entry: digits fill left to right, backspace empties
/// right to left.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(super) struct DateInput {
    digits: [Option<u8>; 8],
}

impl DateInput {
    pub(super) fn from_date(date: Date) -> DateInput {
        let year = u16::try_from(date.year()).unwrap_or(0).min(9999);
        let month = u8::from(date.month());
        let day = date.day();
        DateInput {
            digits: [
                Some(u8::try_from(year / 1000 % 10).expect("digit fits in u8")),
                Some(u8::try_from(year / 100 % 10).expect("digit fits in u8")),
                Some(u8::try_from(year / 10 % 10).expect("digit fits in u8")),
                Some(u8::try_from(year % 10).expect("digit fits in u8")),
                Some(month / 10),
                Some(month % 10),
                Some(day / 10),
                Some(day % 10),
            ],
        }
    }

    pub(super) fn push_digit(&mut self, digit: u8) -> bool {
        match self.digits.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(digit);
                true
            }
            None => false,
        }
    }

    pub(super) fn backspace(&mut self) -> bool {
        match self.digits.iter_mut().rev().find(|slot| slot.is_some()) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    pub(super) fn is_complete(&self) -> bool {
        self.digits.iter().all(Option::is_some)
    }

    /// `None` until all eight digits form a real calendar date.
    pub(super) fn value(&self) -> Option<Date> {
        if !self.is_complete() {
            return None;
        }
        let digit = |i: usize| i32::from(self.digits[i].expect("checked complete above"));
        let year = digit(0) * 1000 + digit(1) * 100 + digit(2) * 10 + digit(3);
        let month = Month::try_from(u8::try_from(digit(4) * 10 + digit(5)).ok()?).ok()?;
        let day = u8::try_from(digit(6) * 10 + digit(7)).ok()?;
        Date::from_calendar_date(year, month, day).ok()
    }

    pub(super) fn spans(&self, focused: bool) -> Vec<Span<'static>> {
        masked_spans(
            &[
                ("Y", &self.digits[0..4]),
                ("M", &self.digits[4..6]),
                ("D", &self.digits[6..8]),
            ],
            "-",
            focused,
        )
    }
}

/// Masked HH:MM entry.  May be left entirely empty where a time is
/// optional.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(super) struct TimeInput {
    digits: [Option<u8>; 4],
}

impl TimeInput {
    pub(super) fn from_time(time: Time) -> TimeInput {
        TimeInput {
            digits: [
                Some(time.hour() / 10),
                Some(time.hour() % 10),
                Some(time.minute() / 10),
                Some(time.minute() % 10),
            ],
        }
    }

    pub(super) fn push_digit(&mut self, digit: u8) -> bool {
        match self.digits.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(digit);
                true
            }
            None => false,
        }
    }

    pub(super) fn backspace(&mut self) -> bool {
        match self.digits.iter_mut().rev().find(|slot| slot.is_some()) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    pub(super) fn is_empty(&self) -> bool {
        self.digits.iter().all(Option::is_none)
    }

    pub(super) fn is_complete(&self) -> bool {
        self.digits.iter().all(Option::is_some)
    }

    /// `None` until all four digits form a valid time of day.
    pub(super) fn value(&self) -> Option<Time> {
        if !self.is_complete() {
            return None;
        }
        let digit = |i: usize| self.digits[i].expect("checked complete above");
        let hour = digit(0) * 10 + digit(1);
        let minute = digit(2) * 10 + digit(3);
        Time::from_hms(hour, minute, 0).ok()
    }

    pub(super) fn spans(&self, focused: bool) -> Vec<Span<'static>> {
        masked_spans(
            &[("H", &self.digits[0..2]), ("M", &self.digits[2..4])],
            ":",
            focused,
        )
    }
}

fn masked_spans(
    groups: &[(&'static str, &[Option<u8>])],
    separator: &'static str,
    focused: bool,
) -> Vec<Span<'static>> {
    let filled_style = if focused {
        FOCUSED_VALUE_STYLE
    } else {
        Style::new()
    };
    let mut spans = Vec::new();
    let mut first = true;
    for &(fallback, digits) in groups {
        if !std::mem::replace(&mut first, false) {
            spans.push(Span::styled(separator, filled_style));
        }
        for digit in digits {
            spans.push(match digit {
                Some(d) => Span::styled(format!("{d}"), filled_style),
                None => Span::styled(fallback, UNFILLED_CELL_STYLE),
            });
        }
    }
    spans
}

/// Free-text entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(super) struct TextInput {
    value: String,
}

impl TextInput {
    pub(super) fn from_text(text: &str) -> TextInput {
        TextInput { value: text.into() }
    }

    pub(super) fn push_char(&mut self, ch: char) {
        self.value.push(ch);
    }

    pub(super) fn backspace(&mut self) -> bool {
        self.value.pop().is_some()
    }

    pub(super) fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub(super) fn trimmed(&self) -> String {
        self.value.trim().to_owned()
    }

    pub(super) fn spans(&self, focused: bool) -> Vec<Span<'static>> {
        let style = if focused {
            FOCUSED_VALUE_STYLE
        } else {
            Style::new()
        };
        let mut spans = vec![Span::styled(self.value.clone(), style)];
        if focused {
            spans.push(Span::styled("▏", UNFILLED_CELL_STYLE));
        }
        spans
    }
}

const LABEL_WIDTH: usize = 10;

fn field_line(label: &'static str, focused: bool, value: Vec<Span<'static>>) -> Line<'static> {
    let label_style = if focused {
        FOCUSED_LABEL_STYLE
    } else {
        Style::new()
    };
    let mut spans = vec![Span::styled(
        format!("{label:<width$}", width = LABEL_WIDTH),
        label_style,
    )];
    spans.extend(value);
    Line::from_iter(spans)
}

fn error_line(error: Option<&'static str>) -> Line<'static> {
    match error {
        Some(msg) => Line::styled(msg, ERROR_STYLE),
        None => Line::raw(""),
    }
}

fn footer_line() -> Line<'static> {
    Line::from(Span::styled("[ENTER] save   [ESC] cancel", DIM_STYLE)).centered()
}

/// Draw a centered modal: clear the backdrop, paint the base style,
/// then a bordered block holding the given lines.  Shared with the
/// category manager and the delete confirmation.
pub(crate) fn render_modal(
    title: &str,
    lines: Vec<Line<'static>>,
    width: u16,
    area: Rect,
    buf: &mut Buffer,
) {
    let height = u16::try_from(lines.len())
        .unwrap_or(u16::MAX)
        .saturating_add(4);
    let [outer_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
    let [outer_area] = Layout::vertical([height]).flex(Flex::Center).areas(outer_area);
    Clear.render(outer_area, buf);
    Block::new().style(BASE_STYLE).render(outer_area, buf);
    let block_area = outer_area.inner(Margin::new(1, 1));
    Block::bordered()
        .title(format!(" {title} "))
        .title_alignment(Alignment::Center)
        .render(block_area, buf);
    let text_area = block_area.inner(Margin::new(1, 1));
    Text::from_iter(lines).render(text_area, buf);
}
