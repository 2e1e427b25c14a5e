use super::month::MonthPage;
use super::{DayMarks, MarkSource};
use crate::theme::{SELECTED_DAY_STYLE, TODAY_STYLE, TODO_DONE_STYLE, TODO_PENDING_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::Text,
    widgets::{Paragraph, Widget},
};
use time::Date;

static HEADER: &str = " Su     Mo     Tu     We     Th     Fr     Sa ";

/// Width of the grid in columns, not counting the side margins
const MAIN_WIDTH: u16 = 46;

const LEFT_MARGIN: u16 = 2;

const RIGHT_MARGIN: u16 = 2;

pub(crate) const TOTAL_WIDTH: u16 = LEFT_MARGIN + MAIN_WIDTH + RIGHT_MARGIN;

/// Number of lines taken up by the month/year title
const TITLE_LINES: u16 = 1;

/// Number of lines taken up by the weekday header and its rule
const HEADER_LINES: u16 = 2;

/// Number of lines taken up by each week of the grid
const WEEK_LINES: u16 = 2;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Event marks drawn under a day's number before the todo mark
const EVENT_MARK_SLOTS: u16 = 3;

const ACS_HLINE: char = '─';
const EVENT_MARK: char = '•';
const TODO_PENDING_MARK: char = '○';
const TODO_DONE_MARK: char = '✓';

/// One month page of the planner, with per-day event/todo marks.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MonthView<'a, S> {
    page: MonthPage,
    today: Date,
    selected: Option<Date>,
    marks: &'a S,
}

impl<'a, S> MonthView<'a, S> {
    pub(crate) fn new(
        page: MonthPage,
        today: Date,
        selected: Option<Date>,
        marks: &'a S,
    ) -> MonthView<'a, S> {
        MonthView {
            page,
            today,
            selected,
            marks,
        }
    }

    fn show_day(&self, date: Date) -> (String, Style) {
        if self.selected == Some(date) {
            (format!("[{:2}]", date.day()), SELECTED_DAY_STYLE)
        } else if date == self.today {
            (format!(" {:2} ", date.day()), TODAY_STYLE)
        } else {
            (format!(" {:2} ", date.day()), Style::new())
        }
    }
}

impl<S: MarkSource> Widget for MonthView<'_, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let left = (area.width.saturating_sub(MAIN_WIDTH) / 2).max(LEFT_MARGIN) - LEFT_MARGIN;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(left),
                Constraint::Length(TOTAL_WIDTH.min(area.width)),
                Constraint::Min(0),
            ])
            .split(area);
        let mut canvas = BufferCanvas::new(chunks[1], buf);
        canvas.draw_title(&self.page.title());
        canvas.draw_header();
        for (idx, cell) in self.page.cells().enumerate() {
            let Some(date) = cell else {
                continue;
            };
            let week_no = u16::try_from(idx / 7).unwrap_or(u16::MAX);
            let wd = u16::try_from(idx % 7).expect("weekday index is below seven");
            let (text, style) = self.show_day(date);
            canvas.draw_day(week_no, wd, &text, style);
            canvas.draw_marks(week_no, wd, &self.marks.day_marks(date));
        }
    }
}

#[derive(Debug)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> BufferCanvas<'a> {
        BufferCanvas { area, buf }
    }

    fn draw_title(&mut self, title: &str) {
        let width = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);
        let x = TOTAL_WIDTH.saturating_sub(width) / 2;
        self.mvprint(0, x, title, Some(Style::new().bold()));
    }

    fn draw_header(&mut self) {
        self.mvprint(TITLE_LINES, LEFT_MARGIN, HEADER, Some(Style::new().bold()));
        self.hline(TITLE_LINES + 1, LEFT_MARGIN, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, wd: u16, text: &str, style: Style) {
        self.mvprint(
            week_no * WEEK_LINES + TITLE_LINES + HEADER_LINES,
            LEFT_MARGIN + DAY_WIDTH * wd,
            text,
            Some(style),
        );
    }

    // Marks go on the spacer line below the day's number: up to
    // EVENT_MARK_SLOTS tinted event dots, then one todo mark.
    fn draw_marks(&mut self, week_no: u16, wd: u16, marks: &DayMarks) {
        let y = week_no * WEEK_LINES + TITLE_LINES + HEADER_LINES + 1;
        let x = LEFT_MARGIN + DAY_WIDTH * wd;
        for (i, &color) in marks
            .events
            .iter()
            .take(usize::from(EVENT_MARK_SLOTS))
            .enumerate()
        {
            let i = u16::try_from(i).expect("mark slot index is below EVENT_MARK_SLOTS");
            self.mvprint(
                y,
                x + i,
                String::from(EVENT_MARK),
                Some(Style::new().fg(color)),
            );
        }
        if marks.pending_todos > 0 {
            self.mvprint(
                y,
                x + EVENT_MARK_SLOTS,
                String::from(TODO_PENDING_MARK),
                Some(TODO_PENDING_STYLE),
            );
        } else if marks.completed_todos > 0 {
            self.mvprint(
                y,
                x + EVENT_MARK_SLOTS,
                String::from(TODO_DONE_MARK),
                Some(TODO_DONE_STYLE),
            );
        }
    }

    fn mvprint<T: AsRef<str>>(&mut self, y: u16, x: u16, s: T, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // grid's area, though we need to be sure that the Rect passed to
            // the Paragraph is entirely within the frame lest a panic result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
