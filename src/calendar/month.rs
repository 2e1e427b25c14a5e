use std::iter::repeat;
use thiserror::Error;
use time::{Date, Duration, Month};

/// One page of the calendar: a single year/month.
///
/// Invariant: `first` is always the first day of its month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthPage {
    first: Date,
}

impl MonthPage {
    pub(crate) fn containing(date: Date) -> MonthPage {
        MonthPage {
            first: date
                .replace_day(1)
                .expect("day 1 is valid in every month"),
        }
    }

    pub(crate) fn year(&self) -> i32 {
        self.first.year()
    }

    pub(crate) fn month(&self) -> Month {
        self.first.month()
    }

    pub(crate) fn last(&self) -> Date {
        self.first
            .replace_day(self.day_count())
            .expect("day_count() is a valid day of its own month")
    }

    /// Number of blank cells before day 1, i.e. the weekday index
    /// (0 = Sunday) of the first of the month.
    pub(crate) fn leading_blanks(&self) -> usize {
        usize::from(self.first.weekday().number_days_from_sunday())
    }

    pub(crate) fn day_count(&self) -> u8 {
        time::util::days_in_month(self.month(), self.year())
    }

    /// The grid's cells: leading blanks followed by the month's days.
    /// Trailing blanks are a rendering concern and are not produced.
    pub(crate) fn cells(self) -> impl Iterator<Item = Option<Date>> {
        let days = (1..=self.day_count()).map(move |day| {
            Some(
                self.first
                    .replace_day(day)
                    .expect("every day up to day_count() is valid"),
            )
        });
        repeat(None).take(self.leading_blanks()).chain(days)
    }

    /// Rows of seven cells needed to lay the page out.
    pub(crate) fn week_rows(&self) -> u16 {
        let cells = self.leading_blanks() + usize::from(self.day_count());
        u16::try_from(cells.div_ceil(7)).expect("a month spans at most six rows")
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.first <= date && date <= self.last()
    }

    /// The date in this month with the given day number, clamped to the
    /// month's length.  Used to carry the selection across page flips.
    pub(crate) fn clamp_day(&self, day: u8) -> Date {
        self.first
            .replace_day(day.clamp(1, self.day_count()))
            .expect("clamped day is valid")
    }

    pub(crate) fn forward(self) -> Result<MonthPage, EndOfCalendarError> {
        match self.last().next_day() {
            Some(first) => Ok(MonthPage { first }),
            None => Err(EndOfCalendarError),
        }
    }

    pub(crate) fn backward(self) -> Result<MonthPage, EndOfCalendarError> {
        match self.first.previous_day() {
            Some(prev) => Ok(MonthPage::containing(prev)),
            None => Err(EndOfCalendarError),
        }
    }

    /// "August 2026"
    pub(crate) fn title(&self) -> String {
        format!("{} {}", self.month(), self.year())
    }
}

/// Navigation ran off either end of the supported date range.
#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of the calendar")]
pub(crate) struct EndOfCalendarError;

/// Step a date by whole days, staying within the calendar.
pub(crate) fn step_days(date: Date, days: i64) -> Result<Date, EndOfCalendarError> {
    date.checked_add(Duration::days(days))
        .ok_or(EndOfCalendarError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_february_leap_and_common() {
        assert_eq!(MonthPage::containing(date!(2024 - 02 - 10)).day_count(), 29);
        assert_eq!(MonthPage::containing(date!(2023 - 02 - 10)).day_count(), 28);
    }

    #[test]
    fn test_cell_count_is_blanks_plus_days() {
        for year in [2023, 2024, 2026] {
            let mut page = MonthPage::containing(
                Date::from_calendar_date(year, Month::January, 1).unwrap(),
            );
            for _ in 0..12 {
                let expected = page.leading_blanks() + usize::from(page.day_count());
                assert_eq!(page.cells().count(), expected, "{}", page.title());
                let blanks = page.cells().take_while(Option::is_none).count();
                assert_eq!(blanks, page.leading_blanks(), "{}", page.title());
                page = page.forward().unwrap();
            }
        }
    }

    #[test]
    fn test_leading_blanks() {
        // 2026-08-01 is a Saturday; 2026-02-01 is a Sunday.
        assert_eq!(MonthPage::containing(date!(2026 - 08 - 15)).leading_blanks(), 6);
        assert_eq!(MonthPage::containing(date!(2026 - 02 - 15)).leading_blanks(), 0);
    }

    #[test]
    fn test_cells_enumerate_days_in_order() {
        let page = MonthPage::containing(date!(2026 - 02 - 01));
        let days = page.cells().flatten().collect::<Vec<_>>();
        assert_eq!(days.len(), 28);
        assert_eq!(days[0], date!(2026 - 02 - 01));
        assert_eq!(days[27], date!(2026 - 02 - 28));
    }

    #[test]
    fn test_week_rows() {
        // 28 days starting on Sunday fit exactly four rows.
        assert_eq!(MonthPage::containing(date!(2026 - 02 - 01)).week_rows(), 4);
        // 31 days with six leading blanks spill into a sixth row.
        assert_eq!(MonthPage::containing(date!(2026 - 08 - 01)).week_rows(), 6);
    }

    #[test]
    fn test_navigation_across_year_boundary() {
        let page = MonthPage::containing(date!(2026 - 01 - 20));
        let prev = page.backward().unwrap();
        assert_eq!((prev.year(), prev.month()), (2025, Month::December));
        let next = prev.forward().unwrap();
        assert_eq!((next.year(), next.month()), (2026, Month::January));
    }

    #[test]
    fn test_clamp_day() {
        let feb = MonthPage::containing(date!(2023 - 02 - 01));
        assert_eq!(feb.clamp_day(31), date!(2023 - 02 - 28));
        assert_eq!(feb.clamp_day(15), date!(2023 - 02 - 15));
    }

    #[test]
    fn test_contains() {
        let page = MonthPage::containing(date!(2026 - 08 - 06));
        assert!(page.contains(date!(2026 - 08 - 01)));
        assert!(page.contains(date!(2026 - 08 - 31)));
        assert!(!page.contains(date!(2026 - 09 - 01)));
        assert!(!page.contains(date!(2026 - 07 - 31)));
    }

    #[test]
    fn test_step_days() {
        assert_eq!(
            step_days(date!(2026 - 08 - 31), 1),
            Ok(date!(2026 - 09 - 01))
        );
        assert_eq!(
            step_days(date!(2024 - 03 - 01), -1),
            Ok(date!(2024 - 02 - 29))
        );
        assert_eq!(step_days(Date::MAX, 1), Err(EndOfCalendarError));
    }

    #[test]
    fn test_title() {
        assert_eq!(MonthPage::containing(date!(2026 - 08 - 06)).title(), "August 2026");
    }
}
