//! Lookups consumed by the `agenda`, `upcoming`, `now`, and `todos`
//! subcommands: single-pass filters over one day's records.

use crate::model::{Event, Todo};
use crate::store::Store;
use time::{Date, Duration, PrimitiveDateTime, Time};

/// Assumed length of an event with no recorded end time.
const UNTIMED_EVENT_MINUTES: i64 = 60;

/// How far back a dateless todo search reaches.
const TODO_SEARCH_DAYS: i64 = 30;

pub(crate) const DEFAULT_NEARBY_WINDOW: i64 = 30;

/// One day's worth of planner records.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct DaySchedule<'a> {
    pub(crate) events: Vec<&'a Event>,
    pub(crate) todos: Vec<&'a Todo>,
}

/// The date's events in start-time order and todos in entry order.
pub(crate) fn day_schedule(store: &Store, date: Date) -> DaySchedule<'_> {
    DaySchedule {
        events: store.events_on(date),
        todos: store.todos_on(date),
    }
}

/// Same-day events whose start time is within `window` minutes of the
/// target's time-of-day (inclusive), plus every incomplete todo for the
/// target's date.
pub(crate) fn nearby_items(
    store: &Store,
    target: PrimitiveDateTime,
    window: i64,
) -> DaySchedule<'_> {
    let target_minute = minute_of_day(target.time());
    DaySchedule {
        events: store
            .events_on(target.date())
            .into_iter()
            .filter(|e| (minute_of_day(e.start) - target_minute).abs() <= window)
            .collect(),
        todos: store
            .todos_on(target.date())
            .into_iter()
            .filter(|t| !t.completed)
            .collect(),
    }
}

/// Same-day events whose `[start, end)` interval contains the
/// time-of-day of `now`.  An event with no end time is treated as
/// lasting `UNTIMED_EVENT_MINUTES`.
pub(crate) fn ongoing_events(store: &Store, now: PrimitiveDateTime) -> Vec<&Event> {
    let now_minute = minute_of_day(now.time());
    store
        .events_on(now.date())
        .into_iter()
        .filter(|e| {
            let start = minute_of_day(e.start);
            let end = e
                .end
                .map_or(start + UNTIMED_EVENT_MINUTES, minute_of_day);
            (start..end).contains(&now_minute)
        })
        .collect()
}

/// Todos whose content matches `pattern` case-insensitively, in either
/// direction (the pattern may contain the content or vice versa).  With
/// no date, searches the `TODO_SEARCH_DAYS` days up to `today`.
pub(crate) fn find_todos<'a>(
    store: &'a Store,
    pattern: &str,
    date: Option<Date>,
    today: Date,
) -> Vec<&'a Todo> {
    let todos = match date {
        Some(date) => store.todos_on(date),
        None => {
            let first = today
                .checked_sub(Duration::days(TODO_SEARCH_DAYS))
                .unwrap_or(Date::MIN);
            store.todos_between(first, today)
        }
    };
    let pattern = pattern.trim().to_lowercase();
    todos
        .into_iter()
        .filter(|t| {
            let content = t.content.to_lowercase();
            content.contains(&pattern) || pattern.contains(&content)
        })
        .collect()
}

/// Plain-text rendering of a day's schedule, suitable for handing to an
/// assistant or printing from the CLI.
pub(crate) fn format_schedule(schedule: &DaySchedule<'_>, date: Date) -> String {
    let mut text = format!("{}, {} {}\n\n", date.weekday(), date.month(), date.day());
    text.push_str("Events:\n");
    if schedule.events.is_empty() {
        text.push_str("  (none)\n");
    }
    for event in &schedule.events {
        text.push_str(&format!("  • {}  {}\n", event.time_range(), event.content));
    }
    text.push_str("Todos:\n");
    if schedule.todos.is_empty() {
        text.push_str("  (none)\n");
    }
    for todo in &schedule.todos {
        let mark = if todo.completed { "[x]" } else { "[ ]" };
        text.push_str(&format!("  {} {}\n", mark, todo.content));
    }
    text
}

/// One-line rendering of an event, used by `upcoming` and `now`.
pub(crate) fn format_event(event: &Event) -> String {
    format!("• {}  {}", event.time_range(), event.content)
}

fn minute_of_day(t: Time) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EventDraft, TodoDraft};
    use time::macros::{date, time};

    fn event(store: &mut Store, date: Date, start: Time, end: Option<Time>, content: &str) {
        store
            .add_event(EventDraft {
                date,
                start,
                end,
                content: content.into(),
                category: None,
            })
            .unwrap();
    }

    fn todo(store: &mut Store, date: Date, content: &str, completed: bool) {
        let id = store
            .add_todo(TodoDraft {
                date,
                content: content.into(),
            })
            .unwrap();
        if completed {
            store.toggle_todo(id).unwrap();
        }
    }

    fn scratch() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("dayplan.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_nearby_window_is_inclusive_in_minutes() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        event(&mut store, day, time!(14:25), None, "within");
        event(&mut store, day, time!(14:35), None, "outside");
        event(&mut store, day, time!(13:30), None, "edge");
        let found = nearby_items(&store, PrimitiveDateTime::new(day, time!(14:00)), 30);
        let contents = found.events.iter().map(|e| &e.content).collect::<Vec<_>>();
        assert_eq!(contents, vec!["edge", "within"]);
    }

    #[test]
    fn test_nearby_ignores_other_days() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        event(&mut store, date!(2026 - 08 - 07), time!(14:00), None, "tomorrow");
        let found = nearby_items(&store, PrimitiveDateTime::new(day, time!(14:00)), 30);
        assert!(found.events.is_empty());
    }

    #[test]
    fn test_nearby_returns_only_incomplete_todos() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        todo(&mut store, day, "pending", false);
        todo(&mut store, day, "done", true);
        todo(&mut store, date!(2026 - 08 - 07), "other day", false);
        let found = nearby_items(&store, PrimitiveDateTime::new(day, time!(8:00)), 30);
        let contents = found.todos.iter().map(|t| &t.content).collect::<Vec<_>>();
        assert_eq!(contents, vec!["pending"]);
    }

    #[test]
    fn test_ongoing_with_end_time_is_half_open() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        event(&mut store, day, time!(9:00), Some(time!(10:00)), "meeting");
        let at = |t| PrimitiveDateTime::new(day, t);
        assert_eq!(ongoing_events(&store, at(time!(9:00))).len(), 1);
        assert_eq!(ongoing_events(&store, at(time!(9:30))).len(), 1);
        assert_eq!(ongoing_events(&store, at(time!(9:59))).len(), 1);
        assert!(ongoing_events(&store, at(time!(10:00))).is_empty());
        assert!(ongoing_events(&store, at(time!(10:01))).is_empty());
        assert!(ongoing_events(&store, at(time!(8:59))).is_empty());
    }

    #[test]
    fn test_ongoing_without_end_time_assumes_an_hour() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        event(&mut store, day, time!(9:00), None, "open ended");
        let at = |t| PrimitiveDateTime::new(day, t);
        assert_eq!(ongoing_events(&store, at(time!(9:59))).len(), 1);
        assert!(ongoing_events(&store, at(time!(10:00))).is_empty());
        assert!(ongoing_events(&store, at(time!(10:01))).is_empty());
    }

    #[test]
    fn test_ongoing_ignores_other_days() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        event(&mut store, date!(2026 - 08 - 05), time!(9:00), None, "yesterday");
        assert!(ongoing_events(&store, PrimitiveDateTime::new(day, time!(9:30))).is_empty());
    }

    #[test]
    fn test_find_todos_matches_either_direction() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        todo(&mut store, day, "Buy milk and eggs", false);
        todo(&mut store, day, "milk", false);
        todo(&mut store, day, "water plants", false);
        let found = find_todos(&store, "buy MILK", Some(day), day);
        let contents = found.iter().map(|t| &t.content).collect::<Vec<_>>();
        assert_eq!(contents, vec!["Buy milk and eggs", "milk"]);
    }

    #[test]
    fn test_find_todos_dateless_search_window() {
        let today = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        todo(&mut store, date!(2026 - 07 - 10), "recent enough", false);
        todo(&mut store, date!(2026 - 06 - 01), "too old", false);
        todo(&mut store, date!(2026 - 08 - 07), "in the future", false);
        let found = find_todos(&store, "o", None, today);
        let contents = found.iter().map(|t| &t.content).collect::<Vec<_>>();
        assert_eq!(contents, vec!["recent enough"]);
    }

    #[test]
    fn test_day_schedule_orders_events_by_start() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        event(&mut store, day, time!(16:00), None, "late");
        event(&mut store, day, time!(9:00), None, "early");
        let schedule = day_schedule(&store, day);
        let contents = schedule.events.iter().map(|e| &e.content).collect::<Vec<_>>();
        assert_eq!(contents, vec!["early", "late"]);
    }

    #[test]
    fn test_format_schedule() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        event(&mut store, day, time!(9:00), Some(time!(10:00)), "standup");
        todo(&mut store, day, "buy milk", false);
        todo(&mut store, day, "pay rent", true);
        let text = format_schedule(&day_schedule(&store, day), day);
        assert_eq!(
            text,
            "Thursday, August 6\n\n\
             Events:\n\
             \x20 • 09:00 – 10:00  standup\n\
             Todos:\n\
             \x20 [ ] buy milk\n\
             \x20 [x] pay rent\n"
        );
    }

    #[test]
    fn test_format_schedule_empty_day() {
        let (_dir, store) = scratch();
        let text = format_schedule(&day_schedule(&store, date!(2026 - 08 - 06)), date!(2026 - 08 - 06));
        assert!(text.contains("Events:\n  (none)"));
        assert!(text.contains("Todos:\n  (none)"));
    }
}
