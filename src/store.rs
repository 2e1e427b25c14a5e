use crate::calendar::{DayMarks, MarkSource};
use crate::model::{Category, Event, Id, Swatch, Todo};
use crate::theme::DEFAULT_EVENT_COLOR;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use time::{Date, Time};

/// Environment fallback for the snapshot location when `--data` is not given.
pub(crate) const DATA_ENV_VAR: &str = "DAYPLAN_DATA";

const DEFAULT_DATA_PATH: &str = "data/dayplan.json";

/// Resolve the snapshot path: CLI flag, then environment, then the
/// relative default.
pub(crate) fn data_path(cli_override: Option<PathBuf>) -> PathBuf {
    cli_override
        .or_else(|| std::env::var_os(DATA_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("failed to read or write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed planner data in {}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// New-event fields as gathered from the event form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventDraft {
    pub(crate) date: Date,
    pub(crate) start: Time,
    pub(crate) end: Option<Time>,
    pub(crate) content: String,
    pub(crate) category: Option<Id>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct TodoDraft {
    pub(crate) date: Date,
    pub(crate) content: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CategoryDraft {
    pub(crate) name: String,
    pub(crate) color: Swatch,
}

/// Next id per table.  Persisted so that ids are never reused within a
/// file's lifetime, even after deleting the highest record.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
struct Counters {
    event: Id,
    todo: Id,
    category: Id,
}

impl Default for Counters {
    fn default() -> Counters {
        Counters {
            event: 1,
            todo: 1,
            category: 1,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct Snapshot {
    #[serde(default)]
    counters: Counters,
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    todos: Vec<Todo>,
    #[serde(default)]
    categories: Vec<Category>,
}

/// The planner's record store: three tables in one JSON snapshot,
/// rewritten after every mutation.
#[derive(Debug)]
pub(crate) struct Store {
    path: PathBuf,
    data: Snapshot,
}

impl Store {
    /// Load the snapshot at `path`.  A missing file yields an empty
    /// store; a file that exists but does not parse is an error.
    pub(crate) fn open(path: PathBuf) -> Result<Store, StoreError> {
        let mut data = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<Snapshot>(&text).map_err(|source| {
                StoreError::Malformed {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(source) if source.kind() == io::ErrorKind::NotFound => Snapshot::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        // Guard against hand-edited files whose counters lag the records.
        data.counters.event = next_free(data.counters.event, data.events.iter().map(|e| e.id));
        data.counters.todo = next_free(data.counters.todo, data.todos.iter().map(|t| t.id));
        data.counters.category =
            next_free(data.counters.category, data.categories.iter().map(|c| c.id));
        Ok(Store { path, data })
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.data).map_err(|source| {
            StoreError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, text).map_err(io_err)
    }

    // --- events ---

    pub(crate) fn add_event(&mut self, draft: EventDraft) -> Result<Id, StoreError> {
        let id = alloc(&mut self.data.counters.event);
        self.data.events.push(Event {
            id,
            date: draft.date,
            start: draft.start,
            end: draft.end,
            content: draft.content,
            category: draft.category,
        });
        self.persist()?;
        Ok(id)
    }

    pub(crate) fn update_event(&mut self, id: Id, draft: EventDraft) -> Result<bool, StoreError> {
        let Some(event) = self.data.events.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        event.date = draft.date;
        event.start = draft.start;
        event.end = draft.end;
        event.content = draft.content;
        event.category = draft.category;
        self.persist()?;
        Ok(true)
    }

    pub(crate) fn delete_event(&mut self, id: Id) -> Result<bool, StoreError> {
        let before = self.data.events.len();
        self.data.events.retain(|e| e.id != id);
        if self.data.events.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// The date's events in start-time order (ties in id order).
    pub(crate) fn events_on(&self, date: Date) -> Vec<&Event> {
        let mut events = self.events_between(date, date);
        events.sort_by_key(|e| (e.start, e.id));
        events
    }

    pub(crate) fn events_between(&self, first: Date, last: Date) -> Vec<&Event> {
        self.data
            .events
            .iter()
            .filter(|e| first <= e.date && e.date <= last)
            .collect()
    }

    // --- todos ---

    pub(crate) fn add_todo(&mut self, draft: TodoDraft) -> Result<Id, StoreError> {
        let id = alloc(&mut self.data.counters.todo);
        self.data.todos.push(Todo {
            id,
            date: draft.date,
            content: draft.content,
            completed: false,
        });
        self.persist()?;
        Ok(id)
    }

    pub(crate) fn update_todo(&mut self, id: Id, draft: TodoDraft) -> Result<bool, StoreError> {
        let Some(todo) = self.data.todos.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        todo.date = draft.date;
        todo.content = draft.content;
        self.persist()?;
        Ok(true)
    }

    /// Flip the completed flag; returns the new state, or `None` for an
    /// unknown id.
    pub(crate) fn toggle_todo(&mut self, id: Id) -> Result<Option<bool>, StoreError> {
        let Some(todo) = self.data.todos.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        todo.completed = !todo.completed;
        let completed = todo.completed;
        self.persist()?;
        Ok(Some(completed))
    }

    pub(crate) fn delete_todo(&mut self, id: Id) -> Result<bool, StoreError> {
        let before = self.data.todos.len();
        self.data.todos.retain(|t| t.id != id);
        if self.data.todos.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// The date's todos in id (insertion) order, so toggling a flag
    /// never moves an item.
    pub(crate) fn todos_on(&self, date: Date) -> Vec<&Todo> {
        self.todos_between(date, date)
    }

    pub(crate) fn todos_between(&self, first: Date, last: Date) -> Vec<&Todo> {
        let mut todos = self
            .data
            .todos
            .iter()
            .filter(|t| first <= t.date && t.date <= last)
            .collect::<Vec<_>>();
        todos.sort_by_key(|t| (t.date, t.id));
        todos
    }

    // --- categories ---

    pub(crate) fn add_category(&mut self, draft: CategoryDraft) -> Result<Id, StoreError> {
        let id = alloc(&mut self.data.counters.category);
        self.data.categories.push(Category {
            id,
            name: draft.name,
            color: draft.color,
        });
        self.persist()?;
        Ok(id)
    }

    pub(crate) fn update_category(
        &mut self,
        id: Id,
        draft: CategoryDraft,
    ) -> Result<bool, StoreError> {
        let Some(cat) = self.data.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        cat.name = draft.name;
        cat.color = draft.color;
        self.persist()?;
        Ok(true)
    }

    /// Delete a category and detach it from any events that carried it.
    pub(crate) fn delete_category(&mut self, id: Id) -> Result<bool, StoreError> {
        let before = self.data.categories.len();
        self.data.categories.retain(|c| c.id != id);
        if self.data.categories.len() == before {
            return Ok(false);
        }
        for event in &mut self.data.events {
            if event.category == Some(id) {
                event.category = None;
            }
        }
        self.persist()?;
        Ok(true)
    }

    pub(crate) fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    pub(crate) fn category(&self, id: Id) -> Option<&Category> {
        self.data.categories.iter().find(|c| c.id == id)
    }
}

impl MarkSource for Store {
    fn day_marks(&self, date: Date) -> DayMarks {
        let events = self
            .events_on(date)
            .into_iter()
            .map(|e| {
                e.category
                    .and_then(|id| self.category(id))
                    .map_or(DEFAULT_EVENT_COLOR, |c| c.color.color())
            })
            .collect();
        let todos = self.todos_on(date);
        let completed_todos = todos.iter().filter(|t| t.completed).count();
        DayMarks {
            events,
            pending_todos: todos.len() - completed_todos,
            completed_todos,
        }
    }
}

fn alloc(counter: &mut Id) -> Id {
    let id = *counter;
    *counter += 1;
    id
}

fn next_free(counter: Id, used: impl Iterator<Item = Id>) -> Id {
    counter.max(used.max().map_or(1, |max| max + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn scratch() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("dayplan.json")).unwrap();
        (dir, store)
    }

    fn draft(date: Date, start: Time, content: &str) -> EventDraft {
        EventDraft {
            date,
            start,
            end: None,
            content: content.into(),
            category: None,
        }
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let (_dir, store) = scratch();
        assert!(store.events_on(date!(2026 - 08 - 06)).is_empty());
        assert!(store.todos_on(date!(2026 - 08 - 06)).is_empty());
        assert!(store.categories().is_empty());
    }

    #[test]
    fn test_open_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dayplan.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Store::open(path),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn test_round_trip_through_reopen() {
        let day = date!(2026 - 08 - 06);
        let (dir, mut store) = scratch();
        let cat = store
            .add_category(CategoryDraft {
                name: "work".into(),
                color: Swatch::Blue,
            })
            .unwrap();
        store
            .add_event(EventDraft {
                date: day,
                start: time!(14:00),
                end: Some(time!(15:30)),
                content: "dentist".into(),
                category: Some(cat),
            })
            .unwrap();
        store
            .add_todo(TodoDraft {
                date: day,
                content: "buy milk".into(),
            })
            .unwrap();
        drop(store);

        let store = Store::open(dir.path().join("dayplan.json")).unwrap();
        let events = store.events_on(day);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].content, "dentist");
        assert_eq!(events[0].start, time!(14:00));
        assert_eq!(events[0].end, Some(time!(15:30)));
        assert_eq!(events[0].category, Some(cat));
        let todos = store.todos_on(day);
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].content, "buy milk");
        assert!(!todos[0].completed);
        assert_eq!(store.category(cat).unwrap().name, "work");
    }

    #[test]
    fn test_events_sorted_by_start_then_id() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        let late = store.add_event(draft(day, time!(16:00), "late")).unwrap();
        let early = store.add_event(draft(day, time!(9:00), "early")).unwrap();
        let tie = store.add_event(draft(day, time!(9:00), "tie")).unwrap();
        store
            .add_event(draft(date!(2026 - 08 - 07), time!(8:00), "other day"))
            .unwrap();
        let ids = store
            .events_on(day)
            .iter()
            .map(|e| e.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![early, tie, late]);
    }

    #[test]
    fn test_toggle_twice_restores_state_and_position() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        let first = store
            .add_todo(TodoDraft {
                date: day,
                content: "first".into(),
            })
            .unwrap();
        let second = store
            .add_todo(TodoDraft {
                date: day,
                content: "second".into(),
            })
            .unwrap();
        let before = store
            .todos_on(day)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(store.toggle_todo(first).unwrap(), Some(true));
        let ids = store.todos_on(day).iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(store.toggle_todo(first).unwrap(), Some(false));
        let after = store
            .todos_on(day)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn test_update_keeps_id_and_moves_date() {
        let (_dir, mut store) = scratch();
        let id = store
            .add_event(draft(date!(2026 - 08 - 06), time!(9:00), "standup"))
            .unwrap();
        assert!(store
            .update_event(
                id,
                EventDraft {
                    date: date!(2026 - 08 - 07),
                    start: time!(9:30),
                    end: None,
                    content: "standup (moved)".into(),
                    category: None,
                },
            )
            .unwrap());
        assert!(store.events_on(date!(2026 - 08 - 06)).is_empty());
        let events = store.events_on(date!(2026 - 08 - 07));
        assert_eq!(events[0].id, id);
        assert_eq!(events[0].content, "standup (moved)");
    }

    #[test]
    fn test_delete_category_detaches_events() {
        let (_dir, mut store) = scratch();
        let cat = store
            .add_category(CategoryDraft {
                name: "work".into(),
                color: Swatch::Red,
            })
            .unwrap();
        let day = date!(2026 - 08 - 06);
        store
            .add_event(EventDraft {
                date: day,
                start: time!(9:00),
                end: None,
                content: "standup".into(),
                category: Some(cat),
            })
            .unwrap();
        assert!(store.delete_category(cat).unwrap());
        assert!(store.categories().is_empty());
        assert_eq!(store.events_on(day)[0].category, None);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let day = date!(2026 - 08 - 06);
        let (dir, mut store) = scratch();
        let first = store.add_event(draft(day, time!(9:00), "one")).unwrap();
        store.delete_event(first).unwrap();
        drop(store);
        let mut store = Store::open(dir.path().join("dayplan.json")).unwrap();
        let second = store.add_event(draft(day, time!(9:00), "two")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let (_dir, mut store) = scratch();
        assert!(!store.delete_event(99).unwrap());
        assert!(!store.delete_todo(99).unwrap());
        assert_eq!(store.toggle_todo(99).unwrap(), None);
    }

    #[test]
    fn test_day_marks() {
        let day = date!(2026 - 08 - 06);
        let (_dir, mut store) = scratch();
        let cat = store
            .add_category(CategoryDraft {
                name: "work".into(),
                color: Swatch::Magenta,
            })
            .unwrap();
        store
            .add_event(EventDraft {
                date: day,
                start: time!(9:00),
                end: None,
                content: "tagged".into(),
                category: Some(cat),
            })
            .unwrap();
        store.add_event(draft(day, time!(8:00), "untagged")).unwrap();
        let done = store
            .add_todo(TodoDraft {
                date: day,
                content: "done".into(),
            })
            .unwrap();
        store
            .add_todo(TodoDraft {
                date: day,
                content: "pending".into(),
            })
            .unwrap();
        store.toggle_todo(done).unwrap();
        let marks = store.day_marks(day);
        assert_eq!(
            marks.events,
            vec![DEFAULT_EVENT_COLOR, Swatch::Magenta.color()]
        );
        assert_eq!(marks.pending_todos, 1);
        assert_eq!(marks.completed_todos, 1);
    }

    #[test]
    fn test_data_path_cli_override() {
        let path = data_path(Some(PathBuf::from("/tmp/elsewhere.json")));
        assert_eq!(path, PathBuf::from("/tmp/elsewhere.json"));
    }
}
