use crate::calendar::{step_days, MonthPage, MonthView, TOTAL_WIDTH};
use crate::categories::{CategoryManager, CategoryManagerView};
use crate::confirm::{ConfirmDelete, DeleteTarget};
use crate::daypane::{DayPane, Tab};
use crate::forms::{
    CategoryForm, CategoryFormOutput, EventForm, EventFormOutput, TodoForm, TodoFormOutput,
};
use crate::help::Help;
use crate::model::Id;
use crate::store::{CategoryDraft, EventDraft, Store, StoreError, TodoDraft};
use crate::theme::{BASE_STYLE, DIM_STYLE, ERROR_STYLE};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Paragraph, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::Date;

const BROWSE_HINTS: &str =
    "a:add  e:edit  d:delete  SPACE:toggle  TAB:tab  c:categories  ?:help  q:quit";

const LABEL_MAX: usize = 24;

#[derive(Debug)]
pub(crate) struct App {
    store: Store,
    view: ViewState,
    state: AppState,
    notice: Option<Notice>,
}

/// Everything the browsing screen needs, in one explicit record:
/// the visible page, the selected day, the active tab, and the
/// per-tab list cursors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ViewState {
    today: Date,
    page: MonthPage,
    selected: Option<Date>,
    tab: Tab,
    event_cursor: usize,
    todo_cursor: usize,
}

impl ViewState {
    fn new(today: Date, start: Option<Date>) -> ViewState {
        ViewState {
            today,
            page: MonthPage::containing(start.unwrap_or(today)),
            selected: start,
            tab: Tab::Events,
            event_cursor: 0,
            todo_cursor: 0,
        }
    }

    /// Select a day, paging to it if needed, and drop the list cursors.
    fn select(&mut self, date: Date) {
        self.selected = Some(date);
        if !self.page.contains(date) {
            self.page = MonthPage::containing(date);
        }
        self.event_cursor = 0;
        self.todo_cursor = 0;
    }

    fn cursor(&self) -> usize {
        match self.tab {
            Tab::Events => self.event_cursor,
            Tab::Todos => self.todo_cursor,
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.tab {
            Tab::Events => &mut self.event_cursor,
            Tab::Todos => &mut self.todo_cursor,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Browsing,
    Helping,
    EditingEvent(EventForm),
    EditingTodo(TodoForm),
    Categories(CategoryManager),
    EditingCategory(CategoryForm, CategoryManager),
    Confirming(ConfirmDelete),
    Quitting,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Notice {
    text: String,
    is_error: bool,
}

impl App {
    pub(crate) fn new(store: Store, today: Date, start: Option<Date>) -> App {
        App {
            store,
            view: ViewState::new(today, start),
            state: AppState::Browsing,
            notice: None,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(&*self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            self.notice = None;
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Browsing => self.browse_key(key),
            AppState::Helping => {
                self.state = AppState::Browsing;
                true
            }
            AppState::EditingEvent(form) => match form.handle_key(key) {
                EventFormOutput::Ok => true,
                EventFormOutput::Invalid => false,
                EventFormOutput::Cancel => {
                    self.state = AppState::Browsing;
                    true
                }
                EventFormOutput::Submit(draft) => {
                    let editing = form.editing();
                    self.state = AppState::Browsing;
                    self.apply_event(editing, draft);
                    true
                }
            },
            AppState::EditingTodo(form) => match form.handle_key(key) {
                TodoFormOutput::Ok => true,
                TodoFormOutput::Invalid => false,
                TodoFormOutput::Cancel => {
                    self.state = AppState::Browsing;
                    true
                }
                TodoFormOutput::Submit(draft) => {
                    let editing = form.editing();
                    self.state = AppState::Browsing;
                    self.apply_todo(editing, draft);
                    true
                }
            },
            AppState::Categories(manager) => {
                let manager = *manager;
                self.categories_key(key, manager)
            }
            AppState::EditingCategory(form, manager) => {
                let manager = *manager;
                match form.handle_key(key) {
                    CategoryFormOutput::Ok => true,
                    CategoryFormOutput::Invalid => false,
                    CategoryFormOutput::Cancel => {
                        self.state = AppState::Categories(manager);
                        true
                    }
                    CategoryFormOutput::Submit(draft) => {
                        let editing = form.editing();
                        self.state = AppState::Categories(manager);
                        self.apply_category(editing, draft);
                        true
                    }
                }
            }
            AppState::Confirming(confirm) => {
                let target = confirm.target();
                match key {
                    KeyCode::Char('y') | KeyCode::Enter => {
                        self.state = Self::after_confirm(target);
                        self.perform_delete(target);
                        true
                    }
                    KeyCode::Char('n') | KeyCode::Esc | KeyCode::Char('q') => {
                        self.state = Self::after_confirm(target);
                        true
                    }
                    _ => false,
                }
            }
            AppState::Quitting => false,
        }
    }

    fn browse_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Left => self.move_selection(-1),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Up => self.move_selection(-7),
            KeyCode::Down => self.move_selection(7),
            KeyCode::Char('n') | KeyCode::PageDown => self.flip_month(true),
            KeyCode::Char('p') | KeyCode::PageUp => self.flip_month(false),
            KeyCode::Char('t') | KeyCode::Char('0') | KeyCode::Home => {
                let today = self.view.today;
                self.view.select(today);
                true
            }
            KeyCode::Tab => {
                self.view.tab = self.view.tab.other();
                true
            }
            KeyCode::Char('j') => self.cursor_step(1),
            KeyCode::Char('k') => self.cursor_step(-1),
            KeyCode::Char('a') => {
                self.open_add_form();
                true
            }
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(),
            KeyCode::Char('d') | KeyCode::Delete => self.open_delete_confirm(),
            KeyCode::Char(' ') => self.toggle_todo(),
            KeyCode::Char('c') => {
                self.state = AppState::Categories(CategoryManager::new());
                true
            }
            KeyCode::Char('?') => {
                self.state = AppState::Helping;
                true
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state = AppState::Quitting;
                true
            }
            _ => false,
        }
    }

    fn categories_key(&mut self, key: KeyCode, mut manager: CategoryManager) -> bool {
        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                let moved = manager.down(self.store.categories().len());
                self.state = AppState::Categories(manager);
                moved
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let moved = manager.up();
                self.state = AppState::Categories(manager);
                moved
            }
            KeyCode::Char('a') => {
                self.state = AppState::EditingCategory(CategoryForm::create(), manager);
                true
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let Some(category) = self.store.categories().get(manager.cursor()).cloned()
                else {
                    return false;
                };
                self.state = AppState::EditingCategory(CategoryForm::edit(&category), manager);
                true
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let Some(category) = self.store.categories().get(manager.cursor()) else {
                    return false;
                };
                let label = format!("category \"{}\"", ellipsize(&category.name, LABEL_MAX));
                self.state = AppState::Confirming(ConfirmDelete::new(
                    DeleteTarget::Category(category.id),
                    label,
                ));
                true
            }
            KeyCode::Char('c') | KeyCode::Char('q') | KeyCode::Esc => {
                self.state = AppState::Browsing;
                true
            }
            _ => false,
        }
    }

    fn after_confirm(target: DeleteTarget) -> AppState {
        match target {
            DeleteTarget::Category(_) => AppState::Categories(CategoryManager::new()),
            DeleteTarget::Event(_) | DeleteTarget::Todo(_) => AppState::Browsing,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn move_selection(&mut self, days: i64) -> bool {
        let Some(from) = self.view.selected else {
            let today = self.view.today;
            self.view.select(today);
            return true;
        };
        match step_days(from, days) {
            Ok(date) => {
                self.view.select(date);
                true
            }
            Err(_) => false,
        }
    }

    fn flip_month(&mut self, forwards: bool) -> bool {
        let flipped = if forwards {
            self.view.page.forward()
        } else {
            self.view.page.backward()
        };
        match flipped {
            Ok(page) => {
                self.view.page = page;
                if let Some(selected) = self.view.selected {
                    self.view.select(page.clamp_day(selected.day()));
                }
                true
            }
            Err(_) => false,
        }
    }

    fn cursor_step(&mut self, delta: i64) -> bool {
        let Some(date) = self.view.selected else {
            return false;
        };
        let len = match self.view.tab {
            Tab::Events => self.store.events_on(date).len(),
            Tab::Todos => self.store.todos_on(date).len(),
        };
        let cursor = self.view.cursor_mut();
        let Ok(current) = i64::try_from(*cursor) else {
            return false;
        };
        let target = current + delta;
        if target < 0 {
            return false;
        }
        let Ok(target) = usize::try_from(target) else {
            return false;
        };
        if target < len {
            *cursor = target;
            true
        } else {
            false
        }
    }

    fn category_snapshot(&self) -> Vec<(Id, String)> {
        self.store
            .categories()
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect()
    }

    fn open_add_form(&mut self) {
        let date = self.view.selected.unwrap_or(self.view.today);
        self.state = match self.view.tab {
            Tab::Events => {
                AppState::EditingEvent(EventForm::create(date, self.category_snapshot()))
            }
            Tab::Todos => AppState::EditingTodo(TodoForm::create(date)),
        };
    }

    fn open_edit_form(&mut self) -> bool {
        let Some(date) = self.view.selected else {
            return false;
        };
        match self.view.tab {
            Tab::Events => {
                let Some(event) = self.store.events_on(date).get(self.view.cursor()).cloned()
                else {
                    return false;
                };
                let event = event.clone();
                self.state =
                    AppState::EditingEvent(EventForm::edit(&event, self.category_snapshot()));
            }
            Tab::Todos => {
                let Some(todo) = self.store.todos_on(date).get(self.view.cursor()).cloned()
                else {
                    return false;
                };
                let todo = todo.clone();
                self.state = AppState::EditingTodo(TodoForm::edit(&todo));
            }
        }
        true
    }

    fn open_delete_confirm(&mut self) -> bool {
        let Some(date) = self.view.selected else {
            return false;
        };
        let confirm = match self.view.tab {
            Tab::Events => {
                let events = self.store.events_on(date);
                let Some(event) = events.get(self.view.cursor()) else {
                    return false;
                };
                ConfirmDelete::new(
                    DeleteTarget::Event(event.id),
                    format!("event \"{}\"", ellipsize(&event.content, LABEL_MAX)),
                )
            }
            Tab::Todos => {
                let todos = self.store.todos_on(date);
                let Some(todo) = todos.get(self.view.cursor()) else {
                    return false;
                };
                ConfirmDelete::new(
                    DeleteTarget::Todo(todo.id),
                    format!("todo \"{}\"", ellipsize(&todo.content, LABEL_MAX)),
                )
            }
        };
        self.state = AppState::Confirming(confirm);
        true
    }

    fn toggle_todo(&mut self) -> bool {
        if self.view.tab != Tab::Todos {
            return false;
        }
        let Some(date) = self.view.selected else {
            return false;
        };
        let Some(id) = self.store.todos_on(date).get(self.view.cursor()).map(|t| t.id) else {
            return false;
        };
        if let Err(e) = self.store.toggle_todo(id) {
            self.notice_error(&e);
        }
        true
    }

    fn apply_event(&mut self, editing: Option<Id>, draft: EventDraft) {
        let date = draft.date;
        let result = match editing {
            Some(id) => self.store.update_event(id, draft).map(|_| "event updated"),
            None => self.store.add_event(draft).map(|_| "event added"),
        };
        match result {
            Ok(msg) => {
                self.view.select(date);
                self.view.tab = Tab::Events;
                self.notice_info(msg);
            }
            Err(e) => self.notice_error(&e),
        }
    }

    fn apply_todo(&mut self, editing: Option<Id>, draft: TodoDraft) {
        let date = draft.date;
        let result = match editing {
            Some(id) => self.store.update_todo(id, draft).map(|_| "todo updated"),
            None => self.store.add_todo(draft).map(|_| "todo added"),
        };
        match result {
            Ok(msg) => {
                self.view.select(date);
                self.view.tab = Tab::Todos;
                self.notice_info(msg);
            }
            Err(e) => self.notice_error(&e),
        }
    }

    fn apply_category(&mut self, editing: Option<Id>, draft: CategoryDraft) {
        let result = match editing {
            Some(id) => self
                .store
                .update_category(id, draft)
                .map(|_| "category updated"),
            None => self.store.add_category(draft).map(|_| "category added"),
        };
        match result {
            Ok(msg) => self.notice_info(msg),
            Err(e) => self.notice_error(&e),
        }
    }

    fn perform_delete(&mut self, target: DeleteTarget) {
        let result = match target {
            DeleteTarget::Event(id) => self.store.delete_event(id).map(|_| "event deleted"),
            DeleteTarget::Todo(id) => self.store.delete_todo(id).map(|_| "todo deleted"),
            DeleteTarget::Category(id) => {
                self.store.delete_category(id).map(|_| "category deleted")
            }
        };
        match result {
            Ok(msg) => {
                self.view.event_cursor = 0;
                self.view.todo_cursor = 0;
                self.notice_info(msg);
            }
            Err(e) => self.notice_error(&e),
        }
    }

    fn notice_info(&mut self, text: &str) {
        self.notice = Some(Notice {
            text: text.to_owned(),
            is_error: false,
        });
    }

    fn notice_error(&mut self, error: &StoreError) {
        self.notice = Some(Notice {
            text: error.to_string(),
            is_error: true,
        });
    }

    fn status_line(&self) -> Paragraph<'_> {
        match &self.notice {
            Some(notice) if notice.is_error => {
                Paragraph::new(notice.text.as_str()).style(ERROR_STYLE)
            }
            Some(notice) => Paragraph::new(notice.text.as_str()),
            None => Paragraph::new(BROWSE_HINTS).style(DIM_STYLE),
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(TOTAL_WIDTH), Constraint::Min(24)])
            .split(rows[0]);
        MonthView::new(
            self.view.page,
            self.view.today,
            self.view.selected,
            &self.store,
        )
        .render(columns[0], buf);
        DayPane::new(
            &self.store,
            self.view.selected,
            self.view.tab,
            self.view.cursor(),
        )
        .render(columns[1], buf);
        self.status_line().render(rows[1], buf);
        match &self.state {
            AppState::Browsing | AppState::Quitting => {}
            AppState::Helping => Help(BASE_STYLE).render(rows[0], buf),
            AppState::EditingEvent(form) => form.render(rows[0], buf),
            AppState::EditingTodo(form) => form.render(rows[0], buf),
            AppState::Categories(manager) => CategoryManagerView {
                manager,
                store: &self.store,
            }
            .render(rows[0], buf),
            AppState::EditingCategory(form, _) => form.render(rows[0], buf),
            AppState::Confirming(confirm) => confirm.render(rows[0], buf),
        }
    }
}

fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_owned()
    } else {
        let mut shortened = text.chars().take(max - 1).collect::<String>();
        shortened.push('…');
        shortened
    }
}
