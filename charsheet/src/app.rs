//! Main application state and navigation.
//!
//! Exactly one screen is active. Character screens own the [`Session`]; it
//! moves into the next screen on navigation and is saved when the sheet is
//! closed.

use charsheet_core::{Catalog, CharacterStore};
use crossterm::event::KeyEvent;
use std::sync::Arc;

use crate::events::{self, AppEvent};
use crate::screens::creation::CreationScreen;
use crate::screens::info::InfoScreen;
use crate::screens::inventory::InventoryScreen;
use crate::screens::selection::SelectionScreen;
use crate::screens::sheet::SheetScreen;
use crate::screens::spellbook::SpellbookScreen;
use crate::screens::{dispatch, NavSignal, Screen, ScreenKind, ScreenOutcome};
use crate::session::Session;
use crate::tasks::{DeferredTask, TaskResult, TaskTag};
use crate::ui::theme::SheetTheme;

pub enum ActiveScreen {
    Selection(SelectionScreen),
    Creation(CreationScreen),
    Sheet(SheetScreen),
    Inventory(InventoryScreen),
    Spellbook(SpellbookScreen),
    Info(InfoScreen),
}

impl ActiveScreen {
    pub fn as_screen(&self) -> &dyn Screen {
        match self {
            ActiveScreen::Selection(s) => s,
            ActiveScreen::Creation(s) => s,
            ActiveScreen::Sheet(s) => s,
            ActiveScreen::Inventory(s) => s,
            ActiveScreen::Spellbook(s) => s,
            ActiveScreen::Info(s) => s,
        }
    }

    pub fn as_screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            ActiveScreen::Selection(s) => s,
            ActiveScreen::Creation(s) => s,
            ActiveScreen::Sheet(s) => s,
            ActiveScreen::Inventory(s) => s,
            ActiveScreen::Spellbook(s) => s,
            ActiveScreen::Info(s) => s,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            ActiveScreen::Sheet(s) => Some(&s.session),
            ActiveScreen::Inventory(s) => Some(&s.session),
            ActiveScreen::Spellbook(s) => Some(&s.session),
            ActiveScreen::Info(s) => Some(&s.session),
            ActiveScreen::Selection(_) | ActiveScreen::Creation(_) => None,
        }
    }

    /// Give up the open character, or hand the screen back if it has none.
    fn into_session(self) -> Result<Session, ActiveScreen> {
        match self {
            ActiveScreen::Sheet(s) => Ok(s.into_session()),
            ActiveScreen::Inventory(s) => Ok(s.into_session()),
            ActiveScreen::Spellbook(s) => Ok(s.into_session()),
            ActiveScreen::Info(s) => Ok(s.into_session()),
            other => Err(other),
        }
    }
}

/// Main application state
pub struct App {
    store: Arc<dyn CharacterStore>,
    catalog: Arc<dyn Catalog>,
    pub theme: SheetTheme,
    hp_bar_width: u16,
    screen: ActiveScreen,
    /// Bumped on every activation so late task results can be recognised.
    generation: u64,
    pending: Vec<(DeferredTask, TaskTag)>,
    pub should_quit: bool,
}

impl App {
    /// Start on the character list with its load task queued.
    pub fn new(store: Arc<dyn CharacterStore>, catalog: Arc<dyn Catalog>, hp_bar_width: u16) -> Self {
        let selection = SelectionScreen::new(store.clone());
        let mut app = Self {
            store,
            catalog,
            theme: SheetTheme::default(),
            hp_bar_width,
            screen: ActiveScreen::Selection(selection),
            generation: 0,
            pending: Vec::new(),
            should_quit: false,
        };
        app.queue(DeferredTask::ListCharacters);
        app
    }

    pub fn screen(&self) -> &ActiveScreen {
        &self.screen
    }

    pub fn kind(&self) -> ScreenKind {
        self.screen.as_screen().kind()
    }

    pub fn store(&self) -> Arc<dyn CharacterStore> {
        self.store.clone()
    }

    /// Tasks waiting to be spawned by the loop.
    pub fn take_pending(&mut self) -> Vec<(DeferredTask, TaskTag)> {
        std::mem::take(&mut self.pending)
    }

    fn tag(&self) -> TaskTag {
        TaskTag {
            screen: self.kind(),
            generation: self.generation,
        }
    }

    fn queue(&mut self, task: DeferredTask) {
        let tag = self.tag();
        self.pending.push((task, tag));
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize(..) => {}
            AppEvent::Task(result) => self.handle_task(result),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if events::is_force_quit(&key) {
            self.quit();
            return;
        }
        let outcome = dispatch(self.screen.as_screen_mut(), key);
        self.apply(outcome);
    }

    fn handle_task(&mut self, result: TaskResult) {
        if result.tag != self.tag() {
            tracing::debug!(
                screen = ?result.tag.screen,
                generation = result.tag.generation,
                "Discarding stale task result"
            );
            return;
        }
        if let ActiveScreen::Selection(selection) = &mut self.screen {
            let outcome = selection.apply_task(result.outcome);
            self.apply(outcome);
        }
    }

    fn apply(&mut self, outcome: ScreenOutcome) {
        match outcome {
            ScreenOutcome::Continue => {}
            ScreenOutcome::Quit => self.quit(),
            ScreenOutcome::Spawn(task) => self.queue(task),
            ScreenOutcome::Navigate(signal) => self.navigate(signal),
        }
    }

    /// Leave the app. Committed edits are already on disk.
    fn quit(&mut self) {
        tracing::info!(screen = ?self.kind(), "Quit requested");
        self.should_quit = true;
    }

    fn selection(&self) -> ActiveScreen {
        ActiveScreen::Selection(SelectionScreen::new(self.store.clone()))
    }

    /// Move the open character into a new screen. Screens without one stay put.
    fn with_session(current: ActiveScreen, open: impl FnOnce(Session) -> ActiveScreen) -> ActiveScreen {
        match current.into_session() {
            Ok(session) => open(session),
            Err(current) => current,
        }
    }

    fn navigate(&mut self, signal: NavSignal) {
        let placeholder = self.selection();
        let current = std::mem::replace(&mut self.screen, placeholder);
        let from = current.as_screen().kind();

        let next = match signal {
            NavSignal::OpenSheet(character) => {
                let session = Session::new(*character, self.store.clone(), self.catalog.clone());
                ActiveScreen::Sheet(SheetScreen::new(session, self.hp_bar_width))
            }
            NavSignal::StartCreation => {
                ActiveScreen::Creation(CreationScreen::new(self.store.clone(), self.catalog.clone()))
            }
            NavSignal::Back => match current {
                ActiveScreen::Sheet(sheet) => {
                    let saved = sheet.session.save();
                    let mut selection = self.selection();
                    if let Err(e) = saved {
                        selection.as_screen_mut().state_mut().error(format!("Save failed: {e}"));
                    }
                    selection
                }
                ActiveScreen::Selection(_) | ActiveScreen::Creation(_) => self.selection(),
                other => {
                    let width = self.hp_bar_width;
                    Self::with_session(other, |s| ActiveScreen::Sheet(SheetScreen::new(s, width)))
                }
            },
            NavSignal::OpenInventory => Self::with_session(current, |s| {
                ActiveScreen::Inventory(InventoryScreen::new(s))
            }),
            NavSignal::OpenSpellbook => Self::with_session(current, |s| {
                ActiveScreen::Spellbook(SpellbookScreen::new(s))
            }),
            NavSignal::OpenInfo => Self::with_session(current, |s| ActiveScreen::Info(InfoScreen::new(s))),
        };

        self.screen = next;
        self.generation += 1;
        tracing::debug!(?from, to = ?self.kind(), generation = self.generation, "Navigated");
        if self.kind() == ScreenKind::Selection && from != ScreenKind::Selection {
            self.queue(DeferredTask::ListCharacters);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::key;
    use crate::tasks;
    use charsheet_core::testing::{sample_fighter, sample_wizard};
    use charsheet_core::{MemoryStore, StaticCatalog};
    use crossterm::event::KeyCode;

    fn app_with(store: Arc<MemoryStore>) -> App {
        App::new(store, Arc::new(StaticCatalog), 20)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(AppEvent::Key(key(code)));
    }

    /// Run every queued task inline, as the loop would.
    fn settle(app: &mut App, store: &MemoryStore) {
        for (task, tag) in app.take_pending() {
            let outcome = tasks::run(task, store);
            app.handle_event(AppEvent::Task(TaskResult { tag, outcome }));
        }
    }

    fn open_first(app: &mut App, store: &MemoryStore) {
        settle(app, store);
        press(app, KeyCode::Enter);
        settle(app, store);
    }

    #[test]
    fn test_starts_by_listing_characters() {
        let store = Arc::new(MemoryStore::with([sample_fighter("Bruni")]));
        let mut app = app_with(store.clone());
        assert_eq!(app.kind(), ScreenKind::Selection);
        settle(&mut app, &store);

        let ActiveScreen::Selection(selection) = app.screen() else {
            panic!("expected the selection screen");
        };
        assert_eq!(selection.summaries().len(), 1);
    }

    #[test]
    fn test_open_character_and_move_between_screens() {
        let store = Arc::new(MemoryStore::with([sample_fighter("Bruni")]));
        let mut app = app_with(store.clone());
        open_first(&mut app, &store);
        assert_eq!(app.kind(), ScreenKind::Sheet);

        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.kind(), ScreenKind::Inventory);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.kind(), ScreenKind::Spellbook);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.kind(), ScreenKind::Info);
        assert_eq!(app.screen().session().unwrap().character.name, "Bruni");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.kind(), ScreenKind::Sheet);
    }

    #[test]
    fn test_leaving_sheet_saves_and_relists() {
        let fighter = sample_fighter("Bruni");
        let id = fighter.id;
        let store = Arc::new(MemoryStore::with([fighter]));
        let mut app = app_with(store.clone());
        open_first(&mut app, &store);
        let writes = store.write_count();

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.kind(), ScreenKind::Selection);
        assert_eq!(store.write_count(), writes + 1);
        assert!(store.get(id).is_some());

        let pending = app.take_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0, DeferredTask::ListCharacters);
    }

    #[test]
    fn test_stale_task_result_is_dropped() {
        let store = Arc::new(MemoryStore::with([sample_fighter("Bruni"), sample_wizard("Elara")]));
        let mut app = app_with(store.clone());
        let stale = app.take_pending();

        // Leave and come back before the first list arrives
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.kind(), ScreenKind::Selection);

        for (task, tag) in stale {
            let outcome = tasks::run(task, store.as_ref());
            app.handle_event(AppEvent::Task(TaskResult { tag, outcome }));
        }
        let ActiveScreen::Selection(selection) = app.screen() else {
            panic!("expected the selection screen");
        };
        assert!(selection.is_loading());

        settle(&mut app, &store);
        let ActiveScreen::Selection(selection) = app.screen() else {
            panic!("expected the selection screen");
        };
        assert_eq!(selection.summaries().len(), 2);
    }

    #[test]
    fn test_create_character_opens_sheet() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with(store.clone());
        settle(&mut app, &store);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.kind(), ScreenKind::Creation);
        for c in "Tess".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        for _ in 0..5 {
            press(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.kind(), ScreenKind::Sheet);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_quit_confirmation_and_force_quit() {
        let store = Arc::new(MemoryStore::with([sample_fighter("Bruni")]));
        let mut app = app_with(store.clone());
        open_first(&mut app, &store);
        let writes = store.write_count();

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('y'));
        assert!(app.should_quit);
        assert_eq!(store.write_count(), writes);

        let mut app = app_with(store.clone());
        app.handle_event(AppEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            crossterm::event::KeyModifiers::CONTROL,
        )));
        assert!(app.should_quit);
    }

    #[test]
    fn test_load_failure_stays_on_list() {
        let store = Arc::new(MemoryStore::with([sample_fighter("Bruni")]));
        let mut app = app_with(store.clone());
        settle(&mut app, &store);
        press(&mut app, KeyCode::Enter);
        store.fail_reads(true);
        settle(&mut app, &store);

        assert_eq!(app.kind(), ScreenKind::Selection);
        let status = app.screen().as_screen().state().status.clone();
        assert!(status.unwrap().is_error);
    }
}
