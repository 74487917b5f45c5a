//! Saved character list.

use charsheet_core::{CharacterStore, CharacterSummary};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    Frame,
};
use std::sync::Arc;

use crate::focus;
use crate::modal::{ConfirmAction, Confirmation, HelpOverlay, Modal, ModalSignal};
use crate::screens::{NavSignal, Screen, ScreenKind, ScreenOutcome, ScreenState};
use crate::tasks::{DeferredTask, TaskOutcome};
use crate::ui::theme::SheetTheme;
use crate::ui::widgets::panel;

const HELP: &[(&str, &str)] = &[
    ("↑/↓", "Choose a character"),
    ("Enter", "Open"),
    ("n", "New character"),
    ("d", "Delete"),
    ("r", "Reload the list"),
    ("?", "This help"),
    ("q", "Quit"),
];

pub struct SelectionScreen {
    state: ScreenState,
    store: Arc<dyn CharacterStore>,
    summaries: Vec<CharacterSummary>,
    cursor: usize,
    loading: bool,
}

impl SelectionScreen {
    /// A fresh selection screen waits for its list task.
    pub fn new(store: Arc<dyn CharacterStore>) -> Self {
        Self {
            state: ScreenState::default(),
            store,
            summaries: Vec::new(),
            cursor: 0,
            loading: true,
        }
    }

    pub fn summaries(&self) -> &[CharacterSummary] {
        &self.summaries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn selected(&self) -> Option<&CharacterSummary> {
        self.summaries
            .get(focus::clamp(self.cursor, self.summaries.len()))
    }

    /// Take a finished list or load task.
    pub fn apply_task(&mut self, outcome: TaskOutcome) -> ScreenOutcome {
        self.loading = false;
        match outcome {
            TaskOutcome::Characters(Ok(summaries)) => {
                tracing::debug!(count = summaries.len(), "Character list loaded");
                self.summaries = summaries;
                self.cursor = focus::clamp(self.cursor, self.summaries.len());
                ScreenOutcome::Continue
            }
            TaskOutcome::Characters(Err(e)) => {
                self.state.error(format!("Could not list characters: {e}"));
                ScreenOutcome::Continue
            }
            TaskOutcome::Loaded(Ok(character)) => {
                tracing::info!(character = %character.name, "Opened character");
                ScreenOutcome::Navigate(NavSignal::OpenSheet(Box::new(character)))
            }
            TaskOutcome::Loaded(Err(e)) => {
                self.state.error(format!("Could not load character: {e}"));
                ScreenOutcome::Continue
            }
        }
    }

    fn delete(&mut self, id: charsheet_core::CharacterId) {
        match self.store.delete(id) {
            Ok(()) => {
                let name = self
                    .summaries
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.name.clone())
                    .unwrap_or_default();
                self.summaries.retain(|s| s.id != id);
                tracing::info!(%id, "Deleted character");
                self.state.info(format!("Deleted {name}"));
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "Delete failed");
                self.state.error(format!("Delete failed: {e}"));
            }
        }
    }
}

impl Screen for SelectionScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Selection
    }

    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn help(&self) -> HelpOverlay {
        HelpOverlay::new("Characters", HELP)
    }

    fn hints(&self) -> &'static str {
        "Enter open  n new  d delete  r reload  q quit"
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> ScreenOutcome {
        let Some(modal) = self.state.modals.pop() else {
            return ScreenOutcome::Continue;
        };
        if let Modal::Confirmation(mut confirm) = modal {
            if confirm.handle_key(key) == ModalSignal::Confirm {
                if let ConfirmAction::DeleteCharacter(id) = confirm.action {
                    self.delete(id);
                }
            }
        }
        ScreenOutcome::Continue
    }

    fn handle_panel_key(&mut self, key: KeyEvent) -> ScreenOutcome {
        match key.code {
            KeyCode::Up => focus::up(&mut self.cursor),
            KeyCode::Down => focus::down(&mut self.cursor, self.summaries.len()),
            KeyCode::Enter => {
                if self.loading {
                    return ScreenOutcome::Continue;
                }
                if let Some(summary) = self.selected() {
                    let id = summary.id;
                    self.loading = true;
                    return ScreenOutcome::Spawn(DeferredTask::LoadCharacter(id));
                }
            }
            KeyCode::Char('n') => return ScreenOutcome::Navigate(NavSignal::StartCreation),
            KeyCode::Char('d') => {
                if let Some(summary) = self.selected() {
                    let prompt = format!("Delete {} permanently?", summary.name);
                    let action = ConfirmAction::DeleteCharacter(summary.id);
                    self.state.open(Modal::Confirmation(Confirmation::new(prompt, action)));
                }
            }
            KeyCode::Char('r') => {
                self.loading = true;
                return ScreenOutcome::Spawn(DeferredTask::ListCharacters);
            }
            _ => {}
        }
        ScreenOutcome::Continue
    }

    /// Esc has nowhere to go from the list.
    fn step_back(&mut self) -> bool {
        true
    }

    fn clamp_cursors(&mut self) {
        self.cursor = focus::clamp(self.cursor, self.summaries.len());
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let rows = self
            .summaries
            .iter()
            .map(|s| {
                Line::from(vec![
                    Span::raw(format!("{:<24}", s.name)),
                    Span::raw(format!("{:<12}", s.race)),
                    Span::raw(format!("{:<24}", s.class)),
                    Span::styled(s.saved_label(), theme.muted_style()),
                ])
            })
            .collect();
        let placeholder = if self.loading {
            "Loading..."
        } else {
            "No saved characters. Press n to create one."
        };
        panel::render_list(frame, area, "Characters", rows, self.cursor, true, placeholder, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::key;
    use crate::screens::dispatch;
    use crate::tasks;
    use charsheet_core::testing::{sample_fighter, sample_wizard};
    use charsheet_core::MemoryStore;

    fn loaded_screen() -> (SelectionScreen, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with([sample_fighter("Bruni"), sample_wizard("Elara")]));
        let mut screen = SelectionScreen::new(store.clone());
        let outcome = tasks::run(DeferredTask::ListCharacters, store.as_ref());
        screen.apply_task(outcome);
        (screen, store)
    }

    fn press(screen: &mut SelectionScreen, code: KeyCode) -> ScreenOutcome {
        dispatch(screen, key(code))
    }

    #[test]
    fn test_list_task_fills_screen() {
        let (screen, _) = loaded_screen();
        assert!(!screen.is_loading());
        assert_eq!(screen.summaries().len(), 2);
    }

    #[test]
    fn test_enter_spawns_load_then_opens_sheet() {
        let (mut screen, store) = loaded_screen();
        press(&mut screen, KeyCode::Down);

        let ScreenOutcome::Spawn(task) = press(&mut screen, KeyCode::Enter) else {
            panic!("expected a load task");
        };
        assert!(screen.is_loading());

        // A second Enter while loading does nothing
        assert!(matches!(press(&mut screen, KeyCode::Enter), ScreenOutcome::Continue));

        let outcome = screen.apply_task(tasks::run(task, store.as_ref()));
        let ScreenOutcome::Navigate(NavSignal::OpenSheet(character)) = outcome else {
            panic!("expected the sheet");
        };
        assert_eq!(character.name, "Elara");
    }

    #[test]
    fn test_delete_asks_first() {
        let (mut screen, store) = loaded_screen();

        press(&mut screen, KeyCode::Char('d'));
        press(&mut screen, KeyCode::Char('n'));
        assert_eq!(store.list().unwrap().len(), 2);

        press(&mut screen, KeyCode::Char('d'));
        press(&mut screen, KeyCode::Char('y'));
        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(screen.summaries().len(), 1);
        assert_eq!(screen.state().status.as_ref().unwrap().text, "Deleted Bruni");
    }

    #[test]
    fn test_list_failure_shows_status() {
        let store = Arc::new(MemoryStore::new());
        store.fail_reads(true);
        let mut screen = SelectionScreen::new(store.clone());
        screen.apply_task(tasks::run(DeferredTask::ListCharacters, store.as_ref()));
        assert!(screen.state().status.as_ref().unwrap().is_error);
        assert!(!screen.is_loading());
    }

    #[test]
    fn test_new_and_escape() {
        let (mut screen, _) = loaded_screen();
        assert!(matches!(
            press(&mut screen, KeyCode::Char('n')),
            ScreenOutcome::Navigate(NavSignal::StartCreation)
        ));
        assert!(matches!(press(&mut screen, KeyCode::Esc), ScreenOutcome::Continue));
        assert!(matches!(
            press(&mut screen, KeyCode::Char('i')),
            ScreenOutcome::Continue
        ));
    }
}
