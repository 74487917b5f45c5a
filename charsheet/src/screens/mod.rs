//! Screen controllers.
//!
//! Every screen owns a [`ScreenState`] (its modal stack and one-shot status
//! line) and implements [`Screen`]. [`dispatch`] routes a key through the
//! same three layers on every screen: the active modal, then global
//! accelerators, then the focused panel.

pub mod casting;
pub mod commands;
pub mod creation;
pub mod info;
pub mod inventory;
pub mod selection;
pub mod sheet;
pub mod spellbook;

use charsheet_core::Character;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

use crate::modal::{ConfirmAction, Confirmation, HelpOverlay, Modal, ModalSignal, ModalStack};
use crate::session::Session;
use crate::tasks::DeferredTask;
use crate::ui::theme::SheetTheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Selection,
    Creation,
    Sheet,
    Inventory,
    Spellbook,
    Info,
}

impl ScreenKind {
    /// Screens that work on an open character.
    pub fn has_character(&self) -> bool {
        matches!(
            self,
            ScreenKind::Sheet | ScreenKind::Inventory | ScreenKind::Spellbook | ScreenKind::Info
        )
    }

    pub fn title(&self) -> &'static str {
        match self {
            ScreenKind::Selection => "Characters",
            ScreenKind::Creation => "New Character",
            ScreenKind::Sheet => "Character Sheet",
            ScreenKind::Inventory => "Inventory",
            ScreenKind::Spellbook => "Spellbook",
            ScreenKind::Info => "Character Info",
        }
    }
}

/// Navigation requested by a screen.
#[derive(Debug)]
pub enum NavSignal {
    Back,
    OpenSheet(Box<Character>),
    OpenInventory,
    OpenSpellbook,
    OpenInfo,
    StartCreation,
}

/// Result of handling one key.
#[derive(Debug)]
pub enum ScreenOutcome {
    Continue,
    Quit,
    Navigate(NavSignal),
    Spawn(DeferredTask),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Modal stack and status line shared by every screen.
#[derive(Debug, Default)]
pub struct ScreenState {
    pub modals: ModalStack,
    pub status: Option<StatusMessage>,
}

impl ScreenState {
    /// Open a modal. Entering a modal clears the status line.
    pub fn open(&mut self, modal: Modal) {
        self.status = None;
        self.modals.push(modal);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Autosave after a committed edit. A failure replaces the status line.
    pub fn persist(&mut self, session: &Session) {
        if let Err(e) = session.autosave() {
            self.error(format!("Save failed: {e}"));
        }
    }
}

pub trait Screen {
    fn kind(&self) -> ScreenKind;
    fn state(&self) -> &ScreenState;
    fn state_mut(&mut self) -> &mut ScreenState;

    fn help(&self) -> HelpOverlay;

    /// Key hints shown when the status line is empty.
    fn hints(&self) -> &'static str;

    /// A key while a screen-specific modal is on top.
    fn handle_modal_key(&mut self, key: KeyEvent) -> ScreenOutcome;

    /// A key no modal or global accelerator took.
    fn handle_panel_key(&mut self, key: KeyEvent) -> ScreenOutcome;

    fn cycle_focus(&mut self, _forward: bool) {}

    /// Esc with no modal open. Return true to stay on this screen.
    fn step_back(&mut self) -> bool {
        false
    }

    /// True while a text field wants every printable key.
    fn captures_text(&self) -> bool {
        false
    }

    /// Bring every cursor back inside its list.
    fn clamp_cursors(&mut self) {}

    fn render(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme);
}

/// Route one key press through modal, global and panel handling.
pub fn dispatch(screen: &mut dyn Screen, key: KeyEvent) -> ScreenOutcome {
    screen.state_mut().clear_status();
    screen.clamp_cursors();

    let outcome = if screen.state().modals.is_active() {
        dispatch_modal(screen, key)
    } else if screen.captures_text() {
        screen.handle_panel_key(key)
    } else if let Some(outcome) = global_key(screen, key) {
        outcome
    } else {
        screen.handle_panel_key(key)
    };

    screen.clamp_cursors();
    outcome
}

/// Help and quit confirmation behave the same everywhere.
fn dispatch_modal(screen: &mut dyn Screen, key: KeyEvent) -> ScreenOutcome {
    match screen.state().modals.top() {
        Some(Modal::Help(_)) => {
            screen.state_mut().modals.pop();
            ScreenOutcome::Continue
        }
        Some(Modal::Confirmation(Confirmation {
            action: ConfirmAction::Quit,
            ..
        })) => {
            let Some(Modal::Confirmation(mut confirm)) = screen.state_mut().modals.pop() else {
                return ScreenOutcome::Continue;
            };
            match confirm.handle_key(key) {
                ModalSignal::Confirm => ScreenOutcome::Quit,
                _ => ScreenOutcome::Continue,
            }
        }
        _ => screen.handle_modal_key(key),
    }
}

fn global_key(screen: &mut dyn Screen, key: KeyEvent) -> Option<ScreenOutcome> {
    let kind = screen.kind();
    let outcome = match key.code {
        KeyCode::Char('q') => {
            screen.state_mut().open(Modal::Confirmation(Confirmation::new(
                "Quit the character sheet?",
                ConfirmAction::Quit,
            )));
            ScreenOutcome::Continue
        }
        KeyCode::Char('?') => {
            let help = screen.help();
            screen.state_mut().open(Modal::Help(help));
            ScreenOutcome::Continue
        }
        KeyCode::Tab => {
            screen.cycle_focus(true);
            ScreenOutcome::Continue
        }
        KeyCode::BackTab => {
            screen.cycle_focus(false);
            ScreenOutcome::Continue
        }
        KeyCode::Char('i') if kind.has_character() && kind != ScreenKind::Inventory => {
            ScreenOutcome::Navigate(NavSignal::OpenInventory)
        }
        KeyCode::Char('b') if kind.has_character() && kind != ScreenKind::Spellbook => {
            ScreenOutcome::Navigate(NavSignal::OpenSpellbook)
        }
        KeyCode::Char('c') if kind.has_character() && kind != ScreenKind::Info => {
            ScreenOutcome::Navigate(NavSignal::OpenInfo)
        }
        KeyCode::Esc if screen.step_back() => ScreenOutcome::Continue,
        KeyCode::Esc => ScreenOutcome::Navigate(NavSignal::Back),
        _ => return None,
    };
    Some(outcome)
}

/// Keys shared by every character screen, for help overlays.
pub const GLOBAL_HELP: &[(&str, &str)] = &[
    ("Tab/S-Tab", "Next/previous panel"),
    ("i b c", "Inventory, spellbook, info"),
    ("Esc", "Back"),
    ("?", "This help"),
    ("q", "Quit"),
];
