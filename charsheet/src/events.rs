//! Events delivered to the application loop.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::tasks::TaskResult;

/// Everything the loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// A deferred task finished.
    Task(TaskResult),
}

impl AppEvent {
    /// Translate a terminal event. Key releases and repeats are dropped.
    pub fn from_terminal(event: Event) -> Option<AppEvent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Ctrl+C quits from anywhere, even with a modal open.
pub fn is_force_quit(key: &KeyEvent) -> bool {
    matches!(
        (key.code, key.modifiers),
        (KeyCode::Char('c'), KeyModifiers::CONTROL)
    )
}

#[cfg(test)]
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    #[test]
    fn test_only_presses_become_keys() {
        let press = Event::Key(key(KeyCode::Char('q')));
        assert!(matches!(AppEvent::from_terminal(press), Some(AppEvent::Key(_))));

        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(AppEvent::from_terminal(release).is_none());
        assert!(AppEvent::from_terminal(Event::FocusGained).is_none());
    }

    #[test]
    fn test_force_quit() {
        assert!(is_force_quit(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_force_quit(&key(KeyCode::Char('c'))));
    }
}
