//! Character info: personality, features, proficiencies and advancement.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    Frame,
};

use crate::focus::{self, FocusRing};
use crate::modal::{
    ConfirmAction, Confirmation, HelpOverlay, ListPicker, Modal, NumericEntry, NumericPurpose,
    PickPurpose,
};
use crate::screens::{commands, Screen, ScreenKind, ScreenOutcome, ScreenState, GLOBAL_HELP};
use crate::session::Session;
use crate::ui::layout::columns;
use crate::ui::theme::SheetTheme;
use crate::ui::widgets::panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPanel {
    Personality,
    Features,
    Proficiencies,
}

const PANELS: &[InfoPanel] = &[
    InfoPanel::Personality,
    InfoPanel::Features,
    InfoPanel::Proficiencies,
];

/// Languages offered by the add-language picker.
pub const LANGUAGES: &[&str] = &[
    "Common",
    "Dwarvish",
    "Elvish",
    "Giant",
    "Gnomish",
    "Goblin",
    "Halfling",
    "Orc",
    "Abyssal",
    "Celestial",
    "Draconic",
    "Deep Speech",
    "Infernal",
    "Primordial",
    "Sylvan",
    "Undercommon",
];

const HELP: &[(&str, &str)] = &[
    ("- +", "Use / restore a feature"),
    ("a", "Add a language"),
    ("x", "Remove the selected language"),
    ("l", "Set level"),
    ("e", "Set experience"),
];

pub struct InfoScreen {
    state: ScreenState,
    pub session: Session,
    pub focus: FocusRing<InfoPanel>,
    personality_cursor: usize,
    feature_cursor: usize,
    language_cursor: usize,
}

impl InfoScreen {
    pub fn new(session: Session) -> Self {
        Self {
            state: ScreenState::default(),
            session,
            focus: FocusRing::new(PANELS),
            personality_cursor: 0,
            feature_cursor: 0,
            language_cursor: 0,
        }
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    fn handle_features(&mut self, key: KeyEvent) {
        let count = self.session.character.features.len();
        match key.code {
            KeyCode::Up => focus::up(&mut self.feature_cursor),
            KeyCode::Down => focus::down(&mut self.feature_cursor, count),
            KeyCode::Char('-') | KeyCode::Char('+') => {
                let spend = key.code == KeyCode::Char('-');
                let Some(feature) = self
                    .session
                    .character
                    .features
                    .get_mut(focus::clamp(self.feature_cursor, count))
                else {
                    return;
                };
                let Some(uses) = feature.uses.as_mut() else {
                    let message = format!("{} has no limited uses", feature.name);
                    self.state.error(message);
                    return;
                };
                let changed = if spend && uses.current > 0 {
                    uses.current -= 1;
                    true
                } else if !spend && uses.current < uses.maximum {
                    uses.current += 1;
                    true
                } else {
                    false
                };
                let message = format!("{} {}/{}", feature.name, uses.current, uses.maximum);
                if changed {
                    self.state.info(message);
                    self.state.persist(&self.session);
                } else if spend {
                    self.state.error(format!("No uses left ({message})"));
                } else {
                    self.state.error(format!("Already full ({message})"));
                }
            }
            _ => {}
        }
    }

    fn handle_proficiencies(&mut self, key: KeyEvent) {
        let languages = &self.session.character.languages;
        match key.code {
            KeyCode::Up => focus::up(&mut self.language_cursor),
            KeyCode::Down => focus::down(&mut self.language_cursor, languages.len()),
            KeyCode::Char('a') => {
                let options: Vec<String> = LANGUAGES
                    .iter()
                    .filter(|l| !languages.iter().any(|known| known == *l))
                    .map(|l| l.to_string())
                    .collect();
                if options.is_empty() {
                    self.state.info("Every language is already known");
                    return;
                }
                self.state.open(Modal::ListPicker(ListPicker::single(
                    "Add language",
                    options,
                    PickPurpose::AddLanguage,
                )));
            }
            KeyCode::Char('x') => {
                let Some(language) = languages
                    .get(focus::clamp(self.language_cursor, languages.len()))
                    .cloned()
                else {
                    return;
                };
                self.state.open(Modal::Confirmation(Confirmation::new(
                    format!("Forget {language}?"),
                    ConfirmAction::RemoveLanguage(language),
                )));
            }
            _ => {}
        }
    }

    fn render_personality(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let character = &self.session.character;
        let [header_area, list_area] =
            Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).areas(area);

        let header = vec![
            Line::from(Span::styled(
                character.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "{} {}, {}",
                character.race.name(),
                character.class_summary(),
                character.background.name()
            )),
            Line::from(format!("Level {}   XP {}", character.level, character.experience)),
        ];
        panel::render_text(frame, header_area, "Character", header, false, theme);

        let rows = character
            .personality
            .fields()
            .iter()
            .map(|(label, text)| {
                let body = if text.is_empty() {
                    Span::styled("-", theme.muted_style())
                } else {
                    Span::raw(text.to_string())
                };
                Line::from(vec![Span::styled(format!("{label}: "), theme.muted_style()), body])
            })
            .collect();
        panel::render_list(
            frame,
            list_area,
            "Personality",
            rows,
            self.personality_cursor,
            self.focus.is(InfoPanel::Personality),
            "",
            theme,
        );
    }

    fn render_features(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let features = &self.session.character.features;
        let rows = features
            .iter()
            .map(|feature| match &feature.uses {
                Some(uses) => Line::from(vec![
                    Span::raw(format!("{:<20}", feature.name)),
                    Span::raw(format!("{}/{} ", uses.current, uses.maximum)),
                    Span::styled(format!("({})", uses.recharge.label()), theme.muted_style()),
                ]),
                None => Line::from(feature.name.clone()),
            })
            .collect();
        let [list_area, detail_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(6)]).areas(area);
        panel::render_list(
            frame,
            list_area,
            "Features",
            rows,
            self.feature_cursor,
            self.focus.is(InfoPanel::Features),
            "No features",
            theme,
        );

        let detail = features
            .get(focus::clamp(self.feature_cursor, features.len()))
            .map(|f| {
                vec![
                    Line::styled(format!("From {}", f.source), theme.muted_style()),
                    Line::from(f.description.clone()),
                ]
            })
            .unwrap_or_default();
        panel::render_text(frame, detail_area, "Description", detail, false, theme);
    }

    fn render_proficiencies(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let character = &self.session.character;
        let [languages_area, other_area] =
            Layout::vertical([Constraint::Min(4), Constraint::Length(8)]).areas(area);

        let rows = character
            .languages
            .iter()
            .map(|l| Line::from(l.clone()))
            .collect();
        panel::render_list(
            frame,
            languages_area,
            "Languages",
            rows,
            self.language_cursor,
            self.focus.is(InfoPanel::Proficiencies),
            "No languages",
            theme,
        );

        let list = |items: &[String]| {
            if items.is_empty() {
                "none".to_string()
            } else {
                items.join(", ")
            }
        };
        let lines = vec![
            Line::from(format!("Weapons: {}", list(&character.weapon_proficiencies))),
            Line::from(format!("Armor: {}", list(&character.armor_proficiencies))),
            Line::from(format!("Tools: {}", list(&character.tool_proficiencies))),
        ];
        panel::render_text(frame, other_area, "Proficiencies", lines, false, theme);
    }
}

impl Screen for InfoScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Info
    }

    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn help(&self) -> HelpOverlay {
        HelpOverlay::new("Character Info", HELP).with(GLOBAL_HELP)
    }

    fn hints(&self) -> &'static str {
        match self.focus.current() {
            InfoPanel::Personality => "l level  e experience  ? help",
            InfoPanel::Features => "- use  + restore  ? help",
            InfoPanel::Proficiencies => "a add language  x remove  ? help",
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> ScreenOutcome {
        commands::handle_modal_key(&mut self.state, &mut self.session, key)
    }

    fn handle_panel_key(&mut self, key: KeyEvent) -> ScreenOutcome {
        match key.code {
            KeyCode::Char('l') => {
                let level = self.session.character.level as u32;
                self.state.open(Modal::NumericEntry(NumericEntry::with_value(
                    NumericPurpose::Level,
                    level,
                )));
                return ScreenOutcome::Continue;
            }
            KeyCode::Char('e') => {
                self.state
                    .open(Modal::NumericEntry(NumericEntry::new(NumericPurpose::Experience)));
                return ScreenOutcome::Continue;
            }
            _ => {}
        }

        match self.focus.current() {
            InfoPanel::Personality => match key.code {
                KeyCode::Up => focus::up(&mut self.personality_cursor),
                KeyCode::Down => focus::down(
                    &mut self.personality_cursor,
                    self.session.character.personality.fields().len(),
                ),
                _ => {}
            },
            InfoPanel::Features => self.handle_features(key),
            InfoPanel::Proficiencies => self.handle_proficiencies(key),
        }
        ScreenOutcome::Continue
    }

    fn cycle_focus(&mut self, forward: bool) {
        if forward {
            self.focus.next();
        } else {
            self.focus.prev();
        }
    }

    fn clamp_cursors(&mut self) {
        let character = &self.session.character;
        self.personality_cursor = focus::clamp(self.personality_cursor, character.personality.fields().len());
        self.feature_cursor = focus::clamp(self.feature_cursor, character.features.len());
        self.language_cursor = focus::clamp(self.language_cursor, character.languages.len());
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let cols = columns(area, 3);
        self.render_personality(frame, cols[0], theme);
        self.render_features(frame, cols[1], theme);
        self.render_proficiencies(frame, cols[2], theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::key;
    use crate::screens::dispatch;
    use charsheet_core::testing::{sample_fighter, sample_wizard};
    use charsheet_core::{Character, MemoryStore, StaticCatalog};
    use std::sync::Arc;

    fn screen(character: Character) -> (InfoScreen, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with([character.clone()]));
        let session = Session::new(character, store.clone(), Arc::new(StaticCatalog));
        (InfoScreen::new(session), store)
    }

    fn press(screen: &mut InfoScreen, code: KeyCode) -> ScreenOutcome {
        dispatch(screen, key(code))
    }

    #[test]
    fn test_level_entry_replaces_buffer() {
        let (mut screen, store) = screen(sample_fighter("Bruni"));
        press(&mut screen, KeyCode::Char('l'));
        press(&mut screen, KeyCode::Backspace);
        press(&mut screen, KeyCode::Char('5'));
        press(&mut screen, KeyCode::Enter);

        assert_eq!(screen.session.character.level, 5);
        assert_eq!(store.get(screen.session.character.id).unwrap().level, 5);
    }

    #[test]
    fn test_level_out_of_range_refused() {
        let (mut screen, store) = screen(sample_fighter("Bruni"));
        press(&mut screen, KeyCode::Char('l'));
        press(&mut screen, KeyCode::Char('0'));
        press(&mut screen, KeyCode::Enter);

        assert_eq!(screen.session.character.level, 3);
        assert!(screen.state().status.as_ref().unwrap().is_error);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_experience_entry() {
        let (mut screen, _) = screen(sample_fighter("Bruni"));
        press(&mut screen, KeyCode::Char('e'));
        for c in "900".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.session.character.experience, 900);
    }

    #[test]
    fn test_feature_uses() {
        let (mut screen, store) = screen(sample_fighter("Bruni"));
        screen.focus.focus(InfoPanel::Features);

        press(&mut screen, KeyCode::Char('-'));
        let uses = screen.session.character.features[0].uses.as_ref().unwrap();
        assert_eq!(uses.current, 0);

        press(&mut screen, KeyCode::Char('-'));
        assert!(screen.state().status.as_ref().unwrap().is_error);

        press(&mut screen, KeyCode::Char('+'));
        press(&mut screen, KeyCode::Char('+'));
        let uses = screen.session.character.features[0].uses.as_ref().unwrap();
        assert_eq!(uses.current, 1);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_add_and_remove_language() {
        let (mut screen, _) = screen(sample_wizard("Elara"));
        screen.focus.focus(InfoPanel::Proficiencies);

        press(&mut screen, KeyCode::Char('a'));
        let Some(Modal::ListPicker(picker)) = screen.state().modals.top() else {
            panic!("expected the language picker");
        };
        assert!(!picker.options.iter().any(|o| o == "Common" || o == "Elvish"));
        assert_eq!(picker.options[0], "Dwarvish");

        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.session.character.languages, vec!["Common", "Elvish", "Dwarvish"]);

        press(&mut screen, KeyCode::Down);
        press(&mut screen, KeyCode::Char('x'));
        press(&mut screen, KeyCode::Char('y'));
        assert_eq!(screen.session.character.languages, vec!["Common", "Dwarvish"]);
    }

    #[test]
    fn test_personality_is_read_only() {
        let (mut screen, store) = screen(sample_fighter("Bruni"));
        let before = screen.session.character.clone();
        for code in [KeyCode::Down, KeyCode::Enter, KeyCode::Char('p'), KeyCode::Up] {
            press(&mut screen, code);
        }
        assert_eq!(screen.session.character, before);
        assert_eq!(store.write_count(), 0);
    }
}
