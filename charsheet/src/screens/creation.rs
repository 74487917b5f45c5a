//! New character wizard.
//!
//! Name, race, class and background are chosen one step at a time; the
//! review step builds a level 1 character and saves it before the sheet
//! opens.

use charsheet_core::character::Ability;
use charsheet_core::{Background, Catalog, CharacterBuilder, CharacterClass, CharacterStore, RaceType};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::Line,
    Frame,
};
use std::sync::Arc;

use crate::focus;
use crate::modal::HelpOverlay;
use crate::screens::{NavSignal, Screen, ScreenKind, ScreenOutcome, ScreenState};
use crate::ui::theme::SheetTheme;
use crate::ui::widgets::{panel, InputWidget};

/// Longest accepted character name.
const MAX_NAME_LEN: usize = 32;

const HELP: &[(&str, &str)] = &[
    ("↑/↓", "Choose"),
    ("Enter", "Next step / create"),
    ("Esc", "Previous step"),
    ("q", "Quit (outside the name step)"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStep {
    Name,
    Race,
    Class,
    Background,
    Review,
}

impl CreationStep {
    pub fn title(&self) -> &'static str {
        match self {
            CreationStep::Name => "Enter a Name",
            CreationStep::Race => "Choose a Race",
            CreationStep::Class => "Choose a Class",
            CreationStep::Background => "Choose a Background",
            CreationStep::Review => "Review",
        }
    }

    pub fn next(&self) -> Option<CreationStep> {
        match self {
            CreationStep::Name => Some(CreationStep::Race),
            CreationStep::Race => Some(CreationStep::Class),
            CreationStep::Class => Some(CreationStep::Background),
            CreationStep::Background => Some(CreationStep::Review),
            CreationStep::Review => None,
        }
    }

    pub fn prev(&self) -> Option<CreationStep> {
        match self {
            CreationStep::Name => None,
            CreationStep::Race => Some(CreationStep::Name),
            CreationStep::Class => Some(CreationStep::Race),
            CreationStep::Background => Some(CreationStep::Class),
            CreationStep::Review => Some(CreationStep::Background),
        }
    }

    fn number(&self) -> usize {
        match self {
            CreationStep::Name => 1,
            CreationStep::Race => 2,
            CreationStep::Class => 3,
            CreationStep::Background => 4,
            CreationStep::Review => 5,
        }
    }
}

pub struct CreationScreen {
    state: ScreenState,
    store: Arc<dyn CharacterStore>,
    catalog: Arc<dyn Catalog>,
    pub step: CreationStep,
    pub name: String,
    race_cursor: usize,
    class_cursor: usize,
    background_cursor: usize,
}

impl CreationScreen {
    pub fn new(store: Arc<dyn CharacterStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            state: ScreenState::default(),
            store,
            catalog,
            step: CreationStep::Name,
            name: String::new(),
            race_cursor: 0,
            class_cursor: 0,
            background_cursor: 0,
        }
    }

    fn race(&self) -> Option<RaceType> {
        let races = self.catalog.races();
        races.get(focus::clamp(self.race_cursor, races.len())).copied()
    }

    fn class(&self) -> Option<CharacterClass> {
        let classes = self.catalog.classes();
        classes.get(focus::clamp(self.class_cursor, classes.len())).copied()
    }

    fn background(&self) -> Option<Background> {
        let backgrounds = self.catalog.backgrounds();
        backgrounds
            .get(focus::clamp(self.background_cursor, backgrounds.len()))
            .copied()
    }

    fn builder(&self) -> CharacterBuilder {
        let mut builder = CharacterBuilder::new().name(self.name.clone());
        if let Some(race) = self.race() {
            builder = builder.race(race);
        }
        if let Some(class) = self.class() {
            builder = builder.class(class);
        }
        if let Some(background) = self.background() {
            builder = builder.background(background);
        }
        builder
    }

    fn advance(&mut self) {
        if let Some(next) = self.step.next() {
            self.step = next;
        }
    }

    fn handle_name(&mut self, key: KeyEvent) -> ScreenOutcome {
        match key.code {
            KeyCode::Char(c) if !c.is_control() => {
                if self.name.chars().count() < MAX_NAME_LEN {
                    self.name.push(c);
                }
            }
            KeyCode::Backspace => {
                self.name.pop();
            }
            KeyCode::Enter => {
                if self.name.trim().is_empty() {
                    self.state.error("Enter a name first");
                } else {
                    self.advance();
                }
            }
            KeyCode::Esc => return ScreenOutcome::Navigate(NavSignal::Back),
            _ => {}
        }
        ScreenOutcome::Continue
    }

    /// Build, save and open the new character. Failures keep the review step.
    fn create(&mut self) -> ScreenOutcome {
        let character = match self.builder().build() {
            Ok(character) => character,
            Err(e) => {
                self.state.error(e.to_string());
                return ScreenOutcome::Continue;
            }
        };
        match self.store.save(&character) {
            Ok(_) => {
                tracing::info!(character = %character.name, class = %character.class_summary(), "Created character");
                ScreenOutcome::Navigate(NavSignal::OpenSheet(Box::new(character)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Saving new character failed");
                self.state.error(format!("Save failed: {e}"));
                ScreenOutcome::Continue
            }
        }
    }

    fn review_lines(&self) -> Vec<Line<'static>> {
        match self.builder().build() {
            Ok(character) => {
                let scores = Ability::all()
                    .iter()
                    .map(|a| format!("{} {}", a.abbreviation(), character.ability_scores.get(*a)))
                    .collect::<Vec<_>>()
                    .join("  ");
                vec![
                    Line::from(character.name.clone()),
                    Line::from(format!(
                        "{} {}, {}",
                        character.race.name(),
                        character.class_summary(),
                        character.background.name()
                    )),
                    Line::from(""),
                    Line::from(scores),
                    Line::from(format!(
                        "HP {}   Speed {} ft   Hit die {}",
                        character.hit_points.maximum, character.speed, character.hit_dice.die
                    )),
                    Line::from(format!("Languages: {}", character.languages.join(", "))),
                    Line::from(format!("{} items to start", character.inventory.items.len())),
                    Line::from(""),
                    Line::from("Press Enter to create"),
                ]
            }
            Err(e) => vec![Line::from(e.to_string())],
        }
    }

    fn describe_choice(&self) -> Vec<Line<'static>> {
        match self.step {
            CreationStep::Race => self
                .race()
                .map(|race| {
                    vec![
                        Line::from(format!("Ability bonuses: {}", race.ability_bonuses())),
                        Line::from(format!("Speed {} ft", race.base_speed())),
                        Line::from(format!("Languages: {}", race.languages().join(", "))),
                    ]
                })
                .unwrap_or_default(),
            CreationStep::Class => self
                .class()
                .map(|class| {
                    let data = class.data();
                    let saves = data
                        .saving_throws
                        .iter()
                        .map(|a| a.name())
                        .collect::<Vec<_>>()
                        .join(", ");
                    let mut lines = vec![
                        Line::from(format!("Hit die {}", class.hit_die())),
                        Line::from(format!("Saving throws: {saves}")),
                        Line::from(format!("Armor: {}", data.armor_proficiencies.join(", "))),
                    ];
                    if let Some(ability) = class.spellcasting_ability() {
                        lines.push(Line::from(format!("Casts with {}", ability.name())));
                    }
                    lines
                })
                .unwrap_or_default(),
            CreationStep::Background => self
                .background()
                .map(|background| {
                    let skills = background
                        .skill_proficiencies()
                        .iter()
                        .map(|s| s.name())
                        .collect::<Vec<_>>()
                        .join(", ");
                    vec![Line::from(format!("Skills: {skills}"))]
                })
                .unwrap_or_default(),
            CreationStep::Name | CreationStep::Review => Vec::new(),
        }
    }
}

impl Screen for CreationScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Creation
    }

    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn help(&self) -> HelpOverlay {
        HelpOverlay::new("New Character", HELP)
    }

    fn hints(&self) -> &'static str {
        match self.step {
            CreationStep::Name => "type a name  Enter next  Esc cancel",
            CreationStep::Review => "Enter create  Esc back",
            _ => "↑/↓ choose  Enter next  Esc back",
        }
    }

    fn handle_modal_key(&mut self, _key: KeyEvent) -> ScreenOutcome {
        self.state.modals.pop();
        ScreenOutcome::Continue
    }

    fn handle_panel_key(&mut self, key: KeyEvent) -> ScreenOutcome {
        let (cursor, len) = match self.step {
            CreationStep::Name => return self.handle_name(key),
            CreationStep::Review => {
                if key.code == KeyCode::Enter {
                    return self.create();
                }
                return ScreenOutcome::Continue;
            }
            CreationStep::Race => (&mut self.race_cursor, self.catalog.races().len()),
            CreationStep::Class => (&mut self.class_cursor, self.catalog.classes().len()),
            CreationStep::Background => (&mut self.background_cursor, self.catalog.backgrounds().len()),
        };
        match key.code {
            KeyCode::Up => focus::up(cursor),
            KeyCode::Down => focus::down(cursor, len),
            KeyCode::Enter => self.advance(),
            _ => {}
        }
        ScreenOutcome::Continue
    }

    fn step_back(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    fn captures_text(&self) -> bool {
        self.step == CreationStep::Name
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let title = format!("Step {}/5: {}", self.step.number(), self.step.title());

        if self.step == CreationStep::Name {
            let [input_area, _] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
            frame.render_widget(
                InputWidget::new(&self.name, theme)
                    .title(self.step.title())
                    .placeholder("character name")
                    .active(true),
                input_area,
            );
            return;
        }

        if self.step == CreationStep::Review {
            panel::render_text(frame, area, title, self.review_lines(), true, theme);
            return;
        }

        let [list_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
        let (rows, cursor): (Vec<Line>, usize) = match self.step {
            CreationStep::Race => (
                self.catalog.races().iter().map(|r| Line::from(r.name())).collect(),
                self.race_cursor,
            ),
            CreationStep::Class => (
                self.catalog.classes().iter().map(|c| Line::from(c.name())).collect(),
                self.class_cursor,
            ),
            _ => (
                self.catalog
                    .backgrounds()
                    .iter()
                    .map(|b| Line::from(b.name()))
                    .collect(),
                self.background_cursor,
            ),
        };
        panel::render_list(frame, list_area, title, rows, cursor, true, "Nothing to choose", theme);
        panel::render_text(frame, detail_area, "Details", self.describe_choice(), false, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::key;
    use crate::screens::dispatch;
    use charsheet_core::{MemoryStore, StaticCatalog};

    fn screen() -> (CreationScreen, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (CreationScreen::new(store.clone(), Arc::new(StaticCatalog)), store)
    }

    fn press(screen: &mut CreationScreen, code: KeyCode) -> ScreenOutcome {
        dispatch(screen, key(code))
    }

    fn type_name(screen: &mut CreationScreen, name: &str) {
        for c in name.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_full_flow_saves_and_opens_sheet() {
        let (mut screen, store) = screen();
        type_name(&mut screen, "Tess");
        for _ in 0..4 {
            press(&mut screen, KeyCode::Enter);
        }
        assert_eq!(screen.step, CreationStep::Review);

        let ScreenOutcome::Navigate(NavSignal::OpenSheet(character)) = press(&mut screen, KeyCode::Enter)
        else {
            panic!("expected the new sheet");
        };
        assert_eq!(character.name, "Tess");
        assert_eq!(character.level, 1);
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.get(character.id).unwrap().name, "Tess");
    }

    #[test]
    fn test_name_step_takes_every_letter() {
        let (mut screen, _) = screen();
        type_name(&mut screen, "qbic?");
        assert_eq!(screen.name, "qbic?");
        assert!(!screen.state().modals.is_active());
    }

    #[test]
    fn test_empty_name_refused() {
        let (mut screen, _) = screen();
        type_name(&mut screen, "  ");
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.step, CreationStep::Name);
        assert!(screen.state().status.as_ref().unwrap().is_error);
    }

    #[test]
    fn test_escape_steps_back_then_leaves() {
        let (mut screen, _) = screen();
        type_name(&mut screen, "Tess");
        press(&mut screen, KeyCode::Enter);
        press(&mut screen, KeyCode::Down);
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.step, CreationStep::Class);

        assert!(matches!(press(&mut screen, KeyCode::Esc), ScreenOutcome::Continue));
        assert_eq!(screen.step, CreationStep::Race);
        assert_eq!(screen.race(), Some(RaceType::all()[1]));
        press(&mut screen, KeyCode::Esc);
        assert!(matches!(
            press(&mut screen, KeyCode::Esc),
            ScreenOutcome::Navigate(NavSignal::Back)
        ));
    }

    #[test]
    fn test_save_failure_stays_on_review() {
        let (mut screen, store) = screen();
        store.fail_writes(true);
        type_name(&mut screen, "Tess");
        for _ in 0..4 {
            press(&mut screen, KeyCode::Enter);
        }

        assert!(matches!(press(&mut screen, KeyCode::Enter), ScreenOutcome::Continue));
        assert_eq!(screen.step, CreationStep::Review);
        assert!(screen.state().status.as_ref().unwrap().text.starts_with("Save failed"));
    }
}
