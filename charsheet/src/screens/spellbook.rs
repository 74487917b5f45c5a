//! Spellbook: slot pools, spells by level, preparing, learning and casting.

use charsheet_core::character::SlotInfo;
use charsheet_core::spells::{level_label, SpellData};
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
use crate::screens::{casting, commands, Screen, ScreenKind, ScreenOutcome, ScreenState, GLOBAL_HELP};
use crate::session::Session;
use crate::ui::theme::SheetTheme;
use crate::ui::widgets::panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellbookPanel {
    Slots,
    Spells,
}

const PANELS: &[SpellbookPanel] = &[SpellbookPanel::Slots, SpellbookPanel::Spells];

/// Highest spell level shown as a tab.
const MAX_SPELL_LEVEL: u8 = 9;

const HELP: &[(&str, &str)] = &[
    ("Enter/n", "Set slot total (slots panel, ↑/↓ adjust)"),
    ("- +", "Use / restore a slot"),
    ("←/→", "Spell level tabs"),
    ("p", "Toggle prepared"),
    ("Enter", "Cast the selected spell"),
    ("l", "Learn spells at this level"),
    ("x", "Forget the selected spell"),
];

/// One row of the slots panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotRow {
    Level(u8),
    Pact,
}

pub struct SpellbookScreen {
    state: ScreenState,
    pub session: Session,
    pub focus: FocusRing<SpellbookPanel>,
    slot_cursor: usize,
    spell_cursor: usize,
    level_tab: u8,
}

impl SpellbookScreen {
    pub fn new(session: Session) -> Self {
        Self {
            state: ScreenState::default(),
            session,
            focus: FocusRing::new(PANELS),
            slot_cursor: 0,
            spell_cursor: 0,
            level_tab: 0,
        }
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    fn slot_rows(&self) -> Vec<SlotRow> {
        let Some(casting) = self.session.character.spellcasting.as_ref() else {
            return Vec::new();
        };
        let mut rows: Vec<SlotRow> = (1..=MAX_SPELL_LEVEL).map(SlotRow::Level).collect();
        if casting.pact.is_some() {
            rows.push(SlotRow::Pact);
        }
        rows
    }

    /// Names of the spells known at the current tab level, in list order.
    fn spells_at_tab(&self) -> Vec<String> {
        let Some(casting) = self.session.character.spellcasting.as_ref() else {
            return Vec::new();
        };
        let catalog = self.session.catalog.as_ref();
        let source = if self.level_tab == 0 {
            &casting.cantrips
        } else {
            &casting.known
        };
        source
            .iter()
            .filter(|name| {
                catalog
                    .spell(name)
                    .is_some_and(|spell| spell.level == self.level_tab)
            })
            .cloned()
            .collect()
    }

    fn selected_spell(&self) -> Option<String> {
        let spells = self.spells_at_tab();
        spells
            .get(focus::clamp(self.spell_cursor, spells.len()))
            .cloned()
    }

    fn handle_slots(&mut self, key: KeyEvent) {
        let rows = self.slot_rows();
        if rows.is_empty() {
            self.state.error(format!("{} has no spell slots", self.session.character.name));
            return;
        }
        let row = rows[focus::clamp(self.slot_cursor, rows.len())];

        match key.code {
            KeyCode::Up => focus::up(&mut self.slot_cursor),
            KeyCode::Down => focus::down(&mut self.slot_cursor, rows.len()),
            KeyCode::Enter | KeyCode::Char('n') => match row {
                SlotRow::Level(level) => {
                    let total = self
                        .session
                        .character
                        .spellcasting
                        .as_ref()
                        .and_then(|c| c.slots.get(level))
                        .map(|s| s.total as u32)
                        .unwrap_or(0);
                    self.state.open(Modal::NumericEntry(NumericEntry::with_value(
                        NumericPurpose::SlotTotal { level },
                        total,
                    )));
                }
                SlotRow::Pact => self.state.error("Pact slots follow warlock level"),
            },
            KeyCode::Char('-') | KeyCode::Char('+') => {
                let spend = key.code == KeyCode::Char('-');
                let Some(casting) = self.session.character.spellcasting.as_mut() else {
                    return;
                };
                let changed = match (row, spend) {
                    (SlotRow::Level(level), true) => casting.slots.use_slot(level),
                    (SlotRow::Level(level), false) => casting.slots.restore_slot(level),
                    (SlotRow::Pact, true) => casting.pact.as_mut().is_some_and(|p| p.use_slot()),
                    (SlotRow::Pact, false) => casting.pact.as_mut().is_some_and(|p| {
                        let restored = p.used > 0;
                        p.used = p.used.saturating_sub(1);
                        restored
                    }),
                };
                if changed {
                    self.state.info(if spend { "Slot used" } else { "Slot restored" });
                    self.state.persist(&self.session);
                } else if spend {
                    self.state.error("No slots left at that level");
                } else {
                    self.state.error("No used slots to restore");
                }
            }
            _ => {}
        }
    }

    fn handle_spells(&mut self, key: KeyEvent) {
        if self.session.character.spellcasting.is_none() {
            self.state.error(format!("{} can't cast spells", self.session.character.name));
            return;
        }

        match key.code {
            KeyCode::Up => focus::up(&mut self.spell_cursor),
            KeyCode::Down => {
                let len = self.spells_at_tab().len();
                focus::down(&mut self.spell_cursor, len);
            }
            KeyCode::Left => {
                self.level_tab = self.level_tab.saturating_sub(1);
                self.spell_cursor = 0;
            }
            KeyCode::Right => {
                self.level_tab = (self.level_tab + 1).min(MAX_SPELL_LEVEL);
                self.spell_cursor = 0;
            }
            KeyCode::Enter => {
                if let Some(name) = self.selected_spell() {
                    casting::begin_cast(&mut self.state, &mut self.session, &name);
                }
            }
            KeyCode::Char('p') => self.toggle_prepared(),
            KeyCode::Char('l') => self.open_learn_picker(),
            KeyCode::Char('x') => {
                if let Some(name) = self.selected_spell() {
                    let prompt = format!("Forget {name}?");
                    self.state.open(Modal::Confirmation(Confirmation::new(
                        prompt,
                        ConfirmAction::ForgetSpell(name),
                    )));
                }
            }
            _ => {}
        }
    }

    fn toggle_prepared(&mut self) {
        if self.level_tab == 0 {
            self.state.error("Cantrips are always ready");
            return;
        }
        let Some(name) = self.selected_spell() else { return };
        let character = &mut self.session.character;
        let prepares = character.primary_class().is_some_and(|c| c.prepares_spells());
        if !prepares {
            self.state.error("Known spells are always ready for this class");
            return;
        }
        let Some(casting) = character.spellcasting.as_mut() else { return };
        let prepared = casting.toggle_prepared(&name);
        self.state.info(if prepared {
            format!("Prepared {name}")
        } else {
            format!("Unprepared {name}")
        });
        self.state.persist(&self.session);
    }

    fn open_learn_picker(&mut self) {
        let character = &self.session.character;
        let (Some(class), Some(casting)) = (character.primary_class(), character.spellcasting.as_ref()) else {
            return;
        };
        let mut options: Vec<String> = self
            .session
            .catalog
            .spells_for_class(class)
            .into_iter()
            .filter(|spell| spell.level == self.level_tab && !casting.knows(&spell.name))
            .map(|spell| spell.name.clone())
            .collect();
        if options.is_empty() {
            self.state.info(format!("No new {} spells to learn", level_label(self.level_tab)));
            return;
        }
        options.sort();
        let title = format!("Learn {} spells", level_label(self.level_tab));
        self.state.open(Modal::ListPicker(ListPicker::multi(
            title,
            options,
            PickPurpose::LearnSpell,
        )));
    }

    fn render_slots(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let Some(casting) = self.session.character.spellcasting.as_ref() else {
            panel::render_list(frame, area, "Slots", Vec::new(), 0, false, "No spellcasting", theme);
            return;
        };
        let pips = |available: u8, total: u8| {
            format!(
                "{}{}",
                "●".repeat(available as usize),
                "○".repeat(total.saturating_sub(available) as usize)
            )
        };
        let rows = self
            .slot_rows()
            .into_iter()
            .map(|row| match row {
                SlotRow::Level(level) => {
                    let slot = casting
                        .slots
                        .get(level)
                        .copied()
                        .unwrap_or(SlotInfo { total: 0, used: 0 });
                    let style = if slot.total == 0 {
                        theme.muted_style()
                    } else {
                        theme.text_style()
                    };
                    Line::styled(
                        format!(
                            "Level {level}  {:<9} {}/{}",
                            pips(slot.available(), slot.total),
                            slot.available(),
                            slot.total
                        ),
                        style,
                    )
                }
                SlotRow::Pact => match &casting.pact {
                    Some(pact) => Line::from(format!(
                        "Pact L{}  {:<9} {}/{}",
                        pact.level,
                        pips(pact.available(), pact.total),
                        pact.available(),
                        pact.total
                    )),
                    None => Line::from(""),
                },
            })
            .collect();
        panel::render_list(
            frame,
            area,
            "Slots",
            rows,
            self.slot_cursor,
            self.focus.is(SpellbookPanel::Slots),
            "",
            theme,
        );
    }

    fn render_spells(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let character = &self.session.character;
        let prepares = character.primary_class().is_some_and(|c| c.prepares_spells());
        let rows = self
            .spells_at_tab()
            .into_iter()
            .map(|name| {
                let prepared = character
                    .spellcasting
                    .as_ref()
                    .is_some_and(|c| c.is_prepared(&name));
                let marker = if self.level_tab > 0 && prepares && prepared {
                    Span::styled("● ", Style::default().fg(theme.proficient))
                } else {
                    Span::raw("  ")
                };
                let concentrating = character.concentration.as_deref() == Some(name.as_str());
                let style = if concentrating {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    theme.text_style()
                };
                Line::from(vec![marker, Span::styled(name, style)])
            })
            .collect();
        let title = format!("{} (←/→)", level_label(self.level_tab));
        let placeholder = if character.spellcasting.is_some() {
            "No spells at this level. Press l to learn one."
        } else {
            "This character doesn't cast spells"
        };
        panel::render_list(
            frame,
            area,
            title,
            rows,
            self.spell_cursor,
            self.focus.is(SpellbookPanel::Spells),
            placeholder,
            theme,
        );
    }

    fn render_details(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let spell = self
            .selected_spell()
            .and_then(|name| self.session.catalog.spell(&name));
        let lines = match spell {
            Some(spell) => spell_lines(spell, theme),
            None => vec![Line::styled("No spell selected", theme.muted_style())],
        };
        panel::render_text(frame, area, "Details", lines, false, theme);
    }
}

fn spell_lines<'a>(spell: &'a SpellData, theme: &SheetTheme) -> Vec<Line<'a>> {
    let mut tags = Vec::new();
    if spell.concentration {
        tags.push("concentration");
    }
    if spell.ritual {
        tags.push("ritual");
    }
    let mut lines = vec![
        Line::styled(spell.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Line::styled(
            format!("{} {}", spell.level_label(), spell.school.name()),
            theme.muted_style(),
        ),
        Line::from(format!("Casting time: {}", spell.casting_time.description())),
        Line::from(format!("Range: {}", spell.range)),
        Line::from(format!("Duration: {}", spell.duration)),
    ];
    if !tags.is_empty() {
        lines.push(Line::styled(tags.join(", "), theme.muted_style()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(spell.description.as_str()));
    if let Some(higher) = &spell.at_higher_levels {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("At higher levels: {higher}")));
    }
    lines
}

impl Screen for SpellbookScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Spellbook
    }

    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn help(&self) -> HelpOverlay {
        HelpOverlay::new("Spellbook", HELP).with(GLOBAL_HELP)
    }

    fn hints(&self) -> &'static str {
        match self.focus.current() {
            SpellbookPanel::Slots => "Enter set total  - use  + restore  ? help",
            SpellbookPanel::Spells => "Enter cast  p prepare  l learn  x forget  ? help",
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> ScreenOutcome {
        commands::handle_modal_key(&mut self.state, &mut self.session, key)
    }

    fn handle_panel_key(&mut self, key: KeyEvent) -> ScreenOutcome {
        match self.focus.current() {
            SpellbookPanel::Slots => self.handle_slots(key),
            SpellbookPanel::Spells => self.handle_spells(key),
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
        self.slot_cursor = focus::clamp(self.slot_cursor, self.slot_rows().len());
        self.spell_cursor = focus::clamp(self.spell_cursor, self.spells_at_tab().len());
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let [slots_area, spells_area, details_area] = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .areas(area);

        self.render_slots(frame, slots_area, theme);
        self.render_spells(frame, spells_area, theme);
        self.render_details(frame, details_area, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::key;
    use crate::screens::dispatch;
    use charsheet_core::testing::{sample_fighter, sample_warlock, sample_wizard};
    use charsheet_core::{Character, MemoryStore, StaticCatalog};
    use std::sync::Arc;

    fn screen(character: Character) -> (SpellbookScreen, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with([character.clone()]));
        let session = Session::new(character, store.clone(), Arc::new(StaticCatalog));
        (SpellbookScreen::new(session), store)
    }

    fn press(screen: &mut SpellbookScreen, code: KeyCode) -> ScreenOutcome {
        dispatch(screen, key(code))
    }

    fn casting(screen: &SpellbookScreen) -> &charsheet_core::character::Spellcasting {
        screen.session.character.spellcasting.as_ref().unwrap()
    }

    #[test]
    fn test_level_tabs_filter_spells() {
        let (mut screen, _) = screen(sample_wizard("Elara"));
        assert_eq!(screen.spells_at_tab(), vec!["Fire Bolt", "Mage Hand"]);

        screen.focus.focus(SpellbookPanel::Spells);
        press(&mut screen, KeyCode::Right);
        press(&mut screen, KeyCode::Right);
        assert_eq!(screen.spells_at_tab(), vec!["Scorching Ray"]);

        press(&mut screen, KeyCode::Left);
        press(&mut screen, KeyCode::Left);
        press(&mut screen, KeyCode::Left);
        assert_eq!(screen.level_tab, 0);
    }

    #[test]
    fn test_slot_use_and_restore() {
        let (mut screen, store) = screen(sample_wizard("Elara"));

        press(&mut screen, KeyCode::Char('-'));
        assert_eq!(casting(&screen).slots.available(1), 3);
        press(&mut screen, KeyCode::Char('+'));
        press(&mut screen, KeyCode::Char('+'));
        assert_eq!(casting(&screen).slots.available(1), 4);
        assert!(screen.state().status.as_ref().unwrap().is_error);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_slot_total_entry() {
        let (mut screen, _) = screen(sample_wizard("Elara"));
        press(&mut screen, KeyCode::Down);
        press(&mut screen, KeyCode::Enter);
        let Some(Modal::NumericEntry(entry)) = screen.state().modals.top() else {
            panic!("expected a slot entry");
        };
        assert_eq!(entry.buffer, "2");

        press(&mut screen, KeyCode::Up);
        assert_eq!(casting(&screen).slots.get(2).unwrap().total, 3);
        press(&mut screen, KeyCode::Esc);
        assert!(!screen.state().modals.is_active());
        assert_eq!(casting(&screen).slots.get(2).unwrap().total, 3);
    }

    #[test]
    fn test_pact_row_spends_pact_slot() {
        let (mut screen, _) = screen(sample_warlock("Mordai"));
        screen.slot_cursor = 9;
        press(&mut screen, KeyCode::Char('-'));
        assert_eq!(casting(&screen).pact.as_ref().unwrap().available(), 1);
    }

    #[test]
    fn test_prepare_toggle() {
        let (mut screen, store) = screen(sample_wizard("Elara"));
        screen.focus.focus(SpellbookPanel::Spells);
        press(&mut screen, KeyCode::Right);
        let first = screen.selected_spell().unwrap();
        let was_prepared = casting(&screen).is_prepared(&first);

        press(&mut screen, KeyCode::Char('p'));
        assert_eq!(casting(&screen).is_prepared(&first), !was_prepared);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_learn_picker_offers_unknown_spells_at_level() {
        let (mut screen, _) = screen(sample_wizard("Elara"));
        screen.focus.focus(SpellbookPanel::Spells);
        press(&mut screen, KeyCode::Right);
        press(&mut screen, KeyCode::Char('l'));

        let Some(Modal::ListPicker(picker)) = screen.state().modals.top() else {
            panic!("expected the learn picker");
        };
        assert!(picker.selected.is_some());
        assert!(!picker.options.iter().any(|o| o == "Magic Missile"));
        assert!(picker.options.iter().any(|o| o == "Burning Hands"));
    }

    #[test]
    fn test_forget_confirmation() {
        let (mut screen, _) = screen(sample_wizard("Elara"));
        screen.focus.focus(SpellbookPanel::Spells);
        press(&mut screen, KeyCode::Char('x'));
        press(&mut screen, KeyCode::Char('y'));
        assert!(!casting(&screen).knows("Fire Bolt"));
    }

    #[test]
    fn test_non_caster_reports() {
        let (mut screen, _) = screen(sample_fighter("Bruni"));
        press(&mut screen, KeyCode::Char('-'));
        assert!(screen.state().status.as_ref().unwrap().is_error);
        assert!(screen.slot_rows().is_empty());
    }
}
