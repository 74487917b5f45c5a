//! Main character sheet: abilities, skills, combat and actions.

use charsheet_core::character::{Ability, Condition, DeathSaveState, Skill};
use charsheet_core::rules::actions::{action_items, ActionItem, ActionTab};
use charsheet_core::rules::combat::record_death_save;
use charsheet_core::rules::spellcasting::end_concentration;
use charsheet_core::rules::{
    armor_class, format_modifier, initiative, passive_perception, spell_attack_bonus, spell_save_dc,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::focus::{self, FocusRing};
use crate::modal::{HelpOverlay, ListPicker, Modal, NumericEntry, NumericPurpose, PickPurpose, RestFlow};
use crate::screens::{casting, commands, Screen, ScreenKind, ScreenOutcome, ScreenState, GLOBAL_HELP};
use crate::session::Session;
use crate::ui::layout::columns;
use crate::ui::theme::SheetTheme;
use crate::ui::widgets::{panel, HpBarWidget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetPanel {
    Abilities,
    Skills,
    Combat,
    Actions,
}

const PANELS: &[SheetPanel] = &[
    SheetPanel::Abilities,
    SheetPanel::Skills,
    SheetPanel::Combat,
    SheetPanel::Actions,
];

const HELP: &[(&str, &str)] = &[
    ("↑/↓", "Move within a panel"),
    ("p", "Toggle save / cycle skill proficiency"),
    ("d h t", "Damage, heal, temporary HP (combat)"),
    ("s f", "Death save success / failure at 0 HP"),
    ("a x", "Add / remove a condition"),
    ("+ -", "Exhaustion level"),
    ("e", "End concentration"),
    ("←/→", "Action tabs"),
    ("Enter", "Use the selected action"),
    ("r", "Rest"),
];

pub struct SheetScreen {
    state: ScreenState,
    pub session: Session,
    pub focus: FocusRing<SheetPanel>,
    ability_cursor: usize,
    skill_cursor: usize,
    action_cursor: usize,
    action_tab: ActionTab,
    hp_bar_width: u16,
}

impl SheetScreen {
    pub fn new(session: Session, hp_bar_width: u16) -> Self {
        Self {
            state: ScreenState::default(),
            session,
            focus: FocusRing::new(PANELS),
            ability_cursor: 0,
            skill_cursor: 0,
            action_cursor: 0,
            action_tab: ActionTab::default(),
            hp_bar_width,
        }
    }

    /// Give the session back to the router.
    pub fn into_session(self) -> Session {
        self.session
    }

    fn actions(&self) -> Vec<ActionItem> {
        action_items(
            &self.session.character,
            self.session.catalog.as_ref(),
            self.action_tab,
        )
    }

    fn handle_abilities(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => focus::up(&mut self.ability_cursor),
            KeyCode::Down => focus::down(&mut self.ability_cursor, Ability::all().len()),
            KeyCode::Char('p') | KeyCode::Enter => {
                let ability = Ability::all()[focus::clamp(self.ability_cursor, Ability::all().len())];
                let saves = &mut self.session.character.saving_throw_proficiencies;
                let message = if saves.remove(&ability) {
                    format!("{} save no longer proficient", ability.name())
                } else {
                    saves.insert(ability);
                    format!("{} save proficient", ability.name())
                };
                self.state.info(message);
                self.state.persist(&self.session);
            }
            _ => {}
        }
    }

    fn handle_skills(&mut self, key: KeyEvent) {
        let skills = Skill::all();
        match key.code {
            KeyCode::Up => focus::up(&mut self.skill_cursor),
            KeyCode::Down => focus::down(&mut self.skill_cursor, skills.len()),
            KeyCode::Char('p') | KeyCode::Enter => {
                let skill = skills[focus::clamp(self.skill_cursor, skills.len())];
                let character = &mut self.session.character;
                let next = character.skill_proficiency(skill).cycle();
                character.skill_proficiencies.insert(skill, next);
                self.state.info(format!("{} {}", skill.name(), next.marker()));
                self.state.persist(&self.session);
            }
            _ => {}
        }
    }

    fn handle_combat(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('d') => self.open_entry(NumericPurpose::Damage),
            KeyCode::Char('h') => self.open_entry(NumericPurpose::Heal),
            KeyCode::Char('t') => self.open_entry(NumericPurpose::TempHp),
            KeyCode::Char('s') => self.death_save(true),
            KeyCode::Char('f') => self.death_save(false),
            KeyCode::Char('a') => {
                let character = &self.session.character;
                let conditions: Vec<Condition> = Condition::toggleable()
                    .iter()
                    .copied()
                    .filter(|c| !character.has_condition(*c))
                    .collect();
                let options = conditions.iter().map(|c| c.to_string()).collect();
                self.state.open(Modal::ListPicker(ListPicker::single(
                    "Add condition",
                    options,
                    PickPurpose::AddCondition(conditions),
                )));
            }
            KeyCode::Char('x') => {
                let conditions: Vec<Condition> = self
                    .session
                    .character
                    .conditions
                    .iter()
                    .copied()
                    .filter(|c| !matches!(c, Condition::Exhaustion(_)))
                    .collect();
                if conditions.is_empty() {
                    self.state.info("No conditions to remove");
                    return;
                }
                let options = conditions.iter().map(|c| c.to_string()).collect();
                self.state.open(Modal::ListPicker(ListPicker::single(
                    "Remove condition",
                    options,
                    PickPurpose::RemoveCondition(conditions),
                )));
            }
            KeyCode::Char('+') | KeyCode::Char('-') => {
                let up = key.code == KeyCode::Char('+');
                match commands::step_exhaustion(&mut self.session.character, up) {
                    Some(level) => {
                        self.state.info(format!("Exhaustion level {level}"));
                        self.state.persist(&self.session);
                    }
                    None => self.state.error("Exhaustion is already at its limit"),
                }
            }
            KeyCode::Char('e') => match end_concentration(&mut self.session.character) {
                Some(spell) => {
                    self.state.info(format!("Stopped concentrating on {spell}"));
                    self.state.persist(&self.session);
                }
                None => self.state.info("Not concentrating"),
            },
            _ => {}
        }
    }

    fn handle_actions(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => focus::up(&mut self.action_cursor),
            KeyCode::Down => {
                let len = self.actions().len();
                focus::down(&mut self.action_cursor, len);
            }
            KeyCode::Left | KeyCode::Right => {
                self.action_tab = if key.code == KeyCode::Left {
                    self.action_tab.left()
                } else {
                    self.action_tab.right()
                };
                self.action_cursor = 0;
            }
            KeyCode::Enter => {
                let actions = self.actions();
                let Some(action) = actions.get(focus::clamp(self.action_cursor, actions.len())) else {
                    return;
                };
                match action {
                    ActionItem::Weapon { attack, .. } => self.state.info(format!(
                        "{}: {} to hit, {}",
                        attack.name,
                        format_modifier(attack.attack_bonus),
                        attack.damage_text()
                    )),
                    ActionItem::Spell { name, .. } => {
                        let name = name.clone();
                        casting::begin_cast(&mut self.state, &mut self.session, &name);
                    }
                    ActionItem::Standard { name, description } => {
                        self.state.info(format!("{name}: {description}"));
                    }
                }
            }
            _ => {}
        }
    }

    fn open_entry(&mut self, purpose: NumericPurpose) {
        self.state.open(Modal::NumericEntry(NumericEntry::new(purpose)));
    }

    fn death_save(&mut self, success: bool) {
        let character = &mut self.session.character;
        let before = character.death_saves.clone();
        let Some(state) = record_death_save(character, success) else {
            self.state.error("Death saves only apply at 0 HP");
            return;
        };
        if character.death_saves == before {
            return;
        }
        let saves = &character.death_saves;
        let message = match state {
            DeathSaveState::Stabilized => "Stabilized".to_string(),
            DeathSaveState::Dead => "Three failed death saves".to_string(),
            DeathSaveState::Dying => format!(
                "Death saves: {} successes, {} failures",
                saves.successes, saves.failures
            ),
        };
        tracing::info!(character = %character.name, ?state, "Death save recorded");
        self.state.info(message);
        self.state.persist(&self.session);
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    fn render_abilities(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let character = &self.session.character;
        let rows = Ability::all()
            .iter()
            .map(|&ability| {
                let score = character.ability_scores.get(ability);
                let modifier = character.ability_modifier(ability) as i32;
                let save = character.saving_throw_modifier(ability) as i32;
                let proficient = character.saving_throw_proficiencies.contains(&ability);
                Line::from(vec![
                    Span::styled(
                        format!("{} {:>2} ({:>2}) ", ability.abbreviation(), score, format_modifier(modifier)),
                        theme.text_style(),
                    ),
                    Span::styled(
                        format!("save {:>3}", format_modifier(save)),
                        if proficient {
                            Style::default().fg(theme.proficient)
                        } else {
                            theme.muted_style()
                        },
                    ),
                ])
            })
            .collect();
        panel::render_list(
            frame,
            area,
            "Abilities",
            rows,
            self.ability_cursor,
            self.focus.is(SheetPanel::Abilities),
            "",
            theme,
        );
    }

    fn render_skills(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let character = &self.session.character;
        let rows = Skill::all()
            .iter()
            .map(|&skill| {
                let level = character.skill_proficiency(skill);
                Line::from(vec![
                    Span::styled(format!("{} ", level.marker()), theme.proficiency_style(level)),
                    Span::raw(format!("{:<16}", skill.name())),
                    Span::raw(format_modifier(character.skill_modifier(skill) as i32)),
                ])
            })
            .collect();
        panel::render_list(
            frame,
            area,
            "Skills",
            rows,
            self.skill_cursor,
            self.focus.is(SheetPanel::Skills),
            "",
            theme,
        );
    }

    fn render_combat(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let character = &self.session.character;
        let block = panel::block("Combat", self.focus.is(SheetPanel::Combat), theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [bar_area, text_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
        frame.render_widget(
            HpBarWidget::new(&character.hit_points, theme).width(self.hp_bar_width),
            bar_area,
        );

        let dice = &character.hit_dice;
        let mut lines = vec![
            Line::from(format!(
                "AC {}   Init {}   Speed {} ft",
                armor_class(character),
                format_modifier(initiative(character) as i32),
                character.speed
            )),
            Line::from(format!(
                "Proficiency {}   Passive Perception {}",
                format_modifier(character.proficiency_bonus() as i32),
                passive_perception(character)
            )),
            Line::from(format!("Hit dice {}/{} {}", dice.remaining, dice.total, dice.die)),
        ];

        if let (Some(dc), Some(attack)) = (spell_save_dc(character), spell_attack_bonus(character)) {
            lines.push(Line::from(format!(
                "Spell DC {dc}   Spell attack {}",
                format_modifier(attack as i32)
            )));
        }

        if character.hit_points.is_down() {
            let saves = &character.death_saves;
            let marks = |n: u8| format!("{}{}", "●".repeat(n as usize), "○".repeat(3 - n.min(3) as usize));
            lines.push(Line::from(vec![
                Span::styled("Death saves ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(marks(saves.successes), Style::default().fg(theme.hp_healthy)),
                Span::raw(" "),
                Span::styled(marks(saves.failures), Style::default().fg(theme.hp_critical)),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(match &character.concentration {
            Some(spell) => Line::from(format!("Concentrating on {spell}")),
            None => Line::styled("Not concentrating", theme.muted_style()),
        });

        let conditions: Vec<String> = character.conditions.iter().map(|c| c.to_string()).collect();
        lines.push(if conditions.is_empty() {
            Line::styled("No conditions", theme.muted_style())
        } else {
            Line::from(format!("Conditions: {}", conditions.join(", ")))
        });

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), text_area);
    }

    fn render_actions(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let tabs = ActionTab::all()
            .iter()
            .map(|tab| {
                if *tab == self.action_tab {
                    format!("[{}]", tab.title())
                } else {
                    tab.title().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        let rows = self
            .actions()
            .into_iter()
            .map(|action| match action {
                ActionItem::Weapon { attack, equipped } => Line::from(vec![
                    Span::styled(
                        format!("{:<16}", attack.name),
                        if equipped {
                            theme.equipped_style()
                        } else {
                            theme.text_style()
                        },
                    ),
                    Span::raw(format!("{:>3}  ", format_modifier(attack.attack_bonus))),
                    Span::styled(attack.damage_text(), theme.muted_style()),
                ]),
                ActionItem::Spell {
                    name,
                    level,
                    detail,
                    castable,
                } => {
                    let label = if level == 0 {
                        "C ".to_string()
                    } else {
                        format!("{level} ")
                    };
                    let style = if castable {
                        theme.text_style()
                    } else {
                        theme.muted_style()
                    };
                    Line::from(vec![
                        Span::styled(label, theme.muted_style()),
                        Span::styled(format!("{name:<18}"), style),
                        Span::styled(detail, theme.muted_style()),
                    ])
                }
                ActionItem::Standard { name, .. } => Line::from(name),
            })
            .collect();

        let placeholder = match self.action_tab {
            ActionTab::Weapons => "No weapons carried",
            ActionTab::Spells => "No spells ready",
            ActionTab::Standard => "",
        };
        panel::render_list(
            frame,
            area,
            format!("Actions {tabs}"),
            rows,
            self.action_cursor,
            self.focus.is(SheetPanel::Actions),
            placeholder,
            theme,
        );
    }
}

impl Screen for SheetScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Sheet
    }

    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn help(&self) -> HelpOverlay {
        HelpOverlay::new("Character Sheet", HELP).with(GLOBAL_HELP)
    }

    fn hints(&self) -> &'static str {
        match self.focus.current() {
            SheetPanel::Abilities => "p save proficiency  r rest  ? help",
            SheetPanel::Skills => "Enter cycle proficiency  r rest  ? help",
            SheetPanel::Combat => "d damage  h heal  t temp  a/x conditions  +/- exhaustion  ? help",
            SheetPanel::Actions => "←/→ tabs  Enter use  r rest  ? help",
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> ScreenOutcome {
        commands::handle_modal_key(&mut self.state, &mut self.session, key)
    }

    fn handle_panel_key(&mut self, key: KeyEvent) -> ScreenOutcome {
        if key.code == KeyCode::Char('r') {
            self.state.open(Modal::Rest(RestFlow::new()));
            return ScreenOutcome::Continue;
        }
        match self.focus.current() {
            SheetPanel::Abilities => self.handle_abilities(key),
            SheetPanel::Skills => self.handle_skills(key),
            SheetPanel::Combat => self.handle_combat(key),
            SheetPanel::Actions => self.handle_actions(key),
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
        self.ability_cursor = focus::clamp(self.ability_cursor, Ability::all().len());
        self.skill_cursor = focus::clamp(self.skill_cursor, Skill::all().len());
        self.action_cursor = focus::clamp(self.action_cursor, self.actions().len());
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let cols = columns(area, 3);
        let [abilities_area, skills_area] =
            Layout::vertical([Constraint::Length(8), Constraint::Min(0)]).areas(cols[0]);

        self.render_abilities(frame, abilities_area, theme);
        self.render_skills(frame, skills_area, theme);
        self.render_combat(frame, cols[1], theme);
        self.render_actions(frame, cols[2], theme);
    }
}
