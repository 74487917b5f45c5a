//! Modal sub-dialogs.
//!
//! A screen keeps a [`ModalStack`]. While it is non-empty the top modal
//! receives every key. Each modal kind is a small state machine that reports
//! a [`ModalSignal`]; the owning screen applies the purpose-specific effect.
//! Only a confirmation may sit over another modal (the concentration swap
//! prompt over a cast picker).

use charsheet_core::catalog::{Catalog, SearchHit};
use charsheet_core::character::{Character, CharacterId, Condition};
use charsheet_core::inventory::{Denomination, EquipSlot, ItemId};
use charsheet_core::rules::rest::{long_rest, short_rest};
use charsheet_core::rules::spellcasting::CastOption;
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::BTreeSet;

use crate::focus;

/// What a modal did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalSignal {
    /// Still open, nothing to apply.
    Stay,
    /// Close without mutating anything.
    Cancel,
    /// Close and apply the modal's purpose.
    Confirm,
    /// Arrow adjustment on a numeric entry. Applied immediately; the modal stays open.
    Adjust(i32),
    /// The modal changed the record itself and stays open.
    Committed,
}

// ============================================================================
// Numeric Entry
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinMode {
    Add,
    Spend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericPurpose {
    Damage,
    Heal,
    TempHp,
    Currency {
        denomination: Denomination,
        mode: CoinMode,
    },
    Quantity {
        item: ItemId,
    },
    Level,
    Experience,
    SlotTotal {
        level: u8,
    },
}

impl NumericPurpose {
    pub fn title(&self) -> String {
        match self {
            NumericPurpose::Damage => "Damage taken".to_string(),
            NumericPurpose::Heal => "Healing".to_string(),
            NumericPurpose::TempHp => "Temporary HP".to_string(),
            NumericPurpose::Currency { denomination, mode } => match mode {
                CoinMode::Add => format!("Add {}", denomination.abbreviation()),
                CoinMode::Spend => format!("Spend {}", denomination.abbreviation()),
            },
            NumericPurpose::Quantity { .. } => "Quantity".to_string(),
            NumericPurpose::Level => "Character level".to_string(),
            NumericPurpose::Experience => "Experience points".to_string(),
            NumericPurpose::SlotTotal { level } => format!("Level {level} slots"),
        }
    }

    /// Entries whose value can be stepped with the arrow keys.
    pub fn accepts_arrows(&self) -> bool {
        matches!(
            self,
            NumericPurpose::Quantity { .. } | NumericPurpose::SlotTotal { .. }
        )
    }
}

/// Longest buffer accepted; keeps values inside `u32`.
const MAX_DIGITS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericEntry {
    pub buffer: String,
    pub purpose: NumericPurpose,
}

impl NumericEntry {
    pub fn new(purpose: NumericPurpose) -> Self {
        Self {
            buffer: String::new(),
            purpose,
        }
    }

    /// Entry pre-filled with the current value.
    pub fn with_value(purpose: NumericPurpose, value: u32) -> Self {
        Self {
            buffer: value.to_string(),
            purpose,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ModalSignal {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.buffer.len() < MAX_DIGITS {
                    self.buffer.push(c);
                }
                ModalSignal::Stay
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                ModalSignal::Stay
            }
            KeyCode::Up if self.purpose.accepts_arrows() => ModalSignal::Adjust(1),
            KeyCode::Down if self.purpose.accepts_arrows() => ModalSignal::Adjust(-1),
            KeyCode::Enter => ModalSignal::Confirm,
            KeyCode::Esc => ModalSignal::Cancel,
            _ => ModalSignal::Stay,
        }
    }

    /// Parsed buffer. None when empty.
    pub fn value(&self) -> Option<u32> {
        self.buffer.parse().ok()
    }

    /// Rewrite the buffer after an arrow adjustment.
    pub fn set_value(&mut self, value: u32) {
        self.buffer = value.to_string();
    }
}

// ============================================================================
// Confirmation
// ============================================================================

/// What a confirmation does on `y`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Quit,
    DeleteCharacter(CharacterId),
    DeleteItem(ItemId),
    ForgetSpell(String),
    RemoveLanguage(String),
    /// Drop current concentration and cast with this option.
    SwapConcentration(CastOption),
}

impl ConfirmAction {
    /// Actions that change the character and must be persisted.
    pub fn commits(&self) -> bool {
        !matches!(self, ConfirmAction::Quit | ConfirmAction::DeleteCharacter(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub prompt: String,
    pub action: ConfirmAction,
}

impl Confirmation {
    pub fn new(prompt: impl Into<String>, action: ConfirmAction) -> Self {
        Self {
            prompt: prompt.into(),
            action,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ModalSignal {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => ModalSignal::Confirm,
            _ => ModalSignal::Cancel,
        }
    }
}

// ============================================================================
// List Picker
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickPurpose {
    EquipSlot { item: ItemId, slots: Vec<EquipSlot> },
    LearnSpell,
    AddLanguage,
    AddCondition(Vec<Condition>),
    RemoveCondition(Vec<Condition>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPicker {
    pub title: String,
    pub options: Vec<String>,
    pub cursor: usize,
    /// Present for multi-selection pickers.
    pub selected: Option<BTreeSet<usize>>,
    pub purpose: PickPurpose,
}

impl ListPicker {
    pub fn single(title: impl Into<String>, options: Vec<String>, purpose: PickPurpose) -> Self {
        Self {
            title: title.into(),
            options,
            cursor: 0,
            selected: None,
            purpose,
        }
    }

    pub fn multi(title: impl Into<String>, options: Vec<String>, purpose: PickPurpose) -> Self {
        Self {
            selected: Some(BTreeSet::new()),
            ..Self::single(title, options, purpose)
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ModalSignal {
        match key.code {
            KeyCode::Up => {
                focus::up(&mut self.cursor);
                ModalSignal::Stay
            }
            KeyCode::Down => {
                focus::down(&mut self.cursor, self.options.len());
                ModalSignal::Stay
            }
            KeyCode::Char(' ') => {
                let cursor = self.cursor;
                if let Some(selected) = self.selected.as_mut() {
                    if !selected.remove(&cursor) && cursor < self.options.len() {
                        selected.insert(cursor);
                    }
                }
                ModalSignal::Stay
            }
            KeyCode::Enter => ModalSignal::Confirm,
            KeyCode::Esc => ModalSignal::Cancel,
            _ => ModalSignal::Stay,
        }
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.selected
            .as_ref()
            .map(|s| s.contains(&index))
            .unwrap_or(false)
    }

    /// Indices to commit: the toggled set for multi pickers, else the cursor.
    pub fn selection(&self) -> Vec<usize> {
        match &self.selected {
            Some(selected) => selected.iter().copied().collect(),
            None if self.options.is_empty() => Vec::new(),
            None => vec![focus::clamp(self.cursor, self.options.len())],
        }
    }
}

// ============================================================================
// Search
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct SearchModal {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub cursor: usize,
}

impl SearchModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: KeyEvent, catalog: &dyn Catalog) -> ModalSignal {
        match key.code {
            KeyCode::Char(c) => {
                self.query.push(c);
                self.refresh(catalog);
                ModalSignal::Stay
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.refresh(catalog);
                ModalSignal::Stay
            }
            KeyCode::Up => {
                focus::up(&mut self.cursor);
                ModalSignal::Stay
            }
            KeyCode::Down => {
                focus::down(&mut self.cursor, self.results.len());
                ModalSignal::Stay
            }
            KeyCode::Enter if !self.results.is_empty() => ModalSignal::Confirm,
            KeyCode::Esc => ModalSignal::Cancel,
            _ => ModalSignal::Stay,
        }
    }

    fn refresh(&mut self, catalog: &dyn Catalog) {
        self.results = catalog.search_items(&self.query);
        self.cursor = focus::clamp(self.cursor, self.results.len());
    }

    pub fn selected(&self) -> Option<&SearchHit> {
        self.results.get(self.cursor)
    }
}

// ============================================================================
// Cast Resolution
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastResolution {
    pub spell: String,
    pub options: Vec<CastOption>,
    /// Display label per option.
    pub labels: Vec<String>,
    pub cursor: usize,
}

impl CastResolution {
    pub fn handle_key(&mut self, key: KeyEvent) -> ModalSignal {
        match key.code {
            KeyCode::Up => {
                focus::up(&mut self.cursor);
                ModalSignal::Stay
            }
            KeyCode::Down => {
                focus::down(&mut self.cursor, self.options.len());
                ModalSignal::Stay
            }
            KeyCode::Enter => ModalSignal::Confirm,
            KeyCode::Esc => ModalSignal::Cancel,
            _ => ModalSignal::Stay,
        }
    }

    pub fn selected(&self) -> Option<CastOption> {
        self.options
            .get(focus::clamp(self.cursor, self.options.len()))
            .copied()
    }
}

// ============================================================================
// Rest Flow
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestPhase {
    Menu,
    Short,
    Long,
    Result,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestFlow {
    pub phase: RestPhase,
    pub dice_to_spend: u8,
    pub summary: Vec<String>,
}

impl Default for RestFlow {
    fn default() -> Self {
        Self {
            phase: RestPhase::Menu,
            dice_to_spend: 0,
            summary: Vec::new(),
        }
    }
}

impl RestFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the flow. Rests run against `character` directly and report
    /// [`ModalSignal::Committed`].
    pub fn handle_key(&mut self, key: KeyEvent, character: &mut Character) -> ModalSignal {
        match self.phase {
            RestPhase::Menu => match key.code {
                KeyCode::Char('s') => {
                    self.phase = RestPhase::Short;
                    self.dice_to_spend = character.hit_dice.remaining.min(1);
                    ModalSignal::Stay
                }
                KeyCode::Char('l') => {
                    self.phase = RestPhase::Long;
                    ModalSignal::Stay
                }
                KeyCode::Esc => ModalSignal::Cancel,
                _ => ModalSignal::Stay,
            },
            RestPhase::Short => match key.code {
                KeyCode::Up => {
                    if self.dice_to_spend < character.hit_dice.remaining {
                        self.dice_to_spend += 1;
                    }
                    ModalSignal::Stay
                }
                KeyCode::Down => {
                    self.dice_to_spend = self.dice_to_spend.saturating_sub(1);
                    ModalSignal::Stay
                }
                KeyCode::Enter => {
                    let report = short_rest(character, self.dice_to_spend);
                    self.summary = report.summary_lines();
                    self.phase = RestPhase::Result;
                    ModalSignal::Committed
                }
                KeyCode::Esc => {
                    self.phase = RestPhase::Menu;
                    ModalSignal::Stay
                }
                _ => ModalSignal::Stay,
            },
            RestPhase::Long => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => {
                    let report = long_rest(character);
                    self.summary = report.summary_lines();
                    self.phase = RestPhase::Result;
                    ModalSignal::Committed
                }
                KeyCode::Esc => {
                    self.phase = RestPhase::Menu;
                    ModalSignal::Stay
                }
                _ => ModalSignal::Stay,
            },
            RestPhase::Result => {
                self.summary.clear();
                ModalSignal::Cancel
            }
        }
    }
}

// ============================================================================
// Help
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpOverlay {
    pub title: &'static str,
    pub bindings: Vec<(&'static str, &'static str)>,
}

impl HelpOverlay {
    pub fn new(title: &'static str, bindings: &[(&'static str, &'static str)]) -> Self {
        Self {
            title,
            bindings: bindings.to_vec(),
        }
    }

    /// Append another block of bindings.
    pub fn with(mut self, bindings: &[(&'static str, &'static str)]) -> Self {
        self.bindings.extend_from_slice(bindings);
        self
    }
}

// ============================================================================
// Stack
// ============================================================================

#[derive(Debug, Clone)]
pub enum Modal {
    NumericEntry(NumericEntry),
    Confirmation(Confirmation),
    ListPicker(ListPicker),
    Search(SearchModal),
    Cast(CastResolution),
    Rest(RestFlow),
    Help(HelpOverlay),
}

impl Modal {
    pub fn kind(&self) -> &'static str {
        match self {
            Modal::NumericEntry(_) => "numeric-entry",
            Modal::Confirmation(_) => "confirmation",
            Modal::ListPicker(_) => "list-picker",
            Modal::Search(_) => "search",
            Modal::Cast(_) => "cast",
            Modal::Rest(_) => "rest",
            Modal::Help(_) => "help",
        }
    }
}

/// Modals open on one screen, bottom first.
#[derive(Debug, Clone, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn push(&mut self, modal: Modal) {
        tracing::debug!(modal = modal.kind(), depth = self.stack.len() + 1, "Modal opened");
        self.stack.push(modal);
    }

    /// Put back a modal taken with [`ModalStack::pop`] that stays open.
    pub fn restore(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modal> {
        self.stack.iter()
    }
}
