//! Inventory screen: carried items, equipment slots and the coin purse.
//!
//! The items panel has two cursors. The top-level cursor walks the
//! inventory; opening a container switches to a separate cursor over its
//! contents until the container is closed again with Esc.

use charsheet_core::inventory::{Denomination, EquipSlot, Item, ItemId};
use charsheet_core::rules::{carried_weight, carrying_capacity};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    Frame,
};

use crate::focus::{self, FocusRing};
use crate::modal::{
    CoinMode, ConfirmAction, Confirmation, HelpOverlay, ListPicker, Modal, NumericEntry,
    NumericPurpose, PickPurpose, SearchModal,
};
use crate::screens::{commands, Screen, ScreenKind, ScreenOutcome, ScreenState, GLOBAL_HELP};
use crate::session::Session;
use crate::ui::theme::SheetTheme;
use crate::ui::widgets::panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryPanel {
    Items,
    Equipment,
    Currency,
}

const PANELS: &[InventoryPanel] = &[
    InventoryPanel::Items,
    InventoryPanel::Equipment,
    InventoryPanel::Currency,
];

const HELP: &[(&str, &str)] = &[
    ("a or /", "Search the catalog and add an item"),
    ("d", "Delete the selected item"),
    ("e", "Equip to a slot"),
    ("n", "Set quantity (↑/↓ adjust)"),
    ("t", "Toggle attunement"),
    ("Enter", "Open a container"),
    ("m", "Move into the first container / take out"),
    ("u", "Unequip (equipment panel)"),
    ("a s", "Add / spend coins (currency panel)"),
];

pub struct InventoryScreen {
    state: ScreenState,
    pub session: Session,
    pub focus: FocusRing<InventoryPanel>,
    item_cursor: usize,
    container: Option<ItemId>,
    container_cursor: usize,
    slot_cursor: usize,
    coin_cursor: usize,
}

impl InventoryScreen {
    pub fn new(session: Session) -> Self {
        Self {
            state: ScreenState::default(),
            session,
            focus: FocusRing::new(PANELS),
            item_cursor: 0,
            container: None,
            container_cursor: 0,
            slot_cursor: 0,
            coin_cursor: 0,
        }
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Items under the active cursor: a container's contents or the top level.
    fn visible_items(&self) -> &[Item] {
        let inventory = &self.session.character.inventory;
        match self.container {
            Some(id) => inventory
                .items
                .iter()
                .find(|item| item.id == id)
                .map(|bag| bag.contents.as_slice())
                .unwrap_or(&[]),
            None => &inventory.items,
        }
    }

    fn cursor(&mut self) -> &mut usize {
        if self.container.is_some() {
            &mut self.container_cursor
        } else {
            &mut self.item_cursor
        }
    }

    fn selected(&self) -> Option<&Item> {
        let items = self.visible_items();
        let cursor = if self.container.is_some() {
            self.container_cursor
        } else {
            self.item_cursor
        };
        items.get(focus::clamp(cursor, items.len()))
    }

    fn handle_items(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => focus::up(self.cursor()),
            KeyCode::Down => {
                let len = self.visible_items().len();
                focus::down(self.cursor(), len);
            }
            KeyCode::Char('a') | KeyCode::Char('/') => {
                self.state.open(Modal::Search(SearchModal::new()));
            }
            KeyCode::Char('d') => {
                let Some(item) = self.selected() else { return };
                let prompt = format!("Delete {}?", item.name);
                let action = ConfirmAction::DeleteItem(item.id);
                self.state.open(Modal::Confirmation(Confirmation::new(prompt, action)));
            }
            KeyCode::Char('e') => self.open_equip_picker(),
            KeyCode::Char('n') => {
                let Some(item) = self.selected() else { return };
                let entry = NumericEntry::with_value(NumericPurpose::Quantity { item: item.id }, item.quantity);
                self.state.open(Modal::NumericEntry(entry));
            }
            KeyCode::Char('t') => {
                let Some(id) = self.selected().map(|item| item.id) else { return };
                let inventory = &mut self.session.character.inventory;
                match inventory.toggle_attunement(id) {
                    Ok(attuned) => {
                        let name = inventory.find(id).map(|i| i.name.clone()).unwrap_or_default();
                        self.state.info(if attuned {
                            format!("Attuned to {name}")
                        } else {
                            format!("Ended attunement to {name}")
                        });
                        self.state.persist(&self.session);
                    }
                    Err(e) => self.state.error(e.to_string()),
                }
            }
            KeyCode::Enter => {
                if self.container.is_some() {
                    return;
                }
                match self.selected() {
                    Some(item) if item.is_container() => {
                        self.container = Some(item.id);
                        self.container_cursor = 0;
                    }
                    Some(item) => {
                        let text = if item.description.is_empty() {
                            format!("{} ({})", item.name, item.category.name())
                        } else {
                            format!("{}: {}", item.name, item.description)
                        };
                        self.state.info(text);
                    }
                    None => {}
                }
            }
            KeyCode::Char('m') => self.move_selected(),
            _ => {}
        }
    }

    fn open_equip_picker(&mut self) {
        if self.container.is_some() {
            self.state.error("Take it out of the container first");
            return;
        }
        let Some(item) = self.selected() else { return };
        let slots = EquipSlot::candidates_for(item);
        let options = slots.iter().map(|slot| slot.name().to_string()).collect();
        let title = format!("Equip {}", item.name);
        let purpose = PickPurpose::EquipSlot { item: item.id, slots };
        self.state.open(Modal::ListPicker(ListPicker::single(title, options, purpose)));
    }

    /// Stow into the first container, or take out of the open one.
    fn move_selected(&mut self) {
        let Some(id) = self.selected().map(|item| item.id) else { return };
        let inventory = &mut self.session.character.inventory;

        let result = match self.container {
            Some(bag) => inventory.take_out(bag, id).map(|_| "Took out".to_string()),
            None => {
                let target = inventory
                    .items
                    .iter()
                    .find(|item| item.is_container() && item.id != id)
                    .map(|bag| (bag.id, bag.name.clone()));
                match target {
                    Some((bag, bag_name)) => inventory
                        .stow(id, bag)
                        .map(|_| format!("Stowed in {bag_name}")),
                    None => {
                        self.state.error("No container to stow into");
                        return;
                    }
                }
            }
        };

        match result {
            Ok(message) => {
                self.state.info(message);
                self.state.persist(&self.session);
            }
            Err(e) => self.state.error(e.to_string()),
        }
    }

    fn handle_equipment(&mut self, key: KeyEvent) {
        let slots = EquipSlot::all();
        match key.code {
            KeyCode::Up => focus::up(&mut self.slot_cursor),
            KeyCode::Down => focus::down(&mut self.slot_cursor, slots.len()),
            KeyCode::Char('u') | KeyCode::Enter => {
                let slot = slots[focus::clamp(self.slot_cursor, slots.len())];
                let inventory = &mut self.session.character.inventory;
                match inventory.unequip(slot) {
                    Some(id) => {
                        let name = inventory.find(id).map(|i| i.name.clone()).unwrap_or_default();
                        self.state.info(format!("Unequipped {name}"));
                        self.state.persist(&self.session);
                    }
                    None => self.state.info(format!("{slot} is empty")),
                }
            }
            _ => {}
        }
    }

    fn handle_currency(&mut self, key: KeyEvent) {
        let denominations = Denomination::all();
        let denomination = denominations[focus::clamp(self.coin_cursor, denominations.len())];
        let mode = match key.code {
            KeyCode::Up => return focus::up(&mut self.coin_cursor),
            KeyCode::Down => return focus::down(&mut self.coin_cursor, denominations.len()),
            KeyCode::Char('a') | KeyCode::Char('+') => CoinMode::Add,
            KeyCode::Char('s') | KeyCode::Char('-') => CoinMode::Spend,
            _ => return,
        };
        self.state.open(Modal::NumericEntry(NumericEntry::new(
            NumericPurpose::Currency { denomination, mode },
        )));
    }

    fn render_items(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let inventory = &self.session.character.inventory;
        let rows = self
            .visible_items()
            .iter()
            .map(|item| {
                let marker = if inventory.is_equipped(item.id) {
                    Span::styled("E ", theme.equipped_style())
                } else if item.attuned {
                    Span::styled("A ", theme.equipped_style())
                } else if item.is_container() {
                    Span::styled("+ ", theme.muted_style())
                } else {
                    Span::raw("  ")
                };
                let name = if item.quantity > 1 {
                    format!("{} x{}", item.name, item.quantity)
                } else {
                    item.name.clone()
                };
                Line::from(vec![
                    marker,
                    Span::raw(format!("{name:<26}")),
                    Span::styled(format!("{:>6.1} lb", item.total_weight()), theme.muted_style()),
                ])
            })
            .collect();

        let character = &self.session.character;
        let title = match self.container.and_then(|id| inventory.find(id)) {
            Some(bag) => format!("{} (Esc to close)", bag.name),
            None => format!(
                "Items {:.1}/{:.0} lb",
                carried_weight(character),
                carrying_capacity(character)
            ),
        };
        let cursor = if self.container.is_some() {
            self.container_cursor
        } else {
            self.item_cursor
        };
        let placeholder = if self.container.is_some() {
            "Empty"
        } else {
            "Nothing carried. Press a to add an item."
        };
        panel::render_list(
            frame,
            area,
            title,
            rows,
            cursor,
            self.focus.is(InventoryPanel::Items),
            placeholder,
            theme,
        );
    }

    fn render_equipment(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let inventory = &self.session.character.inventory;
        let rows = EquipSlot::all()
            .iter()
            .map(|slot| match inventory.equipped(*slot) {
                Some(item) => Line::from(vec![
                    Span::raw(format!("{:<11}", slot.name())),
                    Span::styled(item.name.clone(), theme.equipped_style()),
                ]),
                None => Line::from(vec![
                    Span::raw(format!("{:<11}", slot.name())),
                    Span::styled("-", theme.muted_style()),
                ]),
            })
            .collect();
        panel::render_list(
            frame,
            area,
            "Equipment",
            rows,
            self.slot_cursor,
            self.focus.is(InventoryPanel::Equipment),
            "",
            theme,
        );
    }

    fn render_currency(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let purse = &self.session.character.inventory.currency;
        let rows = Denomination::all()
            .iter()
            .map(|d| Line::from(format!("{:<3}{:>8}", d.abbreviation(), purse.get(*d))))
            .collect();
        panel::render_list(
            frame,
            area,
            "Currency",
            rows,
            self.coin_cursor,
            self.focus.is(InventoryPanel::Currency),
            "",
            theme,
        );
    }
}

impl Screen for InventoryScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Inventory
    }

    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn help(&self) -> HelpOverlay {
        HelpOverlay::new("Inventory", HELP).with(GLOBAL_HELP)
    }

    fn hints(&self) -> &'static str {
        match self.focus.current() {
            InventoryPanel::Items if self.container.is_some() => "m take out  Esc close  ? help",
            InventoryPanel::Items => "a add  d delete  e equip  n qty  t attune  ? help",
            InventoryPanel::Equipment => "u unequip  ? help",
            InventoryPanel::Currency => "a add  s spend  ? help",
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> ScreenOutcome {
        commands::handle_modal_key(&mut self.state, &mut self.session, key)
    }

    fn handle_panel_key(&mut self, key: KeyEvent) -> ScreenOutcome {
        match self.focus.current() {
            InventoryPanel::Items => self.handle_items(key),
            InventoryPanel::Equipment => self.handle_equipment(key),
            InventoryPanel::Currency => self.handle_currency(key),
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

    fn step_back(&mut self) -> bool {
        if self.focus.is(InventoryPanel::Items) && self.container.take().is_some() {
            self.container_cursor = 0;
            return true;
        }
        false
    }

    fn clamp_cursors(&mut self) {
        let inventory = &self.session.character.inventory;
        if let Some(id) = self.container {
            if !inventory.items.iter().any(|item| item.id == id) {
                self.container = None;
            }
        }
        self.item_cursor = focus::clamp(self.item_cursor, inventory.items.len());
        let contents = self.visible_items().len();
        if self.container.is_some() {
            self.container_cursor = focus::clamp(self.container_cursor, contents);
        }
        self.slot_cursor = focus::clamp(self.slot_cursor, EquipSlot::all().len());
        self.coin_cursor = focus::clamp(self.coin_cursor, Denomination::all().len());
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &SheetTheme) {
        let [items_area, side] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);
        let [equipment_area, currency_area] =
            Layout::vertical([Constraint::Length(12), Constraint::Min(7)]).areas(side);

        self.render_items(frame, items_area, theme);
        self.render_equipment(frame, equipment_area, theme);
        self.render_currency(frame, currency_area, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::key;
    use crate::screens::{dispatch, NavSignal};
    use charsheet_core::testing::sample_fighter;
    use charsheet_core::{Character, MemoryStore, StaticCatalog};
    use std::sync::Arc;

    fn screen(character: Character) -> (InventoryScreen, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with([character.clone()]));
        let session = Session::new(character, store.clone(), Arc::new(StaticCatalog));
        (InventoryScreen::new(session), store)
    }

    fn press(screen: &mut InventoryScreen, code: KeyCode) -> ScreenOutcome {
        dispatch(screen, key(code))
    }

    fn position(screen: &InventoryScreen, name: &str) -> usize {
        screen
            .session
            .character
            .inventory
            .items
            .iter()
            .position(|i| i.name == name)
            .unwrap()
    }

    #[test]
    fn test_search_adds_item() {
        let (mut screen, store) = screen(sample_fighter("Bruni"));
        let before = screen.session.character.inventory.items.len();

        press(&mut screen, KeyCode::Char('/'));
        for c in "rope".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        press(&mut screen, KeyCode::Enter);

        assert_eq!(screen.session.character.inventory.items.len(), before + 1);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_equip_from_items_panel() {
        let (mut screen, _) = screen(sample_fighter("Bruni"));
        screen.item_cursor = position(&screen, "Light Crossbow");

        press(&mut screen, KeyCode::Char('e'));
        let Some(Modal::ListPicker(picker)) = screen.state().modals.top() else {
            panic!("expected the slot picker");
        };
        assert_eq!(picker.options, vec!["Main Hand", "Off Hand"]);

        press(&mut screen, KeyCode::Enter);
        let inventory = &screen.session.character.inventory;
        let crossbow = inventory.items[position(&screen, "Light Crossbow")].id;
        assert_eq!(inventory.equipment.get(EquipSlot::MainHand), Some(crossbow));
    }

    #[test]
    fn test_attunement_refused_for_mundane_item() {
        let (mut screen, store) = screen(sample_fighter("Bruni"));
        press(&mut screen, KeyCode::Char('t'));
        let status = screen.state().status.as_ref().unwrap();
        assert!(status.is_error);
        assert!(status.text.contains("does not require attunement"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_container_cursor_and_escape() {
        let (mut screen, _) = screen(sample_fighter("Bruni"));
        screen.item_cursor = position(&screen, "Longsword");

        press(&mut screen, KeyCode::Char('m'));
        let backpack = position(&screen, "Backpack");
        assert_eq!(screen.session.character.inventory.items[backpack].contents.len(), 1);
        assert!(screen
            .session
            .character
            .inventory
            .equipment
            .get(EquipSlot::MainHand)
            .is_none());

        screen.item_cursor = backpack;
        press(&mut screen, KeyCode::Enter);
        assert!(screen.container.is_some());
        assert_eq!(screen.selected().unwrap().name, "Longsword");

        // Esc closes the container before it leaves the screen
        assert!(matches!(press(&mut screen, KeyCode::Esc), ScreenOutcome::Continue));
        assert!(screen.container.is_none());
        assert_eq!(screen.item_cursor, backpack);
        assert!(matches!(
            press(&mut screen, KeyCode::Esc),
            ScreenOutcome::Navigate(NavSignal::Back)
        ));
    }

    #[test]
    fn test_take_out_of_container() {
        let (mut screen, _) = screen(sample_fighter("Bruni"));
        screen.item_cursor = position(&screen, "Light Crossbow");
        press(&mut screen, KeyCode::Char('m'));
        screen.item_cursor = position(&screen, "Backpack");
        press(&mut screen, KeyCode::Enter);

        press(&mut screen, KeyCode::Char('m'));
        let inventory = &screen.session.character.inventory;
        assert!(inventory.items[position(&screen, "Backpack")].contents.is_empty());
        assert_eq!(inventory.items.last().unwrap().name, "Light Crossbow");
        assert!(screen.visible_items().is_empty());
    }

    #[test]
    fn test_quantity_entry_starts_from_current() {
        let (mut screen, _) = screen(sample_fighter("Bruni"));
        press(&mut screen, KeyCode::Char('n'));
        let Some(Modal::NumericEntry(entry)) = screen.state().modals.top() else {
            panic!("expected a quantity entry");
        };
        assert_eq!(entry.buffer, "1");
    }

    #[test]
    fn test_unequip_slot() {
        let (mut screen, store) = screen(sample_fighter("Bruni"));
        screen.focus.focus(InventoryPanel::Equipment);
        screen.slot_cursor = EquipSlot::all()
            .iter()
            .position(|s| *s == EquipSlot::OffHand)
            .unwrap();

        press(&mut screen, KeyCode::Char('u'));
        assert!(screen
            .session
            .character
            .inventory
            .equipment
            .get(EquipSlot::OffHand)
            .is_none());
        assert_eq!(screen.state().status.as_ref().unwrap().text, "Unequipped Shield");
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_spend_coins() {
        let (mut screen, _) = screen(sample_fighter("Bruni"));
        screen.focus.focus(InventoryPanel::Currency);
        screen.coin_cursor = 3;

        press(&mut screen, KeyCode::Char('s'));
        press(&mut screen, KeyCode::Char('5'));
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.session.character.inventory.currency.gp, 10);
    }

    #[test]
    fn test_delete_requires_yes() {
        let (mut screen, _) = screen(sample_fighter("Bruni"));
        let count = screen.session.character.inventory.items.len();

        press(&mut screen, KeyCode::Char('d'));
        press(&mut screen, KeyCode::Esc);
        assert_eq!(screen.session.character.inventory.items.len(), count);

        press(&mut screen, KeyCode::Char('d'));
        press(&mut screen, KeyCode::Char('y'));
        assert_eq!(screen.session.character.inventory.items.len(), count - 1);
    }
}
