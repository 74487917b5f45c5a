//! Items, equipment slots and coin purses.

use crate::rules;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for an item instance in an inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors raised by inventory operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Item not found")]
    NotFound,
    #[error("{0} does not require attunement")]
    NoAttunement(String),
    #[error("Already attuned to {} items", rules::MAX_ATTUNED_ITEMS)]
    AttunementLimit,
    #[error("{0} must be taken out of its container first")]
    Contained(String),
}

// ============================================================================
// Items
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Shield,
    Gear,
    Tool,
    Container,
    Potion,
    Scroll,
    Wondrous,
    Other,
}

impl ItemCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ItemCategory::Weapon => "Weapon",
            ItemCategory::Armor => "Armor",
            ItemCategory::Shield => "Shield",
            ItemCategory::Gear => "Gear",
            ItemCategory::Tool => "Tool",
            ItemCategory::Container => "Container",
            ItemCategory::Potion => "Potion",
            ItemCategory::Scroll => "Scroll",
            ItemCategory::Wondrous => "Wondrous",
            ItemCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmorType {
    Light,
    Medium,
    Heavy,
}

/// Simple/martial crossed with melee/ranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponCategory {
    SimpleMelee,
    SimpleRanged,
    MartialMelee,
    MartialRanged,
}

impl WeaponCategory {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponCategory::SimpleMelee => "Simple Melee",
            WeaponCategory::SimpleRanged => "Simple Ranged",
            WeaponCategory::MartialMelee => "Martial Melee",
            WeaponCategory::MartialRanged => "Martial Ranged",
        }
    }

    pub fn is_ranged(&self) -> bool {
        matches!(
            self,
            WeaponCategory::SimpleRanged | WeaponCategory::MartialRanged
        )
    }
}

/// Weapon damage type (separate from spell/effect damage types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponDamageType {
    Slashing,
    Piercing,
    Bludgeoning,
}

impl WeaponDamageType {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponDamageType::Slashing => "slashing",
            WeaponDamageType::Piercing => "piercing",
            WeaponDamageType::Bludgeoning => "bludgeoning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponProperty {
    Finesse,
    Light,
    Heavy,
    TwoHanded,
    Versatile(String),
    Thrown,
    Ammunition,
    Loading,
    Reach,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage_dice: String,
    pub damage_type: WeaponDamageType,
    pub category: WeaponCategory,
    pub properties: Vec<WeaponProperty>,
    pub range: Option<(u32, u32)>,
}

impl WeaponStats {
    pub fn has_property(&self, property: &WeaponProperty) -> bool {
        self.properties.contains(property)
    }

    pub fn is_finesse(&self) -> bool {
        self.has_property(&WeaponProperty::Finesse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorStats {
    pub armor_type: ArmorType,
    pub base_ac: u8,
    pub strength_requirement: Option<u8>,
    pub stealth_disadvantage: bool,
}

/// A single inventory entry. Containers hold their contents inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    pub quantity: u32,
    pub weight: f32,
    pub cost_gp: f32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weapon: Option<WeaponStats>,
    #[serde(default)]
    pub armor: Option<ArmorStats>,
    #[serde(default)]
    pub magic_bonus: i8,
    #[serde(default)]
    pub requires_attunement: bool,
    #[serde(default)]
    pub attuned: bool,
    #[serde(default)]
    pub contents: Vec<Item>,
}

impl Item {
    pub fn new(name: impl Into<String>, category: ItemCategory) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            category,
            quantity: 1,
            weight: 0.0,
            cost_gp: 0.0,
            description: String::new(),
            weapon: None,
            armor: None,
            magic_bonus: 0,
            requires_attunement: false,
            attuned: false,
            contents: Vec::new(),
        }
    }

    pub fn weapon(
        name: impl Into<String>,
        damage_dice: impl Into<String>,
        damage_type: WeaponDamageType,
        category: WeaponCategory,
    ) -> Self {
        let mut item = Self::new(name, ItemCategory::Weapon);
        item.weapon = Some(WeaponStats {
            damage_dice: damage_dice.into(),
            damage_type,
            category,
            properties: Vec::new(),
            range: None,
        });
        item
    }

    pub fn armor(name: impl Into<String>, armor_type: ArmorType, base_ac: u8) -> Self {
        let mut item = Self::new(name, ItemCategory::Armor);
        item.armor = Some(ArmorStats {
            armor_type,
            base_ac,
            strength_requirement: None,
            stealth_disadvantage: false,
        });
        item
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_value(mut self, cost_gp: f32) -> Self {
        self.cost_gp = cost_gp;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_properties(mut self, properties: Vec<WeaponProperty>) -> Self {
        if let Some(weapon) = &mut self.weapon {
            weapon.properties = properties;
        }
        self
    }

    pub fn with_range(mut self, normal: u32, long: u32) -> Self {
        if let Some(weapon) = &mut self.weapon {
            weapon.range = Some((normal, long));
        }
        self
    }

    pub fn with_strength_requirement(mut self, str_req: u8) -> Self {
        if let Some(armor) = &mut self.armor {
            armor.strength_requirement = Some(str_req);
        }
        self
    }

    pub fn with_stealth_disadvantage(mut self) -> Self {
        if let Some(armor) = &mut self.armor {
            armor.stealth_disadvantage = true;
        }
        self
    }

    pub fn with_magic_bonus(mut self, bonus: i8) -> Self {
        self.magic_bonus = bonus;
        self
    }

    pub fn requiring_attunement(mut self) -> Self {
        self.requires_attunement = true;
        self
    }

    pub fn is_container(&self) -> bool {
        self.category == ItemCategory::Container
    }

    /// Weight of the whole stack including anything carried inside it.
    pub fn total_weight(&self) -> f32 {
        self.weight * self.quantity as f32
            + self.contents.iter().map(Item::total_weight).sum::<f32>()
    }

    /// Copy of this entry with a fresh id, used when instantiating catalog templates.
    pub fn instantiate(&self) -> Item {
        let mut item = self.clone();
        item.id = ItemId::new();
        item.attuned = false;
        item.contents = self.contents.iter().map(Item::instantiate).collect();
        item
    }
}

// ============================================================================
// Equipment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipSlot {
    Head,
    Armor,
    Cloak,
    Neck,
    Hands,
    MainHand,
    OffHand,
    RingLeft,
    RingRight,
    Feet,
}

impl EquipSlot {
    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::Head => "Head",
            EquipSlot::Armor => "Armor",
            EquipSlot::Cloak => "Cloak",
            EquipSlot::Neck => "Neck",
            EquipSlot::Hands => "Hands",
            EquipSlot::MainHand => "Main Hand",
            EquipSlot::OffHand => "Off Hand",
            EquipSlot::RingLeft => "Left Ring",
            EquipSlot::RingRight => "Right Ring",
            EquipSlot::Feet => "Feet",
        }
    }

    pub fn all() -> [EquipSlot; 10] {
        [
            EquipSlot::Head,
            EquipSlot::Armor,
            EquipSlot::Cloak,
            EquipSlot::Neck,
            EquipSlot::Hands,
            EquipSlot::MainHand,
            EquipSlot::OffHand,
            EquipSlot::RingLeft,
            EquipSlot::RingRight,
            EquipSlot::Feet,
        ]
    }

    /// Slots offered when equipping an item of this kind.
    pub fn candidates_for(item: &Item) -> Vec<EquipSlot> {
        match item.category {
            ItemCategory::Weapon => vec![EquipSlot::MainHand, EquipSlot::OffHand],
            ItemCategory::Armor => vec![EquipSlot::Armor],
            ItemCategory::Shield => vec![EquipSlot::OffHand],
            _ => EquipSlot::all().to_vec(),
        }
    }
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Slot assignments. Each slot holds at most one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub slots: BTreeMap<EquipSlot, ItemId>,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<ItemId> {
        self.slots.get(&slot).copied()
    }

    pub fn slot_of(&self, id: ItemId) -> Option<EquipSlot> {
        self.slots
            .iter()
            .find_map(|(slot, item)| (*item == id).then_some(*slot))
    }
}

// ============================================================================
// Currency
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Denomination {
    Copper,
    Silver,
    Electrum,
    Gold,
    Platinum,
}

impl Denomination {
    /// Value expressed in copper pieces.
    pub fn value_cp(&self) -> u64 {
        match self {
            Denomination::Copper => 1,
            Denomination::Silver => 10,
            Denomination::Electrum => 50,
            Denomination::Gold => 100,
            Denomination::Platinum => 1000,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Denomination::Copper => "cp",
            Denomination::Silver => "sp",
            Denomination::Electrum => "ep",
            Denomination::Gold => "gp",
            Denomination::Platinum => "pp",
        }
    }

    /// Lowest to highest.
    pub fn all() -> [Denomination; 5] {
        [
            Denomination::Copper,
            Denomination::Silver,
            Denomination::Electrum,
            Denomination::Gold,
            Denomination::Platinum,
        ]
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub cp: u32,
    pub sp: u32,
    pub ep: u32,
    pub gp: u32,
    pub pp: u32,
}

impl Currency {
    pub fn get(&self, denomination: Denomination) -> u32 {
        match denomination {
            Denomination::Copper => self.cp,
            Denomination::Silver => self.sp,
            Denomination::Electrum => self.ep,
            Denomination::Gold => self.gp,
            Denomination::Platinum => self.pp,
        }
    }

    pub fn get_mut(&mut self, denomination: Denomination) -> &mut u32 {
        match denomination {
            Denomination::Copper => &mut self.cp,
            Denomination::Silver => &mut self.sp,
            Denomination::Electrum => &mut self.ep,
            Denomination::Gold => &mut self.gp,
            Denomination::Platinum => &mut self.pp,
        }
    }

    pub fn add(&mut self, denomination: Denomination, amount: u32) {
        let coins = self.get_mut(denomination);
        *coins = coins.saturating_add(amount);
    }

    pub fn total_cp(&self) -> u64 {
        Denomination::all()
            .iter()
            .map(|d| self.get(*d) as u64 * d.value_cp())
            .sum()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pp, {} gp, {} ep, {} sp, {} cp",
            self.pp, self.gp, self.ep, self.sp, self.cp
        )
    }
}

// ============================================================================
// Inventory
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<Item>,
    pub equipment: Equipment,
    pub currency: Currency,
}

impl Inventory {
    pub fn add(&mut self, item: Item) -> ItemId {
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Find an item anywhere in the inventory, including inside containers.
    pub fn find(&self, id: ItemId) -> Option<&Item> {
        fn search(items: &[Item], id: ItemId) -> Option<&Item> {
            for item in items {
                if item.id == id {
                    return Some(item);
                }
                if let Some(found) = search(&item.contents, id) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.items, id)
    }

    pub fn find_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        fn search(items: &mut [Item], id: ItemId) -> Option<&mut Item> {
            for item in items {
                if item.id == id {
                    return Some(item);
                }
                if let Some(found) = search(&mut item.contents, id) {
                    return Some(found);
                }
            }
            None
        }
        search(&mut self.items, id)
    }

    /// Remove an item from wherever it lives, clearing any slot it occupied.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        fn take(items: &mut Vec<Item>, id: ItemId) -> Option<Item> {
            if let Some(pos) = items.iter().position(|i| i.id == id) {
                return Some(items.remove(pos));
            }
            items.iter_mut().find_map(|i| take(&mut i.contents, id))
        }
        let removed = take(&mut self.items, id)?;
        self.equipment.slots.retain(|_, item| *item != id);
        Some(removed)
    }

    /// Put a top-level item in a slot. An item equipped elsewhere moves; a previous occupant is unequipped.
    pub fn equip(&mut self, id: ItemId, slot: EquipSlot) -> Result<Option<ItemId>, InventoryError> {
        if !self.items.iter().any(|i| i.id == id) {
            return match self.find(id) {
                Some(item) => Err(InventoryError::Contained(item.name.clone())),
                None => Err(InventoryError::NotFound),
            };
        }
        self.equipment.slots.retain(|_, item| *item != id);
        Ok(self.equipment.slots.insert(slot, id))
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<ItemId> {
        self.equipment.slots.remove(&slot)
    }

    pub fn equipped(&self, slot: EquipSlot) -> Option<&Item> {
        self.equipment.get(slot).and_then(|id| self.find(id))
    }

    pub fn is_equipped(&self, id: ItemId) -> bool {
        self.equipment.slot_of(id).is_some()
    }

    /// Equipped items that carry weapon stats, main hand first.
    pub fn equipped_weapons(&self) -> Vec<&Item> {
        [EquipSlot::MainHand, EquipSlot::OffHand]
            .iter()
            .filter_map(|slot| self.equipped(*slot))
            .filter(|item| item.weapon.is_some())
            .collect()
    }

    pub fn attuned_count(&self) -> usize {
        fn count(items: &[Item]) -> usize {
            items
                .iter()
                .map(|i| usize::from(i.attuned) + count(&i.contents))
                .sum()
        }
        count(&self.items)
    }

    /// Flip attunement on an item. Returns the new state.
    pub fn toggle_attunement(&mut self, id: ItemId) -> Result<bool, InventoryError> {
        let can_attune = rules::can_attune(self);
        let item = self.find_mut(id).ok_or(InventoryError::NotFound)?;
        if item.attuned {
            item.attuned = false;
            return Ok(false);
        }
        if !item.requires_attunement {
            return Err(InventoryError::NoAttunement(item.name.clone()));
        }
        if !can_attune {
            return Err(InventoryError::AttunementLimit);
        }
        item.attuned = true;
        Ok(true)
    }

    /// Move a top-level item into a container.
    pub fn stow(&mut self, id: ItemId, container: ItemId) -> Result<(), InventoryError> {
        if id == container {
            return Err(InventoryError::NotFound);
        }
        let target = self
            .items
            .iter()
            .position(|i| i.id == container && i.is_container())
            .ok_or(InventoryError::NotFound)?;
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(InventoryError::NotFound)?;
        let item = self.items.remove(pos);
        self.equipment.slots.retain(|_, slotted| *slotted != id);
        let target = if pos < target { target - 1 } else { target };
        self.items[target].contents.push(item);
        Ok(())
    }

    /// Move an item out of a top-level container back to the top level.
    pub fn take_out(&mut self, container: ItemId, id: ItemId) -> Result<(), InventoryError> {
        let bag = self
            .items
            .iter_mut()
            .find(|i| i.id == container)
            .ok_or(InventoryError::NotFound)?;
        let pos = bag
            .contents
            .iter()
            .position(|i| i.id == id)
            .ok_or(InventoryError::NotFound)?;
        let item = bag.contents.remove(pos);
        self.items.push(item);
        Ok(())
    }

    pub fn total_weight(&self) -> f32 {
        self.items.iter().map(Item::total_weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn longsword() -> Item {
        Item::weapon(
            "Longsword",
            "1d8",
            WeaponDamageType::Slashing,
            WeaponCategory::MartialMelee,
        )
        .with_weight(3.0)
    }

    #[test]
    fn test_equip_replaces_occupant() {
        let mut inventory = Inventory::default();
        let sword = inventory.add(longsword());
        let dagger = inventory.add(Item::weapon(
            "Dagger",
            "1d4",
            WeaponDamageType::Piercing,
            WeaponCategory::SimpleMelee,
        ));

        assert_eq!(inventory.equip(sword, EquipSlot::MainHand), Ok(None));
        assert_eq!(inventory.equip(dagger, EquipSlot::MainHand), Ok(Some(sword)));
        assert!(!inventory.is_equipped(sword));

        // Moving an equipped item leaves its old slot empty
        assert_eq!(inventory.equip(dagger, EquipSlot::OffHand), Ok(None));
        assert_eq!(inventory.equipment.get(EquipSlot::MainHand), None);
        assert_eq!(inventory.equipment.slots.len(), 1);
    }

    #[test]
    fn test_remove_clears_slot() {
        let mut inventory = Inventory::default();
        let sword = inventory.add(longsword());
        inventory.equip(sword, EquipSlot::MainHand).unwrap();

        let removed = inventory.remove(sword).unwrap();
        assert_eq!(removed.name, "Longsword");
        assert!(inventory.equipment.slots.is_empty());
        assert!(inventory.items.is_empty());
    }

    #[test]
    fn test_containers() {
        let mut inventory = Inventory::default();
        let pack = inventory.add(Item::new("Backpack", ItemCategory::Container).with_weight(5.0));
        let rope = inventory.add(Item::new("Rope", ItemCategory::Gear).with_weight(10.0));

        inventory.stow(rope, pack).unwrap();
        assert_eq!(inventory.items.len(), 1);
        assert_eq!(inventory.items[0].contents.len(), 1);
        assert!(inventory.find(rope).is_some());
        assert_eq!(inventory.total_weight(), 15.0);

        // Contained items can't be equipped directly
        assert!(matches!(
            inventory.equip(rope, EquipSlot::Hands),
            Err(InventoryError::Contained(_))
        ));

        inventory.take_out(pack, rope).unwrap();
        assert_eq!(inventory.items.len(), 2);
        assert!(inventory.items[0].contents.is_empty());
    }

    #[test]
    fn test_attunement_limit() {
        let mut inventory = Inventory::default();
        let ids: Vec<ItemId> = (0..4)
            .map(|n| {
                inventory.add(
                    Item::new(format!("Ring {n}"), ItemCategory::Wondrous).requiring_attunement(),
                )
            })
            .collect();

        for id in &ids[..3] {
            assert_eq!(inventory.toggle_attunement(*id), Ok(true));
        }
        assert_eq!(
            inventory.toggle_attunement(ids[3]),
            Err(InventoryError::AttunementLimit)
        );
        assert_eq!(inventory.attuned_count(), 3);

        // Ending attunement frees a slot
        assert_eq!(inventory.toggle_attunement(ids[0]), Ok(false));
        assert_eq!(inventory.toggle_attunement(ids[3]), Ok(true));
    }

    #[test]
    fn test_attunement_requires_flag() {
        let mut inventory = Inventory::default();
        let sword = inventory.add(longsword());
        assert!(matches!(
            inventory.toggle_attunement(sword),
            Err(InventoryError::NoAttunement(_))
        ));
    }

    #[test]
    fn test_currency_total() {
        let purse = Currency {
            cp: 5,
            sp: 4,
            ep: 1,
            gp: 2,
            pp: 1,
        };
        assert_eq!(purse.total_cp(), 5 + 40 + 50 + 200 + 1000);
    }
}
