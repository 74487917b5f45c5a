//! The derived action list shown on the main sheet.

use crate::catalog::Catalog;
use crate::character::Character;
use crate::rules::combat::{weapon_attack, WeaponAttack};
use crate::rules::spellcasting::cast_options;

/// Action type tabs, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionTab {
    #[default]
    Weapons,
    Spells,
    Standard,
}

impl ActionTab {
    pub fn all() -> [ActionTab; 3] {
        [ActionTab::Weapons, ActionTab::Spells, ActionTab::Standard]
    }

    pub fn title(&self) -> &'static str {
        match self {
            ActionTab::Weapons => "Weapons",
            ActionTab::Spells => "Spells",
            ActionTab::Standard => "Standard",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ActionTab::Weapons => 0,
            ActionTab::Spells => 1,
            ActionTab::Standard => 2,
        }
    }

    /// Next tab to the right. Stops at the last tab.
    pub fn right(self) -> ActionTab {
        match self {
            ActionTab::Weapons => ActionTab::Spells,
            ActionTab::Spells | ActionTab::Standard => ActionTab::Standard,
        }
    }

    /// Next tab to the left. Stops at the first tab.
    pub fn left(self) -> ActionTab {
        match self {
            ActionTab::Weapons | ActionTab::Spells => ActionTab::Weapons,
            ActionTab::Standard => ActionTab::Spells,
        }
    }
}

/// Actions every creature can take.
pub const STANDARD_ACTIONS: &[(&str, &str)] = &[
    ("Dash", "Gain extra movement equal to your speed."),
    ("Disengage", "Your movement doesn't provoke opportunity attacks this turn."),
    ("Dodge", "Attacks against you have disadvantage until your next turn."),
    ("Help", "Give an ally advantage on their next check or attack."),
    ("Hide", "Make a Dexterity (Stealth) check to hide."),
    ("Ready", "Prepare an action to trigger on a condition you choose."),
    ("Search", "Devote your attention to finding something."),
    ("Use an Object", "Interact with a second object or use a special item."),
    ("Grapple", "Athletics contest to grab a creature."),
    ("Shove", "Athletics contest to knock prone or push 5 feet."),
];

/// One row in the actions panel. Derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionItem {
    Weapon {
        attack: WeaponAttack,
        equipped: bool,
    },
    Spell {
        name: String,
        level: u8,
        detail: String,
        castable: bool,
    },
    Standard {
        name: &'static str,
        description: &'static str,
    },
}

impl ActionItem {
    pub fn name(&self) -> &str {
        match self {
            ActionItem::Weapon { attack, .. } => &attack.name,
            ActionItem::Spell { name, .. } => name,
            ActionItem::Standard { name, .. } => name,
        }
    }
}

/// Spells the character can cast right now: cantrips, then prepared spells
/// for classes that prepare or known spells for those that don't.
pub fn castable_spells(character: &Character) -> Vec<String> {
    let Some(casting) = character.spellcasting.as_ref() else {
        return Vec::new();
    };
    let prepares = character
        .primary_class()
        .map(|c| c.prepares_spells())
        .unwrap_or(false);
    let leveled = if prepares {
        &casting.prepared
    } else {
        &casting.known
    };
    casting
        .cantrips
        .iter()
        .chain(leveled.iter())
        .cloned()
        .collect()
}

/// Build the rows for one tab.
pub fn action_items(character: &Character, catalog: &dyn Catalog, tab: ActionTab) -> Vec<ActionItem> {
    match tab {
        ActionTab::Weapons => {
            let inventory = &character.inventory;
            let equipped = inventory.equipped_weapons();
            let carried = inventory
                .items
                .iter()
                .filter(|item| item.weapon.is_some() && !inventory.is_equipped(item.id));
            equipped
                .iter()
                .map(|item| (*item, true))
                .chain(carried.map(|item| (item, false)))
                .filter_map(|(item, equipped)| {
                    weapon_attack(character, item).map(|attack| ActionItem::Weapon { attack, equipped })
                })
                .collect()
        }
        ActionTab::Spells => {
            let Some(casting) = character.spellcasting.as_ref() else {
                return Vec::new();
            };
            let mut rows: Vec<ActionItem> = castable_spells(character)
                .iter()
                .filter_map(|name| catalog.spell(name))
                .map(|spell| ActionItem::Spell {
                    name: spell.name.clone(),
                    level: spell.level,
                    detail: spell
                        .dice
                        .clone()
                        .unwrap_or_else(|| spell.range.clone()),
                    castable: !cast_options(casting, spell).is_empty(),
                })
                .collect();
            rows.sort_by_key(|row| match row {
                ActionItem::Spell { level, .. } => *level,
                _ => 0,
            });
            rows
        }
        ActionTab::Standard => STANDARD_ACTIONS
            .iter()
            .map(|&(name, description)| ActionItem::Standard { name, description })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::character::{Ability, CharacterClass, ClassLevel, Spellcasting};
    use crate::inventory::EquipSlot;
    use crate::items::find_item;

    #[test]
    fn test_tabs_clamp() {
        assert_eq!(ActionTab::Weapons.left(), ActionTab::Weapons);
        assert_eq!(ActionTab::Weapons.right(), ActionTab::Spells);
        assert_eq!(ActionTab::Standard.right(), ActionTab::Standard);
        assert_eq!(ActionTab::Standard.left(), ActionTab::Spells);
    }

    #[test]
    fn test_weapon_rows_equipped_first() {
        let mut character = Character::new("Test");
        let dagger = character
            .inventory
            .add(find_item("Dagger").unwrap().instantiate());
        let sword = character
            .inventory
            .add(find_item("Longsword").unwrap().instantiate());
        character
            .inventory
            .equip(sword, EquipSlot::MainHand)
            .unwrap();

        let rows = action_items(&character, &StaticCatalog, ActionTab::Weapons);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name(), "Longsword");
        assert!(matches!(rows[0], ActionItem::Weapon { equipped: true, .. }));
        assert!(matches!(rows[1], ActionItem::Weapon { equipped: false, .. }));
        assert!(character.inventory.find(dagger).is_some());
    }

    #[test]
    fn test_spell_rows_follow_preparation() {
        let mut character = Character::new("Test");
        character.classes.push(ClassLevel {
            class: CharacterClass::Wizard,
            level: 1,
            subclass: None,
        });
        let mut casting = Spellcasting::new(Ability::Intelligence);
        casting.cantrips.push("Fire Bolt".to_string());
        casting.known.push("Magic Missile".to_string());
        casting.known.push("Shield".to_string());
        casting.prepared.push("Shield".to_string());
        character.spellcasting = Some(casting);

        let rows = action_items(&character, &StaticCatalog, ActionTab::Spells);
        let names: Vec<&str> = rows.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["Fire Bolt", "Shield"]);

        // No slots: the cantrip is castable, the leveled spell isn't
        assert!(matches!(rows[0], ActionItem::Spell { castable: true, .. }));
        assert!(matches!(rows[1], ActionItem::Spell { castable: false, .. }));
    }

    #[test]
    fn test_standard_rows() {
        let character = Character::new("Test");
        let rows = action_items(&character, &StaticCatalog, ActionTab::Standard);
        assert_eq!(rows.len(), STANDARD_ACTIONS.len());
        assert!(action_items(&character, &StaticCatalog, ActionTab::Spells).is_empty());
    }
}
