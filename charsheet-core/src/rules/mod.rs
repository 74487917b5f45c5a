//! Rule engine.
//!
//! Pure functions deriving numbers from a [`Character`] and resolving
//! resource spending. Nothing here rolls dice: wherever a roll would occur
//! the die's fixed average is used.

pub mod actions;
pub mod combat;
pub mod currency;
pub mod hp_bar;
pub mod rest;
pub mod spellcasting;
pub mod upcast;

use crate::character::{Ability, Character, Skill};
use crate::inventory::{ArmorType, EquipSlot, Inventory, ItemCategory};

/// Most items a character can be attuned to at once.
pub const MAX_ATTUNED_ITEMS: usize = 3;

/// Carrying capacity multiplier per point of Strength.
pub const CARRY_PER_STRENGTH: f32 = 15.0;

// ============================================================================
// Ability and Proficiency
// ============================================================================

/// `floor((score - 10) / 2)`.
pub fn ability_modifier(score: u8) -> i8 {
    (score as i16 - 10).div_euclid(2) as i8
}

/// Proficiency bonus by total character level.
pub fn proficiency_bonus(level: u8) -> i8 {
    match level {
        0..=4 => 2,
        5..=8 => 3,
        9..=12 => 4,
        13..=16 => 5,
        _ => 6,
    }
}

pub fn skill_modifier(character: &Character, skill: Skill) -> i8 {
    let ability_mod = character.ability_modifier(skill.ability());
    ability_mod
        + character
            .skill_proficiency(skill)
            .bonus(character.proficiency_bonus())
}

pub fn saving_throw_modifier(character: &Character, ability: Ability) -> i8 {
    let ability_mod = character.ability_modifier(ability);
    if character.saving_throw_proficiencies.contains(&ability) {
        ability_mod + character.proficiency_bonus()
    } else {
        ability_mod
    }
}

/// Signed display form: `+3`, `+0`, `-1`.
pub fn format_modifier(value: i32) -> String {
    if value >= 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

pub fn initiative(character: &Character) -> i8 {
    character.ability_modifier(Ability::Dexterity)
}

pub fn passive_perception(character: &Character) -> i8 {
    10 + skill_modifier(character, Skill::Perception)
}

// ============================================================================
// Spellcasting Numbers
// ============================================================================

/// `8 + proficiency + casting modifier`, or None for non-casters.
pub fn spell_save_dc(character: &Character) -> Option<i8> {
    let casting = character.spellcasting.as_ref()?;
    Some(8 + character.proficiency_bonus() + character.ability_modifier(casting.ability))
}

/// `proficiency + casting modifier`, or None for non-casters.
pub fn spell_attack_bonus(character: &Character) -> Option<i8> {
    let casting = character.spellcasting.as_ref()?;
    Some(character.proficiency_bonus() + character.ability_modifier(casting.ability))
}

// ============================================================================
// Armor and Encumbrance
// ============================================================================

/// Armor class from equipped armor and shield.
///
/// Without body armor the character's base armor class is used. A shield in
/// the off hand adds 2. Magic bonuses on either piece are added.
pub fn armor_class(character: &Character) -> i32 {
    let dex_mod = character.ability_modifier(Ability::Dexterity) as i32;
    let inventory = &character.inventory;

    let body = inventory
        .equipped(EquipSlot::Armor)
        .and_then(|item| item.armor.as_ref().map(|stats| (item, stats)));
    let mut ac = match body {
        Some((item, stats)) => {
            let base = stats.base_ac as i32 + item.magic_bonus as i32;
            match stats.armor_type {
                ArmorType::Light => base + dex_mod,
                ArmorType::Medium => base + dex_mod.min(2),
                ArmorType::Heavy => base,
            }
        }
        None => character.base_armor_class as i32,
    };

    if let Some(shield) = inventory
        .equipped(EquipSlot::OffHand)
        .filter(|item| item.category == ItemCategory::Shield)
    {
        ac += 2 + shield.magic_bonus as i32;
    }
    ac
}

pub fn carrying_capacity(character: &Character) -> f32 {
    character.ability_scores.strength as f32 * CARRY_PER_STRENGTH
}

pub fn carried_weight(character: &Character) -> f32 {
    character.inventory.total_weight()
}

/// True while another item can be attuned.
pub fn can_attune(inventory: &Inventory) -> bool {
    inventory.attuned_count() < MAX_ATTUNED_ITEMS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::ProficiencyLevel;
    use crate::inventory::Item;

    #[test]
    fn test_ability_modifier_floors() {
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(15), 2);
        assert_eq!(ability_modifier(20), 5);
    }

    #[test]
    fn test_proficiency_bonus_table() {
        let expected = [(1, 2), (4, 2), (5, 3), (8, 3), (9, 4), (13, 5), (16, 5), (17, 6), (20, 6)];
        for (level, bonus) in expected {
            assert_eq!(proficiency_bonus(level), bonus, "level {level}");
        }
    }

    #[test]
    fn test_skill_proficiency_levels() {
        let mut character = Character::new("Test");
        character.ability_scores.dexterity = 14;
        character.level = 5; // +3

        assert_eq!(skill_modifier(&character, Skill::Stealth), 2);

        character
            .skill_proficiencies
            .insert(Skill::Stealth, ProficiencyLevel::Half);
        assert_eq!(skill_modifier(&character, Skill::Stealth), 3);

        character
            .skill_proficiencies
            .insert(Skill::Stealth, ProficiencyLevel::Proficient);
        assert_eq!(skill_modifier(&character, Skill::Stealth), 5);

        character
            .skill_proficiencies
            .insert(Skill::Stealth, ProficiencyLevel::Expertise);
        assert_eq!(skill_modifier(&character, Skill::Stealth), 8);
    }

    #[test]
    fn test_saving_throws() {
        let mut character = Character::new("Test");
        character.ability_scores.constitution = 16;
        assert_eq!(saving_throw_modifier(&character, Ability::Constitution), 3);
        character
            .saving_throw_proficiencies
            .insert(Ability::Constitution);
        assert_eq!(saving_throw_modifier(&character, Ability::Constitution), 5);
    }

    #[test]
    fn test_format_modifier() {
        assert_eq!(format_modifier(3), "+3");
        assert_eq!(format_modifier(0), "+0");
        assert_eq!(format_modifier(-2), "-2");
    }

    #[test]
    fn test_armor_class_from_equipment() {
        let mut character = Character::new("Test");
        character.ability_scores.dexterity = 16; // +3
        character.base_armor_class = 13;
        assert_eq!(armor_class(&character), 13);

        let leather = character
            .inventory
            .add(Item::armor("Leather Armor", ArmorType::Light, 11));
        character
            .inventory
            .equip(leather, EquipSlot::Armor)
            .unwrap();
        assert_eq!(armor_class(&character), 14);

        let scale = character
            .inventory
            .add(Item::armor("Scale Mail", ArmorType::Medium, 14));
        character.inventory.equip(scale, EquipSlot::Armor).unwrap();
        assert_eq!(armor_class(&character), 16);

        let plate = character
            .inventory
            .add(Item::armor("Plate", ArmorType::Heavy, 18).with_magic_bonus(1));
        character.inventory.equip(plate, EquipSlot::Armor).unwrap();
        assert_eq!(armor_class(&character), 19);

        let shield = character
            .inventory
            .add(Item::new("Shield", ItemCategory::Shield));
        character
            .inventory
            .equip(shield, EquipSlot::OffHand)
            .unwrap();
        assert_eq!(armor_class(&character), 21);
    }

    #[test]
    fn test_spell_numbers() {
        let mut character = Character::new("Test");
        assert_eq!(spell_save_dc(&character), None);

        character.ability_scores.intelligence = 16;
        character.spellcasting = Some(crate::character::Spellcasting::new(Ability::Intelligence));
        assert_eq!(spell_save_dc(&character), Some(13));
        assert_eq!(spell_attack_bonus(&character), Some(5));
    }

    #[test]
    fn test_carrying_capacity() {
        let mut character = Character::new("Test");
        character.ability_scores.strength = 15;
        assert_eq!(carrying_capacity(&character), 225.0);
    }
}
