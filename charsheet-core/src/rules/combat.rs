//! Weapon attacks, damage, healing and death saves.

use crate::character::{Ability, Character, DeathSaveState};
use crate::inventory::{Item, WeaponCategory, WeaponProperty, WeaponStats};
use crate::rules::format_modifier;

// ============================================================================
// Weapon Attacks
// ============================================================================

/// A fully derived weapon attack line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponAttack {
    pub name: String,
    pub ability: Ability,
    pub proficient: bool,
    pub attack_bonus: i32,
    pub damage_modifier: i32,
    pub damage_dice: String,
    pub damage_type: &'static str,
    pub range: Option<(u32, u32)>,
}

impl WeaponAttack {
    /// "1d8+3 slashing".
    pub fn damage_text(&self) -> String {
        let modifier = match self.damage_modifier {
            0 => String::new(),
            m => format_modifier(m),
        };
        format!("{}{} {}", self.damage_dice, modifier, self.damage_type)
    }
}

/// Ability used for attack and damage rolls with this weapon.
///
/// Finesse weapons take the better of STR and DEX; ranged weapons and
/// ammunition weapons use DEX; everything else uses STR.
pub fn attack_ability(character: &Character, weapon: &WeaponStats) -> Ability {
    if weapon.is_finesse() {
        let str_mod = character.ability_modifier(Ability::Strength);
        let dex_mod = character.ability_modifier(Ability::Dexterity);
        if dex_mod > str_mod {
            Ability::Dexterity
        } else {
            Ability::Strength
        }
    } else if weapon.category.is_ranged() || weapon.has_property(&WeaponProperty::Ammunition) {
        Ability::Dexterity
    } else {
        Ability::Strength
    }
}

fn singular(word: &str) -> &str {
    if word.len() > 3 && word.ends_with('s') {
        &word[..word.len() - 1]
    } else {
        word
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .map(singular)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a proficiency list covers a weapon.
///
/// Entries are matched case-insensitively. "Simple ..." and "Martial ..."
/// entries match on the weapon's category. Any other entry matches when it
/// and the weapon name contain one another, ignoring plural endings.
pub fn is_proficient_with(proficiencies: &[String], weapon_name: &str, category: WeaponCategory) -> bool {
    let name = normalize(weapon_name);
    let category_name = category.name().to_lowercase();

    proficiencies.iter().any(|entry| {
        let entry = normalize(entry.trim());
        if entry.is_empty() {
            return false;
        }
        for group in ["simple", "martial"] {
            if entry.split(' ').any(|word| word == group) {
                return category_name.starts_with(group);
            }
        }
        name.contains(&entry) || entry.contains(&name)
    })
}

/// Derive the attack line for an item with weapon stats.
pub fn weapon_attack(character: &Character, item: &Item) -> Option<WeaponAttack> {
    let weapon = item.weapon.as_ref()?;
    let ability = attack_ability(character, weapon);
    let ability_mod = character.ability_modifier(ability) as i32;
    let proficient = is_proficient_with(
        &character.weapon_proficiencies,
        &item.name,
        weapon.category,
    );
    let proficiency = if proficient {
        character.proficiency_bonus() as i32
    } else {
        0
    };
    let magic = item.magic_bonus as i32;

    Some(WeaponAttack {
        name: item.name.clone(),
        ability,
        proficient,
        attack_bonus: ability_mod + proficiency + magic,
        damage_modifier: ability_mod + magic,
        damage_dice: weapon.damage_dice.clone(),
        damage_type: weapon.damage_type.name(),
        range: weapon.range,
    })
}

// ============================================================================
// Hit Points
// ============================================================================

/// What a damage entry did to the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Damaged { absorbed: i32, taken: i32 },
    DroppedToZero { absorbed: i32, taken: i32 },
    /// Damage taken while already at 0 HP.
    DeathSaveFailure(DeathSaveState),
}

pub fn apply_damage(character: &mut Character, amount: i32) -> DamageOutcome {
    if character.hit_points.is_down() && amount > 0 {
        return DamageOutcome::DeathSaveFailure(character.death_saves.add_failure());
    }
    let result = character.hit_points.take_damage(amount);
    if result.dropped_to_zero {
        character.death_saves.reset();
        DamageOutcome::DroppedToZero {
            absorbed: result.absorbed_by_temporary,
            taken: result.damage_taken,
        }
    } else {
        DamageOutcome::Damaged {
            absorbed: result.absorbed_by_temporary,
            taken: result.damage_taken,
        }
    }
}

/// Heal, capped at maximum. Coming back above 0 clears death saves. Returns HP restored.
pub fn apply_healing(character: &mut Character, amount: i32) -> i32 {
    let healed = character.hit_points.heal(amount);
    if character.hit_points.current > 0 {
        character.death_saves.reset();
    }
    healed
}

pub fn set_temporary_hp(character: &mut Character, amount: i32) {
    character.hit_points.set_temporary(amount);
}

/// Record a death save. Returns None unless the character is at 0 HP.
pub fn record_death_save(character: &mut Character, success: bool) -> Option<DeathSaveState> {
    if !character.hit_points.is_down() {
        return None;
    }
    Some(if success {
        character.death_saves.add_success()
    } else {
        character.death_saves.add_failure()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::WeaponDamageType;

    fn profs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_proficiency_predicate() {
        let martial = WeaponCategory::MartialMelee;
        let simple = WeaponCategory::SimpleRanged;

        assert!(is_proficient_with(&profs(&["Martial weapons"]), "Longsword", martial));
        assert!(!is_proficient_with(&profs(&["Simple weapons"]), "Longsword", martial));
        assert!(is_proficient_with(&profs(&["simple WEAPONS"]), "Light Crossbow", simple));

        // Plural entries match singular weapon names and vice versa
        assert!(is_proficient_with(&profs(&["Longswords"]), "Longsword", martial));
        assert!(is_proficient_with(&profs(&["Rapier"]), "Rapiers", martial));
        assert!(is_proficient_with(&profs(&["Light crossbows"]), "Light Crossbow", simple));
        assert!(!is_proficient_with(&profs(&["Hand crossbows"]), "Light Crossbow", simple));

        // Magic variants still match the base name
        assert!(is_proficient_with(&profs(&["Longswords"]), "Longsword +1", martial));

        // Empty entries never match
        assert!(!is_proficient_with(&profs(&["", "  "]), "Dagger", WeaponCategory::SimpleMelee));
    }

    #[test]
    fn test_attack_ability_selection() {
        let mut character = Character::new("Test");
        character.ability_scores.strength = 16;
        character.ability_scores.dexterity = 12;

        let rapier = Item::weapon("Rapier", "1d8", WeaponDamageType::Piercing, WeaponCategory::MartialMelee)
            .with_properties(vec![WeaponProperty::Finesse]);
        assert_eq!(
            attack_ability(&character, rapier.weapon.as_ref().unwrap()),
            Ability::Strength
        );

        character.ability_scores.dexterity = 18;
        assert_eq!(
            attack_ability(&character, rapier.weapon.as_ref().unwrap()),
            Ability::Dexterity
        );

        character.ability_scores.dexterity = 8;
        let bow = Item::weapon("Longbow", "1d8", WeaponDamageType::Piercing, WeaponCategory::MartialRanged);
        assert_eq!(
            attack_ability(&character, bow.weapon.as_ref().unwrap()),
            Ability::Dexterity
        );
    }

    #[test]
    fn test_weapon_attack_numbers() {
        let mut character = Character::new("Test");
        character.ability_scores.strength = 16; // +3
        character.level = 5; // +3
        character.weapon_proficiencies = profs(&["Martial weapons"]);

        let sword = Item::weapon("Longsword", "1d8", WeaponDamageType::Slashing, WeaponCategory::MartialMelee)
            .with_magic_bonus(1);
        let attack = weapon_attack(&character, &sword).unwrap();
        assert!(attack.proficient);
        assert_eq!(attack.attack_bonus, 7);
        assert_eq!(attack.damage_modifier, 4);
        assert_eq!(attack.damage_text(), "1d8+4 slashing");

        character.weapon_proficiencies.clear();
        let attack = weapon_attack(&character, &sword).unwrap();
        assert!(!attack.proficient);
        assert_eq!(attack.attack_bonus, 4);
    }

    #[test]
    fn test_damage_at_zero_adds_failure() {
        let mut character = Character::new("Test");
        character.hit_points = crate::character::HitPoints::new(10);

        assert!(matches!(
            apply_damage(&mut character, 12),
            DamageOutcome::DroppedToZero { taken: 12, .. }
        ));
        assert_eq!(character.hit_points.current, 0);

        assert_eq!(
            apply_damage(&mut character, 3),
            DamageOutcome::DeathSaveFailure(DeathSaveState::Dying)
        );
        assert_eq!(character.death_saves.failures, 1);

        // Healing resets the saves
        assert_eq!(apply_healing(&mut character, 4), 4);
        assert_eq!(character.death_saves.failures, 0);
    }

    #[test]
    fn test_death_saves_only_at_zero() {
        let mut character = Character::new("Test");
        assert_eq!(record_death_save(&mut character, true), None);

        character.hit_points.current = 0;
        for _ in 0..2 {
            record_death_save(&mut character, false);
        }
        assert_eq!(
            record_death_save(&mut character, false),
            Some(DeathSaveState::Dead)
        );
        assert_eq!(
            record_death_save(&mut character, true),
            Some(DeathSaveState::Dead)
        );
        assert_eq!(character.death_saves.successes, 0);
    }
}
