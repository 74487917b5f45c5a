//! Testing utilities.
//!
//! - `MemoryStore`, an in-memory `CharacterStore` that can be told to fail
//! - Ready-made characters for sheet, casting and rest scenarios

use crate::character::{
    Ability, AbilityScores, Character, CharacterClass, CharacterId, ClassLevel, Feature,
    FeatureUses, HitDice, HitPoints, PactMagic, ProficiencyLevel, RechargeType, Skill,
    Spellcasting,
};
use crate::dice::DieType;
use crate::inventory::EquipSlot;
use crate::items::find_item;
use crate::persist::{CharacterStore, CharacterSummary, PersistError};
use crate::origins::{Background, RaceType};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A store that keeps characters in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    characters: Mutex<HashMap<CharacterId, Character>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `characters`.
    pub fn with(characters: impl IntoIterator<Item = Character>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.characters.lock() {
            map.extend(characters.into_iter().map(|c| (c.id, c)));
        }
        store
    }

    /// Make every subsequent save and delete fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent list and load fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: CharacterId) -> Option<Character> {
        self.characters.lock().ok()?.get(&id).cloned()
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), PersistError> {
        if flag.load(Ordering::SeqCst) {
            Err(PersistError::Unavailable("memory store set to fail".to_string()))
        } else {
            Ok(())
        }
    }

    fn map(&self) -> Result<std::sync::MutexGuard<'_, HashMap<CharacterId, Character>>, PersistError> {
        self.characters
            .lock()
            .map_err(|_| PersistError::Unavailable("memory store poisoned".to_string()))
    }
}

impl CharacterStore for MemoryStore {
    fn list(&self) -> Result<Vec<CharacterSummary>, PersistError> {
        self.check(&self.fail_reads)?;
        let mut summaries: Vec<CharacterSummary> = self
            .map()?
            .values()
            .map(|c| CharacterSummary::of(c, None))
            .collect();
        summaries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(summaries)
    }

    fn load(&self, id: CharacterId) -> Result<Character, PersistError> {
        self.check(&self.fail_reads)?;
        self.map()?
            .get(&id)
            .cloned()
            .ok_or(PersistError::NotFound(id))
    }

    fn save(&self, character: &Character) -> Result<CharacterId, PersistError> {
        self.check(&self.fail_writes)?;
        self.map()?.insert(character.id, character.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(character.id)
    }

    fn delete(&self, id: CharacterId) -> Result<(), PersistError> {
        self.check(&self.fail_writes)?;
        self.map()?
            .remove(&id)
            .map(|_| ())
            .ok_or(PersistError::NotFound(id))
    }
}

// ============================================================================
// Sample Characters
// ============================================================================

fn equip_new(character: &mut Character, name: &str, slot: Option<EquipSlot>) {
    let Some(template) = find_item(name) else {
        return;
    };
    let id = character.inventory.add(template.instantiate());
    if let Some(slot) = slot {
        let _ = character.inventory.equip(id, slot);
    }
}

/// Level 3 human fighter in chain mail with a longsword and shield.
pub fn sample_fighter(name: &str) -> Character {
    let mut character = Character::new(name);

    character.ability_scores = AbilityScores::new(16, 14, 14, 10, 12, 8);
    character.level = 3;
    character.hit_points = HitPoints::new(28);
    character.hit_dice = HitDice::new(DieType::D10, 3);
    character.background = Background::Soldier;

    character.classes.push(ClassLevel {
        class: CharacterClass::Fighter,
        level: 3,
        subclass: Some("Champion".to_string()),
    });

    character
        .saving_throw_proficiencies
        .insert(Ability::Strength);
    character
        .saving_throw_proficiencies
        .insert(Ability::Constitution);

    character
        .skill_proficiencies
        .insert(Skill::Athletics, ProficiencyLevel::Proficient);
    character
        .skill_proficiencies
        .insert(Skill::Perception, ProficiencyLevel::Proficient);
    character
        .skill_proficiencies
        .insert(Skill::Intimidation, ProficiencyLevel::Proficient);

    character.weapon_proficiencies = vec!["Simple weapons".to_string(), "Martial weapons".to_string()];
    character.armor_proficiencies = vec!["All armor".to_string(), "Shields".to_string()];
    character.base_armor_class = 12;

    equip_new(&mut character, "Longsword", Some(EquipSlot::MainHand));
    equip_new(&mut character, "Chain Mail", Some(EquipSlot::Armor));
    equip_new(&mut character, "Shield", Some(EquipSlot::OffHand));
    equip_new(&mut character, "Light Crossbow", None);
    equip_new(&mut character, "Backpack", None);
    character.inventory.currency.gp = 15;

    character.features.push(Feature {
        name: "Second Wind".to_string(),
        description: "Regain 1d10 + fighter level HP as bonus action".to_string(),
        source: "Fighter".to_string(),
        uses: Some(FeatureUses {
            current: 1,
            maximum: 1,
            recharge: RechargeType::ShortRest,
        }),
    });

    character.features.push(Feature {
        name: "Action Surge".to_string(),
        description: "Take one additional action on your turn".to_string(),
        source: "Fighter".to_string(),
        uses: Some(FeatureUses {
            current: 1,
            maximum: 1,
            recharge: RechargeType::ShortRest,
        }),
    });

    character
}

/// Level 3 elf wizard with slots at levels 1 and 2.
pub fn sample_wizard(name: &str) -> Character {
    let mut character = Character::new(name);

    character.race = RaceType::Elf;
    character.background = Background::Sage;
    character.ability_scores = AbilityScores::new(8, 14, 14, 16, 12, 10);
    character.level = 3;
    character.hit_points = HitPoints::new(17);
    character.hit_dice = HitDice::new(DieType::D6, 3);
    character.base_armor_class = 12;
    character.languages.push("Elvish".to_string());

    character.classes.push(ClassLevel {
        class: CharacterClass::Wizard,
        level: 3,
        subclass: None,
    });
    character
        .saving_throw_proficiencies
        .insert(Ability::Intelligence);
    character.saving_throw_proficiencies.insert(Ability::Wisdom);
    character
        .skill_proficiencies
        .insert(Skill::Arcana, ProficiencyLevel::Proficient);
    character
        .skill_proficiencies
        .insert(Skill::History, ProficiencyLevel::Proficient);
    character.weapon_proficiencies = vec!["Daggers".to_string(), "Quarterstaffs".to_string()];

    equip_new(&mut character, "Quarterstaff", Some(EquipSlot::MainHand));
    equip_new(&mut character, "Dagger", None);
    equip_new(&mut character, "Spellbook", None);

    let mut casting = Spellcasting::new(Ability::Intelligence);
    casting.cantrips = vec!["Fire Bolt".to_string(), "Mage Hand".to_string()];
    casting.known = ["Magic Missile", "Shield", "Detect Magic", "Sleep", "Scorching Ray"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    casting.prepared = vec!["Magic Missile".to_string(), "Shield".to_string(), "Scorching Ray".to_string()];
    casting.slots.set_total(1, 4);
    casting.slots.set_total(2, 2);
    character.spellcasting = Some(casting);

    character.features.push(Feature {
        name: "Arcane Recovery".to_string(),
        description: "Recover expended spell slots after a short rest".to_string(),
        source: "Wizard".to_string(),
        uses: Some(FeatureUses {
            current: 1,
            maximum: 1,
            recharge: RechargeType::LongRest,
        }),
    });

    character
}

/// Level 2 tiefling warlock with two level 1 pact slots.
pub fn sample_warlock(name: &str) -> Character {
    let mut character = Character::new(name);

    character.race = RaceType::Tiefling;
    character.background = Background::Charlatan;
    character.ability_scores = AbilityScores::new(8, 14, 14, 12, 10, 16);
    character.level = 2;
    character.hit_points = HitPoints::new(17);
    character.hit_dice = HitDice::new(DieType::D8, 2);
    character.classes.push(ClassLevel {
        class: CharacterClass::Warlock,
        level: 2,
        subclass: Some("Fiend".to_string()),
    });
    character.saving_throw_proficiencies.insert(Ability::Wisdom);
    character
        .saving_throw_proficiencies
        .insert(Ability::Charisma);

    let mut casting = Spellcasting::new(Ability::Charisma);
    casting.cantrips = vec!["Eldritch Blast".to_string()];
    casting.known = vec!["Hex".to_string(), "Hellish Rebuke".to_string()];
    casting.pact = Some(PactMagic {
        level: 1,
        total: 2,
        used: 0,
    });
    character.spellcasting = Some(casting);

    character
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::armor_class;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        let fighter = sample_fighter("Bruni");
        store.save(&fighter).unwrap();
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.load(fighter.id).unwrap(), fighter);
        assert_eq!(store.list().unwrap()[0].name, "Bruni");
    }

    #[test]
    fn test_memory_store_failures() {
        let fighter = sample_fighter("Bruni");
        let store = MemoryStore::with([fighter.clone()]);

        store.fail_writes(true);
        assert!(matches!(store.save(&fighter), Err(PersistError::Unavailable(_))));
        assert_eq!(store.write_count(), 0);
        assert!(store.load(fighter.id).is_ok());

        store.fail_reads(true);
        assert!(store.list().is_err());
    }

    #[test]
    fn test_sample_fighter_armor() {
        let fighter = sample_fighter("Bruni");
        // Chain mail 16 + shield 2
        assert_eq!(armor_class(&fighter), 18);
        assert_eq!(fighter.proficiency_bonus(), 2);
    }
}
