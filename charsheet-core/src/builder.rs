//! Level 1 character creation.

use crate::character::{
    Ability, AbilityScores, Character, CharacterClass, ClassLevel, HitDice, HitPoints, PactMagic,
    ProficiencyLevel, Skill, Spellcasting,
};
use crate::inventory::{EquipSlot, ItemCategory};
use crate::items::find_item;
use crate::origins::{Background, RaceType};
use thiserror::Error;
use tracing::warn;

/// Scores handed out by class priority when none are given.
pub const STANDARD_ARRAY: [u8; 6] = [15, 14, 13, 12, 10, 8];

/// Builder for new level 1 characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    race: Option<RaceType>,
    class: Option<CharacterClass>,
    background: Option<Background>,
    ability_scores: Option<AbilityScores>,
    selected_skills: Option<Vec<Skill>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Character name is required")]
    MissingName,
    #[error("Race selection is required")]
    MissingRace,
    #[error("Class selection is required")]
    MissingClass,
    #[error("Background selection is required")]
    MissingBackground,
    #[error("Expected {expected} skills, got {got}")]
    InvalidSkillCount { expected: usize, got: usize },
    #[error("Skill {} is not available for this class", .0.name())]
    SkillNotAvailable(Skill),
}

/// Standard array assigned by the class's ability priority.
pub fn standard_array_for(class: CharacterClass) -> AbilityScores {
    let mut scores = AbilityScores::default();
    for (value, ability) in STANDARD_ARRAY.iter().zip(class.data().ability_priority) {
        scores.set(ability, *value);
    }
    scores
}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn race(mut self, race: RaceType) -> Self {
        self.race = Some(race);
        self
    }

    pub fn class(mut self, class: CharacterClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    /// Scores before racial bonuses. Defaults to the standard array.
    pub fn ability_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self
    }

    /// Class skill picks. Defaults to the first options the background doesn't cover.
    pub fn skills(mut self, skills: Vec<Skill>) -> Self {
        self.selected_skills = Some(skills);
        self
    }

    pub fn build(self) -> Result<Character, BuildError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(BuildError::MissingName)?;
        let race = self.race.ok_or(BuildError::MissingRace)?;
        let class = self.class.ok_or(BuildError::MissingClass)?;
        let background = self.background.ok_or(BuildError::MissingBackground)?;
        let class_data = class.data();

        let mut ability_scores = self
            .ability_scores
            .unwrap_or_else(|| standard_array_for(class));
        race.apply_ability_bonuses(&mut ability_scores);

        // Half-elf +1s go to the next two priorities after Charisma
        if race == RaceType::HalfElf {
            for ability in class_data
                .ability_priority
                .iter()
                .filter(|a| **a != Ability::Charisma)
                .take(2)
            {
                let current = ability_scores.get(*ability);
                ability_scores.set(*ability, current + 1);
            }
        }

        let background_skills = background.skill_proficiencies();
        let selected_skills = match self.selected_skills {
            Some(skills) => {
                if skills.len() != class_data.skill_count {
                    return Err(BuildError::InvalidSkillCount {
                        expected: class_data.skill_count,
                        got: skills.len(),
                    });
                }
                if let Some(skill) = skills
                    .iter()
                    .find(|s| !class_data.skill_options.contains(*s))
                {
                    return Err(BuildError::SkillNotAvailable(*skill));
                }
                skills
            }
            None => class_data
                .skill_options
                .iter()
                .filter(|s| !background_skills.contains(*s))
                .take(class_data.skill_count)
                .copied()
                .collect(),
        };

        let mut character = Character::new(name);
        character.race = race;
        character.background = background;
        character.ability_scores = ability_scores;
        character.classes = vec![ClassLevel {
            class,
            level: 1,
            subclass: None,
        }];

        let con_mod = character.ability_modifier(Ability::Constitution) as i32;
        character.hit_points = HitPoints::new((class.hit_die().sides() as i32 + con_mod).max(1));
        character.hit_dice = HitDice::new(class.hit_die(), 1);
        character.base_armor_class =
            (10 + character.ability_modifier(Ability::Dexterity) as i32).max(0) as u8;
        character.speed = race.base_speed();

        character.saving_throw_proficiencies = class_data.saving_throws.into_iter().collect();
        for skill in selected_skills.into_iter().chain(background_skills) {
            character
                .skill_proficiencies
                .insert(skill, ProficiencyLevel::Proficient);
        }
        character.weapon_proficiencies = class_data
            .weapon_proficiencies
            .iter()
            .map(|s| s.to_string())
            .collect();
        character.armor_proficiencies = class_data
            .armor_proficiencies
            .iter()
            .map(|s| s.to_string())
            .collect();
        character.tool_proficiencies = background
            .tool_proficiencies()
            .iter()
            .map(|s| s.to_string())
            .collect();
        character.languages = race.languages().iter().map(|s| s.to_string()).collect();
        character.features = class_data.level_1_features;

        give_starting_items(&mut character, class_data.starting_items);

        if let Some(ability) = class.spellcasting_ability() {
            let mut casting = Spellcasting::new(ability);
            casting.cantrips = class_data.cantrips.iter().map(|s| s.to_string()).collect();
            casting.known = class_data.spells.iter().map(|s| s.to_string()).collect();
            match class {
                CharacterClass::Warlock => {
                    casting.pact = Some(PactMagic::for_warlock_level(1));
                }
                // Half casters get slots at level 2
                CharacterClass::Paladin | CharacterClass::Ranger => {}
                _ => {
                    casting.slots.set_total(1, 2);
                }
            }
            if class.prepares_spells() {
                casting.prepared = casting.known.clone();
            }
            character.spellcasting = Some(casting);
        }

        Ok(character)
    }
}

/// Add starting gear, wearing the first armor and shield and wielding the first weapon.
fn give_starting_items(character: &mut Character, names: &[&str]) {
    for name in names {
        let Some(template) = find_item(name) else {
            warn!(item = %name, "Starting item missing from catalog");
            continue;
        };
        let item = template.instantiate();
        let slot = match item.category {
            ItemCategory::Armor => Some(EquipSlot::Armor),
            ItemCategory::Shield => Some(EquipSlot::OffHand),
            ItemCategory::Weapon => Some(EquipSlot::MainHand),
            _ => None,
        };
        let id = character.inventory.add(item);
        if let Some(slot) = slot {
            if character.inventory.equipped(slot).is_none() {
                // Top-level items always equip
                let _ = character.inventory.equip(id, slot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::armor_class;

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            CharacterBuilder::new().build().unwrap_err(),
            BuildError::MissingName
        );
        assert_eq!(
            CharacterBuilder::new().name("  ").build().unwrap_err(),
            BuildError::MissingName
        );
        assert_eq!(
            CharacterBuilder::new()
                .name("Aria")
                .race(RaceType::Elf)
                .class(CharacterClass::Wizard)
                .build()
                .unwrap_err(),
            BuildError::MissingBackground
        );
    }

    #[test]
    fn test_standard_array_by_priority() {
        let scores = standard_array_for(CharacterClass::Fighter);
        assert_eq!(scores.strength, 15);
        assert_eq!(scores.get(CharacterClass::Fighter.data().ability_priority[5]), 8);
    }

    #[test]
    fn test_build_fighter() {
        let character = CharacterBuilder::new()
            .name("Thorin")
            .race(RaceType::Dwarf)
            .class(CharacterClass::Fighter)
            .background(Background::Soldier)
            .build()
            .unwrap();

        assert_eq!(character.level, 1);
        assert_eq!(character.class_summary(), "Fighter 1");
        assert_eq!(character.speed, 25);
        assert!(character.languages.contains(&"Dwarvish".to_string()));
        assert!(character
            .saving_throw_proficiencies
            .contains(&Ability::Strength));
        // d10 + CON modifier
        let con = character.ability_modifier(Ability::Constitution) as i32;
        assert_eq!(character.hit_points.maximum, 10 + con);
        assert_eq!(character.hit_dice.remaining, 1);

        // Chain mail and shield are worn: 16 + 2
        assert!(character.inventory.equipped(EquipSlot::Armor).is_some());
        assert!(character.inventory.equipped(EquipSlot::OffHand).is_some());
        assert_eq!(armor_class(&character), 18);
        assert!(character.spellcasting.is_none());
    }

    #[test]
    fn test_build_wizard_spells() {
        let character = CharacterBuilder::new()
            .name("Elara")
            .race(RaceType::Elf)
            .class(CharacterClass::Wizard)
            .background(Background::Sage)
            .build()
            .unwrap();

        let casting = character.spellcasting.as_ref().unwrap();
        assert_eq!(casting.ability, Ability::Intelligence);
        assert_eq!(casting.slots.available(1), 2);
        assert!(casting.knows("Magic Missile"));
        assert!(casting.is_prepared("Magic Missile"));
        assert!(casting.pact.is_none());
    }

    #[test]
    fn test_build_warlock_pact() {
        let character = CharacterBuilder::new()
            .name("Vex")
            .race(RaceType::Tiefling)
            .class(CharacterClass::Warlock)
            .background(Background::Charlatan)
            .build()
            .unwrap();

        let casting = character.spellcasting.as_ref().unwrap();
        assert!(!casting.slots.has_any());
        assert_eq!(casting.pact.as_ref().map(|p| p.available()), Some(1));
    }

    #[test]
    fn test_half_elf_extra_bonuses() {
        let character = CharacterBuilder::new()
            .name("Lia")
            .race(RaceType::HalfElf)
            .class(CharacterClass::Fighter)
            .background(Background::Soldier)
            .build()
            .unwrap();

        let priority = CharacterClass::Fighter.data().ability_priority;
        let base = standard_array_for(CharacterClass::Fighter);
        assert_eq!(
            character.ability_scores.get(priority[0]),
            base.get(priority[0]) + 1
        );
        assert_eq!(
            character.ability_scores.charisma,
            base.charisma + 2
        );
    }

    #[test]
    fn test_skill_validation() {
        let builder = CharacterBuilder::new()
            .name("Test")
            .race(RaceType::Human)
            .class(CharacterClass::Fighter)
            .background(Background::Soldier);

        assert_eq!(
            builder.clone().skills(vec![Skill::Athletics]).build().unwrap_err(),
            BuildError::InvalidSkillCount {
                expected: 2,
                got: 1
            }
        );
        assert_eq!(
            builder
                .skills(vec![Skill::Athletics, Skill::Arcana])
                .build()
                .unwrap_err(),
            BuildError::SkillNotAvailable(Skill::Arcana)
        );
    }
}
