//! Races and backgrounds.

use crate::character::{AbilityScores, Skill};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Races
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceType {
    Human,
    Elf,
    Dwarf,
    Halfling,
    HalfOrc,
    HalfElf,
    Tiefling,
    Gnome,
    Dragonborn,
}

impl RaceType {
    pub fn name(&self) -> &'static str {
        match self {
            RaceType::Human => "Human",
            RaceType::Elf => "Elf",
            RaceType::Dwarf => "Dwarf",
            RaceType::Halfling => "Halfling",
            RaceType::HalfOrc => "Half-Orc",
            RaceType::HalfElf => "Half-Elf",
            RaceType::Tiefling => "Tiefling",
            RaceType::Gnome => "Gnome",
            RaceType::Dragonborn => "Dragonborn",
        }
    }

    /// Short summary of the racial ability score increases.
    pub fn ability_bonuses(&self) -> &'static str {
        match self {
            RaceType::Human => "+1 to every ability",
            RaceType::Elf | RaceType::Halfling => "+2 DEX",
            RaceType::Dwarf => "+2 CON",
            RaceType::HalfOrc => "+2 STR, +1 CON",
            RaceType::HalfElf => "+2 CHA, +1 to two others",
            RaceType::Tiefling => "+2 CHA, +1 INT",
            RaceType::Gnome => "+2 INT",
            RaceType::Dragonborn => "+2 STR, +1 CHA",
        }
    }

    /// Apply fixed racial increases. Half-elf free choices are made by the builder.
    pub fn apply_ability_bonuses(&self, scores: &mut AbilityScores) {
        match self {
            RaceType::Human => {
                scores.strength += 1;
                scores.dexterity += 1;
                scores.constitution += 1;
                scores.intelligence += 1;
                scores.wisdom += 1;
                scores.charisma += 1;
            }
            RaceType::Elf | RaceType::Halfling => scores.dexterity += 2,
            RaceType::Dwarf => scores.constitution += 2,
            RaceType::HalfOrc => {
                scores.strength += 2;
                scores.constitution += 1;
            }
            RaceType::HalfElf => scores.charisma += 2,
            RaceType::Tiefling => {
                scores.charisma += 2;
                scores.intelligence += 1;
            }
            RaceType::Gnome => scores.intelligence += 2,
            RaceType::Dragonborn => {
                scores.strength += 2;
                scores.charisma += 1;
            }
        }
    }

    pub fn base_speed(&self) -> u32 {
        match self {
            RaceType::Dwarf | RaceType::Halfling | RaceType::Gnome => 25,
            _ => 30,
        }
    }

    pub fn languages(&self) -> &'static [&'static str] {
        match self {
            RaceType::Human => &["Common"],
            RaceType::Elf | RaceType::HalfElf => &["Common", "Elvish"],
            RaceType::Dwarf => &["Common", "Dwarvish"],
            RaceType::Halfling => &["Common", "Halfling"],
            RaceType::HalfOrc => &["Common", "Orc"],
            RaceType::Tiefling => &["Common", "Infernal"],
            RaceType::Gnome => &["Common", "Gnomish"],
            RaceType::Dragonborn => &["Common", "Draconic"],
        }
    }

    pub fn all() -> &'static [RaceType] {
        &[
            RaceType::Human,
            RaceType::Elf,
            RaceType::Dwarf,
            RaceType::Halfling,
            RaceType::HalfOrc,
            RaceType::HalfElf,
            RaceType::Tiefling,
            RaceType::Gnome,
            RaceType::Dragonborn,
        ]
    }
}

impl fmt::Display for RaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Backgrounds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Background {
    Acolyte,
    Charlatan,
    Criminal,
    Entertainer,
    FolkHero,
    GuildArtisan,
    Hermit,
    Noble,
    Outlander,
    Sage,
    Sailor,
    Soldier,
    Urchin,
}

impl Background {
    pub fn name(&self) -> &'static str {
        match self {
            Background::Acolyte => "Acolyte",
            Background::Charlatan => "Charlatan",
            Background::Criminal => "Criminal",
            Background::Entertainer => "Entertainer",
            Background::FolkHero => "Folk Hero",
            Background::GuildArtisan => "Guild Artisan",
            Background::Hermit => "Hermit",
            Background::Noble => "Noble",
            Background::Outlander => "Outlander",
            Background::Sage => "Sage",
            Background::Sailor => "Sailor",
            Background::Soldier => "Soldier",
            Background::Urchin => "Urchin",
        }
    }

    pub fn skill_proficiencies(&self) -> [Skill; 2] {
        match self {
            Background::Acolyte => [Skill::Insight, Skill::Religion],
            Background::Charlatan => [Skill::Deception, Skill::SleightOfHand],
            Background::Criminal => [Skill::Deception, Skill::Stealth],
            Background::Entertainer => [Skill::Acrobatics, Skill::Performance],
            Background::FolkHero => [Skill::AnimalHandling, Skill::Survival],
            Background::GuildArtisan => [Skill::Insight, Skill::Persuasion],
            Background::Hermit => [Skill::Medicine, Skill::Religion],
            Background::Noble => [Skill::History, Skill::Persuasion],
            Background::Outlander => [Skill::Athletics, Skill::Survival],
            Background::Sage => [Skill::Arcana, Skill::History],
            Background::Sailor => [Skill::Athletics, Skill::Perception],
            Background::Soldier => [Skill::Athletics, Skill::Intimidation],
            Background::Urchin => [Skill::SleightOfHand, Skill::Stealth],
        }
    }

    pub fn tool_proficiencies(&self) -> &'static [&'static str] {
        match self {
            Background::Acolyte | Background::Sage => &[],
            Background::Charlatan => &["Disguise kit", "Forgery kit"],
            Background::Criminal => &["Thieves' tools"],
            Background::Entertainer => &["Disguise kit"],
            Background::FolkHero => &["Carpenter's tools"],
            Background::GuildArtisan => &["Smith's tools"],
            Background::Hermit => &["Herbalism kit"],
            Background::Noble => &["Playing card set"],
            Background::Outlander => &["Flute"],
            Background::Sailor => &["Navigator's tools"],
            Background::Soldier => &["Dice set"],
            Background::Urchin => &["Disguise kit", "Thieves' tools"],
        }
    }

    pub fn all() -> &'static [Background] {
        &[
            Background::Acolyte,
            Background::Charlatan,
            Background::Criminal,
            Background::Entertainer,
            Background::FolkHero,
            Background::GuildArtisan,
            Background::Hermit,
            Background::Noble,
            Background::Outlander,
            Background::Sage,
            Background::Sailor,
            Background::Soldier,
            Background::Urchin,
        ]
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Languages a character may learn beyond their starting ones.
pub const STANDARD_LANGUAGES: &[&str] = &[
    "Common",
    "Dwarvish",
    "Elvish",
    "Giant",
    "Gnomish",
    "Goblin",
    "Halfling",
    "Orc",
    "Abyssal",
    "Celestial",
    "Draconic",
    "Deep Speech",
    "Infernal",
    "Primordial",
    "Sylvan",
    "Undercommon",
];
