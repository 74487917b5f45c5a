//! Class data for character creation.
//!
//! Saving throws, skill options, proficiencies, ability priorities, starting
//! spells and equipment, and level 1 features for all 12 classes.

use crate::character::{
    Ability, CharacterClass, Feature, FeatureUses, RechargeType, Skill,
};

use Ability::*;

/// Class-specific data for character creation.
pub struct ClassData {
    /// Saving throw proficiencies granted by the class.
    pub saving_throws: [Ability; 2],
    /// Number of skills to choose.
    pub skill_count: usize,
    /// Skills available to choose from.
    pub skill_options: &'static [Skill],
    /// Highest score first, used when assigning the standard array.
    pub ability_priority: [Ability; 6],
    pub weapon_proficiencies: &'static [&'static str],
    pub armor_proficiencies: &'static [&'static str],
    /// Catalog item names handed out at level 1.
    pub starting_items: &'static [&'static str],
    pub cantrips: &'static [&'static str],
    pub spells: &'static [&'static str],
    pub level_1_features: Vec<Feature>,
}

fn feature(name: &str, source: CharacterClass, description: &str) -> Feature {
    Feature {
        name: name.to_string(),
        description: description.to_string(),
        source: source.name().to_string(),
        uses: None,
    }
}

fn limited(feature: Feature, maximum: u8, recharge: RechargeType) -> Feature {
    Feature {
        uses: Some(FeatureUses {
            current: maximum,
            maximum,
            recharge,
        }),
        ..feature
    }
}

const ALL_SKILLS: &[Skill] = &[
    Skill::Acrobatics,
    Skill::AnimalHandling,
    Skill::Arcana,
    Skill::Athletics,
    Skill::Deception,
    Skill::History,
    Skill::Insight,
    Skill::Intimidation,
    Skill::Investigation,
    Skill::Medicine,
    Skill::Nature,
    Skill::Perception,
    Skill::Performance,
    Skill::Persuasion,
    Skill::Religion,
    Skill::SleightOfHand,
    Skill::Stealth,
    Skill::Survival,
];

impl CharacterClass {
    /// Get class data for character creation.
    pub fn data(&self) -> ClassData {
        let class = *self;
        match self {
            CharacterClass::Barbarian => ClassData {
                saving_throws: [Strength, Constitution],
                skill_count: 2,
                skill_options: &[
                    Skill::AnimalHandling,
                    Skill::Athletics,
                    Skill::Intimidation,
                    Skill::Nature,
                    Skill::Perception,
                    Skill::Survival,
                ],
                ability_priority: [Strength, Constitution, Dexterity, Wisdom, Charisma, Intelligence],
                weapon_proficiencies: &["Simple weapons", "Martial weapons"],
                armor_proficiencies: &["Light armor", "Medium armor", "Shields"],
                starting_items: &["Greataxe", "Handaxe", "Explorer's Pack"],
                cantrips: &[],
                spells: &[],
                level_1_features: vec![
                    limited(
                        feature("Rage", class, "As a bonus action, enter a rage for bonus melee damage and resistance to bludgeoning, piercing and slashing damage."),
                        2,
                        RechargeType::LongRest,
                    ),
                    feature("Unarmored Defense", class, "Without armor, your AC equals 10 + DEX modifier + CON modifier."),
                ],
            },
            CharacterClass::Bard => ClassData {
                saving_throws: [Dexterity, Charisma],
                skill_count: 3,
                skill_options: ALL_SKILLS,
                ability_priority: [Charisma, Dexterity, Constitution, Wisdom, Intelligence, Strength],
                weapon_proficiencies: &["Simple weapons", "Hand crossbows", "Longswords", "Rapiers", "Shortswords"],
                armor_proficiencies: &["Light armor"],
                starting_items: &["Rapier", "Leather Armor", "Dagger", "Lute"],
                cantrips: &["Vicious Mockery", "Minor Illusion"],
                spells: &["Healing Word", "Charm Person", "Thunderwave", "Sleep"],
                level_1_features: vec![
                    limited(
                        feature("Bardic Inspiration", class, "As a bonus action, grant a creature a d6 to add to one ability check, attack roll or saving throw."),
                        3,
                        RechargeType::LongRest,
                    ),
                    feature("Spellcasting", class, "You cast bard spells using Charisma."),
                ],
            },
            CharacterClass::Cleric => ClassData {
                saving_throws: [Wisdom, Charisma],
                skill_count: 2,
                skill_options: &[
                    Skill::History,
                    Skill::Insight,
                    Skill::Medicine,
                    Skill::Persuasion,
                    Skill::Religion,
                ],
                ability_priority: [Wisdom, Constitution, Strength, Charisma, Dexterity, Intelligence],
                weapon_proficiencies: &["Simple weapons"],
                armor_proficiencies: &["Light armor", "Medium armor", "Shields"],
                starting_items: &["Mace", "Scale Mail", "Shield", "Priest's Pack"],
                cantrips: &["Sacred Flame", "Guidance", "Light"],
                spells: &["Cure Wounds", "Guiding Bolt", "Bless", "Healing Word"],
                level_1_features: vec![
                    feature("Spellcasting", class, "You cast cleric spells using Wisdom."),
                    feature("Divine Domain", class, "Your chosen domain grants additional spells and features."),
                ],
            },
            CharacterClass::Druid => ClassData {
                saving_throws: [Intelligence, Wisdom],
                skill_count: 2,
                skill_options: &[
                    Skill::Arcana,
                    Skill::AnimalHandling,
                    Skill::Insight,
                    Skill::Medicine,
                    Skill::Nature,
                    Skill::Perception,
                    Skill::Religion,
                    Skill::Survival,
                ],
                ability_priority: [Wisdom, Constitution, Dexterity, Intelligence, Charisma, Strength],
                weapon_proficiencies: &["Clubs", "Daggers", "Darts", "Javelins", "Maces", "Quarterstaffs", "Scimitars", "Sickles", "Slings", "Spears"],
                armor_proficiencies: &["Light armor", "Medium armor", "Shields"],
                starting_items: &["Scimitar", "Leather Armor", "Explorer's Pack", "Herbalism Kit"],
                cantrips: &["Produce Flame", "Guidance"],
                spells: &["Cure Wounds", "Faerie Fire", "Thunderwave", "Healing Word"],
                level_1_features: vec![
                    feature("Druidic", class, "You know Druidic, the secret language of druids."),
                    feature("Spellcasting", class, "You cast druid spells using Wisdom."),
                ],
            },
            CharacterClass::Fighter => ClassData {
                saving_throws: [Strength, Constitution],
                skill_count: 2,
                skill_options: &[
                    Skill::Acrobatics,
                    Skill::AnimalHandling,
                    Skill::Athletics,
                    Skill::History,
                    Skill::Insight,
                    Skill::Intimidation,
                    Skill::Perception,
                    Skill::Survival,
                ],
                ability_priority: [Strength, Constitution, Dexterity, Wisdom, Charisma, Intelligence],
                weapon_proficiencies: &["Simple weapons", "Martial weapons"],
                armor_proficiencies: &["All armor", "Shields"],
                starting_items: &["Longsword", "Chain Mail", "Shield", "Light Crossbow", "Dungeoneer's Pack"],
                cantrips: &[],
                spells: &[],
                level_1_features: vec![
                    feature("Fighting Style", class, "You adopt a particular style of fighting as your specialty."),
                    limited(
                        feature("Second Wind", class, "As a bonus action, regain hit points equal to 1d10 + your fighter level."),
                        1,
                        RechargeType::ShortRest,
                    ),
                ],
            },
            CharacterClass::Monk => ClassData {
                saving_throws: [Strength, Dexterity],
                skill_count: 2,
                skill_options: &[
                    Skill::Acrobatics,
                    Skill::Athletics,
                    Skill::History,
                    Skill::Insight,
                    Skill::Religion,
                    Skill::Stealth,
                ],
                ability_priority: [Dexterity, Wisdom, Constitution, Strength, Intelligence, Charisma],
                weapon_proficiencies: &["Simple weapons", "Shortswords"],
                armor_proficiencies: &[],
                starting_items: &["Shortsword", "Dart", "Explorer's Pack"],
                cantrips: &[],
                spells: &[],
                level_1_features: vec![
                    feature("Unarmored Defense", class, "Without armor or a shield, your AC equals 10 + DEX modifier + WIS modifier."),
                    feature("Martial Arts", class, "Unarmed strikes and monk weapons use DEX and deal a d4 martial arts die."),
                ],
            },
            CharacterClass::Paladin => ClassData {
                saving_throws: [Wisdom, Charisma],
                skill_count: 2,
                skill_options: &[
                    Skill::Athletics,
                    Skill::Insight,
                    Skill::Intimidation,
                    Skill::Medicine,
                    Skill::Persuasion,
                    Skill::Religion,
                ],
                ability_priority: [Strength, Charisma, Constitution, Wisdom, Dexterity, Intelligence],
                weapon_proficiencies: &["Simple weapons", "Martial weapons"],
                armor_proficiencies: &["All armor", "Shields"],
                starting_items: &["Longsword", "Shield", "Chain Mail", "Javelin", "Priest's Pack"],
                cantrips: &[],
                spells: &[],
                level_1_features: vec![
                    limited(
                        feature("Divine Sense", class, "As an action, detect celestials, fiends and undead within 60 feet."),
                        1,
                        RechargeType::LongRest,
                    ),
                    limited(
                        feature("Lay on Hands", class, "Restore hit points from a pool equal to five times your paladin level."),
                        5,
                        RechargeType::LongRest,
                    ),
                ],
            },
            CharacterClass::Ranger => ClassData {
                saving_throws: [Strength, Dexterity],
                skill_count: 3,
                skill_options: &[
                    Skill::AnimalHandling,
                    Skill::Athletics,
                    Skill::Insight,
                    Skill::Investigation,
                    Skill::Nature,
                    Skill::Perception,
                    Skill::Stealth,
                    Skill::Survival,
                ],
                ability_priority: [Dexterity, Wisdom, Constitution, Strength, Intelligence, Charisma],
                weapon_proficiencies: &["Simple weapons", "Martial weapons"],
                armor_proficiencies: &["Light armor", "Medium armor", "Shields"],
                starting_items: &["Longbow", "Shortsword", "Scale Mail", "Explorer's Pack"],
                cantrips: &[],
                spells: &[],
                level_1_features: vec![
                    feature("Favored Enemy", class, "You have advantage on checks to track and recall information about your favored enemies."),
                    feature("Natural Explorer", class, "You are particularly familiar with one type of natural environment."),
                ],
            },
            CharacterClass::Rogue => ClassData {
                saving_throws: [Dexterity, Intelligence],
                skill_count: 4,
                skill_options: &[
                    Skill::Acrobatics,
                    Skill::Athletics,
                    Skill::Deception,
                    Skill::Insight,
                    Skill::Intimidation,
                    Skill::Investigation,
                    Skill::Perception,
                    Skill::Performance,
                    Skill::Persuasion,
                    Skill::SleightOfHand,
                    Skill::Stealth,
                ],
                ability_priority: [Dexterity, Constitution, Intelligence, Wisdom, Charisma, Strength],
                weapon_proficiencies: &["Simple weapons", "Hand crossbows", "Longswords", "Rapiers", "Shortswords"],
                armor_proficiencies: &["Light armor"],
                starting_items: &["Rapier", "Shortbow", "Leather Armor", "Dagger", "Thieves' Tools", "Burglar's Pack"],
                cantrips: &[],
                spells: &[],
                level_1_features: vec![
                    feature("Sneak Attack", class, "Once per turn, deal an extra 1d6 damage to a creature you hit with advantage."),
                    feature("Thieves' Cant", class, "You know the secret mix of dialect, jargon and code used by thieves."),
                ],
            },
            CharacterClass::Sorcerer => ClassData {
                saving_throws: [Constitution, Charisma],
                skill_count: 2,
                skill_options: &[
                    Skill::Arcana,
                    Skill::Deception,
                    Skill::Insight,
                    Skill::Intimidation,
                    Skill::Persuasion,
                    Skill::Religion,
                ],
                ability_priority: [Charisma, Constitution, Dexterity, Wisdom, Intelligence, Strength],
                weapon_proficiencies: &["Daggers", "Darts", "Slings", "Quarterstaffs", "Light crossbows"],
                armor_proficiencies: &[],
                starting_items: &["Light Crossbow", "Dagger", "Component Pouch", "Dungeoneer's Pack"],
                cantrips: &["Fire Bolt", "Ray of Frost", "Light", "Mage Hand"],
                spells: &["Magic Missile", "Shield"],
                level_1_features: vec![
                    feature("Spellcasting", class, "You cast sorcerer spells using Charisma."),
                    feature("Sorcerous Origin", class, "Your innate magic comes from a draconic bloodline or wild magic."),
                ],
            },
            CharacterClass::Warlock => ClassData {
                saving_throws: [Wisdom, Charisma],
                skill_count: 2,
                skill_options: &[
                    Skill::Arcana,
                    Skill::Deception,
                    Skill::History,
                    Skill::Intimidation,
                    Skill::Investigation,
                    Skill::Nature,
                    Skill::Religion,
                ],
                ability_priority: [Charisma, Constitution, Dexterity, Wisdom, Intelligence, Strength],
                weapon_proficiencies: &["Simple weapons"],
                armor_proficiencies: &["Light armor"],
                starting_items: &["Light Crossbow", "Leather Armor", "Dagger", "Component Pouch", "Scholar's Pack"],
                cantrips: &["Eldritch Blast", "Minor Illusion"],
                spells: &["Hex", "Hellish Rebuke"],
                level_1_features: vec![
                    feature("Otherworldly Patron", class, "You have struck a bargain with an otherworldly being."),
                    feature("Pact Magic", class, "Your pact slots are all the same level and return after a short rest."),
                ],
            },
            CharacterClass::Wizard => ClassData {
                saving_throws: [Intelligence, Wisdom],
                skill_count: 2,
                skill_options: &[
                    Skill::Arcana,
                    Skill::History,
                    Skill::Insight,
                    Skill::Investigation,
                    Skill::Medicine,
                    Skill::Religion,
                ],
                ability_priority: [Intelligence, Constitution, Dexterity, Wisdom, Charisma, Strength],
                weapon_proficiencies: &["Daggers", "Darts", "Slings", "Quarterstaffs", "Light crossbows"],
                armor_proficiencies: &[],
                starting_items: &["Quarterstaff", "Component Pouch", "Spellbook", "Scholar's Pack"],
                cantrips: &["Fire Bolt", "Mage Hand", "Light"],
                spells: &["Magic Missile", "Shield", "Mage Armor", "Detect Magic", "Sleep", "Find Familiar"],
                level_1_features: vec![
                    feature("Spellcasting", class, "You cast wizard spells using Intelligence."),
                    limited(
                        feature("Arcane Recovery", class, "Once per day after a short rest, recover expended spell slots."),
                        1,
                        RechargeType::LongRest,
                    ),
                ],
            },
        }
    }
}
