//! Spell database.
//!
//! Contains SRD spell definitions and lookup functions. Text fields carry
//! the rules wording the upcast formatter reads.

use crate::character::CharacterClass;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Schools of magic in D&D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellSchool {
    Abjuration,
    Conjuration,
    Divination,
    Enchantment,
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

impl SpellSchool {
    pub fn name(&self) -> &'static str {
        match self {
            SpellSchool::Abjuration => "Abjuration",
            SpellSchool::Conjuration => "Conjuration",
            SpellSchool::Divination => "Divination",
            SpellSchool::Enchantment => "Enchantment",
            SpellSchool::Evocation => "Evocation",
            SpellSchool::Illusion => "Illusion",
            SpellSchool::Necromancy => "Necromancy",
            SpellSchool::Transmutation => "Transmutation",
        }
    }
}

/// How long it takes to cast a spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastingTime {
    Action,
    BonusAction,
    Reaction,
    Minutes(u32),
}

impl CastingTime {
    pub fn description(&self) -> String {
        match self {
            CastingTime::Action => "1 action".to_string(),
            CastingTime::BonusAction => "1 bonus action".to_string(),
            CastingTime::Reaction => "1 reaction".to_string(),
            CastingTime::Minutes(m) => format!("{} minute{}", m, if *m == 1 { "" } else { "s" }),
        }
    }
}

/// Complete spell definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellData {
    pub name: String,
    /// 0 for cantrips.
    pub level: u8,
    pub school: SpellSchool,
    pub casting_time: CastingTime,
    pub range: String,
    pub duration: String,
    pub concentration: bool,
    pub ritual: bool,
    pub description: String,
    pub at_higher_levels: Option<String>,
    /// Base damage or healing dice shown in the actions list.
    pub dice: Option<String>,
    pub classes: Vec<CharacterClass>,
}

impl SpellData {
    fn new(name: &str, level: u8, school: SpellSchool, classes: &[CharacterClass]) -> Self {
        Self {
            name: name.to_string(),
            level,
            school,
            casting_time: CastingTime::Action,
            range: "Self".to_string(),
            duration: "Instantaneous".to_string(),
            concentration: false,
            ritual: false,
            description: String::new(),
            at_higher_levels: None,
            dice: None,
            classes: classes.to_vec(),
        }
    }

    fn casting_time(mut self, casting_time: CastingTime) -> Self {
        self.casting_time = casting_time;
        self
    }

    fn range(mut self, range: &str) -> Self {
        self.range = range.to_string();
        self
    }

    fn duration(mut self, duration: &str) -> Self {
        self.duration = duration.to_string();
        self
    }

    fn concentration(mut self) -> Self {
        self.concentration = true;
        self
    }

    fn ritual(mut self) -> Self {
        self.ritual = true;
        self
    }

    fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn higher(mut self, text: &str) -> Self {
        self.at_higher_levels = Some(text.to_string());
        self
    }

    fn dice(mut self, dice: &str) -> Self {
        self.dice = Some(dice.to_string());
        self
    }

    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    /// "Cantrip", "1st level", "2nd level" and so on.
    pub fn level_label(&self) -> String {
        level_label(self.level)
    }
}

/// Display label for a spell level.
pub fn level_label(level: u8) -> String {
    match level {
        0 => "Cantrip".to_string(),
        1 => "1st level".to_string(),
        2 => "2nd level".to_string(),
        3 => "3rd level".to_string(),
        n => format!("{n}th level"),
    }
}

// ============================================================================
// Spell Database
// ============================================================================

static SPELL_DATABASE: LazyLock<HashMap<String, SpellData>> = LazyLock::new(build_spell_database);

/// Look up a spell by name (case-insensitive).
pub fn get_spell(name: &str) -> Option<&'static SpellData> {
    SPELL_DATABASE.get(&name.to_lowercase())
}

/// All spells ordered by level, then name.
pub fn all_spells() -> Vec<&'static SpellData> {
    let mut spells: Vec<_> = SPELL_DATABASE.values().collect();
    spells.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
    spells
}

/// Spells on a class's list, ordered by level, then name.
pub fn spells_for_class(class: CharacterClass) -> Vec<&'static SpellData> {
    all_spells()
        .into_iter()
        .filter(|s| s.classes.contains(&class))
        .collect()
}

fn build_spell_database() -> HashMap<String, SpellData> {
    use CharacterClass::*;
    use SpellSchool::*;

    let spells = vec![
        // ====================================================================
        // CANTRIPS
        // ====================================================================
        SpellData::new("Fire Bolt", 0, Evocation, &[Sorcerer, Wizard])
            .range("120 feet")
            .dice("1d10")
            .describe("You hurl a mote of fire at a creature or object within range. On a hit, the target takes 1d10 fire damage."),
        SpellData::new("Eldritch Blast", 0, Evocation, &[Warlock])
            .range("120 feet")
            .dice("1d10")
            .describe("A beam of crackling energy streaks toward a creature within range. On a hit, the target takes 1d10 force damage."),
        SpellData::new("Sacred Flame", 0, Evocation, &[Cleric])
            .range("60 feet")
            .dice("1d8")
            .describe("Flame-like radiance descends on a creature you can see. It must succeed on a Dexterity saving throw or take 1d8 radiant damage."),
        SpellData::new("Ray of Frost", 0, Evocation, &[Sorcerer, Wizard])
            .range("60 feet")
            .dice("1d8")
            .describe("A frigid beam streaks toward a creature. On a hit, it takes 1d8 cold damage and its speed drops by 10 feet."),
        SpellData::new("Vicious Mockery", 0, Enchantment, &[Bard])
            .range("60 feet")
            .dice("1d4")
            .describe("You unleash a string of insults laced with subtle enchantments. The target takes 1d4 psychic damage on a failed Wisdom save."),
        SpellData::new("Produce Flame", 0, Conjuration, &[Druid])
            .duration("10 minutes")
            .dice("1d8")
            .describe("A flickering flame appears in your hand. You can hurl it at a creature for 1d8 fire damage."),
        SpellData::new("Guidance", 0, Divination, &[Cleric, Druid])
            .range("Touch")
            .duration("1 minute")
            .concentration()
            .describe("You touch a willing creature. Once before the spell ends, it can roll a d4 and add it to one ability check."),
        SpellData::new("Mage Hand", 0, Conjuration, &[Bard, Sorcerer, Warlock, Wizard])
            .range("30 feet")
            .duration("1 minute")
            .describe("A spectral, floating hand appears at a point you choose within range."),
        SpellData::new("Light", 0, Evocation, &[Bard, Cleric, Sorcerer, Wizard])
            .range("Touch")
            .duration("1 hour")
            .describe("You touch one object that is no larger than 10 feet. It sheds bright light in a 20-foot radius."),
        SpellData::new("Minor Illusion", 0, Illusion, &[Bard, Sorcerer, Warlock, Wizard])
            .range("30 feet")
            .duration("1 minute")
            .describe("You create a sound or an image of an object within range that lasts for the duration."),
        // ====================================================================
        // 1ST LEVEL
        // ====================================================================
        SpellData::new("Magic Missile", 1, Evocation, &[Sorcerer, Wizard])
            .range("120 feet")
            .dice("1d4+1")
            .describe("You create three glowing darts of magical force. Each dart hits a creature of your choice and deals 1d4+1 force damage.")
            .higher("The spell creates one more dart for each slot level above 1st."),
        SpellData::new("Cure Wounds", 1, Evocation, &[Bard, Cleric, Druid, Paladin, Ranger])
            .range("Touch")
            .dice("1d8")
            .describe("A creature you touch regains a number of hit points equal to 1d8 + your spellcasting ability modifier.")
            .higher("The healing increases by 1d8 for each slot level above 1st."),
        SpellData::new("Healing Word", 1, Evocation, &[Bard, Cleric, Druid])
            .casting_time(CastingTime::BonusAction)
            .range("60 feet")
            .dice("1d4")
            .describe("A creature of your choice that you can see regains hit points equal to 1d4 + your spellcasting ability modifier.")
            .higher("The healing increases by 1d4 for each slot level above 1st."),
        SpellData::new("Shield", 1, Abjuration, &[Sorcerer, Wizard])
            .casting_time(CastingTime::Reaction)
            .duration("1 round")
            .describe("An invisible barrier of magical force appears and protects you. You gain +5 to AC until the start of your next turn."),
        SpellData::new("Burning Hands", 1, Evocation, &[Sorcerer, Wizard])
            .range("Self (15-foot cone)")
            .dice("3d6")
            .describe("A thin sheet of flames shoots forth. Each creature in a 15-foot cone takes 3d6 fire damage on a failed Dexterity save.")
            .higher("The damage increases by 1d6 for each slot level above 1st."),
        SpellData::new("Thunderwave", 1, Evocation, &[Bard, Druid, Sorcerer, Wizard])
            .range("Self (15-foot cube)")
            .dice("2d8")
            .describe("A wave of thunderous force sweeps out from you. Each creature in a 15-foot cube takes 2d8 thunder damage and is pushed 10 feet.")
            .higher("The damage increases by 1d8 for each slot level above 1st."),
        SpellData::new("Guiding Bolt", 1, Evocation, &[Cleric])
            .range("120 feet")
            .duration("1 round")
            .dice("4d6")
            .describe("A flash of light streaks toward a creature. On a hit, the target takes 4d6 radiant damage.")
            .higher("The damage increases by 1d6 for each slot level above 1st."),
        SpellData::new("Mage Armor", 1, Abjuration, &[Sorcerer, Wizard])
            .range("Touch")
            .duration("8 hours")
            .describe("You touch a willing creature who isn't wearing armor. Its base AC becomes 13 + its Dexterity modifier."),
        SpellData::new("Sleep", 1, Enchantment, &[Bard, Sorcerer, Wizard])
            .range("90 feet")
            .duration("1 minute")
            .dice("5d8")
            .describe("This spell sends creatures into a magical slumber. Roll 5d8; the total is how many hit points of creatures this spell can affect.")
            .higher("Roll an additional 2d8 for each slot level above 1st."),
        SpellData::new("Hex", 1, Enchantment, &[Warlock])
            .casting_time(CastingTime::BonusAction)
            .range("90 feet")
            .duration("1 hour")
            .concentration()
            .dice("1d6")
            .describe("You place a curse on a creature. You deal an extra 1d6 necrotic damage to it whenever you hit it with an attack.")
            .higher("Using a slot of 3rd level or higher lets the curse last up to 8 hours."),
        SpellData::new("Hellish Rebuke", 1, Evocation, &[Warlock])
            .casting_time(CastingTime::Reaction)
            .range("60 feet")
            .dice("2d10")
            .describe("The creature that damaged you is surrounded by hellish flames and takes 2d10 fire damage on a failed Dexterity save.")
            .higher("The damage increases by 1d10 for each slot level above 1st."),
        SpellData::new("Armor of Agathys", 1, Abjuration, &[Warlock])
            .duration("1 hour")
            .describe("A protective magical force surrounds you. You gain 5 temporary hit points for the duration.")
            .higher("Both the temporary hit points and the cold damage increase by 5 for each slot level above 1st."),
        SpellData::new("Charm Person", 1, Enchantment, &[Bard, Druid, Sorcerer, Warlock, Wizard])
            .range("30 feet")
            .duration("1 hour")
            .describe("You attempt to charm a humanoid you can see within range. It must make a Wisdom saving throw.")
            .higher("You can target one additional creature for each slot level above 1st."),
        SpellData::new("Bless", 1, Enchantment, &[Cleric, Paladin])
            .range("30 feet")
            .duration("1 minute")
            .concentration()
            .describe("You bless up to three creatures. Whenever a target makes an attack roll or saving throw, it adds a d4.")
            .higher("You can target one additional creature for each slot level above 1st."),
        SpellData::new("Faerie Fire", 1, Evocation, &[Bard, Druid])
            .range("60 feet")
            .duration("1 minute")
            .concentration()
            .describe("Each object in a 20-foot cube is outlined in light. Attacks against affected creatures have advantage."),
        SpellData::new("Hunter's Mark", 1, Divination, &[Ranger])
            .casting_time(CastingTime::BonusAction)
            .range("90 feet")
            .duration("1 hour")
            .concentration()
            .dice("1d6")
            .describe("You choose a creature you can see and mystically mark it as your quarry. You deal an extra 1d6 damage to it when you hit."),
        SpellData::new("Detect Magic", 1, Divination, &[Bard, Cleric, Druid, Paladin, Ranger, Sorcerer, Wizard])
            .duration("10 minutes")
            .concentration()
            .ritual()
            .describe("For the duration, you sense the presence of magic within 30 feet of you."),
        SpellData::new("Identify", 1, Divination, &[Bard, Wizard])
            .casting_time(CastingTime::Minutes(1))
            .range("Touch")
            .ritual()
            .describe("You choose one object that you must touch throughout the casting. You learn its properties and how to use them."),
        SpellData::new("Find Familiar", 1, Conjuration, &[Wizard])
            .casting_time(CastingTime::Minutes(60))
            .range("10 feet")
            .ritual()
            .describe("You gain the service of a familiar, a spirit that takes an animal form you choose."),
        // ====================================================================
        // 2ND LEVEL
        // ====================================================================
        SpellData::new("Scorching Ray", 2, Evocation, &[Sorcerer, Wizard])
            .range("120 feet")
            .dice("2d6")
            .describe("You create three rays of fire and hurl them at targets within range. Each ray deals 2d6 fire damage on a hit.")
            .higher("You create one additional ray for each slot level above 2nd."),
        SpellData::new("Hold Person", 2, Enchantment, &[Bard, Cleric, Druid, Sorcerer, Warlock, Wizard])
            .range("60 feet")
            .duration("1 minute")
            .concentration()
            .describe("Choose a humanoid that you can see within range. It must succeed on a Wisdom saving throw or be paralyzed.")
            .higher("You can target one additional humanoid for each slot level above 2nd."),
        SpellData::new("Misty Step", 2, Conjuration, &[Sorcerer, Warlock, Wizard])
            .casting_time(CastingTime::BonusAction)
            .describe("Briefly surrounded by silvery mist, you teleport up to 30 feet to an unoccupied space that you can see."),
        SpellData::new("Spiritual Weapon", 2, Evocation, &[Cleric])
            .casting_time(CastingTime::BonusAction)
            .range("60 feet")
            .duration("1 minute")
            .dice("1d8")
            .describe("You create a floating, spectral weapon that deals 1d8 + your spellcasting ability modifier force damage on a hit.")
            .higher("The damage increases by 1d8 for every two slot levels above 2nd."),
        SpellData::new("Shatter", 2, Evocation, &[Bard, Sorcerer, Warlock, Wizard])
            .range("60 feet")
            .dice("3d8")
            .describe("A sudden loud ringing noise erupts from a point of your choice. Each creature in a 10-foot sphere takes 3d8 thunder damage.")
            .higher("The damage increases by 1d8 for each slot level above 2nd."),
        SpellData::new("Invisibility", 2, Illusion, &[Bard, Sorcerer, Warlock, Wizard])
            .range("Touch")
            .duration("1 hour")
            .concentration()
            .describe("A creature you touch becomes invisible until the spell ends.")
            .higher("You can target one additional creature for each slot level above 2nd."),
        SpellData::new("Augury", 2, Divination, &[Cleric])
            .casting_time(CastingTime::Minutes(1))
            .ritual()
            .describe("By casting gem-inlaid sticks or similar, you receive an omen about a specific course of action in the next 30 minutes."),
        // ====================================================================
        // 3RD LEVEL
        // ====================================================================
        SpellData::new("Fireball", 3, Evocation, &[Sorcerer, Wizard])
            .range("150 feet")
            .dice("8d6")
            .describe("A bright streak blossoms into an explosion of flame. Each creature in a 20-foot sphere takes 8d6 fire damage on a failed Dexterity save.")
            .higher("The damage increases by 1d6 for each slot level above 3rd."),
        SpellData::new("Lightning Bolt", 3, Evocation, &[Sorcerer, Wizard])
            .range("Self (100-foot line)")
            .dice("8d6")
            .describe("A stroke of lightning forms a line 100 feet long. Each creature in the line takes 8d6 lightning damage on a failed Dexterity save.")
            .higher("The damage increases by 1d6 for each slot level above 3rd."),
        SpellData::new("Counterspell", 3, Abjuration, &[Sorcerer, Warlock, Wizard])
            .casting_time(CastingTime::Reaction)
            .range("60 feet")
            .describe("You attempt to interrupt a creature in the process of casting a spell of 3rd level or lower.")
            .higher("The interrupted spell's level can be up to the level of the slot you use."),
        SpellData::new("Dispel Magic", 3, Abjuration, &[Bard, Cleric, Druid, Paladin, Sorcerer, Warlock, Wizard])
            .range("120 feet")
            .describe("Choose one creature, object, or magical effect within range. Any spell of 3rd level or lower on the target ends."),
        SpellData::new("Spirit Guardians", 3, Conjuration, &[Cleric])
            .range("Self (15-foot radius)")
            .duration("10 minutes")
            .concentration()
            .dice("3d8")
            .describe("You call forth spirits to protect you. A creature that enters the area takes 3d8 radiant or necrotic damage on a failed Wisdom save.")
            .higher("The damage increases by 1d8 for each slot level above 3rd."),
        SpellData::new("Revivify", 3, Necromancy, &[Cleric, Paladin])
            .range("Touch")
            .describe("You touch a creature that has died within the last minute. That creature returns to life with 1 hit point."),
        SpellData::new("Hypnotic Pattern", 3, Illusion, &[Bard, Sorcerer, Warlock, Wizard])
            .range("120 feet")
            .duration("1 minute")
            .concentration()
            .describe("You create a twisting pattern of colors in a 30-foot cube. Each creature that sees it must make a Wisdom save or be charmed."),
        // ====================================================================
        // 4TH AND 5TH LEVEL
        // ====================================================================
        SpellData::new("Dimension Door", 4, Conjuration, &[Bard, Sorcerer, Warlock, Wizard])
            .range("500 feet")
            .describe("You teleport yourself from your current location to any other spot within range."),
        SpellData::new("Polymorph", 4, Transmutation, &[Bard, Druid, Sorcerer, Wizard])
            .range("60 feet")
            .duration("1 hour")
            .concentration()
            .describe("This spell transforms a creature that you can see within range into a new form."),
        SpellData::new("Cone of Cold", 5, Evocation, &[Sorcerer, Wizard])
            .range("Self (60-foot cone)")
            .dice("8d8")
            .describe("A blast of cold air erupts from your hands. Each creature in a 60-foot cone takes 8d8 cold damage on a failed Constitution save.")
            .higher("The damage increases by 1d8 for each slot level above 5th."),
    ];

    spells
        .into_iter()
        .map(|spell| (spell.name.to_lowercase(), spell))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_spell() {
        let fireball = get_spell("fireball").expect("Fireball should exist");
        assert_eq!(fireball.name, "Fireball");
        assert_eq!(fireball.level, 3);
        assert_eq!(fireball.school, SpellSchool::Evocation);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert!(get_spell("MAGIC MISSILE").is_some());
        assert!(get_spell("Magic Missile").is_some());
        assert!(get_spell("magic missile").is_some());
    }

    #[test]
    fn test_rituals_and_concentration() {
        let detect = get_spell("detect magic").expect("Detect Magic should exist");
        assert!(detect.ritual);
        assert!(detect.concentration);

        let fireball = get_spell("fireball").expect("Fireball should exist");
        assert!(!fireball.ritual);
        assert!(!fireball.concentration);
    }

    #[test]
    fn test_spells_for_class() {
        let wizard_spells = spells_for_class(CharacterClass::Wizard);
        assert!(wizard_spells.iter().any(|s| s.name == "Fire Bolt"));
        assert!(!wizard_spells.iter().any(|s| s.name == "Eldritch Blast"));

        // Ordered by level
        let levels: Vec<u8> = wizard_spells.iter().map(|s| s.level).collect();
        let mut sorted = levels.clone();
        sorted.sort();
        assert_eq!(levels, sorted);
    }

    #[test]
    fn test_level_label() {
        assert_eq!(level_label(0), "Cantrip");
        assert_eq!(level_label(2), "2nd level");
        assert_eq!(level_label(9), "9th level");
    }
}
