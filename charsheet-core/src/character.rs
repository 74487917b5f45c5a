//! The character record.
//!
//! Contains every persisted piece of a character sheet: abilities,
//! proficiencies, health, class levels, features, spellcasting state,
//! personality and the inventory aggregate.

use crate::dice::DieType;
use crate::inventory::Inventory;
use crate::origins::{Background, RaceType};
use crate::rules;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ability scores container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        rules::ability_modifier(self.get(ability))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// D&D 5e skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Athletics,
    Acrobatics,
    SleightOfHand,
    Stealth,
    Arcana,
    History,
    Investigation,
    Nature,
    Religion,
    AnimalHandling,
    Insight,
    Medicine,
    Perception,
    Survival,
    Deception,
    Intimidation,
    Performance,
    Persuasion,
}

impl Skill {
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Athletics => "Athletics",
            Skill::Acrobatics => "Acrobatics",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Arcana => "Arcana",
            Skill::History => "History",
            Skill::Investigation => "Investigation",
            Skill::Nature => "Nature",
            Skill::Religion => "Religion",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Insight => "Insight",
            Skill::Medicine => "Medicine",
            Skill::Perception => "Perception",
            Skill::Survival => "Survival",
            Skill::Deception => "Deception",
            Skill::Intimidation => "Intimidation",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
        }
    }

    /// All skills in alphabetical display order.
    pub fn all() -> [Skill; 18] {
        [
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
        ]
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Proficiency level for skills/tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProficiencyLevel {
    #[default]
    None,
    Half,
    Proficient,
    Expertise,
}

impl ProficiencyLevel {
    pub fn bonus(&self, proficiency_bonus: i8) -> i8 {
        match self {
            ProficiencyLevel::None => 0,
            ProficiencyLevel::Half => proficiency_bonus / 2,
            ProficiencyLevel::Proficient => proficiency_bonus,
            ProficiencyLevel::Expertise => proficiency_bonus * 2,
        }
    }

    /// Next level when toggling from the sheet: none, proficient, expertise.
    pub fn cycle(&self) -> ProficiencyLevel {
        match self {
            ProficiencyLevel::None | ProficiencyLevel::Half => ProficiencyLevel::Proficient,
            ProficiencyLevel::Proficient => ProficiencyLevel::Expertise,
            ProficiencyLevel::Expertise => ProficiencyLevel::None,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            ProficiencyLevel::None => "[ ]",
            ProficiencyLevel::Half => "[~]",
            ProficiencyLevel::Proficient => "[*]",
            ProficiencyLevel::Expertise => "[E]",
        }
    }
}

// ============================================================================
// Conditions
// ============================================================================

/// D&D 5e conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Blinded,
    Charmed,
    Deafened,
    Frightened,
    Grappled,
    Incapacitated,
    Invisible,
    Paralyzed,
    Petrified,
    Poisoned,
    Prone,
    Restrained,
    Stunned,
    Unconscious,
    Exhaustion(u8),
}

/// Highest exhaustion level.
pub const MAX_EXHAUSTION: u8 = 6;

impl Condition {
    pub fn name(&self) -> &'static str {
        match self {
            Condition::Blinded => "Blinded",
            Condition::Charmed => "Charmed",
            Condition::Deafened => "Deafened",
            Condition::Frightened => "Frightened",
            Condition::Grappled => "Grappled",
            Condition::Incapacitated => "Incapacitated",
            Condition::Invisible => "Invisible",
            Condition::Paralyzed => "Paralyzed",
            Condition::Petrified => "Petrified",
            Condition::Poisoned => "Poisoned",
            Condition::Prone => "Prone",
            Condition::Restrained => "Restrained",
            Condition::Stunned => "Stunned",
            Condition::Unconscious => "Unconscious",
            Condition::Exhaustion(_) => "Exhaustion",
        }
    }

    /// Conditions that can be toggled from a picker. Exhaustion is tracked by level.
    pub fn toggleable() -> &'static [Condition] {
        &[
            Condition::Blinded,
            Condition::Charmed,
            Condition::Deafened,
            Condition::Frightened,
            Condition::Grappled,
            Condition::Incapacitated,
            Condition::Invisible,
            Condition::Paralyzed,
            Condition::Petrified,
            Condition::Poisoned,
            Condition::Prone,
            Condition::Restrained,
            Condition::Stunned,
            Condition::Unconscious,
        ]
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Exhaustion(level) => write!(f, "Exhaustion ({level})"),
            _ => write!(f, "{}", self.name()),
        }
    }
}

// ============================================================================
// Hit Points and Health
// ============================================================================

/// Hit points tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub maximum: i32,
    pub temporary: i32,
}

impl HitPoints {
    pub fn new(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
            temporary: 0,
        }
    }

    /// Apply damage, spending temporary hit points first. Current never drops below zero.
    pub fn take_damage(&mut self, amount: i32) -> DamageResult {
        let was_at_zero = self.current <= 0;
        let mut remaining = amount.max(0);

        let absorbed = self.temporary.min(remaining);
        self.temporary -= absorbed;
        remaining -= absorbed;

        self.current = (self.current - remaining).max(0);
        DamageResult {
            absorbed_by_temporary: absorbed,
            damage_taken: remaining,
            dropped_to_zero: !was_at_zero && self.current == 0,
        }
    }

    /// Heal up to maximum. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let old = self.current;
        self.current = (self.current + amount.max(0)).min(self.maximum);
        self.current - old
    }

    /// Replace temporary hit points.
    pub fn set_temporary(&mut self, amount: i32) {
        self.temporary = amount.max(0);
    }

    pub fn is_down(&self) -> bool {
        self.current <= 0
    }

    pub fn ratio(&self) -> f32 {
        if self.maximum <= 0 {
            return 0.0;
        }
        (self.current as f32 / self.maximum as f32).clamp(0.0, 1.0)
    }
}

/// Result of taking damage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageResult {
    pub absorbed_by_temporary: i32,
    pub damage_taken: i32,
    pub dropped_to_zero: bool,
}

/// Hit dice pool for a single die type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDice {
    pub die: DieType,
    pub total: u8,
    pub remaining: u8,
}

impl HitDice {
    pub fn new(die: DieType, total: u8) -> Self {
        Self {
            die,
            total,
            remaining: total,
        }
    }

    /// Spend up to `count` dice. Returns how many were actually spent.
    pub fn spend(&mut self, count: u8) -> u8 {
        let spent = count.min(self.remaining);
        self.remaining -= spent;
        spent
    }

    /// Recover up to `count` dice, bounded by the total. Returns how many came back.
    pub fn recover(&mut self, count: u8) -> u8 {
        let recovered = count.min(self.total - self.remaining.min(self.total));
        self.remaining += recovered;
        recovered
    }
}

impl Default for HitDice {
    fn default() -> Self {
        Self::new(DieType::D8, 1)
    }
}

/// Where a dying character stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathSaveState {
    Dying,
    Stabilized,
    Dead,
}

/// Death saving throws.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathSaves {
    pub successes: u8,
    pub failures: u8,
}

impl DeathSaves {
    pub fn state(&self) -> DeathSaveState {
        if self.failures >= 3 {
            DeathSaveState::Dead
        } else if self.successes >= 3 {
            DeathSaveState::Stabilized
        } else {
            DeathSaveState::Dying
        }
    }

    /// Record a success. No-op once stabilized or dead.
    pub fn add_success(&mut self) -> DeathSaveState {
        if self.state() == DeathSaveState::Dying {
            self.successes += 1;
        }
        self.state()
    }

    /// Record a failure. No-op once stabilized or dead.
    pub fn add_failure(&mut self) -> DeathSaveState {
        if self.state() == DeathSaveState::Dying {
            self.failures += 1;
        }
        self.state()
    }

    pub fn reset(&mut self) {
        self.successes = 0;
        self.failures = 0;
    }
}

// ============================================================================
// Classes and Features
// ============================================================================

/// D&D character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

impl CharacterClass {
    pub fn hit_die(&self) -> DieType {
        match self {
            CharacterClass::Barbarian => DieType::D12,
            CharacterClass::Fighter | CharacterClass::Paladin | CharacterClass::Ranger => {
                DieType::D10
            }
            CharacterClass::Bard
            | CharacterClass::Cleric
            | CharacterClass::Druid
            | CharacterClass::Monk
            | CharacterClass::Rogue
            | CharacterClass::Warlock => DieType::D8,
            CharacterClass::Sorcerer | CharacterClass::Wizard => DieType::D6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Bard => "Bard",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Druid => "Druid",
            CharacterClass::Fighter => "Fighter",
            CharacterClass::Monk => "Monk",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Sorcerer => "Sorcerer",
            CharacterClass::Warlock => "Warlock",
            CharacterClass::Wizard => "Wizard",
        }
    }

    /// Returns true if this class has spellcasting at level 1.
    pub fn is_spellcaster(&self) -> bool {
        matches!(
            self,
            CharacterClass::Bard
                | CharacterClass::Cleric
                | CharacterClass::Druid
                | CharacterClass::Sorcerer
                | CharacterClass::Warlock
                | CharacterClass::Wizard
        )
    }

    /// Returns the spellcasting ability for this class, if any.
    pub fn spellcasting_ability(&self) -> Option<Ability> {
        match self {
            CharacterClass::Bard
            | CharacterClass::Sorcerer
            | CharacterClass::Warlock
            | CharacterClass::Paladin => Some(Ability::Charisma),
            CharacterClass::Cleric | CharacterClass::Druid | CharacterClass::Ranger => {
                Some(Ability::Wisdom)
            }
            CharacterClass::Wizard => Some(Ability::Intelligence),
            _ => None,
        }
    }

    /// Classes that prepare a subset of their spells each day.
    pub fn prepares_spells(&self) -> bool {
        matches!(
            self,
            CharacterClass::Cleric
                | CharacterClass::Druid
                | CharacterClass::Paladin
                | CharacterClass::Wizard
        )
    }

    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Barbarian,
            CharacterClass::Bard,
            CharacterClass::Cleric,
            CharacterClass::Druid,
            CharacterClass::Fighter,
            CharacterClass::Monk,
            CharacterClass::Paladin,
            CharacterClass::Ranger,
            CharacterClass::Rogue,
            CharacterClass::Sorcerer,
            CharacterClass::Warlock,
            CharacterClass::Wizard,
        ]
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Class information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevel {
    pub class: CharacterClass,
    pub level: u8,
    pub subclass: Option<String>,
}

/// Class feature/ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub description: String,
    pub source: String,
    pub uses: Option<FeatureUses>,
}

/// Limited use tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureUses {
    pub current: u8,
    pub maximum: u8,
    pub recharge: RechargeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RechargeType {
    ShortRest,
    LongRest,
    Dawn,
}

impl RechargeType {
    pub fn label(&self) -> &'static str {
        match self {
            RechargeType::ShortRest => "short rest",
            RechargeType::LongRest => "long rest",
            RechargeType::Dawn => "dawn",
        }
    }
}

// ============================================================================
// Spellcasting
// ============================================================================

/// Spell slot tracking for the nine regular spell levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSlots {
    pub slots: [SlotInfo; 9],
}

impl SpellSlots {
    pub fn new() -> Self {
        Self {
            slots: [SlotInfo { total: 0, used: 0 }; 9],
        }
    }

    pub fn get(&self, level: u8) -> Option<&SlotInfo> {
        if (1..=9).contains(&level) {
            Some(&self.slots[level as usize - 1])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, level: u8) -> Option<&mut SlotInfo> {
        if (1..=9).contains(&level) {
            Some(&mut self.slots[level as usize - 1])
        } else {
            None
        }
    }

    pub fn available(&self, level: u8) -> u8 {
        self.get(level).map(|s| s.available()).unwrap_or(0)
    }

    pub fn use_slot(&mut self, level: u8) -> bool {
        match self.get_mut(level) {
            Some(slot) if slot.available() > 0 => {
                slot.used += 1;
                true
            }
            _ => false,
        }
    }

    /// Give back one used slot. Returns false if none were used.
    pub fn restore_slot(&mut self, level: u8) -> bool {
        match self.get_mut(level) {
            Some(slot) if slot.used > 0 => {
                slot.used -= 1;
                true
            }
            _ => false,
        }
    }

    /// Change the total at a level, keeping `used` within the new bound.
    pub fn set_total(&mut self, level: u8, total: u8) -> bool {
        match self.get_mut(level) {
            Some(slot) => {
                slot.total = total;
                slot.used = slot.used.min(total);
                true
            }
            None => false,
        }
    }

    pub fn recover_all(&mut self) {
        for slot in &mut self.slots {
            slot.used = 0;
        }
    }

    pub fn has_any(&self) -> bool {
        self.slots.iter().any(|s| s.total > 0)
    }
}

impl Default for SpellSlots {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInfo {
    pub total: u8,
    pub used: u8,
}

impl SlotInfo {
    pub fn available(&self) -> u8 {
        self.total.saturating_sub(self.used)
    }
}

/// Pact magic: a single-level pool that refreshes on a short rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PactMagic {
    pub level: u8,
    pub total: u8,
    pub used: u8,
}

impl PactMagic {
    /// The pact pool of a warlock at `level`.
    pub fn for_warlock_level(level: u8) -> Self {
        let total = match level {
            0..=1 => 1,
            2..=10 => 2,
            11..=16 => 3,
            _ => 4,
        };
        Self {
            level: level.div_ceil(2).clamp(1, 5),
            total,
            used: 0,
        }
    }

    /// Move to a new warlock level, keeping spent uses spent.
    pub fn set_warlock_level(&mut self, level: u8) {
        let used = self.used;
        *self = Self::for_warlock_level(level);
        self.used = used.min(self.total);
    }

    pub fn available(&self) -> u8 {
        self.total.saturating_sub(self.used)
    }

    pub fn use_slot(&mut self) -> bool {
        if self.available() > 0 {
            self.used += 1;
            true
        } else {
            false
        }
    }

    pub fn recover_all(&mut self) {
        self.used = 0;
    }
}

/// Spellcasting data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spellcasting {
    pub ability: Ability,
    pub cantrips: Vec<String>,
    pub known: Vec<String>,
    pub prepared: Vec<String>,
    pub slots: SpellSlots,
    #[serde(default)]
    pub pact: Option<PactMagic>,
}

impl Spellcasting {
    pub fn new(ability: Ability) -> Self {
        Self {
            ability,
            cantrips: Vec::new(),
            known: Vec::new(),
            prepared: Vec::new(),
            slots: SpellSlots::new(),
            pact: None,
        }
    }

    pub fn knows(&self, spell: &str) -> bool {
        self.cantrips
            .iter()
            .chain(self.known.iter())
            .any(|s| s.eq_ignore_ascii_case(spell))
    }

    pub fn is_prepared(&self, spell: &str) -> bool {
        self.prepared.iter().any(|s| s.eq_ignore_ascii_case(spell))
    }

    /// Toggle a spell's prepared flag. Returns the new state.
    pub fn toggle_prepared(&mut self, spell: &str) -> bool {
        if let Some(pos) = self
            .prepared
            .iter()
            .position(|s| s.eq_ignore_ascii_case(spell))
        {
            self.prepared.remove(pos);
            false
        } else {
            self.prepared.push(spell.to_string());
            true
        }
    }

    /// Remove a spell from every list. Returns true if anything was removed.
    pub fn forget(&mut self, spell: &str) -> bool {
        let before = self.cantrips.len() + self.known.len() + self.prepared.len();
        self.cantrips.retain(|s| !s.eq_ignore_ascii_case(spell));
        self.known.retain(|s| !s.eq_ignore_ascii_case(spell));
        self.prepared.retain(|s| !s.eq_ignore_ascii_case(spell));
        before != self.cantrips.len() + self.known.len() + self.prepared.len()
    }
}

// ============================================================================
// Personality
// ============================================================================

/// Free-text personality fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub traits: String,
    pub ideals: String,
    pub bonds: String,
    pub flaws: String,
    pub backstory: String,
    pub appearance: String,
    pub notes: String,
}

impl Personality {
    /// Label and text for each field in display order.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("Traits", &self.traits),
            ("Ideals", &self.ideals),
            ("Bonds", &self.bonds),
            ("Flaws", &self.flaws),
            ("Backstory", &self.backstory),
            ("Appearance", &self.appearance),
            ("Notes", &self.notes),
        ]
    }
}

// ============================================================================
// Character
// ============================================================================

/// Complete D&D 5e character record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub race: RaceType,
    pub background: Background,

    // Core stats
    pub ability_scores: AbilityScores,
    pub level: u8,
    pub experience: u32,
    pub classes: Vec<ClassLevel>,

    // Proficiencies
    pub saving_throw_proficiencies: HashSet<Ability>,
    pub skill_proficiencies: HashMap<Skill, ProficiencyLevel>,
    pub weapon_proficiencies: Vec<String>,
    pub armor_proficiencies: Vec<String>,
    pub tool_proficiencies: Vec<String>,
    pub languages: Vec<String>,

    // Health and combat
    pub hit_points: HitPoints,
    pub hit_dice: HitDice,
    pub death_saves: DeathSaves,
    /// Armor class used when no armor is equipped.
    pub base_armor_class: u8,
    pub speed: u32,
    pub conditions: Vec<Condition>,
    pub concentration: Option<String>,

    // Features and spellcasting
    pub features: Vec<Feature>,
    pub spellcasting: Option<Spellcasting>,

    // Equipment
    pub inventory: Inventory,

    pub personality: Personality,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            race: RaceType::Human,
            background: Background::Soldier,
            ability_scores: AbilityScores::default(),
            level: 1,
            experience: 0,
            classes: Vec::new(),
            saving_throw_proficiencies: HashSet::new(),
            skill_proficiencies: HashMap::new(),
            weapon_proficiencies: Vec::new(),
            armor_proficiencies: Vec::new(),
            tool_proficiencies: Vec::new(),
            languages: vec!["Common".to_string()],
            hit_points: HitPoints::new(10),
            hit_dice: HitDice::default(),
            death_saves: DeathSaves::default(),
            base_armor_class: 10,
            speed: 30,
            conditions: Vec::new(),
            concentration: None,
            features: Vec::new(),
            spellcasting: None,
            inventory: Inventory::default(),
            personality: Personality::default(),
        }
    }

    pub fn proficiency_bonus(&self) -> i8 {
        rules::proficiency_bonus(self.level)
    }

    pub fn ability_modifier(&self, ability: Ability) -> i8 {
        self.ability_scores.modifier(ability)
    }

    pub fn skill_proficiency(&self, skill: Skill) -> ProficiencyLevel {
        self.skill_proficiencies
            .get(&skill)
            .copied()
            .unwrap_or_default()
    }

    pub fn skill_modifier(&self, skill: Skill) -> i8 {
        rules::skill_modifier(self, skill)
    }

    pub fn saving_throw_modifier(&self, ability: Ability) -> i8 {
        rules::saving_throw_modifier(self, ability)
    }

    pub fn primary_class(&self) -> Option<CharacterClass> {
        self.classes.first().map(|c| c.class)
    }

    /// "Fighter 3 / Rogue 1" style summary.
    pub fn class_summary(&self) -> String {
        if self.classes.is_empty() {
            return format!("Level {}", self.level);
        }
        self.classes
            .iter()
            .map(|c| match &c.subclass {
                Some(sub) => format!("{} ({}) {}", c.class, sub, c.level),
                None => format!("{} {}", c.class, c.level),
            })
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Set total level.
    ///
    /// A single-class character's class level, hit dice and pact pool follow
    /// it. Gained levels add ready hit dice; lost levels drop them.
    pub fn set_level(&mut self, level: u8) {
        let previous = self.level;
        self.level = level;
        if self.classes.len() != 1 {
            return;
        }
        self.classes[0].level = level;

        let gained = level.saturating_sub(previous);
        self.hit_dice.total = level;
        self.hit_dice.remaining = self.hit_dice.remaining.saturating_add(gained).min(level);

        if self.classes[0].class == CharacterClass::Warlock {
            if let Some(pact) = self.spellcasting.as_mut().and_then(|c| c.pact.as_mut()) {
                pact.set_warlock_level(level);
            }
        }
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions
            .iter()
            .any(|c| std::mem::discriminant(c) == std::mem::discriminant(&condition))
    }

    /// Add a condition if not already present. Returns true if the condition was added.
    pub fn add_condition(&mut self, condition: Condition) -> bool {
        if self.has_condition(condition) {
            false
        } else {
            self.conditions.push(condition);
            true
        }
    }

    pub fn remove_condition(&mut self, condition: Condition) -> bool {
        let before = self.conditions.len();
        self.conditions
            .retain(|c| std::mem::discriminant(c) != std::mem::discriminant(&condition));
        before != self.conditions.len()
    }

    pub fn exhaustion_level(&self) -> u8 {
        self.conditions
            .iter()
            .find_map(|c| match c {
                Condition::Exhaustion(level) => Some(*level),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Set exhaustion, removing the condition entirely at zero.
    pub fn set_exhaustion(&mut self, level: u8) {
        let level = level.min(MAX_EXHAUSTION);
        self.conditions
            .retain(|c| !matches!(c, Condition::Exhaustion(_)));
        if level > 0 {
            self.conditions.push(Condition::Exhaustion(level));
        }
    }
}
