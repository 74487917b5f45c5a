//! Short and long rest resolution.

use crate::character::{Ability, Character, RechargeType};
use crate::rules::combat;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortRestReport {
    pub dice_spent: u8,
    pub hp_restored: i32,
    pub features_restored: Vec<String>,
    pub pact_slots_restored: u8,
}

impl ShortRestReport {
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Spent {} hit {}, regained {} HP",
            self.dice_spent,
            if self.dice_spent == 1 { "die" } else { "dice" },
            self.hp_restored
        )];
        if self.pact_slots_restored > 0 {
            lines.push(format!("Recovered {} pact slot(s)", self.pact_slots_restored));
        }
        for name in &self.features_restored {
            lines.push(format!("{name} recharged"));
        }
        lines
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongRestReport {
    pub hp_restored: i32,
    pub hit_dice_recovered: u8,
    pub exhaustion: Option<u8>,
    pub features_restored: Vec<String>,
}

impl LongRestReport {
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Regained {} HP", self.hp_restored),
            format!("Recovered {} hit dice", self.hit_dice_recovered),
            "Spell slots restored".to_string(),
        ];
        if let Some(level) = self.exhaustion {
            lines.push(match level {
                0 => "No longer exhausted".to_string(),
                n => format!("Exhaustion reduced to {n}"),
            });
        }
        for name in &self.features_restored {
            lines.push(format!("{name} recharged"));
        }
        lines
    }
}

/// HP regained per hit die: `max(1, die average + CON modifier)`.
pub fn heal_per_hit_die(character: &Character) -> i32 {
    let con = character.ability_modifier(Ability::Constitution) as i32;
    (character.hit_dice.die.average() + con).max(1)
}

fn restore_features(character: &mut Character, recharges: &[RechargeType]) -> Vec<String> {
    character
        .features
        .iter_mut()
        .filter_map(|feature| {
            let uses = feature.uses.as_mut()?;
            if recharges.contains(&uses.recharge) && uses.current < uses.maximum {
                uses.current = uses.maximum;
                Some(feature.name.clone())
            } else {
                None
            }
        })
        .collect()
}

/// Spend up to `dice` hit dice, recharge short-rest features and pact slots.
pub fn short_rest(character: &mut Character, dice: u8) -> ShortRestReport {
    let dice_spent = character.hit_dice.spend(dice);
    let healing = heal_per_hit_die(character) * dice_spent as i32;
    let hp_restored = if dice_spent > 0 {
        combat::apply_healing(character, healing)
    } else {
        0
    };

    let features_restored = restore_features(character, &[RechargeType::ShortRest]);

    let pact_slots_restored = character
        .spellcasting
        .as_mut()
        .and_then(|casting| casting.pact.as_mut())
        .map(|pact| {
            let used = pact.used;
            pact.recover_all();
            used
        })
        .unwrap_or(0);

    ShortRestReport {
        dice_spent,
        hp_restored,
        features_restored,
        pact_slots_restored,
    }
}

/// Full heal, half hit dice back, all slots, one level of exhaustion off.
pub fn long_rest(character: &mut Character) -> LongRestReport {
    let hp_restored = character.hit_points.maximum - character.hit_points.current;
    character.hit_points.current = character.hit_points.maximum;
    character.death_saves.reset();

    let recover = (character.hit_dice.total / 2).max(1);
    let hit_dice_recovered = character.hit_dice.recover(recover);

    if let Some(casting) = character.spellcasting.as_mut() {
        casting.slots.recover_all();
        if let Some(pact) = casting.pact.as_mut() {
            pact.recover_all();
        }
    }

    let exhaustion = match character.exhaustion_level() {
        0 => None,
        level => {
            character.set_exhaustion(level - 1);
            Some(level - 1)
        }
    };

    let features_restored = restore_features(
        character,
        &[RechargeType::ShortRest, RechargeType::LongRest, RechargeType::Dawn],
    );

    LongRestReport {
        hp_restored: hp_restored.max(0),
        hit_dice_recovered,
        exhaustion,
        features_restored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Feature, FeatureUses, HitDice, HitPoints, PactMagic, Spellcasting};
    use crate::dice::DieType;

    fn fighter() -> Character {
        let mut character = Character::new("Rest Test");
        character.ability_scores.constitution = 14; // +2
        character.hit_points = HitPoints::new(30);
        character.hit_dice = HitDice::new(DieType::D10, 4);
        character.features.push(Feature {
            name: "Second Wind".to_string(),
            description: String::new(),
            source: "Fighter".to_string(),
            uses: Some(FeatureUses {
                current: 0,
                maximum: 1,
                recharge: RechargeType::ShortRest,
            }),
        });
        character.features.push(Feature {
            name: "Indomitable".to_string(),
            description: String::new(),
            source: "Fighter".to_string(),
            uses: Some(FeatureUses {
                current: 0,
                maximum: 1,
                recharge: RechargeType::LongRest,
            }),
        });
        character
    }

    #[test]
    fn test_short_rest_heals_average_plus_con() {
        let mut character = fighter();
        character.hit_points.current = 5;

        // d10 averages 6, +2 CON = 8 per die
        let report = short_rest(&mut character, 2);
        assert_eq!(report.dice_spent, 2);
        assert_eq!(report.hp_restored, 16);
        assert_eq!(character.hit_points.current, 21);
        assert_eq!(character.hit_dice.remaining, 2);
        assert_eq!(report.features_restored, vec!["Second Wind".to_string()]);

        // Long-rest features stay spent
        assert_eq!(character.features[1].uses.as_ref().unwrap().current, 0);
    }

    #[test]
    fn test_short_rest_bounds() {
        let mut character = fighter();
        character.hit_points.current = 28;

        let report = short_rest(&mut character, 9);
        assert_eq!(report.dice_spent, 4);
        assert_eq!(character.hit_points.current, 30);
        assert_eq!(report.hp_restored, 2);
        assert_eq!(character.hit_dice.remaining, 0);
    }

    #[test]
    fn test_heal_per_die_minimum_one() {
        let mut character = fighter();
        character.hit_dice = HitDice::new(DieType::D6, 1);
        character.ability_scores.constitution = 1; // -5
        assert_eq!(heal_per_hit_die(&character), 1);
    }

    #[test]
    fn test_short_rest_recovers_pact_slots() {
        let mut character = fighter();
        let mut casting = Spellcasting::new(Ability::Charisma);
        casting.slots.set_total(1, 2);
        casting.slots.use_slot(1);
        casting.pact = Some(PactMagic {
            level: 1,
            total: 1,
            used: 1,
        });
        character.spellcasting = Some(casting);

        let report = short_rest(&mut character, 0);
        assert_eq!(report.pact_slots_restored, 1);
        let casting = character.spellcasting.as_ref().unwrap();
        assert_eq!(casting.pact.as_ref().unwrap().used, 0);
        // Regular slots wait for a long rest
        assert_eq!(casting.slots.available(1), 1);
    }

    #[test]
    fn test_long_rest() {
        let mut character = fighter();
        character.hit_points.current = 3;
        character.hit_dice.remaining = 0;
        character.set_exhaustion(2);
        let mut casting = Spellcasting::new(Ability::Intelligence);
        casting.slots.set_total(1, 3);
        casting.slots.use_slot(1);
        character.spellcasting = Some(casting);

        let report = long_rest(&mut character);
        assert_eq!(report.hp_restored, 27);
        assert_eq!(character.hit_points.current, 30);
        assert_eq!(report.hit_dice_recovered, 2);
        assert_eq!(character.hit_dice.remaining, 2);
        assert_eq!(report.exhaustion, Some(1));
        assert_eq!(character.exhaustion_level(), 1);
        assert_eq!(
            character.spellcasting.as_ref().unwrap().slots.available(1),
            3
        );
        assert_eq!(report.features_restored.len(), 2);
    }

    #[test]
    fn test_long_rest_recovers_at_least_one_die() {
        let mut character = fighter();
        character.hit_dice = HitDice::new(DieType::D10, 1);
        character.hit_dice.remaining = 0;
        let report = long_rest(&mut character);
        assert_eq!(report.hit_dice_recovered, 1);

        // Never past the total
        let report = long_rest(&mut character);
        assert_eq!(report.hit_dice_recovered, 0);
        assert_eq!(character.hit_dice.remaining, 1);
    }

    #[test]
    fn test_long_rest_clears_last_exhaustion() {
        let mut character = fighter();
        character.set_exhaustion(1);
        let report = long_rest(&mut character);
        assert_eq!(report.exhaustion, Some(0));
        assert!(character.conditions.is_empty());
    }
}
