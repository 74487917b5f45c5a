//! Choosing a slot for a spell and spending it.

use crate::character::{Character, Spellcasting};
use crate::rules::upcast;
use crate::spells::SpellData;
use thiserror::Error;

/// One way to pay for a spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOption {
    Cantrip,
    /// Cast as a ritual; spends nothing.
    Ritual,
    Pact { level: u8 },
    Slot { level: u8 },
}

impl CastOption {
    /// Effective casting level.
    pub fn level(&self, spell: &SpellData) -> u8 {
        match self {
            CastOption::Cantrip | CastOption::Ritual => spell.level,
            CastOption::Pact { level } | CastOption::Slot { level } => *level,
        }
    }

    /// Picker label including the pool's remaining uses and any upcast effect.
    pub fn describe(&self, casting: &Spellcasting, spell: &SpellData) -> String {
        let base = match self {
            CastOption::Cantrip => "Cast cantrip".to_string(),
            CastOption::Ritual => "Cast as ritual (no slot)".to_string(),
            CastOption::Pact { level } => {
                let left = casting.pact.as_ref().map(|p| p.available()).unwrap_or(0);
                format!("Pact slot, level {level} ({left} left)")
            }
            CastOption::Slot { level } => {
                format!("Level {level} slot ({} left)", casting.slots.available(*level))
            }
        };
        match upcast::upcast_text(spell, self.level(spell)) {
            Some(extra) => format!("{base} - {extra}"),
            None => base,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CastError {
    #[error("This character can't cast spells")]
    NotACaster,
    #[error("No slot left for {0}")]
    NoSlot(String),
    #[error("{0} can't be cast that way")]
    InvalidOption(String),
}

/// Result of a successful cast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastReport {
    pub spell: String,
    pub option: CastOption,
    pub level: u8,
    pub upcast: Option<String>,
    /// Spell whose concentration ended because of this cast.
    pub dropped_concentration: Option<String>,
}

impl CastReport {
    pub fn summary(&self) -> String {
        let mut text = match self.option {
            CastOption::Cantrip => format!("Cast {}", self.spell),
            CastOption::Ritual => format!("Cast {} as a ritual", self.spell),
            CastOption::Pact { level } => format!("Cast {} with a level {level} pact slot", self.spell),
            CastOption::Slot { level } => format!("Cast {} at level {level}", self.spell),
        };
        if let Some(extra) = &self.upcast {
            text.push_str(&format!(" ({extra})"));
        }
        if let Some(old) = &self.dropped_concentration {
            text.push_str(&format!("; stopped concentrating on {old}"));
        }
        text
    }
}

/// Ways to cast `spell` right now, in picker order.
///
/// A cantrip has the single cantrip option. Otherwise the pact slot comes
/// first when its level is high enough and a use remains, then every
/// regular level from the spell's level up to 9 with a slot left. A ritual
/// spell with none of those offers the ritual option alone.
pub fn cast_options(casting: &Spellcasting, spell: &SpellData) -> Vec<CastOption> {
    if spell.is_cantrip() {
        return vec![CastOption::Cantrip];
    }

    let mut options = Vec::new();
    if let Some(pact) = &casting.pact {
        if pact.level >= spell.level && pact.available() > 0 {
            options.push(CastOption::Pact { level: pact.level });
        }
    }
    for level in spell.level..=9 {
        if casting.slots.available(level) > 0 {
            options.push(CastOption::Slot { level });
        }
    }
    if options.is_empty() && spell.ritual {
        options.push(CastOption::Ritual);
    }
    options
}

/// The spell this cast would end concentration on, if any.
pub fn concentration_conflict<'a>(character: &'a Character, spell: &SpellData) -> Option<&'a str> {
    if !spell.concentration {
        return None;
    }
    character
        .concentration
        .as_deref()
        .filter(|current| !current.eq_ignore_ascii_case(&spell.name))
}

/// Spend the chosen pool and update concentration.
pub fn cast(character: &mut Character, spell: &SpellData, option: CastOption) -> Result<CastReport, CastError> {
    let casting = character
        .spellcasting
        .as_mut()
        .ok_or(CastError::NotACaster)?;

    match option {
        CastOption::Cantrip if spell.is_cantrip() => {}
        CastOption::Ritual if spell.ritual => {}
        CastOption::Pact { level } if level >= spell.level && !spell.is_cantrip() => {
            let spent = casting.pact.as_mut().map(|p| p.use_slot()).unwrap_or(false);
            if !spent {
                return Err(CastError::NoSlot(spell.name.clone()));
            }
        }
        CastOption::Slot { level } if level >= spell.level && !spell.is_cantrip() => {
            if !casting.slots.use_slot(level) {
                return Err(CastError::NoSlot(spell.name.clone()));
            }
        }
        _ => return Err(CastError::InvalidOption(spell.name.clone())),
    }

    let dropped_concentration = if spell.concentration {
        character
            .concentration
            .replace(spell.name.clone())
            .filter(|old| !old.eq_ignore_ascii_case(&spell.name))
    } else {
        None
    };

    let level = option.level(spell);
    Ok(CastReport {
        spell: spell.name.clone(),
        option,
        level,
        upcast: upcast::upcast_text(spell, level),
        dropped_concentration,
    })
}

pub fn end_concentration(character: &mut Character) -> Option<String> {
    character.concentration.take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Ability, PactMagic};
    use crate::spells::get_spell;

    fn wizard_casting() -> Spellcasting {
        let mut casting = Spellcasting::new(Ability::Intelligence);
        casting.slots.set_total(1, 2);
        casting.slots.set_total(2, 1);
        casting.slots.set_total(3, 1);
        casting
    }

    #[test]
    fn test_cantrip_has_single_option() {
        let casting = wizard_casting();
        let fire_bolt = get_spell("Fire Bolt").unwrap();
        assert_eq!(cast_options(&casting, fire_bolt), vec![CastOption::Cantrip]);
    }

    #[test]
    fn test_regular_levels_ascending() {
        let mut casting = wizard_casting();
        let missile = get_spell("Magic Missile").unwrap();
        assert_eq!(
            cast_options(&casting, missile),
            vec![
                CastOption::Slot { level: 1 },
                CastOption::Slot { level: 2 },
                CastOption::Slot { level: 3 },
            ]
        );

        // Levels with nothing left are skipped
        casting.slots.use_slot(2);
        assert_eq!(
            cast_options(&casting, missile),
            vec![CastOption::Slot { level: 1 }, CastOption::Slot { level: 3 }]
        );

        // Spells above the highest slot have no options
        let cone = get_spell("Cone of Cold").unwrap();
        assert!(cast_options(&casting, cone).is_empty());
    }

    #[test]
    fn test_pact_slot_first() {
        let mut casting = Spellcasting::new(Ability::Charisma);
        casting.pact = Some(PactMagic {
            level: 2,
            total: 2,
            used: 0,
        });
        casting.slots.set_total(1, 1);
        let hex = get_spell("Hex").unwrap();
        assert_eq!(
            cast_options(&casting, hex),
            vec![CastOption::Pact { level: 2 }, CastOption::Slot { level: 1 }]
        );

        // Pact level below the spell's level doesn't qualify
        let fireball = get_spell("Fireball").unwrap();
        assert!(cast_options(&casting, fireball).is_empty());
    }

    #[test]
    fn test_ritual_only_without_slot() {
        let mut casting = wizard_casting();
        let detect = get_spell("Detect Magic").unwrap();
        assert_eq!(cast_options(&casting, detect)[0], CastOption::Slot { level: 1 });

        // Higher slots still available: no free ritual at the default cursor
        casting.slots.use_slot(1);
        casting.slots.use_slot(1);
        assert_eq!(
            cast_options(&casting, detect),
            vec![CastOption::Slot { level: 2 }, CastOption::Slot { level: 3 }]
        );

        for level in 1..=9 {
            casting.slots.set_total(level, 0);
        }
        assert_eq!(cast_options(&casting, detect), vec![CastOption::Ritual]);

        // A usable pact slot also rules the ritual out
        casting.pact = Some(PactMagic {
            level: 1,
            total: 1,
            used: 0,
        });
        assert_eq!(cast_options(&casting, detect), vec![CastOption::Pact { level: 1 }]);

        // Non-ritual spells with nothing left have no options at all
        casting.pact = None;
        let missile = get_spell("Magic Missile").unwrap();
        assert!(cast_options(&casting, missile).is_empty());
    }

    #[test]
    fn test_cast_spends_and_tracks_concentration() {
        let mut character = Character::new("Caster");
        character.spellcasting = Some(wizard_casting());

        let detect = get_spell("Detect Magic").unwrap();
        let report = cast(&mut character, detect, CastOption::Slot { level: 1 }).unwrap();
        assert_eq!(report.dropped_concentration, None);
        assert_eq!(character.concentration.as_deref(), Some("Detect Magic"));
        assert_eq!(character.spellcasting.as_ref().unwrap().slots.available(1), 1);

        let hold = get_spell("Hold Person").unwrap();
        assert_eq!(concentration_conflict(&character, hold), Some("Detect Magic"));
        let report = cast(&mut character, hold, CastOption::Slot { level: 2 }).unwrap();
        assert_eq!(report.dropped_concentration.as_deref(), Some("Detect Magic"));
        assert_eq!(character.concentration.as_deref(), Some("Hold Person"));
    }

    #[test]
    fn test_cast_refuses_empty_pool() {
        let mut character = Character::new("Caster");
        character.spellcasting = Some(Spellcasting::new(Ability::Intelligence));
        let missile = get_spell("Magic Missile").unwrap();
        assert_eq!(
            cast(&mut character, missile, CastOption::Slot { level: 1 }),
            Err(CastError::NoSlot("Magic Missile".to_string()))
        );
        assert_eq!(
            cast(&mut character, missile, CastOption::Cantrip),
            Err(CastError::InvalidOption("Magic Missile".to_string()))
        );
    }

    #[test]
    fn test_upcast_in_report() {
        let mut character = Character::new("Caster");
        character.spellcasting = Some(wizard_casting());
        let missile = get_spell("Magic Missile").unwrap();
        let report = cast(&mut character, missile, CastOption::Slot { level: 3 }).unwrap();
        assert_eq!(report.upcast.as_deref(), Some("5 darts"));
        assert_eq!(report.summary(), "Cast Magic Missile at level 3 (5 darts)");
    }
}
