//! Short descriptions of what casting a spell above its level adds.
//!
//! Spell text is free-form, so this is a keyword-driven rule table: the
//! first rule whose keyword appears in the "at higher levels" text and
//! which can produce a description wins.

use crate::dice::{find_dice_term, DiceExpression};
use crate::spells::SpellData;

/// One entry in the upcast rule table.
pub struct UpcastRule {
    pub name: &'static str,
    matches: fn(&str) -> bool,
    format: fn(&SpellData, &str, u32) -> Option<String>,
}

/// Rules in priority order. The last one always applies.
pub static RULES: &[UpcastRule] = &[
    UpcastRule {
        name: "darts",
        matches: |text| has_word(text, "dart"),
        format: |spell, text, extra| count_text(spell, text, extra, "dart"),
    },
    UpcastRule {
        name: "rays",
        matches: |text| has_word(text, "ray"),
        format: |spell, text, extra| count_text(spell, text, extra, "ray"),
    },
    UpcastRule {
        name: "beams",
        matches: |text| has_word(text, "beam"),
        format: |spell, text, extra| count_text(spell, text, extra, "beam"),
    },
    UpcastRule {
        name: "dice",
        matches: |text| find_dice_term(text).is_some(),
        format: dice_text,
    },
    UpcastRule {
        name: "fallback",
        matches: |_| true,
        format: |_, _, extra| Some(format!("+{extra} upcast")),
    },
];

/// Describe the effect of casting `spell` at `level`, or None when not upcast.
pub fn upcast_text(spell: &SpellData, level: u8) -> Option<String> {
    if spell.is_cantrip() || level <= spell.level {
        return None;
    }
    let extra = (level - spell.level) as u32;
    let text = spell.at_higher_levels.as_deref().unwrap_or_default();
    RULES
        .iter()
        .filter(|rule| (rule.matches)(text))
        .find_map(|rule| (rule.format)(spell, text, extra))
}

fn singular(word: &str) -> &str {
    word.strip_suffix('s').unwrap_or(word)
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_ascii_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn has_word(text: &str, keyword: &str) -> bool {
    words(text).iter().any(|w| singular(w) == keyword)
}

fn number_word(word: &str) -> Option<u32> {
    let value = match word {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        other => return other.parse().ok(),
    };
    Some(value)
}

/// A number within three words before the first occurrence of `keyword`.
fn count_before(text: &str, keyword: &str) -> Option<u32> {
    let words = words(text);
    let at = words.iter().position(|w| singular(w) == keyword)?;
    words[at.saturating_sub(3)..at]
        .iter()
        .rev()
        .find_map(|w| number_word(w))
}

fn count_text(spell: &SpellData, text: &str, extra: u32, keyword: &str) -> Option<String> {
    let per_level = count_before(text, keyword).unwrap_or(1);
    let added = per_level * extra;
    match count_before(&spell.description, keyword) {
        Some(base) => Some(format!("{} {keyword}s", base + added)),
        None => Some(format!("+{added} {keyword}{}", if added == 1 { "" } else { "s" })),
    }
}

fn dice_text(spell: &SpellData, text: &str, extra: u32) -> Option<String> {
    let term = find_dice_term(text)?;
    let steps = if text.to_lowercase().contains("every two") {
        extra / 2
    } else {
        extra
    };
    if steps == 0 {
        return None;
    }
    let added = term.count * steps;
    let base = spell
        .dice
        .as_deref()
        .and_then(|d| DiceExpression::parse(d).ok())
        .and_then(|expr| expr.components.first().cloned());
    match base {
        Some(base) if base.die_type == term.die_type => Some(format!(
            "+{added}{} ({}{} total)",
            term.die_type,
            base.count + added,
            term.die_type
        )),
        _ => Some(format!("+{added}{}", term.die_type)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spells::get_spell;

    fn upcast(name: &str, level: u8) -> Option<String> {
        upcast_text(get_spell(name).unwrap(), level)
    }

    #[test]
    fn test_not_upcast() {
        assert_eq!(upcast("Magic Missile", 1), None);
        assert_eq!(upcast("Fire Bolt", 3), None);
        assert_eq!(upcast("Fireball", 3), None);
    }

    #[test]
    fn test_darts() {
        assert_eq!(upcast("Magic Missile", 2).as_deref(), Some("4 darts"));
        assert_eq!(upcast("Magic Missile", 3).as_deref(), Some("5 darts"));
    }

    #[test]
    fn test_rays() {
        assert_eq!(upcast("Scorching Ray", 3).as_deref(), Some("4 rays"));
        assert_eq!(upcast("Scorching Ray", 5).as_deref(), Some("6 rays"));
    }

    #[test]
    fn test_dice() {
        assert_eq!(upcast("Fireball", 5).as_deref(), Some("+2d6 (10d6 total)"));
        assert_eq!(upcast("Cure Wounds", 2).as_deref(), Some("+1d8 (2d8 total)"));
        assert_eq!(upcast("Sleep", 2).as_deref(), Some("+2d8 (7d8 total)"));
    }

    #[test]
    fn test_every_two_levels() {
        // One level up isn't enough for another die
        assert_eq!(upcast("Spiritual Weapon", 3).as_deref(), Some("+1 upcast"));
        assert_eq!(
            upcast("Spiritual Weapon", 4).as_deref(),
            Some("+1d8 (2d8 total)")
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(upcast("Hold Person", 4).as_deref(), Some("+2 upcast"));
        assert_eq!(upcast("Shield", 2).as_deref(), Some("+1 upcast"));
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, ["darts", "rays", "beams", "dice", "fallback"]);
    }
}
