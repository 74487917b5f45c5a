//! QA tests for the character sheet engine.
//!
//! These exercise whole flows across the rules and persistence layers the
//! way the terminal screens drive them.
//! Run with: `cargo test -p charsheet-core --test qa_sheet_flow`

use charsheet_core::catalog::{Catalog, StaticCatalog};
use charsheet_core::character::{Condition, DeathSaveState};
use charsheet_core::inventory::{Denomination, EquipSlot};
use charsheet_core::rules::actions::{action_items, ActionItem, ActionTab};
use charsheet_core::rules::combat::{apply_damage, apply_healing, record_death_save, DamageOutcome};
use charsheet_core::rules::currency::spend;
use charsheet_core::rules::rest::{long_rest, short_rest};
use charsheet_core::rules::spellcasting::{cast, cast_options, CastOption};
use charsheet_core::rules::{armor_class, spell_attack_bonus, spell_save_dc};
use charsheet_core::testing::{sample_fighter, sample_warlock, sample_wizard};
use charsheet_core::{
    Background, CharacterBuilder, CharacterClass, CharacterStore, JsonCharacterStore, RaceType,
};
use tempfile::TempDir;

// =============================================================================
// Creation and persistence
// =============================================================================

#[test]
fn test_create_save_and_reload() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = JsonCharacterStore::open(temp_dir.path().join("characters"))
        .expect("Failed to open store");

    let character = CharacterBuilder::new()
        .name("Thorin Ironforge")
        .race(RaceType::Dwarf)
        .class(CharacterClass::Fighter)
        .background(Background::Soldier)
        .build()
        .expect("Failed to build character");

    let id = store.save(&character).expect("Failed to save");
    let summaries = store.list().expect("Failed to list");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "Thorin Ironforge");
    assert_eq!(summaries[0].class, "Fighter 1");

    let loaded = store.load(id).expect("Failed to load");
    assert_eq!(loaded, character);
}

#[test]
fn test_edits_survive_autosave() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = JsonCharacterStore::open(temp_dir.path()).expect("Failed to open store");

    let mut fighter = sample_fighter("Bruni");
    store.save(&fighter).unwrap();

    apply_damage(&mut fighter, 7);
    fighter.add_condition(Condition::Poisoned);
    fighter.set_exhaustion(2);
    store.autosave(&fighter).unwrap();

    let loaded = store.load(fighter.id).unwrap();
    assert_eq!(loaded.hit_points.current, 21);
    assert!(loaded.has_condition(Condition::Poisoned));
    assert_eq!(loaded.exhaustion_level(), 2);

    // Equipment references still resolve after a reload
    assert_eq!(armor_class(&loaded), 18);
}

// =============================================================================
// Combat
// =============================================================================

#[test]
fn test_fighter_goes_down_and_recovers() {
    let mut fighter = sample_fighter("Bruni");

    assert_eq!(
        apply_damage(&mut fighter, 30),
        DamageOutcome::DroppedToZero {
            absorbed: 0,
            taken: 28
        }
    );
    assert_eq!(
        apply_damage(&mut fighter, 5),
        DamageOutcome::DeathSaveFailure(DeathSaveState::Dying)
    );
    assert_eq!(record_death_save(&mut fighter, true), Some(DeathSaveState::Dying));
    assert_eq!(fighter.death_saves.failures, 1);

    apply_healing(&mut fighter, 10);
    assert_eq!(fighter.hit_points.current, 10);
    assert_eq!(fighter.death_saves.failures, 0);
    assert_eq!(fighter.death_saves.successes, 0);
    assert_eq!(record_death_save(&mut fighter, false), None);
}

#[test]
fn test_weapon_actions() {
    let fighter = sample_fighter("Bruni");
    let rows = action_items(&fighter, &StaticCatalog, ActionTab::Weapons);

    let ActionItem::Weapon { attack, equipped } = &rows[0] else {
        panic!("expected a weapon row");
    };
    assert!(equipped);
    assert_eq!(attack.name, "Longsword");
    // STR +3, proficiency +2
    assert_eq!(attack.attack_bonus, 5);
    assert_eq!(attack.damage_text(), "1d8+3 slashing");
}

// =============================================================================
// Spellcasting and rests
// =============================================================================

#[test]
fn test_wizard_casts_and_rests() {
    let mut wizard = sample_wizard("Elara");
    assert_eq!(spell_save_dc(&wizard), Some(13));
    assert_eq!(spell_attack_bonus(&wizard), Some(5));

    let missile = StaticCatalog.spell("Magic Missile").unwrap();
    let casting = wizard.spellcasting.as_ref().unwrap();
    assert_eq!(
        cast_options(casting, missile),
        vec![CastOption::Slot { level: 1 }, CastOption::Slot { level: 2 }]
    );

    let report = cast(&mut wizard, missile, CastOption::Slot { level: 2 }).unwrap();
    assert_eq!(report.upcast.as_deref(), Some("4 darts"));
    assert_eq!(wizard.spellcasting.as_ref().unwrap().slots.available(2), 1);

    let report = long_rest(&mut wizard);
    assert_eq!(report.hp_restored, 0);
    assert_eq!(wizard.spellcasting.as_ref().unwrap().slots.available(2), 2);
}

#[test]
fn test_warlock_pact_recovers_on_short_rest() {
    let mut warlock = sample_warlock("Vex");
    let hex = StaticCatalog.spell("Hex").unwrap();

    cast(&mut warlock, hex, CastOption::Pact { level: 1 }).unwrap();
    cast(&mut warlock, hex, CastOption::Pact { level: 1 }).unwrap();
    let casting = warlock.spellcasting.as_ref().unwrap();
    assert!(cast_options(casting, hex).is_empty());

    let report = short_rest(&mut warlock, 0);
    assert_eq!(report.pact_slots_restored, 2);
    let casting = warlock.spellcasting.as_ref().unwrap();
    assert_eq!(cast_options(casting, hex), vec![CastOption::Pact { level: 1 }]);
}

#[test]
fn test_short_rest_heals_fighter() {
    let mut fighter = sample_fighter("Bruni");
    apply_damage(&mut fighter, 10);

    // d10 averages 6, CON +2
    let report = short_rest(&mut fighter, 1);
    assert_eq!(report.hp_restored, 8);
    assert_eq!(fighter.hit_points.current, 26);
    assert_eq!(fighter.hit_dice.remaining, 2);
}

// =============================================================================
// Inventory and coin
// =============================================================================

#[test]
fn test_spend_breaks_gold() {
    let mut fighter = sample_fighter("Bruni");
    spend(&mut fighter.inventory.currency, Denomination::Silver, 3).unwrap();
    assert_eq!(fighter.inventory.currency.gp, 14);
    assert_eq!(fighter.inventory.currency.sp, 7);
}

#[test]
fn test_search_and_equip() {
    let mut fighter = sample_fighter("Bruni");
    let hits = StaticCatalog.search_items("plate");
    let plate = hits
        .iter()
        .find(|hit| hit.item.name == "Plate Armor")
        .expect("plate armor in catalog");

    let id = fighter.inventory.add(plate.item.instantiate());
    let replaced = fighter.inventory.equip(id, EquipSlot::Armor).unwrap();
    assert!(replaced.is_some());
    // Plate 18 + shield 2
    assert_eq!(armor_class(&fighter), 20);
}
