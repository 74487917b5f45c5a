//! Applying modal results to the open character.
//!
//! The character screens share one modal handler. A modal that closes with
//! `Confirm` has its purpose applied here; a successful edit autosaves.
//! Cancelled modals never touch the record.

use charsheet_core::character::{Character, DeathSaveState, MAX_EXHAUSTION};
use charsheet_core::rules::combat::{apply_damage, apply_healing, set_temporary_hp, DamageOutcome};
use charsheet_core::rules::currency;
use charsheet_core::Catalog;
use crossterm::event::KeyEvent;

use crate::modal::{CoinMode, ConfirmAction, Modal, ModalSignal, NumericPurpose, PickPurpose};
use crate::screens::{casting, ScreenOutcome, ScreenState};
use crate::session::Session;

/// Highest character level.
pub const MAX_LEVEL: u32 = 20;

/// Highest slot total accepted at one spell level.
pub const MAX_SLOT_TOTAL: u32 = 9;

/// Route a key to the top modal of a character screen.
pub fn handle_modal_key(state: &mut ScreenState, session: &mut Session, key: KeyEvent) -> ScreenOutcome {
    let Some(modal) = state.modals.pop() else {
        return ScreenOutcome::Continue;
    };

    match modal {
        Modal::NumericEntry(mut entry) => match entry.handle_key(key) {
            ModalSignal::Confirm => match entry.value() {
                Some(value) => match apply_numeric(&mut session.character, entry.purpose, value) {
                    Ok(message) => {
                        state.info(message);
                        state.persist(session);
                    }
                    Err(message) => state.error(message),
                },
                None => state.error("Enter a whole number"),
            },
            ModalSignal::Adjust(delta) => {
                if let Some(value) = adjust_numeric(&mut session.character, entry.purpose, delta) {
                    entry.set_value(value);
                    state.persist(session);
                }
                state.modals.restore(Modal::NumericEntry(entry));
            }
            ModalSignal::Cancel => {}
            ModalSignal::Stay | ModalSignal::Committed => {
                state.modals.restore(Modal::NumericEntry(entry));
            }
        },

        Modal::Confirmation(mut confirm) => {
            if confirm.handle_key(key) == ModalSignal::Confirm {
                apply_confirmation(state, session, confirm.action);
            }
        }

        Modal::ListPicker(mut picker) => match picker.handle_key(key) {
            ModalSignal::Confirm => {
                let chosen = picker.selection();
                if chosen.is_empty() {
                    state.error("Nothing selected");
                } else {
                    let catalog = session.catalog.clone();
                    match apply_pick(
                        &mut session.character,
                        catalog.as_ref(),
                        &picker.purpose,
                        &picker.options,
                        &chosen,
                    ) {
                        Ok(message) => {
                            state.info(message);
                            state.persist(session);
                        }
                        Err(message) => state.error(message),
                    }
                }
            }
            ModalSignal::Cancel => {}
            _ => state.modals.restore(Modal::ListPicker(picker)),
        },

        Modal::Search(mut search) => {
            let catalog = session.catalog.clone();
            match search.handle_key(key, catalog.as_ref()) {
                ModalSignal::Confirm => {
                    if let Some(hit) = search.selected() {
                        let item = hit.item.instantiate();
                        let name = item.name.clone();
                        session.character.inventory.add(item);
                        state.info(format!("Added {name}"));
                        state.persist(session);
                    }
                }
                ModalSignal::Cancel => {}
                _ => state.modals.restore(Modal::Search(search)),
            }
        }

        Modal::Cast(mut resolution) => match resolution.handle_key(key) {
            ModalSignal::Confirm => casting::confirm_cast(state, session, resolution),
            ModalSignal::Cancel => state.info("Casting cancelled"),
            _ => state.modals.restore(Modal::Cast(resolution)),
        },

        Modal::Rest(mut rest) => match rest.handle_key(key, &mut session.character) {
            ModalSignal::Committed => {
                tracing::info!(character = %session.character.name, "Rested");
                state.modals.restore(Modal::Rest(rest));
                state.persist(session);
            }
            ModalSignal::Cancel => {}
            _ => state.modals.restore(Modal::Rest(rest)),
        },

        Modal::Help(_) => {}
    }

    ScreenOutcome::Continue
}

fn apply_confirmation(state: &mut ScreenState, session: &mut Session, action: ConfirmAction) {
    let result = match &action {
        ConfirmAction::SwapConcentration(option) => {
            // The cast picker sits underneath the question.
            if let Some(Modal::Cast(resolution)) = state.modals.pop() {
                casting::perform_cast(state, session, &resolution.spell, *option);
            }
            return;
        }
        ConfirmAction::Quit | ConfirmAction::DeleteCharacter(_) => return,
        ConfirmAction::DeleteItem(id) => match session.character.inventory.remove(*id) {
            Some(item) => Ok(format!("Removed {}", item.name)),
            None => Err("That item is gone".to_string()),
        },
        ConfirmAction::ForgetSpell(name) => {
            let forgotten = session
                .character
                .spellcasting
                .as_mut()
                .map(|casting| casting.forget(name))
                .unwrap_or(false);
            if forgotten {
                Ok(format!("Forgot {name}"))
            } else {
                Err(format!("{name} isn't known"))
            }
        }
        ConfirmAction::RemoveLanguage(name) => {
            let languages = &mut session.character.languages;
            let before = languages.len();
            languages.retain(|l| l != name);
            if languages.len() < before {
                Ok(format!("Removed {name}"))
            } else {
                Err(format!("{name} isn't known"))
            }
        }
    };

    match result {
        Ok(message) => {
            state.info(message);
            if action.commits() {
                state.persist(session);
            }
        }
        Err(message) => state.error(message),
    }
}

/// Apply a confirmed numeric entry. Returns the status text.
pub fn apply_numeric(character: &mut Character, purpose: NumericPurpose, value: u32) -> Result<String, String> {
    let amount = i32::try_from(value).map_err(|_| "That number is too large".to_string())?;

    match purpose {
        NumericPurpose::Damage => Ok(match apply_damage(character, amount) {
            DamageOutcome::Damaged { absorbed, taken } if absorbed > 0 => {
                format!("Took {taken} damage ({absorbed} absorbed by temporary HP)")
            }
            DamageOutcome::Damaged { taken, .. } => format!("Took {taken} damage"),
            DamageOutcome::DroppedToZero { .. } => "Dropped to 0 HP".to_string(),
            DamageOutcome::DeathSaveFailure(DeathSaveState::Dead) => {
                "Damage at 0 HP: third failed death save".to_string()
            }
            DamageOutcome::DeathSaveFailure(_) => format!(
                "Damage at 0 HP: death save failure ({}/3)",
                character.death_saves.failures
            ),
        }),
        NumericPurpose::Heal => {
            let healed = apply_healing(character, amount);
            Ok(format!("Healed {healed} HP"))
        }
        NumericPurpose::TempHp => {
            set_temporary_hp(character, amount);
            Ok(format!("Temporary HP set to {amount}"))
        }
        NumericPurpose::Currency { denomination, mode } => {
            let purse = &mut character.inventory.currency;
            match mode {
                CoinMode::Add => {
                    purse.add(denomination, value);
                    Ok(format!("Added {value} {}", denomination.abbreviation()))
                }
                CoinMode::Spend => {
                    currency::spend(purse, denomination, value).map_err(|e| e.to_string())?;
                    Ok(format!("Spent {value} {}", denomination.abbreviation()))
                }
            }
        }
        NumericPurpose::Quantity { item } => {
            if value == 0 {
                return Err("Quantity must be at least 1".to_string());
            }
            let item = character
                .inventory
                .find_mut(item)
                .ok_or_else(|| "That item is gone".to_string())?;
            item.quantity = value;
            Ok(format!("{} x{value}", item.name))
        }
        NumericPurpose::Level => {
            if !(1..=MAX_LEVEL).contains(&value) {
                return Err(format!("Level must be between 1 and {MAX_LEVEL}"));
            }
            character.set_level(value as u8);
            Ok(format!("Level set to {value}"))
        }
        NumericPurpose::Experience => {
            character.experience = value;
            Ok(format!("Experience set to {value}"))
        }
        NumericPurpose::SlotTotal { level } => {
            if value > MAX_SLOT_TOTAL {
                return Err(format!("At most {MAX_SLOT_TOTAL} slots per level"));
            }
            let casting = character
                .spellcasting
                .as_mut()
                .ok_or_else(|| "No spell slots to set".to_string())?;
            casting.slots.set_total(level, value as u8);
            Ok(format!("Level {level} slots set to {value}"))
        }
    }
}

/// Apply an arrow press on an adjustable entry. Returns the new value.
pub fn adjust_numeric(character: &mut Character, purpose: NumericPurpose, delta: i32) -> Option<u32> {
    match purpose {
        NumericPurpose::Quantity { item } => {
            let item = character.inventory.find_mut(item)?;
            let value = (item.quantity as i64 + delta as i64).clamp(1, u32::MAX as i64) as u32;
            item.quantity = value;
            Some(value)
        }
        NumericPurpose::SlotTotal { level } => {
            let slots = &mut character.spellcasting.as_mut()?.slots;
            let total = slots.get(level)?.total as i32;
            let value = (total + delta).clamp(0, MAX_SLOT_TOTAL as i32) as u8;
            slots.set_total(level, value);
            Some(value as u32)
        }
        _ => None,
    }
}

/// Apply a confirmed picker selection. Returns the status text.
pub fn apply_pick(
    character: &mut Character,
    catalog: &dyn Catalog,
    purpose: &PickPurpose,
    options: &[String],
    chosen: &[usize],
) -> Result<String, String> {
    let first = *chosen.first().ok_or_else(|| "Nothing selected".to_string())?;

    match purpose {
        PickPurpose::EquipSlot { item, slots } => {
            let slot = *slots.get(first).ok_or_else(|| "No such slot".to_string())?;
            let inventory = &mut character.inventory;
            let name = inventory
                .find(*item)
                .map(|i| i.name.clone())
                .ok_or_else(|| "That item is gone".to_string())?;
            let replaced = inventory.equip(*item, slot).map_err(|e| e.to_string())?;
            Ok(match replaced.and_then(|id| inventory.find(id)) {
                Some(old) => format!("Equipped {name} ({slot}), stowed {}", old.name),
                None => format!("Equipped {name} ({slot})"),
            })
        }
        PickPurpose::LearnSpell => {
            let casting = character
                .spellcasting
                .as_mut()
                .ok_or_else(|| "This character can't learn spells".to_string())?;
            let mut learned = Vec::new();
            for name in chosen.iter().filter_map(|&i| options.get(i)) {
                if casting.knows(name) {
                    continue;
                }
                match catalog.spell(name) {
                    Some(spell) if spell.is_cantrip() => casting.cantrips.push(spell.name.clone()),
                    Some(spell) => casting.known.push(spell.name.clone()),
                    None => continue,
                }
                learned.push(name.as_str());
            }
            if learned.is_empty() {
                Err("Already known".to_string())
            } else {
                Ok(format!("Learned {}", learned.join(", ")))
            }
        }
        PickPurpose::AddLanguage => {
            let language = options.get(first).ok_or_else(|| "No such language".to_string())?;
            if character.languages.iter().any(|l| l == language) {
                return Err(format!("Already speaks {language}"));
            }
            character.languages.push(language.clone());
            Ok(format!("Learned {language}"))
        }
        PickPurpose::AddCondition(conditions) => {
            let condition = *conditions.get(first).ok_or_else(|| "No such condition".to_string())?;
            if character.add_condition(condition) {
                Ok(format!("{condition} added"))
            } else {
                Err(format!("Already {condition}"))
            }
        }
        PickPurpose::RemoveCondition(conditions) => {
            let condition = *conditions.get(first).ok_or_else(|| "No such condition".to_string())?;
            character.remove_condition(condition);
            Ok(format!("{condition} removed"))
        }
    }
}

/// Step exhaustion by one level within `[0, 6]`.
pub fn step_exhaustion(character: &mut Character, up: bool) -> Option<u8> {
    let level = character.exhaustion_level();
    let next = if up {
        (level < MAX_EXHAUSTION).then_some(level + 1)?
    } else {
        level.checked_sub(1)?
    };
    character.set_exhaustion(next);
    Some(next)
}
