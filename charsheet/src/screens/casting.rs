//! Casting from the actions panel and the spellbook.

use charsheet_core::rules::spellcasting::{cast, cast_options, concentration_conflict, CastOption};

use crate::modal::{CastResolution, ConfirmAction, Confirmation, Modal};
use crate::screens::ScreenState;
use crate::session::Session;

/// Start casting `spell_name`.
///
/// Opens the cast picker when there is a choice to make; a single option
/// resolves immediately. Nothing opens when no option is left.
pub fn begin_cast(state: &mut ScreenState, session: &mut Session, spell_name: &str) {
    let catalog = session.catalog.clone();
    let Some(spell) = catalog.spell(spell_name) else {
        state.error(format!("No details for {spell_name}"));
        return;
    };
    let Some(casting) = session.character.spellcasting.as_ref() else {
        state.error(format!("{} can't cast spells", session.character.name));
        return;
    };

    let options = cast_options(casting, spell);
    if options.is_empty() {
        state.error(format!("No slots left to cast {}", spell.name));
        return;
    }
    let labels = options
        .iter()
        .map(|option| option.describe(casting, spell))
        .collect();
    let resolution = CastResolution {
        spell: spell.name.clone(),
        options,
        labels,
        cursor: 0,
    };

    if resolution.options.len() == 1 {
        confirm_cast(state, session, resolution);
    } else {
        state.open(Modal::Cast(resolution));
    }
}

/// Enter on the cast picker. A concentration clash asks first and keeps the
/// picker underneath the question.
pub fn confirm_cast(state: &mut ScreenState, session: &mut Session, resolution: CastResolution) {
    let Some(option) = resolution.selected() else {
        state.error("Nothing to cast");
        return;
    };

    let catalog = session.catalog.clone();
    let Some(spell) = catalog.spell(&resolution.spell) else {
        state.error(format!("No details for {}", resolution.spell));
        return;
    };

    if let Some(current) = concentration_conflict(&session.character, spell) {
        let prompt = format!("Stop concentrating on {current} to cast {}?", spell.name);
        state.modals.restore(Modal::Cast(resolution));
        state.open(Modal::Confirmation(Confirmation::new(
            prompt,
            ConfirmAction::SwapConcentration(option),
        )));
        return;
    }

    perform_cast(state, session, &resolution.spell, option);
}

/// Spend the pool and report.
pub fn perform_cast(state: &mut ScreenState, session: &mut Session, spell_name: &str, option: CastOption) {
    let catalog = session.catalog.clone();
    let Some(spell) = catalog.spell(spell_name) else {
        state.error(format!("No details for {spell_name}"));
        return;
    };

    match cast(&mut session.character, spell, option) {
        Ok(report) => {
            tracing::info!(spell = %report.spell, level = report.level, "Cast spell");
            state.info(report.summary());
            state.persist(session);
        }
        Err(e) => state.error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_core::testing::{sample_fighter, sample_wizard};
    use charsheet_core::{MemoryStore, StaticCatalog};
    use std::sync::Arc;

    fn session(character: charsheet_core::Character) -> (Session, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with([character.clone()]));
        (Session::new(character, store.clone(), Arc::new(StaticCatalog)), store)
    }

    #[test]
    fn test_cantrip_casts_without_picker() {
        let (mut session, store) = session(sample_wizard("Elara"));
        let mut state = ScreenState::default();

        begin_cast(&mut state, &mut session, "Fire Bolt");
        assert!(!state.modals.is_active());
        assert_eq!(state.status.as_ref().unwrap().text, "Cast Fire Bolt");
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_leveled_spell_opens_picker() {
        let (mut session, _) = session(sample_wizard("Elara"));
        let mut state = ScreenState::default();

        begin_cast(&mut state, &mut session, "Magic Missile");
        let Some(Modal::Cast(cast)) = state.modals.top() else {
            panic!("expected the cast picker");
        };
        assert_eq!(cast.options.len(), 2);
        assert!(cast.labels[1].contains("4 darts"));
    }

    #[test]
    fn test_no_slots_refused() {
        let (mut session, store) = session(sample_wizard("Elara"));
        if let Some(casting) = session.character.spellcasting.as_mut() {
            casting.slots.set_total(1, 0);
            casting.slots.set_total(2, 0);
        }
        let mut state = ScreenState::default();

        begin_cast(&mut state, &mut session, "Magic Missile");
        assert!(!state.modals.is_active());
        assert!(state.status.as_ref().unwrap().is_error);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_non_caster_refused() {
        let (mut session, _) = session(sample_fighter("Bruni"));
        let mut state = ScreenState::default();
        begin_cast(&mut state, &mut session, "Fire Bolt");
        assert!(state.status.unwrap().text.contains("can't cast"));
    }

    #[test]
    fn test_concentration_clash_asks_over_picker() {
        let (mut session, _) = session(sample_wizard("Elara"));
        session.character.concentration = Some("Hold Person".to_string());
        if let Some(casting) = session.character.spellcasting.as_mut() {
            casting.slots.set_total(2, 0);
        }
        let mut state = ScreenState::default();

        // Only the level 1 slot qualifies, so the cast resolves straight to the question
        begin_cast(&mut state, &mut session, "Detect Magic");
        assert_eq!(state.modals.len(), 2);
        assert!(matches!(state.modals.top(), Some(Modal::Confirmation(_))));
        assert_eq!(
            session.character.spellcasting.as_ref().unwrap().slots.available(1),
            4
        );
    }
}
