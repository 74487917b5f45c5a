//! The open character and the handles that travel with it.
//!
//! A `Session` moves from screen to screen as the user navigates; exactly
//! one screen owns it at a time.

use charsheet_core::{Catalog, Character, CharacterStore, PersistError};
use std::sync::Arc;

pub struct Session {
    pub character: Character,
    pub store: Arc<dyn CharacterStore>,
    pub catalog: Arc<dyn Catalog>,
}

impl Session {
    pub fn new(character: Character, store: Arc<dyn CharacterStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            character,
            store,
            catalog,
        }
    }

    /// Write the record after an in-place edit.
    pub fn autosave(&self) -> Result<(), PersistError> {
        self.store.autosave(&self.character).inspect_err(|e| {
            tracing::warn!(character = %self.character.name, error = %e, "Autosave failed");
        })
    }

    /// Full save at a save point.
    pub fn save(&self) -> Result<(), PersistError> {
        self.store
            .save(&self.character)
            .map(|_| ())
            .inspect_err(|e| {
                tracing::warn!(character = %self.character.name, error = %e, "Save failed");
            })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("character", &self.character.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_core::testing::sample_fighter;
    use charsheet_core::{MemoryStore, StaticCatalog};

    #[test]
    fn test_autosave_writes_and_reports_failure() {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::new(sample_fighter("Bruni"), store.clone(), Arc::new(StaticCatalog));

        session.character.hit_points.current = 9;
        session.autosave().unwrap();
        assert_eq!(store.get(session.character.id).unwrap().hit_points.current, 9);

        store.fail_writes(true);
        session.character.hit_points.current = 3;
        assert!(session.autosave().is_err());
        assert_eq!(store.get(session.character.id).unwrap().hit_points.current, 9);
    }
}
