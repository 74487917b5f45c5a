//! Character persistence.
//!
//! One pretty-printed JSON file per character, wrapped in a versioned
//! envelope whose metadata can be read without decoding the whole record.

use crate::character::{Character, CharacterId};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid save format")]
    InvalidFormat,

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("No saved character with id {0}")]
    NotFound(CharacterId),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Current save file version.
const SAVE_VERSION: u32 = 1;

/// What the selection screen shows for a saved character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: CharacterId,
    pub name: String,
    pub race: String,
    pub class: String,
    pub level: u8,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl CharacterSummary {
    pub fn of(character: &Character, saved_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id: character.id,
            name: character.name.clone(),
            race: character.race.name().to_string(),
            class: character.class_summary(),
            level: character.level,
            saved_at,
        }
    }

    /// Save time in local time, minute precision. Empty when unknown.
    pub fn saved_label(&self) -> String {
        self.saved_at
            .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Storage for character records.
///
/// Calls are synchronous; the terminal front end runs `list` and `load` on
/// a blocking worker and calls `autosave` inline after each committed edit.
pub trait CharacterStore: Send + Sync {
    fn list(&self) -> Result<Vec<CharacterSummary>, PersistError>;
    fn load(&self, id: CharacterId) -> Result<Character, PersistError>;
    fn save(&self, character: &Character) -> Result<CharacterId, PersistError>;
    fn delete(&self, id: CharacterId) -> Result<(), PersistError>;

    /// Persist after an in-place edit.
    fn autosave(&self, character: &Character) -> Result<(), PersistError> {
        self.save(character).map(|_| ())
    }
}

// ============================================================================
// Save Envelope
// ============================================================================

/// A saved character with its format version and summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCharacter {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub metadata: CharacterSummary,
    pub character: Character,
}

impl SavedCharacter {
    pub fn new(character: Character) -> Self {
        let saved_at = Utc::now();
        Self {
            version: SAVE_VERSION,
            metadata: CharacterSummary::of(&character, Some(saved_at)),
            saved_at,
            character,
        }
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        let path = path.as_ref();
        // Write then rename so a crash never leaves a half-written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path)?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// Read the summary without decoding the character.
    pub fn peek_metadata(path: impl AsRef<Path>) -> Result<CharacterSummary, PersistError> {
        let content = fs::read_to_string(path)?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: CharacterSummary,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

// ============================================================================
// JSON Directory Store
// ============================================================================

/// Stores each character as `<id>.json` inside one directory.
#[derive(Debug, Clone)]
pub struct JsonCharacterStore {
    dir: PathBuf,
}

impl JsonCharacterStore {
    /// Open a store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: CharacterId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl CharacterStore for JsonCharacterStore {
    fn list(&self) -> Result<Vec<CharacterSummary>, PersistError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match SavedCharacter::peek_metadata(&path) {
                    Ok(summary) => summaries.push(summary),
                    Err(e) => debug!(path = %path.display(), error = %e, "Skipping unreadable save"),
                }
            }
        }

        summaries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(summaries)
    }

    fn load(&self, id: CharacterId) -> Result<Character, PersistError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(PersistError::NotFound(id));
        }
        let saved = SavedCharacter::load_json(&path)?;
        if saved.character.id != id {
            return Err(PersistError::InvalidFormat);
        }
        info!(character = %saved.character.name, "Loaded character");
        Ok(saved.character)
    }

    fn save(&self, character: &Character) -> Result<CharacterId, PersistError> {
        let path = self.path_for(character.id);
        SavedCharacter::new(character.clone()).save_json(&path)?;
        info!(character = %character.name, path = %path.display(), "Saved character");
        Ok(character.id)
    }

    fn autosave(&self, character: &Character) -> Result<(), PersistError> {
        SavedCharacter::new(character.clone()).save_json(self.path_for(character.id))?;
        debug!(character = %character.name, "Autosaved");
        Ok(())
    }

    fn delete(&self, id: CharacterId) -> Result<(), PersistError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(PersistError::NotFound(id));
        }
        fs::remove_file(&path)?;
        info!(%id, "Deleted character");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonCharacterStore::open(temp_dir.path()).unwrap();

        let character = Character::new("Roundtrip");
        let id = store.save(&character).unwrap();
        assert_eq!(id, character.id);

        let loaded = store.load(id).unwrap();
        assert_eq!(loaded, character);
    }

    #[test]
    fn test_list_sorted_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonCharacterStore::open(temp_dir.path()).unwrap();

        for name in ["Zed", "alice", "Mira"] {
            store.save(&Character::new(name)).unwrap();
        }
        // Junk files are skipped
        fs::write(temp_dir.path().join("notes.json"), "not json").unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["alice", "Mira", "Zed"]);
    }

    #[test]
    fn test_peek_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("peek.json");

        let mut character = Character::new("Peeker");
        character.level = 4;
        SavedCharacter::new(character).save_json(&path).unwrap();

        let metadata = SavedCharacter::peek_metadata(&path).unwrap();
        assert_eq!(metadata.name, "Peeker");
        assert_eq!(metadata.level, 4);
        assert!(metadata.saved_at.is_some());
    }

    #[test]
    fn test_saved_label() {
        let character = Character::new("Stamped");
        assert_eq!(CharacterSummary::of(&character, None).saved_label(), "");

        let at = DateTime::parse_from_rfc3339("2025-10-09T08:53:20Z")
            .unwrap()
            .with_timezone(&Utc);
        let label = CharacterSummary::of(&character, Some(at)).saved_label();
        assert_eq!(label, at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string());
        assert_eq!(label.len(), 16);
        assert!(!label.contains("1760000000"));
    }

    #[test]
    fn test_version_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("old.json");

        let mut saved = SavedCharacter::new(Character::new("Old"));
        saved.version = 99;
        fs::write(&path, serde_json::to_string(&saved).unwrap()).unwrap();

        assert!(matches!(
            SavedCharacter::load_json(&path),
            Err(PersistError::VersionMismatch {
                expected: 1,
                found: 99
            })
        ));
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonCharacterStore::open(temp_dir.path()).unwrap();

        let id = store.save(&Character::new("Gone")).unwrap();
        store.delete(id).unwrap();
        assert!(matches!(store.load(id), Err(PersistError::NotFound(_))));
        assert!(matches!(store.delete(id), Err(PersistError::NotFound(_))));
    }
}
