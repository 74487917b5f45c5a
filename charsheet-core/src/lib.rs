//! D&D 5e character sheet engine.
//!
//! This crate provides:
//! - The character record: abilities, skills, hit points, conditions,
//!   spellcasting, inventory and currency
//! - Rule calculations: modifiers, armor class, attacks, casting, upcasting,
//!   rests and coin change
//! - A read-only content catalog of items, spells, races and classes
//! - Character persistence behind the [`CharacterStore`] trait
//!
//! # Quick Start
//!
//! ```ignore
//! use charsheet_core::{CharacterBuilder, CharacterStore, JsonCharacterStore};
//! use charsheet_core::{Background, CharacterClass, RaceType};
//!
//! let store = JsonCharacterStore::open("characters")?;
//! let character = CharacterBuilder::new()
//!     .name("Thorin")
//!     .race(RaceType::Dwarf)
//!     .class(CharacterClass::Fighter)
//!     .background(Background::Soldier)
//!     .build()?;
//! store.save(&character)?;
//! ```

pub mod builder;
pub mod catalog;
pub mod character;
pub mod class_data;
pub mod dice;
pub mod inventory;
pub mod items;
pub mod origins;
pub mod persist;
pub mod rules;
pub mod spells;
pub mod testing;

// Primary public API
pub use builder::{BuildError, CharacterBuilder};
pub use catalog::{Catalog, StaticCatalog};
pub use character::{Character, CharacterClass, CharacterId};
pub use origins::{Background, RaceType};
pub use persist::{CharacterStore, CharacterSummary, JsonCharacterStore, PersistError};
pub use testing::MemoryStore;
