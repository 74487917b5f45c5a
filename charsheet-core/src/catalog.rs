//! Static game content behind a trait.
//!
//! Screens only see [`Catalog`]; [`StaticCatalog`] serves the built-in item
//! and spell databases.

use crate::character::CharacterClass;
use crate::inventory::Item;
use crate::items;
use crate::origins::{Background, RaceType};
use crate::spells::{self, SpellData};

/// Queries shorter than this return nothing.
pub const MIN_QUERY_LEN: usize = 2;

/// Per-category cap on search results.
pub const MAX_RESULTS_PER_CATEGORY: usize = 10;

/// Which catalog list a search hit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemGroup {
    Weapons,
    Armor,
    Gear,
    Tools,
}

impl ItemGroup {
    pub fn label(&self) -> &'static str {
        match self {
            ItemGroup::Weapons => "Weapon",
            ItemGroup::Armor => "Armor",
            ItemGroup::Gear => "Gear",
            ItemGroup::Tools => "Tool",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub group: ItemGroup,
    pub item: Item,
}

/// Read-only access to game content.
pub trait Catalog: Send + Sync {
    fn weapons(&self) -> &[Item];
    fn armor(&self) -> &[Item];
    fn gear(&self) -> &[Item];
    fn tools(&self) -> &[Item];
    fn spell(&self, name: &str) -> Option<&SpellData>;
    fn spells_for_class(&self, class: CharacterClass) -> Vec<&SpellData>;
    fn races(&self) -> &[RaceType];
    fn backgrounds(&self) -> &[Background];
    fn classes(&self) -> &[CharacterClass];

    /// Case-insensitive substring search across item lists.
    ///
    /// Results are grouped weapons, armor, gear, tools, each capped at
    /// [`MAX_RESULTS_PER_CATEGORY`]. Queries shorter than [`MIN_QUERY_LEN`]
    /// characters return nothing.
    fn search_items(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let groups = [
            (ItemGroup::Weapons, self.weapons()),
            (ItemGroup::Armor, self.armor()),
            (ItemGroup::Gear, self.gear()),
            (ItemGroup::Tools, self.tools()),
        ];
        groups
            .into_iter()
            .flat_map(|(group, list)| {
                list.iter()
                    .filter(|item| item.name.to_lowercase().contains(&query))
                    .take(MAX_RESULTS_PER_CATEGORY)
                    .map(move |item| SearchHit {
                        group,
                        item: item.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Find an item template by exact name in any list.
    fn find_item(&self, name: &str) -> Option<&Item> {
        self.weapons()
            .iter()
            .chain(self.armor())
            .chain(self.gear())
            .chain(self.tools())
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }
}

/// Built-in SRD content.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCatalog;

impl Catalog for StaticCatalog {
    fn weapons(&self) -> &[Item] {
        &items::WEAPONS
    }

    fn armor(&self) -> &[Item] {
        &items::ARMOR
    }

    fn gear(&self) -> &[Item] {
        &items::GEAR
    }

    fn tools(&self) -> &[Item] {
        &items::TOOLS
    }

    fn spell(&self, name: &str) -> Option<&SpellData> {
        spells::get_spell(name)
    }

    fn spells_for_class(&self, class: CharacterClass) -> Vec<&SpellData> {
        spells::spells_for_class(class)
    }

    fn races(&self) -> &[RaceType] {
        RaceType::all()
    }

    fn backgrounds(&self) -> &[Background] {
        Background::all()
    }

    fn classes(&self) -> &[CharacterClass] {
        CharacterClass::all()
    }
}
