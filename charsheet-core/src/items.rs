//! Standard item database.
//!
//! Weapons, armor, adventuring gear and tools available for search and for
//! starting equipment. Entries are templates: call [`Item::instantiate`] to
//! get a copy with its own id.

use crate::inventory::{
    ArmorType, Item, ItemCategory, WeaponCategory, WeaponDamageType, WeaponProperty,
};

use WeaponCategory::*;
use WeaponDamageType::*;
use WeaponProperty::*;

/// Find a catalog entry by exact name (case-insensitive) across every category.
pub fn find_item(name: &str) -> Option<&'static Item> {
    let name_lower = name.to_lowercase();
    WEAPONS
        .iter()
        .chain(ARMOR.iter())
        .chain(GEAR.iter())
        .chain(TOOLS.iter())
        .find(|item| item.name.to_lowercase() == name_lower)
}

fn versatile(dice: &str) -> WeaponProperty {
    Versatile(dice.to_string())
}

// ============================================================================
// Weapons
// ============================================================================

lazy_static::lazy_static! {
    /// Standard weapons.
    pub static ref WEAPONS: Vec<Item> = vec![
        // Simple Melee Weapons
        Item::weapon("Club", "1d4", Bludgeoning, SimpleMelee)
            .with_weight(2.0)
            .with_value(0.1)
            .with_properties(vec![Light]),
        Item::weapon("Dagger", "1d4", Piercing, SimpleMelee)
            .with_weight(1.0)
            .with_value(2.0)
            .with_properties(vec![Finesse, Light, Thrown])
            .with_range(20, 60),
        Item::weapon("Handaxe", "1d6", Slashing, SimpleMelee)
            .with_weight(2.0)
            .with_value(5.0)
            .with_properties(vec![Light, Thrown])
            .with_range(20, 60),
        Item::weapon("Javelin", "1d6", Piercing, SimpleMelee)
            .with_weight(2.0)
            .with_value(0.5)
            .with_properties(vec![Thrown])
            .with_range(30, 120),
        Item::weapon("Mace", "1d6", Bludgeoning, SimpleMelee)
            .with_weight(4.0)
            .with_value(5.0),
        Item::weapon("Quarterstaff", "1d6", Bludgeoning, SimpleMelee)
            .with_weight(4.0)
            .with_value(0.2)
            .with_properties(vec![versatile("1d8")]),
        Item::weapon("Sickle", "1d4", Slashing, SimpleMelee)
            .with_weight(2.0)
            .with_value(1.0)
            .with_properties(vec![Light]),
        Item::weapon("Spear", "1d6", Piercing, SimpleMelee)
            .with_weight(3.0)
            .with_value(1.0)
            .with_properties(vec![Thrown, versatile("1d8")])
            .with_range(20, 60),

        // Simple Ranged Weapons
        Item::weapon("Light Crossbow", "1d8", Piercing, SimpleRanged)
            .with_weight(5.0)
            .with_value(25.0)
            .with_properties(vec![Ammunition, Loading, TwoHanded])
            .with_range(80, 320),
        Item::weapon("Dart", "1d4", Piercing, SimpleRanged)
            .with_weight(0.25)
            .with_value(0.05)
            .with_properties(vec![Finesse, Thrown])
            .with_range(20, 60),
        Item::weapon("Shortbow", "1d6", Piercing, SimpleRanged)
            .with_weight(2.0)
            .with_value(25.0)
            .with_properties(vec![Ammunition, TwoHanded])
            .with_range(80, 320),
        Item::weapon("Sling", "1d4", Bludgeoning, SimpleRanged)
            .with_value(0.1)
            .with_properties(vec![Ammunition])
            .with_range(30, 120),

        // Martial Melee Weapons
        Item::weapon("Battleaxe", "1d8", Slashing, MartialMelee)
            .with_weight(4.0)
            .with_value(10.0)
            .with_properties(vec![versatile("1d10")]),
        Item::weapon("Glaive", "1d10", Slashing, MartialMelee)
            .with_weight(6.0)
            .with_value(20.0)
            .with_properties(vec![Heavy, Reach, TwoHanded]),
        Item::weapon("Greataxe", "1d12", Slashing, MartialMelee)
            .with_weight(7.0)
            .with_value(30.0)
            .with_properties(vec![Heavy, TwoHanded]),
        Item::weapon("Greatsword", "2d6", Slashing, MartialMelee)
            .with_weight(6.0)
            .with_value(50.0)
            .with_properties(vec![Heavy, TwoHanded]),
        Item::weapon("Longsword", "1d8", Slashing, MartialMelee)
            .with_weight(3.0)
            .with_value(15.0)
            .with_properties(vec![versatile("1d10")]),
        Item::weapon("Maul", "2d6", Bludgeoning, MartialMelee)
            .with_weight(10.0)
            .with_value(10.0)
            .with_properties(vec![Heavy, TwoHanded]),
        Item::weapon("Rapier", "1d8", Piercing, MartialMelee)
            .with_weight(2.0)
            .with_value(25.0)
            .with_properties(vec![Finesse]),
        Item::weapon("Scimitar", "1d6", Slashing, MartialMelee)
            .with_weight(3.0)
            .with_value(25.0)
            .with_properties(vec![Finesse, Light]),
        Item::weapon("Shortsword", "1d6", Piercing, MartialMelee)
            .with_weight(2.0)
            .with_value(10.0)
            .with_properties(vec![Finesse, Light]),
        Item::weapon("Warhammer", "1d8", Bludgeoning, MartialMelee)
            .with_weight(2.0)
            .with_value(15.0)
            .with_properties(vec![versatile("1d10")]),
        Item::weapon("Whip", "1d4", Slashing, MartialMelee)
            .with_weight(3.0)
            .with_value(2.0)
            .with_properties(vec![Finesse, Reach]),
        Item::weapon("Longsword +1", "1d8", Slashing, MartialMelee)
            .with_weight(3.0)
            .with_value(500.0)
            .with_properties(vec![versatile("1d10")])
            .with_magic_bonus(1),

        // Martial Ranged Weapons
        Item::weapon("Hand Crossbow", "1d6", Piercing, MartialRanged)
            .with_weight(3.0)
            .with_value(75.0)
            .with_properties(vec![Ammunition, Light, Loading])
            .with_range(30, 120),
        Item::weapon("Heavy Crossbow", "1d10", Piercing, MartialRanged)
            .with_weight(18.0)
            .with_value(50.0)
            .with_properties(vec![Ammunition, Heavy, Loading, TwoHanded])
            .with_range(100, 400),
        Item::weapon("Longbow", "1d8", Piercing, MartialRanged)
            .with_weight(2.0)
            .with_value(50.0)
            .with_properties(vec![Ammunition, Heavy, TwoHanded])
            .with_range(150, 600),
    ];

    /// Standard armor and shields.
    pub static ref ARMOR: Vec<Item> = vec![
        // Light Armor
        Item::armor("Padded Armor", ArmorType::Light, 11)
            .with_weight(8.0)
            .with_value(5.0)
            .with_stealth_disadvantage(),
        Item::armor("Leather Armor", ArmorType::Light, 11)
            .with_weight(10.0)
            .with_value(10.0),
        Item::armor("Studded Leather", ArmorType::Light, 12)
            .with_weight(13.0)
            .with_value(45.0),

        // Medium Armor
        Item::armor("Hide Armor", ArmorType::Medium, 12)
            .with_weight(12.0)
            .with_value(10.0),
        Item::armor("Chain Shirt", ArmorType::Medium, 13)
            .with_weight(20.0)
            .with_value(50.0),
        Item::armor("Scale Mail", ArmorType::Medium, 14)
            .with_weight(45.0)
            .with_value(50.0)
            .with_stealth_disadvantage(),
        Item::armor("Breastplate", ArmorType::Medium, 14)
            .with_weight(20.0)
            .with_value(400.0),

        // Heavy Armor
        Item::armor("Ring Mail", ArmorType::Heavy, 14)
            .with_weight(40.0)
            .with_value(30.0)
            .with_stealth_disadvantage(),
        Item::armor("Chain Mail", ArmorType::Heavy, 16)
            .with_weight(55.0)
            .with_value(75.0)
            .with_strength_requirement(13)
            .with_stealth_disadvantage(),
        Item::armor("Plate Armor", ArmorType::Heavy, 18)
            .with_weight(65.0)
            .with_value(1500.0)
            .with_strength_requirement(15)
            .with_stealth_disadvantage(),

        Item::new("Shield", ItemCategory::Shield)
            .with_weight(6.0)
            .with_value(10.0)
            .with_description("+2 AC while wielded."),
    ];

    /// Adventuring gear, containers, consumables and wondrous items.
    pub static ref GEAR: Vec<Item> = vec![
        Item::new("Backpack", ItemCategory::Container)
            .with_weight(5.0)
            .with_value(2.0)
            .with_description("A leather pack for carrying gear."),
        Item::new("Pouch", ItemCategory::Container)
            .with_weight(1.0)
            .with_value(0.5),
        Item::new("Bag of Holding", ItemCategory::Container)
            .with_weight(15.0)
            .with_value(500.0)
            .with_description("Its interior is considerably larger than its outside dimensions."),
        Item::new("Bedroll", ItemCategory::Gear)
            .with_weight(7.0)
            .with_value(1.0),
        Item::new("Rope (50 feet)", ItemCategory::Gear)
            .with_weight(10.0)
            .with_value(1.0),
        Item::new("Torch", ItemCategory::Gear)
            .with_weight(1.0)
            .with_value(0.01),
        Item::new("Rations (1 day)", ItemCategory::Gear)
            .with_weight(2.0)
            .with_value(0.5),
        Item::new("Waterskin", ItemCategory::Gear)
            .with_weight(5.0)
            .with_value(0.2),
        Item::new("Tinderbox", ItemCategory::Gear)
            .with_weight(1.0)
            .with_value(0.5),
        Item::new("Lantern", ItemCategory::Gear)
            .with_weight(2.0)
            .with_value(5.0),
        Item::new("Crowbar", ItemCategory::Gear)
            .with_weight(5.0)
            .with_value(2.0),
        Item::new("Arrows (20)", ItemCategory::Gear)
            .with_weight(1.0)
            .with_value(1.0),
        Item::new("Crossbow Bolts (20)", ItemCategory::Gear)
            .with_weight(1.5)
            .with_value(1.0),
        Item::new("Component Pouch", ItemCategory::Gear)
            .with_weight(2.0)
            .with_value(25.0),
        Item::new("Spellbook", ItemCategory::Gear)
            .with_weight(3.0)
            .with_value(50.0),
        Item::new("Holy Symbol", ItemCategory::Gear)
            .with_weight(1.0)
            .with_value(5.0),
        Item::new("Explorer's Pack", ItemCategory::Gear)
            .with_weight(59.0)
            .with_value(10.0),
        Item::new("Dungeoneer's Pack", ItemCategory::Gear)
            .with_weight(61.5)
            .with_value(12.0),
        Item::new("Priest's Pack", ItemCategory::Gear)
            .with_weight(24.0)
            .with_value(19.0),
        Item::new("Scholar's Pack", ItemCategory::Gear)
            .with_weight(10.0)
            .with_value(40.0),
        Item::new("Burglar's Pack", ItemCategory::Gear)
            .with_weight(44.5)
            .with_value(16.0),
        Item::new("Potion of Healing", ItemCategory::Potion)
            .with_weight(0.5)
            .with_value(50.0)
            .with_description("Regain 2d4+2 hit points when you drink it."),
        Item::new("Potion of Greater Healing", ItemCategory::Potion)
            .with_weight(0.5)
            .with_value(150.0)
            .with_description("Regain 4d4+4 hit points when you drink it."),
        Item::new("Ring of Protection", ItemCategory::Wondrous)
            .with_value(3500.0)
            .with_description("+1 bonus to AC and saving throws.")
            .requiring_attunement(),
        Item::new("Cloak of Protection", ItemCategory::Wondrous)
            .with_weight(1.0)
            .with_value(3500.0)
            .with_description("+1 bonus to AC and saving throws.")
            .requiring_attunement(),
        Item::new("Amulet of Health", ItemCategory::Wondrous)
            .with_weight(1.0)
            .with_value(8000.0)
            .with_description("Your Constitution score is 19 while you wear this amulet.")
            .requiring_attunement(),
    ];

    /// Tools and instruments.
    pub static ref TOOLS: Vec<Item> = vec![
        Item::new("Thieves' Tools", ItemCategory::Tool)
            .with_weight(1.0)
            .with_value(25.0),
        Item::new("Herbalism Kit", ItemCategory::Tool)
            .with_weight(3.0)
            .with_value(5.0),
        Item::new("Healer's Kit", ItemCategory::Tool)
            .with_weight(3.0)
            .with_value(5.0),
        Item::new("Smith's Tools", ItemCategory::Tool)
            .with_weight(8.0)
            .with_value(20.0),
        Item::new("Carpenter's Tools", ItemCategory::Tool)
            .with_weight(6.0)
            .with_value(8.0),
        Item::new("Navigator's Tools", ItemCategory::Tool)
            .with_weight(2.0)
            .with_value(25.0),
        Item::new("Disguise Kit", ItemCategory::Tool)
            .with_weight(3.0)
            .with_value(25.0),
        Item::new("Forgery Kit", ItemCategory::Tool)
            .with_weight(5.0)
            .with_value(15.0),
        Item::new("Dice Set", ItemCategory::Tool)
            .with_value(0.1),
        Item::new("Playing Card Set", ItemCategory::Tool)
            .with_value(0.5),
        Item::new("Lute", ItemCategory::Tool)
            .with_weight(2.0)
            .with_value(35.0),
        Item::new("Flute", ItemCategory::Tool)
            .with_weight(1.0)
            .with_value(2.0),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_item_case_insensitive() {
        let sword = find_item("LONGSWORD").expect("Longsword should exist");
        assert_eq!(sword.name, "Longsword");
        assert_eq!(sword.category, ItemCategory::Weapon);

        assert!(find_item("shield").is_some());
        assert!(find_item("thieves' tools").is_some());
        assert!(find_item("vorpal sword").is_none());
    }

    #[test]
    fn test_weapon_stats() {
        let rapier = find_item("rapier").unwrap();
        let stats = rapier.weapon.as_ref().unwrap();
        assert!(stats.is_finesse());
        assert_eq!(stats.category, MartialMelee);

        let bow = find_item("longbow").unwrap();
        assert!(bow.weapon.as_ref().unwrap().category.is_ranged());
    }

    #[test]
    fn test_instantiate_gives_fresh_id() {
        let template = find_item("dagger").unwrap();
        let copy = template.instantiate();
        assert_ne!(copy.id, template.id);
        assert_eq!(copy.name, template.name);
    }
}
