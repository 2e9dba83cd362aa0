//! Equipment instances, qualities and the per-slot loadout.
mod enhance;

pub use enhance::{EnhanceOutcome, enhance, enhancement_cost, enhancement_success_rate};

use crate::config::GameConfig;

/// Equipment rarity. Drives the stat multiplier and the enhancement ceiling.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Quality {
    #[default]
    Common,
    Fine,
    Superior,
    Epic,
    Legendary,
}

impl Quality {
    pub const COUNT: usize = 5;

    pub const ALL: [Quality; Self::COUNT] = [
        Quality::Common,
        Quality::Fine,
        Quality::Superior,
        Quality::Epic,
        Quality::Legendary,
    ];

    pub const fn index(self) -> usize {
        match self {
            Quality::Common => 0,
            Quality::Fine => 1,
            Quality::Superior => 2,
            Quality::Epic => 3,
            Quality::Legendary => 4,
        }
    }

    /// Stat multiplier applied to an item's base stats.
    pub const fn multiplier(self) -> f64 {
        match self {
            Quality::Common => 1.0,
            Quality::Fine => 1.2,
            Quality::Superior => 1.5,
            Quality::Epic => 2.0,
            Quality::Legendary => 3.0,
        }
    }
}

/// Slot an equipment item occupies. Declared on the item definition.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EquipmentSlot {
    Weapon,
    Helmet,
    Armor,
    Boots,
    Accessory,
}

/// A single owned piece of equipment.
///
/// `unique_id` is the stable identity; several instances may share an
/// `item_id` and still be addressed individually.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentInstance {
    pub unique_id: u64,
    pub item_id: String,
    pub level: u32,
    pub quality: Quality,
    pub enhancement: u32,
}

impl EquipmentInstance {
    /// Creates an instance, clamping level to at least 1 and enhancement to the
    /// quality ceiling.
    pub fn new(
        unique_id: u64,
        item_id: impl Into<String>,
        level: u32,
        quality: Quality,
        enhancement: u32,
        config: &GameConfig,
    ) -> Self {
        let limit = config.enhancement.limit(quality);
        debug_assert!(enhancement <= limit, "enhancement above quality ceiling");
        Self {
            unique_id,
            item_id: item_id.into(),
            level: level.max(1),
            quality,
            enhancement: enhancement.min(limit),
        }
    }

    /// Gold received when selling this instance.
    pub fn sell_value(&self, config: &GameConfig) -> u64 {
        (config.drops.sell_value_per_level * f64::from(self.level) * self.quality.multiplier())
            .floor() as u64
    }
}

/// Items currently worn, one optional instance per slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loadout {
    pub weapon: Option<EquipmentInstance>,
    pub helmet: Option<EquipmentInstance>,
    pub armor: Option<EquipmentInstance>,
    pub boots: Option<EquipmentInstance>,
    pub accessory: Option<EquipmentInstance>,
}

impl Loadout {
    pub fn slot(&self, slot: EquipmentSlot) -> Option<&EquipmentInstance> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Helmet => self.helmet.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
            EquipmentSlot::Boots => self.boots.as_ref(),
            EquipmentSlot::Accessory => self.accessory.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<EquipmentInstance> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Helmet => &mut self.helmet,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Boots => &mut self.boots,
            EquipmentSlot::Accessory => &mut self.accessory,
        }
    }

    /// Places `item` in `slot`, returning the previous occupant.
    pub fn put(&mut self, slot: EquipmentSlot, item: EquipmentInstance) -> Option<EquipmentInstance> {
        self.slot_mut(slot).replace(item)
    }

    pub fn take(&mut self, slot: EquipmentSlot) -> Option<EquipmentInstance> {
        self.slot_mut(slot).take()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EquipmentInstance> {
        [
            self.weapon.as_ref(),
            self.helmet.as_ref(),
            self.armor.as_ref(),
            self.boots.as_ref(),
            self.accessory.as_ref(),
        ]
        .into_iter()
        .flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EquipmentInstance> {
        [
            self.weapon.as_mut(),
            self.helmet.as_mut(),
            self.armor.as_mut(),
            self.boots.as_mut(),
            self.accessory.as_mut(),
        ]
        .into_iter()
        .flatten()
    }

    pub fn find_mut(&mut self, unique_id: u64) -> Option<&mut EquipmentInstance> {
        [
            self.weapon.as_mut(),
            self.helmet.as_mut(),
            self.armor.as_mut(),
            self.boots.as_mut(),
            self.accessory.as_mut(),
        ]
        .into_iter()
        .flatten()
        .find(|item| item.unique_id == unique_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sword(unique_id: u64) -> EquipmentInstance {
        EquipmentInstance::new(unique_id, "iron_sword", 1, Quality::Common, 0, &GameConfig::default())
    }

    #[test]
    fn put_returns_previous_occupant() {
        let mut loadout = Loadout::default();
        assert!(loadout.put(EquipmentSlot::Weapon, sword(1)).is_none());
        let previous = loadout.put(EquipmentSlot::Weapon, sword(2));
        assert_eq!(previous.map(|item| item.unique_id), Some(1));
        assert_eq!(loadout.iter().count(), 1);
    }

    #[test]
    fn copies_of_one_item_stay_distinct() {
        let mut loadout = Loadout::default();
        loadout.put(EquipmentSlot::Weapon, sword(7));
        assert!(loadout.find_mut(8).is_none());
        assert!(loadout.find_mut(7).is_some());
    }

    #[test]
    fn sell_value_scales_with_level_and_quality() {
        let config = GameConfig::default();
        let item = EquipmentInstance::new(1, "ring", 4, Quality::Superior, 0, &config);
        assert_eq!(item.sell_value(&config), 150);
    }
}
