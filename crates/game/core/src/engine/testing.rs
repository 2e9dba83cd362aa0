//! Shared content and state for engine tests.

use crate::config::GameConfig;
use crate::element::Element;
use crate::env::{
    ConsumableEffect, ContentOracle, ContentSnapshot, Env, GameEnv, ItemCategory, ItemDefinition,
    MonsterDefinition, PcgRng, RngOracle,
};
use crate::equipment::EquipmentSlot;
use crate::floor::FloorTier;
use crate::state::GameState;
use crate::stats::StatBlock;

pub struct Fixture {
    pub content: ContentSnapshot,
    pub config: GameConfig,
    pub rng: PcgRng,
}

impl Fixture {
    pub fn new(content: ContentSnapshot) -> Self {
        Self {
            content,
            config: GameConfig::default(),
            rng: PcgRng,
        }
    }

    /// Floor 1 pool holds a single weak slime; floor 5 holds a brute that
    /// one-shots a fresh character.
    pub fn standard() -> Self {
        Self::new(ContentSnapshot::from_catalogs(
            vec![slime(), brute()],
            vec![],
            vec![sword(), charm(), stew()],
            vec![],
            vec![(Element::Flame, FloorTier::Normal, vec!["ember_slime".into()])],
        ))
    }

    pub fn state(&self) -> GameState {
        GameState::new(0x5eed, &self.config)
    }

    pub fn env(&self) -> GameEnv<'_> {
        let content: &dyn ContentOracle = &self.content;
        let rng: &dyn RngOracle = &self.rng;
        Env::new(content, rng, &self.config)
    }
}

pub fn slime() -> MonsterDefinition {
    MonsterDefinition {
        id: "ember_slime".into(),
        name: "Ember Slime".into(),
        theme: Element::Flame,
        stats: StatBlock {
            max_hp: 30,
            physical_attack: 5,
            speed: 1,
            ..StatBlock::default()
        },
        weaknesses: vec![],
        resistances: vec![],
        drop_table_id: None,
        skill_page_drops: vec![],
        gold_reward: 10,
        skills: vec![],
    }
}

pub fn brute() -> MonsterDefinition {
    MonsterDefinition {
        id: "cinder_brute".into(),
        name: "Cinder Brute".into(),
        stats: StatBlock {
            max_hp: 500,
            physical_attack: 1_000,
            physical_defense: 100,
            speed: 100,
            ..StatBlock::default()
        },
        gold_reward: 100,
        ..slime()
    }
}

pub fn sword() -> ItemDefinition {
    ItemDefinition {
        id: "iron_sword".into(),
        name: "Iron Sword".into(),
        category: ItemCategory::Equipment,
        slot: Some(EquipmentSlot::Weapon),
        base_stats: StatBlock {
            physical_attack: 10,
            ..StatBlock::default()
        },
        elements: Default::default(),
        consumable: None,
        crafting_materials: vec![],
    }
}

fn charm() -> ItemDefinition {
    ItemDefinition {
        id: "vital_charm".into(),
        name: "Vital Charm".into(),
        slot: Some(EquipmentSlot::Accessory),
        base_stats: StatBlock {
            max_hp: 50,
            ..StatBlock::default()
        },
        ..sword()
    }
}

fn stew() -> ItemDefinition {
    ItemDefinition {
        id: "hearty_stew".into(),
        name: "Hearty Stew".into(),
        category: ItemCategory::Consumable,
        slot: None,
        base_stats: StatBlock::default(),
        consumable: Some(ConsumableEffect {
            bonus: StatBlock {
                max_hp: 10,
                ..StatBlock::default()
            },
            heal_hp: 30,
            heal_mp: 0,
        }),
        ..sword()
    }
}
