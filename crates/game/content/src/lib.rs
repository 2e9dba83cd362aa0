//! Data-driven content definitions and loaders.
//!
//! This crate reads the tower's static content from RON/TOML data files:
//! - Monster catalog (stats, theme, weaknesses, drops, monster skills)
//! - Skill catalog (element, trigger curve, damage, training rules)
//! - Item catalog (equipment slots, base stats, consumable effects)
//! - Drop tables (independently rolled reward entries)
//! - Spawn pools (candidate monsters per theme and tier)
//! - Game configuration (every balance knob, TOML)
//!
//! Content is consumed through `tower-core`'s content oracle and never
//! appears in game state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, DropTableLoader, ItemLoader, MonsterLoader, SkillLoader,
    SpawnPoolLoader, SpawnPoolSpec, dangling_references,
};
