//! Stat model.
//!
//! ```text
//! [ StatBlock (stored: base, consumable bonus, item base stats) ]
//!      ↓  resolver
//! [ CombatStats (derived, never stored) ]
//! ```
//!
//! Derived stats are recomputed from their sources whenever they are needed;
//! only current HP/MP are persisted next to the sources.

mod resolver;

pub use resolver::{
    ResolvedMonster, equipment_contribution, monster_scaling, resolve_monster, resolve_player,
};

use crate::element::{Element, ElementTable};

/// The seven numeric combat stats shared by players, monsters and items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBlock {
    pub max_hp: u32,
    pub max_mp: u32,
    pub physical_attack: u32,
    pub magical_attack: u32,
    pub physical_defense: u32,
    pub magical_defense: u32,
    pub speed: u32,
}

impl StatBlock {
    /// Starting stats for a new character.
    pub const fn starting() -> Self {
        Self {
            max_hp: 100,
            max_mp: 50,
            physical_attack: 10,
            magical_attack: 10,
            physical_defense: 5,
            magical_defense: 5,
            speed: 10,
        }
    }

    pub fn add(&mut self, other: &StatBlock) {
        self.max_hp = self.max_hp.saturating_add(other.max_hp);
        self.max_mp = self.max_mp.saturating_add(other.max_mp);
        self.physical_attack = self.physical_attack.saturating_add(other.physical_attack);
        self.magical_attack = self.magical_attack.saturating_add(other.magical_attack);
        self.physical_defense = self.physical_defense.saturating_add(other.physical_defense);
        self.magical_defense = self.magical_defense.saturating_add(other.magical_defense);
        self.speed = self.speed.saturating_add(other.speed);
    }

    /// Applies `f` to every stat.
    pub fn map(&self, f: impl Fn(u32) -> u32) -> StatBlock {
        StatBlock {
            max_hp: f(self.max_hp),
            max_mp: f(self.max_mp),
            physical_attack: f(self.physical_attack),
            magical_attack: f(self.magical_attack),
            physical_defense: f(self.physical_defense),
            magical_defense: f(self.magical_defense),
            speed: f(self.speed),
        }
    }

    /// Applies `f` to the five core combat stats, leaving HP/MP pools as-is.
    pub fn map_core(&self, f: impl Fn(u32) -> u32) -> StatBlock {
        StatBlock {
            max_hp: self.max_hp,
            max_mp: self.max_mp,
            ..self.map(f)
        }
    }
}

/// Effective stats of one combatant for the current state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CombatStats {
    pub stats: StatBlock,
    pub elements: ElementTable,
    /// Monster theme. `None` for the player.
    pub theme: Option<Element>,
}

impl CombatStats {
    pub fn attack_power(&self, is_physical: bool) -> u32 {
        if is_physical {
            self.stats.physical_attack
        } else {
            self.stats.magical_attack
        }
    }

    pub fn defense_power(&self, is_physical: bool) -> u32 {
        if is_physical {
            self.stats.physical_defense
        } else {
            self.stats.magical_defense
        }
    }
}
