//! Authoritative game state representation.
//!
//! Everything that is persisted lives here: player, tower progress,
//! inventory, skills and the active encounter. Derived stats are not stored.
//! Runtime layers clone or query this state but mutate it exclusively
//! through the engine.
mod encounter;
mod inventory;
mod player;
mod tower;

pub use encounter::Encounter;
pub use inventory::InventoryState;
pub use player::PlayerState;
pub use tower::TowerState;

use crate::config::GameConfig;
use crate::skills::SkillBook;

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// RNG seed for deterministic random generation.
    ///
    /// Set once when the save is created and never modified.
    /// Combined with `nonce` to generate unique seeds for each random event.
    pub game_seed: u64,

    /// Sequence number of resolved steps. Incremented after every step that
    /// may roll dice.
    pub nonce: u64,

    /// Simulation clock, advanced only by ticks.
    pub clock_ms: u64,

    /// Unique id allocator for equipment instances. Never reused.
    next_unique_id: u64,

    pub player: PlayerState,
    pub tower: TowerState,
    pub inventory: InventoryState,
    pub skills: SkillBook,
    pub encounter: Option<Encounter>,
}

impl GameState {
    /// Creates a fresh save on floor 1.
    pub fn new(game_seed: u64, config: &GameConfig) -> Self {
        Self {
            game_seed,
            nonce: 0,
            clock_ms: 0,
            next_unique_id: 1,
            player: PlayerState::new(),
            tower: TowerState::new(),
            inventory: InventoryState::default(),
            skills: SkillBook::starter(config),
            encounter: None,
        }
    }

    /// Allocates a new equipment instance id.
    pub fn allocate_unique_id(&mut self) -> u64 {
        let id = self.next_unique_id;
        self.next_unique_id += 1;
        id
    }

    /// Period between auto-combat turns, or `None` while auto combat is off.
    ///
    /// The active encounter's `turn_delay_ms` wins; between encounters the
    /// delay follows the configured speed curve.
    pub fn turn_delay_ms(&self, config: &GameConfig) -> Option<u64> {
        if !self.tower.auto_mode {
            return None;
        }
        Some(
            self.encounter
                .as_ref()
                .map(|encounter| encounter.combat.turn_delay_ms)
                .unwrap_or_else(|| config.turn_delay_ms(self.tower.auto_speed)),
        )
    }

    /// Brings a loaded save back within the current tuning's invariants.
    ///
    /// Enhancement levels above the quality ceiling (a save written under a
    /// higher limit) are clamped. Returns how many instances changed.
    pub fn normalize(&mut self, config: &GameConfig) -> usize {
        let limits = &config.enhancement;
        let mut clamped = 0;
        for item in self
            .inventory
            .equipment
            .iter_mut()
            .chain(self.player.equipment.iter_mut())
        {
            let limit = limits.limit(item.quality);
            if item.enhancement > limit {
                item.enhancement = limit;
                clamped += 1;
            }
        }
        clamped
    }

    /// The id the next allocated equipment instance will get.
    pub fn peek_unique_id(&self) -> u64 {
        self.next_unique_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::{EquipmentInstance, Quality};

    #[test]
    fn new_state_starts_on_floor_one_with_basic_attack() {
        let state = GameState::new(7, &GameConfig::default());
        assert_eq!(state.tower.current_floor, 1);
        assert_eq!(state.tower.highest_floor, 1);
        assert!(state.skills.get(crate::env::BASIC_ATTACK).is_some());
        assert_eq!(state.player.hp, state.player.base.max_hp);
    }

    #[test]
    fn normalize_clamps_enhancement_above_the_ceiling() {
        let config = GameConfig::default();
        let mut state = GameState::new(7, &config);
        let over = |unique_id, quality, enhancement| EquipmentInstance {
            unique_id,
            item_id: "iron_sword".into(),
            level: 1,
            quality,
            enhancement,
        };
        state.inventory.equipment.push(over(1, Quality::Common, 12));
        state.inventory.equipment.push(over(2, Quality::Epic, 12));
        state.player.equipment.weapon = Some(over(3, Quality::Fine, 40));

        assert_eq!(state.normalize(&config), 2);
        assert_eq!(state.inventory.equipment[0].enhancement, 5);
        assert_eq!(state.inventory.equipment[1].enhancement, 12);
        assert_eq!(state.player.equipment.weapon.as_ref().unwrap().enhancement, 10);
        assert_eq!(state.normalize(&config), 0);
    }

    #[test]
    fn turn_delay_follows_the_encounter() {
        let config = GameConfig::default();
        let mut state = GameState::new(7, &config);
        assert_eq!(state.turn_delay_ms(&config), None);

        state.tower.auto_mode = true;
        state.tower.auto_speed = 1;
        assert_eq!(state.turn_delay_ms(&config), Some(2_000));

        state.encounter = Some(Encounter {
            monster_id: "ember_slime".into(),
            name: "Ember Slime".into(),
            theme: crate::element::Element::Flame,
            floor: 1,
            tier: crate::floor::FloorTier::Normal,
            hp: 30,
            combat: crate::combat::CombatState::new(1_500),
        });
        assert_eq!(state.turn_delay_ms(&config), Some(1_500));
    }

    #[test]
    fn unique_ids_are_never_reused() {
        let mut state = GameState::new(7, &GameConfig::default());
        let a = state.allocate_unique_id();
        let b = state.allocate_unique_id();
        assert_ne!(a, b);
        assert_eq!(state.peek_unique_id(), b + 1);
    }
}
