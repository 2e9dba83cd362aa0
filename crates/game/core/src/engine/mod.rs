//! Tick resolution and action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. Every
//! mutation, including combat ticks, flows through [`GameEngine::execute`] (or
//! its tick entry points) and produces an [`ActionOutcome`]; expected failures
//! are reported in the outcome, never as panics.

mod action;
mod actions;
mod errors;
pub mod requirements;
#[cfg(test)]
mod testing;
mod turns;

pub use action::{Action, ActionKind, RewardRequest, SkillXpGrant};
pub use errors::ActionError;

use crate::combat::{LogEntry, LogKind};
use crate::config::ProgressionTuning;
use crate::drops::Reward;
use crate::env::{ContentKey, ContentOracle, GameEnv, SkillDefinition};
use crate::equipment::EquipmentInstance;
use crate::state::GameState;
use crate::stats::resolve_player;

/// Result of one action: a success flag, a human-readable message and the
/// log entries it produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
    pub logs: Vec<LogEntry>,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>, logs: Vec<LogEntry>) -> Self {
        Self {
            success: true,
            message: message.into(),
            logs,
        }
    }

    pub fn rejected(error: &ActionError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            logs: Vec::new(),
        }
    }
}

/// Result of one tick or resume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do: auto combat is off, a step is already claimed, or the
    /// post-defeat grace delay is running.
    Idle,
    /// One step resolved.
    Advanced { logs: Vec<LogEntry> },
    /// A step was claimed but needs content first; call
    /// [`GameEngine::resume`] once `keys` are resolved.
    AwaitingContent { keys: Vec<ContentKey> },
}

impl TickOutcome {
    pub fn logs(&self) -> &[LogEntry] {
        match self {
            TickOutcome::Advanced { logs } => logs,
            TickOutcome::Idle | TickOutcome::AwaitingContent { .. } => &[],
        }
    }

    /// Collapses a tick result into the generic action outcome.
    pub fn into_outcome(self) -> ActionOutcome {
        match self {
            TickOutcome::Idle => ActionOutcome::ok("idle", Vec::new()),
            TickOutcome::Advanced { logs } => ActionOutcome::ok("advanced", logs),
            TickOutcome::AwaitingContent { keys } => {
                ActionOutcome::ok(format!("awaiting {} content entries", keys.len()), Vec::new())
            }
        }
    }
}

/// AP paid out by a rebirth from `floor`.
///
/// `(floor - rebirth_floor) × ap_per_floor + ⌊(floor - rebirth_floor) / bonus_every⌋ × bonus`
pub fn rebirth_payout(floor: u32, tuning: &ProgressionTuning) -> u32 {
    let above = floor.saturating_sub(tuning.rebirth_floor);
    let bonus_blocks = above.checked_div(tuning.rebirth_ap_bonus_every).unwrap_or(0);
    above
        .saturating_mul(tuning.rebirth_ap_per_floor)
        .saturating_add(bonus_blocks.saturating_mul(tuning.rebirth_ap_bonus))
}

/// Game engine that applies actions and ticks to a borrowed state.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    /// Creates a new game engine with the given state.
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Executes an action and reports its outcome.
    ///
    /// Rejected actions leave the state untouched. The nonce advances after
    /// every accepted action so later rolls never repeat.
    pub fn execute(&mut self, env: GameEnv<'_>, action: &Action) -> ActionOutcome {
        if let Action::Tick { elapsed_ms } = action {
            return self.tick(env, *elapsed_ms).into_outcome();
        }

        let mut logs = Vec::new();
        match self.apply(env, action, &mut logs) {
            Ok(message) => {
                self.state.nonce += 1;
                ActionOutcome::ok(message, logs)
            }
            Err(error) => ActionOutcome::rejected(&error),
        }
    }

    // ===== shared helpers =====

    fn log(&mut self, env: &GameEnv<'_>, logs: &mut Vec<LogEntry>, kind: LogKind, message: String) {
        let capacity = env.config().progression.max_log_entries;
        let entry = self
            .state
            .tower
            .record(kind, message, self.state.clock_ms, capacity);
        logs.push(entry);
    }

    /// Re-derives the player's stats and clamps HP/MP into the new maxima.
    fn clamp_player(&mut self, env: &GameEnv<'_>) {
        let stats = resolve_player(&self.state.player, env.content(), env.config());
        self.state
            .player
            .clamp_resources(stats.stats.max_hp, stats.stats.max_mp);
    }

    fn restore_player(&mut self, env: &GameEnv<'_>) {
        let stats = resolve_player(&self.state.player, env.content(), env.config());
        self.state
            .player
            .restore(stats.stats.max_hp, stats.stats.max_mp);
    }

    /// Credits one reward through the shared inventory path.
    fn credit(&mut self, env: &GameEnv<'_>, reward: &Reward) {
        match reward {
            Reward::Material { item_id, quantity } => {
                self.state.inventory.add_material(item_id, *quantity)
            }
            Reward::Consumable { item_id, quantity } => {
                self.state.inventory.add_consumable(item_id, *quantity)
            }
            Reward::Gem { quantity, .. } => {
                self.state.player.gems = self.state.player.gems.saturating_add(u64::from(*quantity))
            }
            Reward::Equipment(drop) => {
                let unique_id = self.state.allocate_unique_id();
                let limit = env.config().enhancement.limit(drop.quality);
                let item = EquipmentInstance::new(
                    unique_id,
                    drop.item_id.clone(),
                    drop.level,
                    drop.quality,
                    drop.enhancement.min(limit),
                    env.config(),
                );
                self.state.inventory.equipment.push(item);
            }
            Reward::SkillPage { skill_id, quantity } => {
                self.state.skills.add_pages(skill_id, *quantity)
            }
            Reward::Gold(amount) => {
                self.state.player.gold = self.state.player.gold.saturating_add(*amount)
            }
        }
    }
}

/// Skill definition from content, or the generic stand-in.
fn skill_definition(content: &dyn ContentOracle, skill_id: &str) -> SkillDefinition {
    content
        .skill(skill_id)
        .cloned()
        .unwrap_or_else(|| SkillDefinition::generic(skill_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn rebirth_payout_matches_reference_values() {
        let tuning = GameConfig::default().progression;
        assert_eq!(rebirth_payout(150, &tuning), 110);
        assert_eq!(rebirth_payout(101, &tuning), 2);
        assert_eq!(rebirth_payout(200, &tuning), 220);
        assert_eq!(rebirth_payout(100, &tuning), 0);
    }

    #[test]
    fn rebirth_payout_saturates_instead_of_overflowing() {
        let mut tuning = GameConfig::default().progression;
        assert_eq!(rebirth_payout(u32::MAX, &tuning), u32::MAX);

        tuning.rebirth_ap_per_floor = 0;
        tuning.rebirth_ap_bonus = u32::MAX;
        tuning.rebirth_ap_bonus_every = 1;
        assert_eq!(rebirth_payout(102, &tuning), u32::MAX);
    }
}
