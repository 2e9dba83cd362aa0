//! Event payloads published by the simulation worker.

use serde::{Deserialize, Serialize};
use tower_core::{ActionOutcome, GameState};

/// Headline numbers after a resolved step or action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub nonce: u64,
    pub floor: u32,
    pub highest_floor: u32,
    pub kills_on_floor: u32,
    pub hp: u32,
    pub mp: u32,
    pub gold: u64,
    pub ap: u32,
    pub auto_mode: bool,
    /// Name of the monster currently fought, if any.
    pub encounter: Option<String>,
}

impl ProgressEvent {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            nonce: state.nonce,
            floor: state.tower.current_floor,
            highest_floor: state.tower.highest_floor,
            kills_on_floor: state.tower.kills_on_floor,
            hp: state.player.hp,
            mp: state.player.mp,
            gold: state.player.gold,
            ap: state.player.ap,
            auto_mode: state.tower.auto_mode,
            encounter: state.encounter.as_ref().map(|e| e.name.clone()),
        }
    }
}

/// A player action and how it ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    /// `snake_case` action kind, e.g. `enhance`.
    pub kind: String,
    pub success: bool,
    pub message: String,
}

impl ActionEvent {
    pub fn new(kind: impl Into<String>, outcome: &ActionOutcome) -> Self {
        Self {
            kind: kind.into(),
            success: outcome.success,
            message: outcome.message.clone(),
        }
    }
}
