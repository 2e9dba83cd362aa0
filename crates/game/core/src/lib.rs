//! Deterministic tower-climb simulation shared by the runtime and tools.
//!
//! `tower-core` defines the canonical rules (stats, elements, combat, skills,
//! equipment, floors, drops) and exposes pure APIs that can be reused by both
//! the runtime and offline tools. All state mutation flows through
//! [`engine::GameEngine`]; content arrives through the read-only
//! [`env::ContentOracle`] and nothing here performs I/O.
pub mod combat;
pub mod config;
pub mod drops;
pub mod element;
pub mod engine;
pub mod env;
pub mod equipment;
pub mod error;
pub mod floor;
pub mod skills;
pub mod state;
pub mod stats;

pub use combat::{CombatLog, CombatPhase, CombatState, LogEntry, LogKind, Side};
pub use config::GameConfig;
pub use drops::{EquipmentDrop, Reward};
pub use element::{AttackElement, Element, ElementStats, ElementTable};
pub use engine::{
    Action, ActionError, ActionKind, ActionOutcome, GameEngine, RewardRequest, SkillXpGrant,
    TickOutcome,
};
pub use env::{
    ContentEntry, ContentKey, ContentOracle, ContentSnapshot, Env, GameEnv, PcgRng, RngOracle,
};
pub use equipment::{EquipmentInstance, EquipmentSlot, Quality};
pub use error::{ErrorSeverity, GameError};
pub use floor::FloorTier;
pub use skills::{SkillBook, SkillInstance, XpEvent};
pub use state::{Encounter, GameState, InventoryState, PlayerState, TowerState};
pub use stats::{CombatStats, StatBlock};
