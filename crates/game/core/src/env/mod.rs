//! Read-only inputs to the engine.
//!
//! The content oracle exposes monster, skill, item, drop-table and spawn-pool
//! definitions by id; the rng oracle supplies deterministic rolls. The [`Env`]
//! aggregate bundles them with the tuning [`GameConfig`] so the engine never
//! depends on a concrete store.
mod content;
mod rng;
mod snapshot;

pub use content::{
    BASIC_ATTACK, ConsumableEffect, ContentEntry, ContentKey, ContentOracle, DropEntry, DropKind,
    DropTable, ItemCategory, ItemDefinition, MaterialCost, MonsterDefinition, MonsterSkill,
    SkillDefinition, SkillKind, TrainingRules, TriggerCurve,
};
pub use rng::{Dice, PcgRng, RngOracle, RollStream, compute_seed};
pub use snapshot::ContentSnapshot;

use crate::config::GameConfig;

/// Aggregates the read-only oracles required by the engine.
pub struct Env<'a, C, R>
where
    C: ContentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    content: &'a C,
    rng: &'a R,
    config: &'a GameConfig,
}

impl<C, R> Clone for Env<'_, C, R>
where
    C: ContentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, R> Copy for Env<'_, C, R>
where
    C: ContentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type GameEnv<'a> = Env<'a, dyn ContentOracle + 'a, dyn RngOracle + 'a>;

impl<'a, C, R> Env<'a, C, R>
where
    C: ContentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(content: &'a C, rng: &'a R, config: &'a GameConfig) -> Self {
        Self {
            content,
            rng,
            config,
        }
    }

    pub fn content(&self) -> &'a C {
        self.content
    }

    pub fn rng(&self) -> &'a R {
        self.rng
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }
}

impl<'a, C, R> Env<'a, C, R>
where
    C: ContentOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let content: &'a dyn ContentOracle = self.content;
        let rng: &'a dyn RngOracle = self.rng;
        Env::new(content, rng, self.config)
    }
}

impl<'a> GameEnv<'a> {
    /// Starts a roll sequence for the given step.
    pub fn dice(&self, game_seed: u64, nonce: u64, stream: RollStream) -> Dice<'a> {
        Dice::new(self.rng, game_seed, nonce, stream)
    }
}
