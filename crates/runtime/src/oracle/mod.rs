//! Runtime side of the engine's read-only oracles.
//!
//! [`OracleBundle`] owns the content cache, the stateless rng and the tuning
//! config so the worker can build a [`GameEnv`] on demand.
mod cache;

use tower_core::{ContentOracle, Env, GameConfig, GameEnv, PcgRng, RngOracle};

pub use cache::{ContentCache, Fetched};

/// Everything the engine reads, owned by the simulation worker.
pub struct OracleBundle {
    pub(crate) cache: ContentCache,
    pub(crate) config: GameConfig,
    rng: PcgRng,
}

impl OracleBundle {
    pub fn new(cache: ContentCache, config: GameConfig) -> Self {
        Self {
            cache,
            config,
            rng: PcgRng,
        }
    }

    pub fn as_game_env(&self) -> GameEnv<'_> {
        let content: &dyn ContentOracle = self.cache.snapshot();
        let rng: &dyn RngOracle = &self.rng;
        Env::new(content, rng, &self.config)
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
