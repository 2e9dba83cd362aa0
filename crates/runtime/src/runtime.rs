//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the simulation.

use std::env;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use tower_core::{ContentSnapshot, GameConfig, GameState};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::oracle::{ContentCache, OracleBundle};
use crate::repository::{ContentRepository, SaveRepository};
use crate::workers::{AutoCombatScheduler, Command, SimulationWorker, WorkerOptions};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Persist after this many resolved ticks. `0` disables autosave.
    pub autosave_every_ticks: u64,
    /// Spawn the auto-combat timer. Tests usually drive ticks by hand.
    pub enable_scheduler: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 256,
            command_buffer_size: 32,
            autosave_every_ticks: 25,
            enable_scheduler: true,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TOWER_EVENT_BUFFER` - Per-topic event capacity (default: 256)
    /// - `TOWER_COMMAND_BUFFER` - Command queue size (default: 32)
    /// - `TOWER_AUTOSAVE_TICKS` - Ticks between autosaves, 0 disables (default: 25)
    /// - `TOWER_SCHEDULER` - Run the auto-combat timer (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("TOWER_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("TOWER_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(ticks) = read_env::<u64>("TOWER_AUTOSAVE_TICKS") {
            config.autosave_every_ticks = ticks;
        }
        if let Some(enable) = read_env::<bool>("TOWER_SCHEDULER") {
            config.enable_scheduler = enable;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Main runtime that orchestrates game simulation
///
/// Runtime owns the workers; [`RuntimeHandle`] is the cloneable façade for
/// clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
    scheduler_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Saves (when a save repository is configured) and stops every worker.
    pub async fn shutdown(self) -> Result<()> {
        let saved = self.handle.shutdown().await;
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        if let Some(scheduler) = self.scheduler_handle {
            scheduler.await.map_err(RuntimeError::WorkerJoin)?;
        }

        saved
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    game_config: GameConfig,
    state: Option<GameState>,
    game_seed: Option<u64>,
    content: Option<Arc<dyn ContentRepository>>,
    preload: Option<ContentSnapshot>,
    saves: Option<Arc<dyn SaveRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            game_config: GameConfig::default(),
            state: None,
            game_seed: None,
            content: None,
            preload: None,
            saves: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override game tuning
    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.game_config = game_config;
        self
    }

    /// Start from this state instead of loading or creating one.
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Seed for a newly created save. Random when unset.
    pub fn game_seed(mut self, seed: u64) -> Self {
        self.game_seed = Some(seed);
        self
    }

    /// Set the required content repository
    pub fn content_repository(mut self, content: Arc<dyn ContentRepository>) -> Self {
        self.content = Some(content);
        self
    }

    /// Warm the content cache with already loaded definitions.
    pub fn preload(mut self, snapshot: ContentSnapshot) -> Self {
        self.preload = Some(snapshot);
        self
    }

    /// Enable save/restore through `saves`.
    pub fn save_repository(mut self, saves: Arc<dyn SaveRepository>) -> Self {
        self.saves = Some(saves);
        self
    }

    /// Build the runtime
    ///
    /// State comes from, in order: [`initial_state`](Self::initial_state), the
    /// save repository, or a fresh save.
    pub async fn build(self) -> Result<Runtime> {
        let content = self.content.ok_or(RuntimeError::MissingContent)?;

        let restored = match (&self.state, &self.saves) {
            (None, Some(saves)) => saves.load().await?,
            _ => None,
        };
        let mut initial_state = match (self.state, restored) {
            (Some(state), _) => state,
            (None, Some(state)) => {
                tracing::info!(
                    target: "runtime::save",
                    floor = state.tower.current_floor,
                    nonce = state.nonce,
                    "restored save"
                );
                state
            }
            (None, None) => {
                let seed = self.game_seed.unwrap_or_else(rand::random);
                tracing::info!(target: "runtime::save", seed, "starting a new save");
                GameState::new(seed, &self.game_config)
            }
        };

        let clamped = initial_state.normalize(&self.game_config);
        if clamped > 0 {
            tracing::warn!(
                target: "runtime::save",
                clamped,
                "clamped enhancement levels above the quality ceiling"
            );
        }

        let cache = self
            .preload
            .map(ContentCache::from_snapshot)
            .unwrap_or_default();
        let oracles = OracleBundle::new(cache, self.game_config.clone());

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (delay_tx, delay_rx) = watch::channel(None);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx.clone(), event_bus.clone());

        let sim_worker = SimulationWorker::new(
            initial_state,
            oracles,
            content,
            command_rx,
            event_bus,
            delay_tx,
            WorkerOptions {
                saves: self.saves,
                autosave_every_ticks: self.config.autosave_every_ticks,
            },
        );
        let sim_worker_handle = tokio::spawn(sim_worker.run());

        let scheduler_handle = self.config.enable_scheduler.then(|| {
            let scheduler = AutoCombatScheduler::new(delay_rx, command_tx);
            tokio::spawn(scheduler.run())
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
            scheduler_handle,
        })
    }
}
