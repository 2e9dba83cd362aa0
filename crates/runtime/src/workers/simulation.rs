//! Simulation worker that owns the authoritative [`tower_core::GameState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle) and the
//! scheduler, runs them through [`GameEngine`], and publishes events to the
//! [`EventBus`].
//!
//! Content is fetched lazily. When a step or action needs definitions that
//! are not cached yet, the worker spawns a fetch over the async
//! [`ContentRepository`] and continues once the results come back:
//!
//! ```text
//! Tick ──▶ engine.tick ──┬─ Advanced ──▶ publish, autosave
//!                        └─ AwaitingContent ──▶ fetch ──▶ ContentReady ──▶ engine.resume
//! Execute ──▶ missing keys? ──┬─ none ──▶ engine.execute
//!                             └─ some ──▶ mark busy, fetch ──▶ ContentReady ──▶ engine.execute
//! ```
//!
//! Ticks that arrive while a step is claimed are no-ops inside the engine,
//! so damage is never applied twice.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

use tower_core::engine::requirements::{action_requirements, missing};
use tower_core::{
    Action, ActionError, ActionKind, ActionOutcome, ContentKey, GameEngine, GameState, LogEntry,
    TickOutcome,
};

use crate::api::{Result, RuntimeError};
use crate::events::{ActionEvent, Event, EventBus, ProgressEvent};
use crate::oracle::{Fetched, OracleBundle};
use crate::repository::{ContentRepository, SaveRepository};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Execute a player action (or a manual tick) and reply with its outcome.
    Execute {
        action: Action,
        reply: oneshot::Sender<ActionOutcome>,
    },
    /// Scheduler tick. Fire and forget.
    Tick { elapsed_ms: u64 },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    /// Persist the current state now.
    Save { reply: oneshot::Sender<Result<()>> },
    /// Persist and stop the worker.
    Shutdown { reply: oneshot::Sender<Result<()>> },
}

/// What to do once a content fetch finishes.
enum Continuation {
    /// Resume the claimed combat step.
    Resume,
    /// Run a deferred player action.
    Action {
        action: Action,
        reply: Option<oneshot::Sender<ActionOutcome>>,
    },
}

/// Results of a spawned fetch, routed back into the worker loop.
struct ContentReady {
    results: Vec<Fetched>,
    continuation: Continuation,
}

/// Optional collaborators of the worker.
pub struct WorkerOptions {
    pub saves: Option<Arc<dyn SaveRepository>>,
    /// Persist after this many resolved ticks. `0` disables autosave.
    pub autosave_every_ticks: u64,
}

/// Background task that processes gameplay commands.
///
/// The worker is the only owner of the game state; everything else sees
/// clones or events.
pub struct SimulationWorker {
    state: GameState,
    oracles: OracleBundle,
    content: Arc<dyn ContentRepository>,
    saves: Option<Arc<dyn SaveRepository>>,
    command_rx: mpsc::Receiver<Command>,
    ready_tx: mpsc::UnboundedSender<ContentReady>,
    ready_rx: mpsc::UnboundedReceiver<ContentReady>,
    event_bus: EventBus,
    delay_tx: watch::Sender<Option<u64>>,
    /// Action kinds waiting on a content fetch.
    in_progress: HashSet<ActionKind>,
    autosave_every_ticks: u64,
    ticks_since_save: u64,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        state: GameState,
        oracles: OracleBundle,
        content: Arc<dyn ContentRepository>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        delay_tx: watch::Sender<Option<u64>>,
        options: WorkerOptions,
    ) -> Self {
        info!(
            target: "runtime::worker",
            floor = state.tower.current_floor,
            nonce = state.nonce,
            auto_mode = state.tower.auto_mode,
            "simulation worker initialized"
        );

        let (ready_tx, ready_rx) = mpsc::unbounded_channel();
        Self {
            state,
            oracles,
            content,
            saves: options.saves,
            command_rx,
            ready_tx,
            ready_rx,
            event_bus,
            delay_tx,
            in_progress: HashSet::new(),
            autosave_every_ticks: options.autosave_every_ticks,
            ticks_since_save: 0,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        self.publish_turn_delay();

        // A save taken while a step was claimed has no fetch behind it anymore.
        if GameEngine::new(&mut self.state).is_awaiting() {
            debug!(target: "runtime::worker", "restored a claimed step, resuming");
            let env = self.oracles.as_game_env();
            let outcome = GameEngine::new(&mut self.state).resume(env);
            self.after_step(outcome);
        }

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => {
                        if !self.handle_command(cmd).await {
                            break;
                        }
                    }
                    None => {
                        if let Err(err) = self.persist().await {
                            error!(target: "runtime::save", %err, "final save failed");
                        }
                        break;
                    }
                },
                Some(ready) = self.ready_rx.recv() => self.handle_ready(ready).await,
            }
        }

        info!(target: "runtime::worker", nonce = self.state.nonce, "simulation worker stopped");
    }

    /// Returns `false` once the worker should stop.
    async fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Execute { action, reply } => {
                if let Some(outcome) = self.handle_execute(action, Some(reply)).await {
                    debug!(target: "runtime::worker", "dropped reply for {}", outcome.message);
                }
            }
            Command::Tick { elapsed_ms } => {
                self.run_tick(elapsed_ms);
                self.maybe_autosave().await;
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!(target: "runtime::worker", "QueryState reply channel closed (caller dropped)");
                }
            }
            Command::Save { reply } => {
                let result = match self.saves {
                    Some(_) => self.persist().await,
                    None => Err(RuntimeError::SaveNotConfigured),
                };
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Save reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown { reply } => {
                let result = self.persist().await;
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Shutdown reply channel closed");
                }
                return false;
            }
        }
        true
    }

    /// Runs or defers an action. Returns the outcome if the caller is gone
    /// before it could be delivered.
    async fn handle_execute(
        &mut self,
        action: Action,
        reply: Option<oneshot::Sender<ActionOutcome>>,
    ) -> Option<ActionOutcome> {
        if let Action::Tick { elapsed_ms } = action {
            let outcome = self.run_tick(elapsed_ms).into_outcome();
            self.maybe_autosave().await;
            return deliver(reply, outcome);
        }

        let kind = action.kind();
        if self.in_progress.contains(&kind) {
            let outcome = ActionOutcome::rejected(&ActionError::InProgress(kind));
            debug!(target: "runtime::worker", %kind, "duplicate action rejected");
            self.event_bus
                .publish(Event::Action(ActionEvent::new(kind.to_string(), &outcome)));
            return deliver(reply, outcome);
        }

        let keys = missing(
            self.oracles.cache.snapshot(),
            action_requirements(&self.state, &action),
        );
        if keys.is_empty() {
            let outcome = self.apply_action(&action);
            return deliver(reply, outcome);
        }

        debug!(target: "runtime::worker", %kind, keys = keys.len(), "action waiting on content");
        self.in_progress.insert(kind);
        self.request_content(keys, Continuation::Action { action, reply });
        None
    }

    async fn handle_ready(&mut self, ready: ContentReady) {
        self.oracles.cache.apply(ready.results);

        match ready.continuation {
            Continuation::Resume => {
                let env = self.oracles.as_game_env();
                let outcome = GameEngine::new(&mut self.state).resume(env);
                self.after_step(outcome);
                self.maybe_autosave().await;
            }
            Continuation::Action { action, reply } => {
                self.in_progress.remove(&action.kind());
                if let Some(outcome) = self.handle_execute(action, reply).await {
                    debug!(target: "runtime::worker", "dropped reply for {}", outcome.message);
                }
            }
        }
    }

    fn run_tick(&mut self, elapsed_ms: u64) -> TickOutcome {
        let env = self.oracles.as_game_env();
        let outcome = GameEngine::new(&mut self.state).tick(env, elapsed_ms);
        self.after_step(outcome.clone());
        outcome
    }

    fn after_step(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Advanced { logs } => {
                self.ticks_since_save += 1;
                self.publish_logs(logs);
                self.publish_progress();
                self.publish_turn_delay();
            }
            TickOutcome::AwaitingContent { keys } => {
                debug!(target: "runtime::worker", ?keys, "combat step waiting on content");
                self.request_content(keys, Continuation::Resume);
            }
        }
    }

    fn apply_action(&mut self, action: &Action) -> ActionOutcome {
        let kind = action.kind();
        let env = self.oracles.as_game_env();
        let outcome = GameEngine::new(&mut self.state).execute(env, action);

        if outcome.success {
            debug!(target: "runtime::worker", %kind, message = %outcome.message, "action applied");
        } else {
            debug!(target: "runtime::worker", %kind, message = %outcome.message, "action rejected");
        }

        self.event_bus
            .publish(Event::Action(ActionEvent::new(kind.to_string(), &outcome)));
        if outcome.success {
            self.publish_logs(outcome.logs.clone());
            self.publish_progress();
            self.publish_turn_delay();
        }
        outcome
    }

    /// Fetches `keys` off the worker task and routes the results back.
    fn request_content(&self, keys: Vec<ContentKey>, continuation: Continuation) {
        let repository = Arc::clone(&self.content);
        let ready_tx = self.ready_tx.clone();

        tokio::spawn(async move {
            let mut results = Vec::with_capacity(keys.len());
            for key in keys {
                let result = repository.fetch(&key).await;
                results.push((key, result));
            }
            if ready_tx
                .send(ContentReady {
                    results,
                    continuation,
                })
                .is_err()
            {
                debug!(target: "runtime::content", "worker stopped before content arrived");
            }
        });
    }

    fn publish_logs(&self, logs: Vec<LogEntry>) {
        for entry in logs {
            self.event_bus.publish(Event::Log(entry));
        }
    }

    fn publish_progress(&self) {
        self.event_bus
            .publish(Event::Progress(ProgressEvent::from_state(&self.state)));
    }

    /// Mirrors the current turn delay into the scheduler channel.
    fn publish_turn_delay(&self) {
        let delay = self.state.turn_delay_ms(self.oracles.config());
        self.delay_tx.send_if_modified(|current| {
            if *current == delay {
                return false;
            }
            *current = delay;
            true
        });
    }

    async fn maybe_autosave(&mut self) {
        if self.autosave_every_ticks == 0 || self.ticks_since_save < self.autosave_every_ticks {
            return;
        }
        if let Err(err) = self.persist().await {
            warn!(target: "runtime::save", %err, "autosave failed");
        }
    }

    async fn persist(&mut self) -> Result<()> {
        let Some(saves) = &self.saves else {
            return Ok(());
        };
        saves.save(&self.state).await?;
        self.ticks_since_save = 0;
        info!(
            target: "runtime::save",
            nonce = self.state.nonce,
            floor = self.state.tower.current_floor,
            "game saved"
        );
        Ok(())
    }
}

/// Sends `outcome` to the caller, handing it back if nobody is listening.
fn deliver(
    reply: Option<oneshot::Sender<ActionOutcome>>,
    outcome: ActionOutcome,
) -> Option<ActionOutcome> {
    match reply {
        Some(reply) => reply.send(outcome).err(),
        None => Some(outcome),
    }
}
