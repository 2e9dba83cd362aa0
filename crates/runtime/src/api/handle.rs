//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! dispatching actions or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use tower_core::{Action, ActionOutcome, EquipmentSlot, GameState};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(make(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        Ok(reply_rx.await?)
    }

    /// Dispatches an action and waits for its outcome.
    ///
    /// Gameplay failures (not enough gold, locked rebirth, ...) come back as
    /// `success == false`; `Err` only means the runtime itself is gone.
    pub async fn execute(&self, action: Action) -> Result<ActionOutcome> {
        self.request(|reply| Command::Execute { action, reply }).await
    }

    /// Turns auto combat on at `speed` and starts the scheduler.
    pub async fn start_auto_combat(&self, speed: u32) -> Result<ActionOutcome> {
        self.execute(Action::StartAutoCombat { speed }).await
    }

    /// Stops scheduling ticks. A tick already being resolved still completes.
    pub async fn stop_auto_combat(&self) -> Result<ActionOutcome> {
        self.execute(Action::StopAutoCombat).await
    }

    /// Advances the simulation by `elapsed_ms` outside the scheduler.
    pub async fn tick(&self, elapsed_ms: u64) -> Result<ActionOutcome> {
        self.execute(Action::Tick { elapsed_ms }).await
    }

    pub async fn unlock_skill(&self, skill_id: impl Into<String>) -> Result<ActionOutcome> {
        self.execute(Action::UnlockSkill {
            skill_id: skill_id.into(),
        })
        .await
    }

    pub async fn level_up_skill(&self, skill_id: impl Into<String>) -> Result<ActionOutcome> {
        self.execute(Action::LevelUpSkill {
            skill_id: skill_id.into(),
        })
        .await
    }

    /// Moves an inventory item into its slot, swapping out the previous one.
    pub async fn equip(&self, unique_id: u64) -> Result<ActionOutcome> {
        self.execute(Action::Equip { unique_id }).await
    }

    pub async fn unequip(&self, slot: EquipmentSlot) -> Result<ActionOutcome> {
        self.execute(Action::Unequip { slot }).await
    }

    /// Enhances an inventory or equipped item by one level.
    pub async fn enhance(&self, unique_id: u64) -> Result<ActionOutcome> {
        self.execute(Action::Enhance { unique_id }).await
    }

    pub async fn rebirth(&self) -> Result<ActionOutcome> {
        self.execute(Action::Rebirth).await
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Persists the current state right away.
    pub async fn save(&self) -> Result<()> {
        self.request(|reply| Command::Save { reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Log` - combat log entries
    /// - `Topic::Progress` - floor and resource snapshots
    /// - `Topic::Action` - player action results
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tower_runtime::Topic;
    ///
    /// let mut logs = handle.subscribe(Topic::Log);
    /// while let Ok(event) = logs.recv().await {
    ///     // Render the entry
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await?
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
