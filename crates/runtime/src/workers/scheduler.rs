//! Auto-combat timer that feeds ticks to the simulation worker.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};

use super::Command;

/// Sends `Tick` commands while auto combat is on.
///
/// The worker publishes the combat turn delay on a `watch` channel (`None`
/// when stopped). A change takes effect before the next tick fires; a tick
/// that was already sent is still resolved by the worker.
pub struct AutoCombatScheduler {
    delay_rx: watch::Receiver<Option<u64>>,
    command_tx: mpsc::Sender<Command>,
}

impl AutoCombatScheduler {
    pub fn new(delay_rx: watch::Receiver<Option<u64>>, command_tx: mpsc::Sender<Command>) -> Self {
        Self {
            delay_rx,
            command_tx,
        }
    }

    pub async fn run(mut self) {
        loop {
            let delay = *self.delay_rx.borrow_and_update();
            let Some(delay_ms) = delay.filter(|ms| *ms > 0) else {
                tracing::debug!(target: "runtime::scheduler", "auto combat idle");
                if self.delay_rx.changed().await.is_err() {
                    break;
                }
                continue;
            };

            let period = Duration::from_millis(delay_ms);
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(target: "runtime::scheduler", delay_ms, "auto combat scheduled");

            loop {
                tokio::select! {
                    biased;
                    changed = self.delay_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        break;
                    }
                    _ = interval.tick() => {
                        let tick = Command::Tick { elapsed_ms: delay_ms };
                        if self.command_tx.send(tick).await.is_err() {
                            return;
                        }
                    }
                }
            }
        }
        tracing::debug!(target: "runtime::scheduler", "scheduler stopped");
    }
}
