//! Headless idle client for the tower runtime.
//!
//! ```text
//! Client
//!   ├─→ Runtime (simulation worker, auto-combat scheduler, saves)
//!   └─→ Console (prints the log stream and a periodic status line)
//! ```
//!
//! [`bootstrap`] turns a [`ClientConfig`] into a running [`Runtime`];
//! [`Client::run`] drives it until Ctrl-C or the configured deadline.

pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod render;

pub use config::ClientConfig;

use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;
use tower_runtime::{Event, Runtime, Topic};

/// Status lines are printed at most once per this many progress events.
const STATUS_EVERY: u64 = 20;

/// Owns the runtime for the lifetime of the session.
pub struct Client {
    runtime: Runtime,
    auto_speed: u32,
    run_for: Option<Duration>,
}

impl Client {
    pub fn new(runtime: Runtime, config: &ClientConfig) -> Self {
        Self {
            runtime,
            auto_speed: config.auto_speed,
            run_for: config.run_for,
        }
    }

    /// Start auto combat and stream events to stdout until interrupted.
    ///
    /// The runtime is always shut down on exit, which writes a final save
    /// when persistence is configured.
    pub async fn run(self) -> Result<()> {
        let handle = self.runtime.handle();
        let mut logs = handle.subscribe(Topic::Log);
        let mut progress = handle.subscribe(Topic::Progress);
        let mut actions = handle.subscribe(Topic::Action);

        let outcome = handle.start_auto_combat(self.auto_speed).await?;
        if outcome.success {
            tracing::info!(speed = self.auto_speed, "auto combat started");
        } else {
            tracing::warn!("could not start auto combat: {}", outcome.message);
        }

        let run_for = self.run_for;
        let deadline = async move {
            match run_for {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut console = Console::default();
        loop {
            let event = tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupted");
                    break;
                }
                _ = &mut deadline => {
                    tracing::info!("run time elapsed");
                    break;
                }
                event = logs.recv() => event,
                event = progress.recv() => event,
                event = actions.recv() => event,
            };
            match event {
                Ok(event) => console.show(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "console fell behind the event stream");
                }
                Err(RecvError::Closed) => break,
            }
        }

        if let Err(err) = handle.stop_auto_combat().await {
            tracing::warn!("stop auto combat: {err}");
        }
        if let Ok(state) = handle.query_state().await {
            println!(
                "stopped on floor {} (best {}), {} gold",
                state.tower.current_floor, state.tower.highest_floor, state.player.gold
            );
        }

        self.runtime.shutdown().await?;
        Ok(())
    }
}

/// Prints events, thinning progress updates to one status line in
/// [`STATUS_EVERY`].
#[derive(Default)]
struct Console {
    progress_seen: u64,
}

impl Console {
    fn show(&mut self, event: Event) {
        match event {
            Event::Log(entry) => println!("{}", render::log_line(&entry)),
            Event::Progress(progress) => {
                self.progress_seen += 1;
                if self.progress_seen % STATUS_EVERY == 1 {
                    println!("{}", render::status_line(&progress));
                }
            }
            Event::Action(action) => println!("{}", render::action_line(&action)),
        }
    }
}
