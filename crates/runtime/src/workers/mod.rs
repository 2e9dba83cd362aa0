//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the game state and executes commands; the
//! scheduler feeds it auto-combat ticks.

mod scheduler;
mod simulation;

pub use scheduler::AutoCombatScheduler;
pub use simulation::{Command, SimulationWorker, WorkerOptions};
