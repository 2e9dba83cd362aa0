//! Event system for runtime notifications.
//!
//! The simulation worker publishes every log entry, a progress snapshot after
//! each resolved step, and the result of each player action. Consumers pick
//! topics on the [`EventBus`].

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{ActionEvent, ProgressEvent};
