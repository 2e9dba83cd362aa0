//! Runtime orchestration for the deterministic tower simulation.
//!
//! This crate wires together the async content repository, the content cache,
//! save persistence, and worker tasks into a cohesive runtime API. Consumers
//! embed [`Runtime`] to run auto combat, dispatch player actions, and stream
//! the combat log through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - `workers` (private) runs the simulation task and the auto-combat scheduler
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{ActionEvent, Event, EventBus, ProgressEvent, Topic};
pub use oracle::{ContentCache, OracleBundle};
pub use repository::{
    ContentError, ContentRepository, FileSaveRepository, InMemoryContentRepository,
    InMemorySaveRepository, RepositoryError, SaveEnvelope, SaveRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
