//! In-memory repository implementations for tests and local runs.

mod content;
mod save;

pub use content::InMemoryContentRepository;
pub use save::InMemorySaveRepository;
