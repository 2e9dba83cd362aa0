//! Data adapters used by the runtime.
//!
//! Content arrives through the async [`ContentRepository`]; save snapshots
//! go through [`SaveRepository`]. Both have file and in-memory backends.
mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{ContentError, RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::{InMemoryContentRepository, InMemorySaveRepository};
pub use traits::{ContentRepository, SaveRepository};
pub use types::SaveEnvelope;
