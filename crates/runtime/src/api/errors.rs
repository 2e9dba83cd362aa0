//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and repositories so clients can
//! bubble them up with consistent context. Expected gameplay failures are not
//! errors: they come back as an unsuccessful [`tower_core::ActionOutcome`].
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::{ContentError, RepositoryError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[from] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("runtime requires a content repository before building")]
    MissingContent,

    #[error("no save repository configured")]
    SaveNotConfigured,
}
