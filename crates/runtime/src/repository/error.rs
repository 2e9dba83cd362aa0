//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by save repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("save repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Typed outcome of a content lookup that produced no definition.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    /// The repository has no entry for the key. Callers fall back to a
    /// generic definition.
    #[error("{0} not found")]
    NotFound(tower_core::ContentKey),

    /// The backing store could not answer. Treated like a missing entry.
    #[error("content store unavailable: {0}")]
    Unavailable(String),
}
