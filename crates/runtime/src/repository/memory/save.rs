//! In-memory SaveRepository implementation for tests and local runs.

use std::sync::RwLock;

use async_trait::async_trait;
use tower_core::GameState;

use crate::repository::traits::{decode, encode};
use crate::repository::{RepositoryError, Result, SaveRepository};

/// Keeps the encoded envelope in memory, so loads exercise the same checksum
/// path as files do.
#[derive(Default)]
pub struct InMemorySaveRepository {
    slot: RwLock<Option<Vec<u8>>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the stored bytes without sealing them.
    pub fn put_raw(&self, bytes: Vec<u8>) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = Some(bytes);
        Ok(())
    }

    pub fn raw(&self) -> Result<Option<Vec<u8>>> {
        let slot = self.slot.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slot.clone())
    }
}

#[async_trait]
impl SaveRepository for InMemorySaveRepository {
    async fn save(&self, state: &GameState) -> Result<()> {
        self.put_raw(encode(state)?)
    }

    async fn load(&self) -> Result<Option<GameState>> {
        self.raw()?.map(|bytes| decode(&bytes)).transpose()
    }

    async fn exists(&self) -> bool {
        self.slot.read().map(|slot| slot.is_some()).unwrap_or(false)
    }

    async fn delete(&self) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = None;
        Ok(())
    }
}
