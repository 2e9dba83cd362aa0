//! File-based SaveRepository implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tower_core::GameState;

use crate::repository::traits::{decode, encode};
use crate::repository::{Result, SaveRepository};

/// Stores the save slot as a single JSON envelope.
///
/// Writes go to `<file>.tmp` first and are renamed over the target, so a
/// crash mid-write never leaves a truncated save behind.
pub struct FileSaveRepository {
    path: PathBuf,
}

impl FileSaveRepository {
    /// Creates the repository, making sure the parent directory exists.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SaveRepository for FileSaveRepository {
    async fn save(&self, state: &GameState) -> Result<()> {
        let bytes = encode(state)?;
        let temp_path = self.path.with_extension("json.tmp");

        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(
            target: "runtime::save",
            nonce = state.nonce,
            path = %self.path.display(),
            "saved game state"
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<GameState>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let state = decode(&bytes)?;

        tracing::debug!(
            target: "runtime::save",
            nonce = state.nonce,
            path = %self.path.display(),
            "loaded game state"
        );
        Ok(Some(state))
    }

    async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
