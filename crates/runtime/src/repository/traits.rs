//! Repository contracts for content lookups and save snapshots.

use async_trait::async_trait;
use tower_core::env::{DropTable, ItemDefinition, MonsterDefinition, SkillDefinition};
use tower_core::{ContentEntry, ContentKey, Element, FloorTier, GameState};

use super::error::{ContentError, Result};
use super::types::SaveEnvelope;

/// Async, id-keyed access to content definitions.
///
/// Content may live in a slow store, so every lookup is asynchronous. A
/// missing id is reported as [`ContentError::NotFound`], never as a panic.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn monster(&self, id: &str) -> std::result::Result<MonsterDefinition, ContentError>;

    async fn skill(&self, id: &str) -> std::result::Result<SkillDefinition, ContentError>;

    async fn item(&self, id: &str) -> std::result::Result<ItemDefinition, ContentError>;

    async fn drop_table(&self, id: &str) -> std::result::Result<DropTable, ContentError>;

    /// Candidate monster ids for a floor theme and tier.
    async fn spawn_pool(
        &self,
        theme: Element,
        tier: FloorTier,
    ) -> std::result::Result<Vec<String>, ContentError>;

    /// Resolves any [`ContentKey`] into a cacheable entry.
    async fn fetch(&self, key: &ContentKey) -> std::result::Result<ContentEntry, ContentError> {
        match key {
            ContentKey::Monster(id) => self.monster(id).await.map(ContentEntry::Monster),
            ContentKey::Skill(id) => self.skill(id).await.map(ContentEntry::Skill),
            ContentKey::Item(id) => self.item(id).await.map(ContentEntry::Item),
            ContentKey::DropTable(id) => self.drop_table(id).await.map(ContentEntry::DropTable),
            ContentKey::SpawnPool(theme, tier) => {
                self.spawn_pool(*theme, *tier)
                    .await
                    .map(|monsters| ContentEntry::SpawnPool {
                        theme: *theme,
                        tier: *tier,
                        monsters,
                    })
            }
        }
    }
}

/// Persistence for the single save slot.
///
/// Loading verifies the envelope checksum; a mismatch is
/// [`RepositoryError::CorruptedData`](super::RepositoryError::CorruptedData).
#[async_trait]
pub trait SaveRepository: Send + Sync {
    async fn save(&self, state: &GameState) -> Result<()>;

    /// Returns `None` when no save exists yet.
    async fn load(&self) -> Result<Option<GameState>>;

    async fn exists(&self) -> bool;

    async fn delete(&self) -> Result<()>;
}

/// Seals `state` into an envelope and serializes it.
pub(crate) fn encode(state: &GameState) -> Result<Vec<u8>> {
    let envelope = SaveEnvelope::seal(state)?;
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

/// Parses and verifies an envelope produced by [`encode`].
pub(crate) fn decode(bytes: &[u8]) -> Result<GameState> {
    let envelope: SaveEnvelope = serde_json::from_slice(bytes)?;
    envelope.open()
}
