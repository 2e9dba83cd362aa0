//! In-memory ContentRepository backed by a [`ContentSnapshot`].

use std::time::Duration;

use async_trait::async_trait;
use tower_core::env::{DropTable, ItemDefinition, MonsterDefinition, SkillDefinition};
use tower_core::{ContentKey, ContentOracle, ContentSnapshot, Element, FloorTier};

use crate::repository::{ContentError, ContentRepository};

/// Serves definitions from a loaded snapshot.
///
/// An optional per-lookup latency simulates a slow store.
pub struct InMemoryContentRepository {
    snapshot: ContentSnapshot,
    latency: Option<Duration>,
}

impl InMemoryContentRepository {
    pub fn new(snapshot: ContentSnapshot) -> Self {
        Self {
            snapshot,
            latency: None,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn monster(&self, id: &str) -> Result<MonsterDefinition, ContentError> {
        self.delay().await;
        self.snapshot
            .monster(id)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(ContentKey::Monster(id.to_string())))
    }

    async fn skill(&self, id: &str) -> Result<SkillDefinition, ContentError> {
        self.delay().await;
        self.snapshot
            .skill(id)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(ContentKey::Skill(id.to_string())))
    }

    async fn item(&self, id: &str) -> Result<ItemDefinition, ContentError> {
        self.delay().await;
        self.snapshot
            .item(id)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(ContentKey::Item(id.to_string())))
    }

    async fn drop_table(&self, id: &str) -> Result<DropTable, ContentError> {
        self.delay().await;
        self.snapshot
            .drop_table(id)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(ContentKey::DropTable(id.to_string())))
    }

    async fn spawn_pool(&self, theme: Element, tier: FloorTier) -> Result<Vec<String>, ContentError> {
        self.delay().await;
        self.snapshot
            .spawn_pool(theme, tier)
            .map(<[String]>::to_vec)
            .ok_or(ContentError::NotFound(ContentKey::SpawnPool(theme, tier)))
    }
}
