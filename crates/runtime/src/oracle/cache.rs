//! Content cache filled from the async repository.

use tower_core::{ContentEntry, ContentKey, ContentSnapshot};

use crate::repository::ContentError;

/// Result of fetching one key.
pub type Fetched = (ContentKey, Result<ContentEntry, ContentError>);

/// Incremental [`ContentSnapshot`] plus bookkeeping for fallbacks.
///
/// Keys the repository cannot answer are remembered as missing, so the
/// engine falls back to a generic definition and never asks twice.
#[derive(Debug, Default)]
pub struct ContentCache {
    snapshot: ContentSnapshot,
    fallbacks: usize,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cache with a pre-loaded snapshot.
    pub fn from_snapshot(snapshot: ContentSnapshot) -> Self {
        Self {
            snapshot,
            fallbacks: 0,
        }
    }

    pub fn snapshot(&self) -> &ContentSnapshot {
        &self.snapshot
    }

    /// Number of keys that fell back to a generic definition so far.
    pub fn fallbacks(&self) -> usize {
        self.fallbacks
    }

    /// Stores fetched entries; failures become known-missing keys.
    pub fn apply(&mut self, results: Vec<Fetched>) {
        for (key, result) in results {
            match result {
                Ok(entry) => {
                    tracing::trace!(target: "runtime::content", %key, "cached");
                    self.snapshot.insert(entry);
                }
                Err(error) => {
                    tracing::warn!(
                        target: "runtime::content",
                        %key,
                        %error,
                        "content missing, using generic fallback"
                    );
                    self.fallbacks += 1;
                    self.snapshot.mark_missing(key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_core::ContentOracle;
    use tower_core::env::SkillDefinition;

    #[test]
    fn failures_are_remembered_as_missing() {
        let mut cache = ContentCache::new();
        let found = ContentKey::Skill("fireball".into());
        let lost = ContentKey::Skill("lost_art".into());

        cache.apply(vec![
            (
                found.clone(),
                Ok(ContentEntry::Skill(SkillDefinition::generic("fireball"))),
            ),
            (lost.clone(), Err(ContentError::NotFound(lost.clone()))),
        ]);

        assert!(cache.snapshot().contains(&found));
        assert!(cache.snapshot().contains(&lost));
        assert!(cache.snapshot().skill("lost_art").is_none());
        assert_eq!(cache.fallbacks(), 1);
    }
}
