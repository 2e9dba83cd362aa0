//! In-memory content store implementing [`ContentOracle`].
//!
//! Used directly by tests and offline tools, and as the runtime's content
//! cache: entries are inserted as they are fetched, and ids the repository
//! reported as unknown are remembered so the engine can fall back to a
//! generic definition instead of asking again.

use std::collections::{HashMap, HashSet};

use super::{
    ContentEntry, ContentKey, ContentOracle, DropTable, ItemDefinition, MonsterDefinition,
    SkillDefinition,
};
use crate::element::Element;
use crate::floor::FloorTier;

#[derive(Clone, Debug, Default)]
pub struct ContentSnapshot {
    monsters: HashMap<String, MonsterDefinition>,
    skills: HashMap<String, SkillDefinition>,
    items: HashMap<String, ItemDefinition>,
    drop_tables: HashMap<String, DropTable>,
    spawn_pools: HashMap<(Element, FloorTier), Vec<String>>,
    missing: HashSet<ContentKey>,
    /// Every key not present is known to be missing.
    complete: bool,
}

impl ContentSnapshot {
    /// An empty cache to be filled incrementally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a complete snapshot from loaded catalogs. Keys absent from the
    /// catalogs are treated as known-missing.
    pub fn from_catalogs(
        monsters: Vec<MonsterDefinition>,
        skills: Vec<SkillDefinition>,
        items: Vec<ItemDefinition>,
        drop_tables: Vec<DropTable>,
        spawn_pools: Vec<(Element, FloorTier, Vec<String>)>,
    ) -> Self {
        let mut snapshot = Self::new();
        for def in monsters {
            snapshot.insert(ContentEntry::Monster(def));
        }
        for def in skills {
            snapshot.insert(ContentEntry::Skill(def));
        }
        for def in items {
            snapshot.insert(ContentEntry::Item(def));
        }
        for table in drop_tables {
            snapshot.insert(ContentEntry::DropTable(table));
        }
        for (theme, tier, monsters) in spawn_pools {
            snapshot.insert(ContentEntry::SpawnPool {
                theme,
                tier,
                monsters,
            });
        }
        snapshot.complete = true;
        snapshot
    }

    /// True when this snapshot holds the whole catalog.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn insert(&mut self, entry: ContentEntry) {
        self.missing.remove(&entry.key());
        match entry {
            ContentEntry::Monster(def) => {
                self.monsters.insert(def.id.clone(), def);
            }
            ContentEntry::Skill(def) => {
                self.skills.insert(def.id.clone(), def);
            }
            ContentEntry::Item(def) => {
                self.items.insert(def.id.clone(), def);
            }
            ContentEntry::DropTable(table) => {
                self.drop_tables.insert(table.id.clone(), table);
            }
            ContentEntry::SpawnPool {
                theme,
                tier,
                monsters,
            } => {
                self.spawn_pools.entry((theme, tier)).or_default().extend(monsters);
            }
        }
    }

    /// Records that `key` does not exist upstream.
    pub fn mark_missing(&mut self, key: ContentKey) {
        self.missing.insert(key);
    }

    pub fn is_missing(&self, key: &ContentKey) -> bool {
        self.missing.contains(key)
    }

    /// Looks up the cached entry for `key`, if present.
    pub fn entry(&self, key: &ContentKey) -> Option<ContentEntry> {
        match key {
            ContentKey::Monster(id) => self.monsters.get(id).cloned().map(ContentEntry::Monster),
            ContentKey::Skill(id) => self.skills.get(id).cloned().map(ContentEntry::Skill),
            ContentKey::Item(id) => self.items.get(id).cloned().map(ContentEntry::Item),
            ContentKey::DropTable(id) => {
                self.drop_tables.get(id).cloned().map(ContentEntry::DropTable)
            }
            ContentKey::SpawnPool(theme, tier) => {
                self.spawn_pools
                    .get(&(*theme, *tier))
                    .map(|monsters| ContentEntry::SpawnPool {
                        theme: *theme,
                        tier: *tier,
                        monsters: monsters.clone(),
                    })
            }
        }
    }

    pub fn monsters(&self) -> impl Iterator<Item = &MonsterDefinition> {
        self.monsters.values()
    }

    pub fn skills(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    pub fn drop_tables(&self) -> impl Iterator<Item = &DropTable> {
        self.drop_tables.values()
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
            + self.skills.len()
            + self.items.len()
            + self.drop_tables.len()
            + self.spawn_pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentOracle for ContentSnapshot {
    fn monster(&self, id: &str) -> Option<&MonsterDefinition> {
        self.monsters.get(id)
    }

    fn skill(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    fn drop_table(&self, id: &str) -> Option<&DropTable> {
        self.drop_tables.get(id)
    }

    fn spawn_pool(&self, theme: Element, tier: FloorTier) -> Option<&[String]> {
        self.spawn_pools.get(&(theme, tier)).map(Vec::as_slice)
    }

    fn contains(&self, key: &ContentKey) -> bool {
        if self.complete || self.missing.contains(key) {
            return true;
        }
        match key {
            ContentKey::Monster(id) => self.monsters.contains_key(id),
            ContentKey::Skill(id) => self.skills.contains_key(id),
            ContentKey::Item(id) => self.items.contains_key(id),
            ContentKey::DropTable(id) => self.drop_tables.contains_key(id),
            ContentKey::SpawnPool(theme, tier) => self.spawn_pools.contains_key(&(*theme, *tier)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_count_as_resolved() {
        let mut snapshot = ContentSnapshot::new();
        let key = ContentKey::Monster("ghost".into());
        assert!(!snapshot.contains(&key));

        snapshot.mark_missing(key.clone());
        assert!(snapshot.contains(&key));
        assert!(snapshot.monster("ghost").is_none());
    }

    #[test]
    fn complete_snapshot_resolves_every_key() {
        let snapshot = ContentSnapshot::from_catalogs(vec![], vec![], vec![], vec![], vec![]);
        assert!(snapshot.contains(&ContentKey::Item("anything".into())));
        assert!(snapshot.item("anything").is_none());
    }

    #[test]
    fn insert_clears_missing_marker() {
        let mut snapshot = ContentSnapshot::new();
        let key = ContentKey::Skill("fireball".into());
        snapshot.mark_missing(key.clone());
        snapshot.insert(ContentEntry::Skill(SkillDefinition::generic("fireball")));
        assert!(!snapshot.is_missing(&key));
        assert!(snapshot.skill("fireball").is_some());
    }

    #[test]
    fn spawn_pools_merge_by_theme_and_tier() {
        let mut snapshot = ContentSnapshot::new();
        for id in ["imp", "salamander"] {
            snapshot.insert(ContentEntry::SpawnPool {
                theme: Element::Flame,
                tier: FloorTier::Normal,
                monsters: vec![id.to_string()],
            });
        }
        assert_eq!(
            snapshot.spawn_pool(Element::Flame, FloorTier::Normal),
            Some(&["imp".to_string(), "salamander".to_string()][..])
        );
        assert!(snapshot.spawn_pool(Element::Flame, FloorTier::Boss).is_none());
    }
}
