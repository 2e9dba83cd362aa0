//! Content factory for building the content snapshot from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tower_core::GameConfig;
use tower_core::env::{
    ContentOracle, ContentSnapshot, DropTable, ItemCategory, ItemDefinition, MonsterDefinition,
    SkillDefinition,
};

use crate::loaders::{
    ConfigLoader, DropTableLoader, ItemLoader, LoadResult, MonsterLoader, SkillLoader,
    SpawnPoolLoader, SpawnPoolSpec,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── monsters.ron
/// ├── skills.ron
/// ├── items.ron
/// ├── drop_tables.ron
/// └── spawns.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`. A missing file yields the
    /// defaults.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path).with_context(|| format!("loading {}", path.display()))
    }

    pub fn load_monsters(&self) -> LoadResult<Vec<MonsterDefinition>> {
        let path = self.data_dir.join("monsters.ron");
        MonsterLoader::load(&path).with_context(|| format!("loading {}", path.display()))
    }

    pub fn load_skills(&self) -> LoadResult<Vec<SkillDefinition>> {
        let path = self.data_dir.join("skills.ron");
        SkillLoader::load(&path).with_context(|| format!("loading {}", path.display()))
    }

    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        let path = self.data_dir.join("items.ron");
        ItemLoader::load(&path).with_context(|| format!("loading {}", path.display()))
    }

    pub fn load_drop_tables(&self) -> LoadResult<Vec<DropTable>> {
        let path = self.data_dir.join("drop_tables.ron");
        DropTableLoader::load(&path).with_context(|| format!("loading {}", path.display()))
    }

    pub fn load_spawn_pools(&self) -> LoadResult<Vec<SpawnPoolSpec>> {
        let path = self.data_dir.join("spawns.ron");
        SpawnPoolLoader::load(&path).with_context(|| format!("loading {}", path.display()))
    }

    /// Loads every catalog into one complete snapshot.
    pub fn load_snapshot(&self) -> LoadResult<ContentSnapshot> {
        let pools = self
            .load_spawn_pools()?
            .into_iter()
            .map(|pool| (pool.theme, pool.tier, pool.monsters))
            .collect();

        Ok(ContentSnapshot::from_catalogs(
            self.load_monsters()?,
            self.load_skills()?,
            self.load_items()?,
            self.load_drop_tables()?,
            pools,
        ))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Lists references between catalogs that do not resolve.
///
/// Dangling references are not fatal: the simulation falls back to generic
/// definitions. Callers usually log these as warnings.
pub fn dangling_references(snapshot: &ContentSnapshot) -> Vec<String> {
    let mut issues = Vec::new();

    for monster in snapshot.monsters() {
        if let Some(table) = &monster.drop_table_id {
            if snapshot.drop_table(table).is_none() {
                issues.push(format!("monster '{}' drops from unknown table '{table}'", monster.id));
            }
        }
        for skill in &monster.skill_page_drops {
            if snapshot.skill(skill).is_none() {
                issues.push(format!("monster '{}' drops pages of unknown skill '{skill}'", monster.id));
            }
        }
    }

    for table in snapshot.drop_tables() {
        for entry in &table.drops {
            match snapshot.item(&entry.item_id) {
                None => issues.push(format!(
                    "drop table '{}' references unknown item '{}'",
                    table.id, entry.item_id
                )),
                Some(item) if item.category == ItemCategory::Equipment && item.slot.is_none() => {
                    issues.push(format!("item '{}' is equipment without a slot", item.id))
                }
                Some(_) => {}
            }
        }
    }

    issues.sort();
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_core::{Element, FloorTier};

    fn shipped_data() -> ContentFactory {
        ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../data"))
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn shipped_content_loads_without_dangling_references() {
        let factory = shipped_data();
        let snapshot = factory.load_snapshot().unwrap();
        assert!(snapshot.is_complete());
        assert!(snapshot.monster("ember_slime").is_some());
        assert!(snapshot.spawn_pool(Element::Flame, FloorTier::Normal).is_some());
        assert_eq!(dangling_references(&snapshot), Vec::<String>::new());

        let config = factory.load_config().unwrap();
        assert_eq!(config.progression.rebirth_floor, 100);
    }

    #[test]
    fn every_spawn_pool_monster_exists() {
        let factory = shipped_data();
        let snapshot = factory.load_snapshot().unwrap();
        for pool in factory.load_spawn_pools().unwrap() {
            for id in &pool.monsters {
                let monster = snapshot.monster(id).unwrap();
                assert_eq!(monster.theme, pool.theme, "{id} is in the wrong pool");
            }
        }
    }

    #[test]
    fn missing_catalog_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentFactory::new(dir.path()).load_snapshot().unwrap_err();
        assert!(format!("{err:#}").contains("spawns.ron"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ContentFactory::new(dir.path()).load_config().unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn dangling_table_is_reported() {
        let mut monster = MonsterDefinition::generic("lost", Element::Frost, FloorTier::Normal);
        monster.drop_table_id = Some("nowhere".into());
        let snapshot = ContentSnapshot::from_catalogs(vec![monster], vec![], vec![], vec![], vec![]);
        assert_eq!(
            dangling_references(&snapshot),
            vec!["monster 'lost' drops from unknown table 'nowhere'".to_string()]
        );
    }
}
