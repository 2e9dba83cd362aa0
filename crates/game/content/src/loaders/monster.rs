//! Monster catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_core::env::MonsterDefinition;

use crate::loaders::{LoadResult, ensure_unique_ids, read_file};

/// Monster catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterCatalog {
    pub monsters: Vec<MonsterDefinition>,
}

/// Loader for monster catalog from RON files.
pub struct MonsterLoader;

impl MonsterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<MonsterDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<MonsterDefinition>> {
        let catalog: MonsterCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse monster catalog RON: {}", e))?;

        ensure_unique_ids(
            "monster",
            catalog.monsters.iter().map(|monster| monster.id.as_str()),
        )?;
        for monster in &catalog.monsters {
            if monster.stats.max_hp == 0 {
                anyhow::bail!("monster '{}' has no HP", monster.id);
            }
            for skill in &monster.skills {
                if !(0.0..=100.0).contains(&skill.chance) {
                    anyhow::bail!(
                        "monster '{}' skill '{}' has chance {} outside 0..=100",
                        monster.id,
                        skill.name,
                        skill.chance
                    );
                }
            }
        }

        Ok(catalog.monsters)
    }
}
