//! Spawn pool loader: candidate monsters per `(theme, tier)`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_core::{Element, FloorTier};

use crate::loaders::{LoadResult, read_file};

/// One pool entry as written in `spawns.ron`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPoolSpec {
    pub theme: Element,
    pub tier: FloorTier,
    pub monsters: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnCatalog {
    pub pools: Vec<SpawnPoolSpec>,
}

pub struct SpawnPoolLoader;

impl SpawnPoolLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SpawnPoolSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SpawnPoolSpec>> {
        let catalog: SpawnCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spawn pool RON: {}", e))?;

        if let Some(pool) = catalog.pools.iter().find(|p| p.tier == FloorTier::Rest) {
            anyhow::bail!("rest floors never spawn, found a {} rest pool", pool.theme);
        }
        Ok(catalog.pools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_pools_are_rejected() {
        let err = SpawnPoolLoader::parse(r#"(pools: [(theme: frost, tier: rest, monsters: [])])"#)
            .unwrap_err();
        assert!(err.to_string().contains("frost rest pool"));
    }
}
