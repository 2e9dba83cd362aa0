//! Content loaders for reading game data from files.
//!
//! Each loader parses one RON catalog (or the TOML config) into `tower-core`
//! definition types; [`ContentFactory`] ties them to a data directory.

pub mod config;
pub mod drops;
pub mod factory;
pub mod item;
pub mod monster;
pub mod skill;
pub mod spawns;

pub use config::ConfigLoader;
pub use drops::DropTableLoader;
pub use factory::{ContentFactory, dangling_references};
pub use item::ItemLoader;
pub use monster::MonsterLoader;
pub use skill::SkillLoader;
pub use spawns::{SpawnPoolLoader, SpawnPoolSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Fails on the first id that appears twice in a catalog.
pub(crate) fn ensure_unique_ids<'a>(
    catalog: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> LoadResult<()> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("duplicate id '{}' in {} catalog", id, catalog);
        }
    }
    Ok(())
}
