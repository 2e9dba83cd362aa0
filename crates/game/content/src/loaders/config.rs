//! Game configuration loader.

use std::path::Path;

use tower_core::{GameConfig, Quality};

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Every table and key is optional; anything left out keeps its default.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        let enhancement = &config.enhancement;
        for pair in Quality::ALL.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            if enhancement.limit(higher) < enhancement.limit(lower) {
                anyhow::bail!(
                    "enhancement limit for {higher} ({}) is below {lower} ({})",
                    enhancement.limit(higher),
                    enhancement.limit(lower)
                );
            }
        }
        if config.combat.max_auto_speed == 0 {
            anyhow::bail!("combat.max_auto_speed must be at least 1");
        }

        Ok(config)
    }
}
