//! Item catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_core::env::{ItemCategory, ItemDefinition};

use crate::loaders::{LoadResult, ensure_unique_ids, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing ItemCatalog
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemDefinition>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        ensure_unique_ids("item", catalog.items.iter().map(|item| item.id.as_str()))?;
        for item in &catalog.items {
            match item.category {
                ItemCategory::Equipment if item.slot.is_none() => {
                    anyhow::bail!("equipment item '{}' has no slot", item.id)
                }
                ItemCategory::Consumable if item.consumable.is_none() => {
                    anyhow::bail!("consumable item '{}' has no effect", item.id)
                }
                _ => {}
            }
        }

        Ok(catalog.items)
    }
}
