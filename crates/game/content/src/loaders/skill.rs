//! Skill catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_core::env::SkillDefinition;

use crate::loaders::{LoadResult, ensure_unique_ids, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillDefinition>,
}

pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SkillDefinition>> {
        let catalog: SkillCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        ensure_unique_ids("skill", catalog.skills.iter().map(|skill| skill.id.as_str()))?;
        for skill in &catalog.skills {
            if let Some(curve) = skill.trigger {
                if curve.per_level < 0.0 || curve.max < curve.base {
                    anyhow::bail!("skill '{}' has a decreasing trigger curve", skill.id);
                }
            }
        }

        Ok(catalog.skills)
    }
}
