//! Drop table catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_core::env::DropTable;

use crate::loaders::{LoadResult, ensure_unique_ids, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropTableCatalog {
    pub tables: Vec<DropTable>,
}

pub struct DropTableLoader;

impl DropTableLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<DropTable>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses and checks every entry: chance in `[0, 1]`, `min <= max`.
    pub fn parse(content: &str) -> LoadResult<Vec<DropTable>> {
        let catalog: DropTableCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse drop table RON: {}", e))?;

        ensure_unique_ids("drop table", catalog.tables.iter().map(|t| t.id.as_str()))?;
        for table in &catalog.tables {
            for entry in &table.drops {
                if !(0.0..=1.0).contains(&entry.chance) {
                    anyhow::bail!(
                        "drop table '{}': chance {} for '{}' is outside 0..=1",
                        table.id,
                        entry.chance,
                        entry.item_id
                    );
                }
                if entry.min > entry.max {
                    anyhow::bail!(
                        "drop table '{}': min {} > max {} for '{}'",
                        table.id,
                        entry.min,
                        entry.max,
                        entry.item_id
                    );
                }
            }
        }

        Ok(catalog.tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_core::Quality;
    use tower_core::env::DropKind;

    #[test]
    fn parses_entries_in_order() {
        let tables = DropTableLoader::parse(
            r#"(
                tables: [
                    (
                        id: "flame_common",
                        drops: [
                            (item_id: "ember_shard", chance: 0.6, min: 1, max: 3, kind: material),
                            (item_id: "ember_blade", chance: 0.05, min: 1, max: 1, kind: equipment, quality: Some(fine)),
                        ],
                    ),
                ],
            )"#,
        )
        .unwrap();
        let drops = &tables[0].drops;
        assert_eq!(drops[0].kind, DropKind::Material);
        assert_eq!(drops[1].quality, Some(Quality::Fine));
        assert_eq!(drops[0].quality, None);
    }

    #[test]
    fn chance_above_one_is_rejected() {
        let err = DropTableLoader::parse(
            r#"(tables: [(id: "bad", drops: [(item_id: "x", chance: 20.0, min: 1, max: 1, kind: gem)])])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside 0..=1"));
    }
}
