//! Derives effective stats from stored sources.
//!
//! Player: `(base + consumable + Σ equipment) × (1 + rebirth_bonus × rebirth_level)`
//! on the five core stats; HP/MP pools are never multiplied.
//!
//! Monster: `base × (1 + scaling × ⌊(floor - 1) / 10⌋)` on every stat and on
//! the gold reward.
//!
//! Item: `⌊base × quality × (1 + 0.05 (level - 1)) × (1 + 0.08 enhancement)⌋`,
//! at least 1 for every nonzero base stat. Enhancement counts up to the
//! quality ceiling only.

use super::{CombatStats, StatBlock};
use crate::config::GameConfig;
use crate::element::ElementTable;
use crate::env::{ContentOracle, ItemDefinition, MonsterDefinition};
use crate::equipment::EquipmentInstance;
use crate::state::PlayerState;

fn scale(value: u32, factor: f64) -> u32 {
    (f64::from(value) * factor).floor() as u32
}

fn scale_item_stat(value: u32, factor: f64) -> u32 {
    if value == 0 {
        0
    } else {
        scale(value, factor).max(1)
    }
}

/// Stats one equipped item adds to its wearer.
pub fn equipment_contribution(
    item: &EquipmentInstance,
    definition: &ItemDefinition,
    config: &GameConfig,
) -> (StatBlock, ElementTable) {
    let tuning = &config.enhancement;
    let enhancement = item.enhancement.min(tuning.limit(item.quality));
    let factor = item.quality.multiplier()
        * (1.0 + tuning.item_level_bonus * f64::from(item.level.saturating_sub(1)))
        * (1.0 + tuning.stat_bonus_per_level * f64::from(enhancement));

    let stats = definition.base_stats.map(|value| scale_item_stat(value, factor));

    let mut elements = ElementTable::default();
    for (element, base) in definition.elements.iter() {
        let entry = elements.get_mut(element);
        entry.attack = scale_item_stat(base.attack, factor);
        entry.resistance = scale_item_stat(base.resistance, factor);
    }
    (stats, elements)
}

/// Effective player stats. Items without a known definition contribute nothing.
pub fn resolve_player(
    player: &PlayerState,
    content: &dyn ContentOracle,
    config: &GameConfig,
) -> CombatStats {
    let mut stats = player.base;
    stats.add(&player.consumable_bonus);

    let mut elements = ElementTable::default();
    for item in player.equipment.iter() {
        if let Some(definition) = content.item(&item.item_id) {
            let (item_stats, item_elements) = equipment_contribution(item, definition, config);
            stats.add(&item_stats);
            elements.accumulate(&item_elements);
        }
    }

    let rebirth =
        1.0 + config.progression.rebirth_stat_bonus * f64::from(player.rebirth_level);
    CombatStats {
        stats: stats.map_core(|value| scale(value, rebirth)),
        elements,
        theme: None,
    }
}

/// Monster stat multiplier for `floor`.
pub fn monster_scaling(floor: u32, config: &GameConfig) -> f64 {
    let blocks = floor.saturating_sub(1) / 10;
    1.0 + config.progression.monster_scaling_per_block * f64::from(blocks)
}

/// Effective monster stats plus its scaled gold reward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedMonster {
    pub combat: CombatStats,
    pub gold_reward: u64,
}

pub fn resolve_monster(
    definition: &MonsterDefinition,
    floor: u32,
    config: &GameConfig,
) -> ResolvedMonster {
    let factor = monster_scaling(floor, config);

    let mut elements = ElementTable::default();
    for &element in &definition.resistances {
        elements.get_mut(element).resistance = config.combat.monster_listed_resistance;
    }

    // MP is not a scaled stat.
    let mut stats = definition.stats.map(|value| scale(value, factor));
    stats.max_mp = definition.stats.max_mp;

    ResolvedMonster {
        combat: CombatStats {
            stats,
            elements,
            theme: Some(definition.theme),
        },
        gold_reward: (definition.gold_reward as f64 * factor).floor() as u64,
    }
}
