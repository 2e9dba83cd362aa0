//! Enhancement cost and success curves.
//!
//! ```text
//! cost    = floor(base_cost * level * level_cost_factor * cost_growth^enhancement)
//! success = max(min_success_rate, base_success_rate - step * enhancement)   (percent)
//! ```
//!
//! The cost is charged whether the roll succeeds or not.

use super::EquipmentInstance;
use crate::config::GameConfig;
use crate::env::Dice;

/// Gold cost of the next enhancement attempt.
pub fn enhancement_cost(item: &EquipmentInstance, config: &GameConfig) -> u64 {
    let tuning = &config.enhancement;
    let cost = tuning.base_cost
        * f64::from(item.level)
        * tuning.level_cost_factor
        * tuning.cost_growth.powi(item.enhancement as i32);
    cost.floor() as u64
}

/// Success chance of the next attempt, in percent.
pub fn enhancement_success_rate(item: &EquipmentInstance, config: &GameConfig) -> u32 {
    let tuning = &config.enhancement;
    tuning
        .base_success_rate
        .saturating_sub(tuning.success_rate_step.saturating_mul(item.enhancement))
        .max(tuning.min_success_rate)
}

/// Result of a single enhancement attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnhanceOutcome {
    /// Already at the quality ceiling. Nothing charged.
    AtLimit { limit: u32 },
    /// Stored enhancement is above the ceiling. Nothing charged or changed.
    OverLimit { found: u32, limit: u32 },
    /// Not enough gold. Nothing charged.
    InsufficientGold { cost: u64, available: u64 },
    /// Roll made; `cost` must be debited in both cases.
    Rolled { success: bool, cost: u64 },
}

/// Attempts to enhance `item` using one roll from `dice`.
///
/// Mutates `item` only on a successful roll. The caller debits the returned
/// cost for every [`EnhanceOutcome::Rolled`] result.
pub fn enhance(
    item: &mut EquipmentInstance,
    gold: u64,
    dice: &mut Dice<'_>,
    config: &GameConfig,
) -> EnhanceOutcome {
    let limit = config.enhancement.limit(item.quality);
    if item.enhancement > limit {
        return EnhanceOutcome::OverLimit {
            found: item.enhancement,
            limit,
        };
    }
    if item.enhancement == limit {
        return EnhanceOutcome::AtLimit { limit };
    }

    let cost = enhancement_cost(item, config);
    if gold < cost {
        return EnhanceOutcome::InsufficientGold {
            cost,
            available: gold,
        };
    }

    let rate = enhancement_success_rate(item, config);
    let success = dice.d100() <= rate;
    if success {
        item.enhancement += 1;
    }
    EnhanceOutcome::Rolled { success, cost }
}
