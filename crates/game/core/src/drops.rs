//! Monster-death reward resolution.
//!
//! Every drop-table entry is an independent Bernoulli trial. Equipment drops
//! additionally roll a drop level, a tier-weighted quality (unless the entry
//! pins one) and a starting enhancement. Skill pages are a separate check per
//! candidate skill declared on the monster.

use crate::config::GameConfig;
use crate::env::{Dice, DropKind, DropTable};
use crate::equipment::Quality;
use crate::floor::{self, FloorTier};

/// Equipment to be instantiated in the inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentDrop {
    pub item_id: String,
    pub level: u32,
    pub quality: Quality,
    pub enhancement: u32,
}

/// A single credited reward. Combat drops and minigame rewards share this
/// shape and the same inventory path.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Reward {
    Material { item_id: String, quantity: u32 },
    Consumable { item_id: String, quantity: u32 },
    Gem { item_id: String, quantity: u32 },
    Equipment(EquipmentDrop),
    SkillPage { skill_id: String, quantity: u32 },
    Gold(u64),
}

impl core::fmt::Display for Reward {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Reward::Material { item_id, quantity }
            | Reward::Consumable { item_id, quantity }
            | Reward::Gem { item_id, quantity } => write!(f, "{quantity}x {item_id}"),
            Reward::Equipment(drop) => write!(
                f,
                "{} {} Lv.{} +{}",
                drop.quality, drop.item_id, drop.level, drop.enhancement
            ),
            Reward::SkillPage { skill_id, quantity } => {
                write!(f, "{quantity}x {skill_id} page")
            }
            Reward::Gold(amount) => write!(f, "{amount} gold"),
        }
    }
}

/// Rolls a quality from the tier's weight row.
pub fn roll_quality(tier: FloorTier, dice: &mut Dice<'_>, config: &GameConfig) -> Quality {
    let weights = &config.drops.quality_weights[tier.quality_row()];
    Quality::ALL[dice.weighted(weights)]
}

/// Rolls a starting enhancement in `0..=limit/5`, halving the weight of each
/// step up. Higher qualities reach further.
pub fn roll_initial_enhancement(quality: Quality, dice: &mut Dice<'_>, config: &GameConfig) -> u32 {
    let ceiling = config.enhancement.limit(quality) / 5;
    let weights: Vec<u32> = (0..=ceiling).map(|step| 1u32 << (ceiling - step).min(30)).collect();
    (dice.weighted(&weights) as u32).min(config.enhancement.limit(quality))
}

/// Resolves all rewards for one kill on `floor`. Gold is credited separately.
pub fn resolve_drops(
    table: Option<&DropTable>,
    skill_page_candidates: &[String],
    floor: u32,
    dice: &mut Dice<'_>,
    config: &GameConfig,
) -> Vec<Reward> {
    let mut rewards = Vec::new();
    let tier = floor::tier(floor);

    for entry in table.map(|t| t.drops.as_slice()).unwrap_or_default() {
        if !dice.chance(entry.chance) {
            continue;
        }
        let quantity = dice.range(entry.min, entry.max.max(entry.min));
        if quantity == 0 {
            continue;
        }
        let item_id = entry.item_id.clone();
        match entry.kind {
            DropKind::Material => rewards.push(Reward::Material { item_id, quantity }),
            DropKind::Consumable => rewards.push(Reward::Consumable { item_id, quantity }),
            DropKind::Gem => rewards.push(Reward::Gem { item_id, quantity }),
            DropKind::Equipment => {
                for _ in 0..quantity {
                    let level = floor::drop_level(floor, dice, config.drops.level_jitter);
                    let quality = entry
                        .quality
                        .unwrap_or_else(|| roll_quality(tier, dice, config));
                    let enhancement = roll_initial_enhancement(quality, dice, config);
                    rewards.push(Reward::Equipment(EquipmentDrop {
                        item_id: item_id.clone(),
                        level,
                        quality,
                        enhancement,
                    }));
                }
            }
        }
    }

    for skill_id in skill_page_candidates {
        if dice.chance(config.drops.skill_page_chance) {
            rewards.push(Reward::SkillPage {
                skill_id: skill_id.clone(),
                quantity: 1,
            });
        }
    }

    rewards
}
