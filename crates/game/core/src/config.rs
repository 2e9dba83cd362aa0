use crate::equipment::Quality;

/// Game configuration constants and tunable parameters.
///
/// Every numeric knob of the simulation lives here so content authors can
/// rebalance without touching code. Loaded from `config.toml` by the content
/// crate; missing keys fall back to the defaults below.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub combat: CombatTuning,
    pub progression: ProgressionTuning,
    pub enhancement: EnhancementTuning,
    pub skills: SkillTuning,
    pub drops: DropTuning,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of active skills that can be equipped at once.
    pub const MAX_EQUIPPED_SKILLS: usize = 4;

    pub fn new() -> Self {
        Self {
            combat: CombatTuning::default(),
            progression: ProgressionTuning::default(),
            enhancement: EnhancementTuning::default(),
            skills: SkillTuning::default(),
            drops: DropTuning::default(),
        }
    }

    /// Delay between auto-combat turns for a speed multiplier.
    ///
    /// `delay = max(min_turn_delay_ms, base_turn_delay_ms / speed)`
    pub fn turn_delay_ms(&self, speed: u32) -> u64 {
        let speed = u64::from(speed.max(1));
        (self.combat.base_turn_delay_ms / speed).max(self.combat.min_turn_delay_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn timing and damage formula constants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatTuning {
    pub base_turn_delay_ms: u64,
    pub min_turn_delay_ms: u64,
    /// Highest accepted auto-combat speed multiplier.
    pub max_auto_speed: u32,
    /// Fraction of defense subtracted from raw damage.
    pub defense_factor: f64,
    /// Crit chance in percent per point of speed.
    pub crit_chance_per_speed: f64,
    pub crit_chance_cap: f64,
    pub crit_multiplier: f64,
    pub weakness_multiplier: f64,
    pub disadvantage_multiplier: f64,
    /// Damage reduction per point of elemental resistance.
    pub resistance_reduction_per_point: f64,
    pub resistance_reduction_cap: f64,
    pub min_elemental_multiplier: f64,
    /// Resistance value a monster has against each element it lists as resisted.
    pub monster_listed_resistance: u32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            base_turn_delay_ms: 2000,
            min_turn_delay_ms: 1000,
            max_auto_speed: 10,
            defense_factor: 0.5,
            crit_chance_per_speed: 0.1,
            crit_chance_cap: 50.0,
            crit_multiplier: 1.5,
            weakness_multiplier: 1.5,
            disadvantage_multiplier: 0.7,
            resistance_reduction_per_point: 0.005,
            resistance_reduction_cap: 0.5,
            min_elemental_multiplier: 0.1,
            monster_listed_resistance: 40,
        }
    }
}

/// Floor, rebirth and defeat rules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionTuning {
    /// Rebirth bonus applied to the five core combat stats, per rebirth level.
    pub rebirth_stat_bonus: f64,
    /// Monster stat growth per completed block of ten floors.
    pub monster_scaling_per_block: f64,
    /// Rebirth becomes available strictly above this floor.
    pub rebirth_floor: u32,
    pub rebirth_ap_per_floor: u32,
    pub rebirth_ap_bonus_every: u32,
    pub rebirth_ap_bonus: u32,
    /// Floors lost on player defeat.
    pub death_floor_rollback: u32,
    /// Delay before a new encounter is spawned after defeat.
    pub death_grace_ms: u64,
    pub max_log_entries: usize,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            rebirth_stat_bonus: 0.05,
            monster_scaling_per_block: 0.2,
            rebirth_floor: 100,
            rebirth_ap_per_floor: 2,
            rebirth_ap_bonus_every: 50,
            rebirth_ap_bonus: 10,
            death_floor_rollback: 3,
            death_grace_ms: 3000,
            max_log_entries: 200,
        }
    }
}

/// Enhancement ceilings and cost/success curves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnhancementTuning {
    /// Ceiling per quality, indexed Common..Legendary.
    pub limits: [u32; Quality::COUNT],
    pub base_cost: f64,
    pub level_cost_factor: f64,
    pub cost_growth: f64,
    pub base_success_rate: u32,
    pub success_rate_step: u32,
    pub min_success_rate: u32,
    /// Stat bonus per enhancement level.
    pub stat_bonus_per_level: f64,
    /// Stat bonus per item level above 1.
    pub item_level_bonus: f64,
}

impl EnhancementTuning {
    pub fn limit(&self, quality: Quality) -> u32 {
        self.limits[quality.index()]
    }
}

impl Default for EnhancementTuning {
    fn default() -> Self {
        Self {
            limits: [5, 10, 15, 20, 25],
            base_cost: 100.0,
            level_cost_factor: 1.5,
            cost_growth: 2.0,
            base_success_rate: 80,
            success_rate_step: 5,
            min_success_rate: 50,
            stat_bonus_per_level: 0.08,
            item_level_bonus: 0.05,
        }
    }
}

/// Skill XP, cost and trigger curve constants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillTuning {
    pub pages_to_unlock: u32,
    pub base_max_xp: u32,
    pub max_xp_growth: f64,
    pub xp_cast: u32,
    pub xp_kill: u32,
    pub xp_kill_weak: u32,
    pub xp_perfect: u32,
    pub ap_cost: u32,
    pub base_gold_cost: f64,
    pub gold_cost_growth: f64,
    /// Trigger chance before any checkpoint is reached.
    pub checkpoint_base: u32,
    pub checkpoint_step: u32,
    pub checkpoint_cap: u32,
    pub checkpoints: Vec<u32>,
}

impl Default for SkillTuning {
    fn default() -> Self {
        Self {
            pages_to_unlock: 3,
            base_max_xp: 100,
            max_xp_growth: 1.2,
            xp_cast: 1,
            xp_kill: 5,
            xp_kill_weak: 20,
            xp_perfect: 15,
            ap_cost: 1,
            base_gold_cost: 100.0,
            gold_cost_growth: 1.5,
            checkpoint_base: 10,
            checkpoint_step: 5,
            checkpoint_cap: 95,
            checkpoints: vec![1, 5, 10, 15, 20, 25, 30, 40, 50, 75, 100],
        }
    }
}

/// Drop resolution constants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DropTuning {
    /// Chance (0..1) per monster-declared skill page candidate.
    pub skill_page_chance: f64,
    /// Drop level jitter, applied as `±jitter`.
    pub level_jitter: i32,
    /// Quality weights (Common..Legendary) per tier: normal, elite, boss.
    pub quality_weights: [[u32; Quality::COUNT]; 3],
    /// Gold value per item level for equipment sales.
    pub sell_value_per_level: f64,
}

impl Default for DropTuning {
    fn default() -> Self {
        Self {
            skill_page_chance: 0.2,
            level_jitter: 3,
            quality_weights: [[60, 25, 10, 4, 1], [40, 30, 18, 9, 3], [20, 30, 25, 17, 8]],
            sell_value_per_level: 25.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_delay_respects_floor() {
        let config = GameConfig::default();
        assert_eq!(config.turn_delay_ms(1), 2000);
        assert_eq!(config.turn_delay_ms(2), 1000);
        assert_eq!(config.turn_delay_ms(4), 1000);
        assert_eq!(config.turn_delay_ms(0), 2000);
    }

    #[test]
    fn enhancement_limits_by_quality() {
        let tuning = EnhancementTuning::default();
        assert_eq!(tuning.limit(Quality::Common), 5);
        assert_eq!(tuning.limit(Quality::Epic), 20);
        assert_eq!(tuning.limit(Quality::Legendary), 25);
    }
}
