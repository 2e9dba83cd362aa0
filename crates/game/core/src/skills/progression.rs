//! Unlock, XP and level-up rules.
//!
//! - Unlock consumes `pages_to_unlock` pages and creates a level-1 instance.
//! - XP is clamped at `max_xp`; levels never advance on their own.
//! - Level-up needs a full bar, AP and gold, and resets XP to zero.

use super::{SkillBook, SkillInstance, XpEvent};
use crate::config::SkillTuning;
use crate::env::{BASIC_ATTACK, SkillDefinition};
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkillError {
    #[error("need {needed} pages of {skill_id}, have {owned}")]
    NotEnoughPages {
        skill_id: String,
        needed: u32,
        owned: u32,
    },

    #[error("{0} is already unlocked")]
    AlreadyOwned(String),

    #[error("{0} is not unlocked")]
    NotOwned(String),

    #[error("{skill_id} needs {needed} XP to level up, has {current}")]
    XpNotFull {
        skill_id: String,
        current: u32,
        needed: u32,
    },

    #[error("level up needs {needed} AP, have {available}")]
    NotEnoughAp { needed: u32, available: u32 },

    #[error("level up needs {needed} gold, have {available}")]
    NotEnoughGold { needed: u64, available: u64 },

    #[error("{0} is already equipped")]
    AlreadyEquipped(String),

    #[error("{0} is not equipped")]
    NotEquipped(String),

    #[error("{0} is passive and cannot be equipped")]
    Passive(String),

    #[error("the basic attack is always active")]
    AlwaysActive,

    #[error("at most {max} skills can be equipped")]
    LoadoutFull { max: usize },
}

impl GameError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotEnoughPages { .. }
            | Self::XpNotFull { .. }
            | Self::NotEnoughAp { .. }
            | Self::NotEnoughGold { .. }
            | Self::LoadoutFull { .. } => ErrorSeverity::Recoverable,
            Self::AlreadyOwned(_)
            | Self::NotOwned(_)
            | Self::AlreadyEquipped(_)
            | Self::NotEquipped(_)
            | Self::Passive(_)
            | Self::AlwaysActive => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotEnoughPages { .. } => "SKILL_NOT_ENOUGH_PAGES",
            Self::AlreadyOwned(_) => "SKILL_ALREADY_OWNED",
            Self::NotOwned(_) => "SKILL_NOT_OWNED",
            Self::XpNotFull { .. } => "SKILL_XP_NOT_FULL",
            Self::NotEnoughAp { .. } => "SKILL_NOT_ENOUGH_AP",
            Self::NotEnoughGold { .. } => "SKILL_NOT_ENOUGH_GOLD",
            Self::AlreadyEquipped(_) => "SKILL_ALREADY_EQUIPPED",
            Self::NotEquipped(_) => "SKILL_NOT_EQUIPPED",
            Self::Passive(_) => "SKILL_PASSIVE",
            Self::AlwaysActive => "SKILL_ALWAYS_ACTIVE",
            Self::LoadoutFull { .. } => "SKILL_LOADOUT_FULL",
        }
    }
}

/// Trigger chance in percent at `level`.
///
/// The basic attack always fires. Skills with a content curve use it;
/// everything else gains `checkpoint_step` for each checkpoint level reached.
pub fn trigger_chance(definition: &SkillDefinition, level: u32, tuning: &SkillTuning) -> f64 {
    if definition.id == BASIC_ATTACK {
        return 100.0;
    }
    if let Some(curve) = definition.trigger {
        let value = curve.base + f64::from(level.saturating_sub(1)) * curve.per_level;
        return value.min(curve.max);
    }
    let reached = tuning
        .checkpoints
        .iter()
        .filter(|&&checkpoint| checkpoint <= level)
        .count() as u32;
    let chance = tuning.checkpoint_base + tuning.checkpoint_step * reached;
    f64::from(chance.min(tuning.checkpoint_cap))
}

/// Required XP at `level` for skills with a content-defined base.
pub fn max_xp_for_level(base: u32, level: u32, tuning: &SkillTuning) -> u32 {
    let exponent = level.saturating_sub(1) as i32;
    (f64::from(base) * tuning.max_xp_growth.powi(exponent)).floor() as u32
}

/// Gold needed to level up from `level`.
pub fn level_up_gold_cost(level: u32, tuning: &SkillTuning) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    (tuning.base_gold_cost * tuning.gold_cost_growth.powi(exponent)).floor() as u64
}

/// Consumes pages and creates a level-1 instance.
pub fn unlock<'b>(
    book: &'b mut SkillBook,
    definition: &SkillDefinition,
    tuning: &SkillTuning,
) -> Result<&'b SkillInstance, SkillError> {
    let skill_id = definition.id.as_str();
    if book.owned.contains_key(skill_id) {
        return Err(SkillError::AlreadyOwned(skill_id.to_string()));
    }
    let owned = book.pages(skill_id);
    if owned < tuning.pages_to_unlock {
        return Err(SkillError::NotEnoughPages {
            skill_id: skill_id.to_string(),
            needed: tuning.pages_to_unlock,
            owned,
        });
    }

    book.pages
        .insert(skill_id.to_string(), owned - tuning.pages_to_unlock);
    let instance = SkillInstance {
        skill_id: skill_id.to_string(),
        kind: definition.kind,
        level: 1,
        current_xp: 0,
        max_xp: definition.base_max_exp.unwrap_or(tuning.base_max_xp),
        trigger_chance: trigger_chance(definition, 1, tuning),
    };
    Ok(book.owned.entry(skill_id.to_string()).or_insert(instance))
}

/// Adds XP for `event`, clamped at `max_xp`. Returns the XP actually gained.
pub fn gain_xp(
    skill: &mut SkillInstance,
    definition: &SkillDefinition,
    event: XpEvent,
    tuning: &SkillTuning,
) -> u32 {
    let rules = &definition.training;
    let amount = match event {
        XpEvent::Cast => rules.cast.unwrap_or(tuning.xp_cast),
        XpEvent::Kill => rules.kill.unwrap_or(tuning.xp_kill),
        XpEvent::KillWeak => rules.kill_weak.unwrap_or(tuning.xp_kill_weak),
        XpEvent::Perfect => rules.perfect.unwrap_or(tuning.xp_perfect),
        XpEvent::Custom(amount) => amount,
    };
    let before = skill.current_xp;
    skill.current_xp = skill.current_xp.saturating_add(amount).min(skill.max_xp);
    skill.current_xp - before
}

/// Resources spent by a successful level-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub new_level: u32,
    pub ap_cost: u32,
    pub gold_cost: u64,
}

/// Levels up `skill` if XP, AP and gold allow. Nothing changes on error.
pub fn level_up(
    skill: &mut SkillInstance,
    definition: &SkillDefinition,
    ap: &mut u32,
    gold: &mut u64,
    tuning: &SkillTuning,
) -> Result<LevelUp, SkillError> {
    if !skill.is_level_up_ready() {
        return Err(SkillError::XpNotFull {
            skill_id: skill.skill_id.clone(),
            current: skill.current_xp,
            needed: skill.max_xp,
        });
    }
    let ap_cost = tuning.ap_cost;
    if *ap < ap_cost {
        return Err(SkillError::NotEnoughAp {
            needed: ap_cost,
            available: *ap,
        });
    }
    let gold_cost = level_up_gold_cost(skill.level, tuning);
    if *gold < gold_cost {
        return Err(SkillError::NotEnoughGold {
            needed: gold_cost,
            available: *gold,
        });
    }

    *ap -= ap_cost;
    *gold -= gold_cost;
    skill.level += 1;
    skill.current_xp = 0;
    skill.max_xp = match definition.base_max_exp {
        Some(base) => max_xp_for_level(base, skill.level, tuning),
        None => (f64::from(skill.max_xp) * tuning.max_xp_growth).floor() as u32,
    };
    skill.trigger_chance = trigger_chance(definition, skill.level, tuning);

    Ok(LevelUp {
        new_level: skill.level,
        ap_cost,
        gold_cost,
    })
}
