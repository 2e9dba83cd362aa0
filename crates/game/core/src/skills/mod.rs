//! Owned skills, equipped active skills and skill pages.
mod progression;

pub use progression::{
    LevelUp, SkillError, gain_xp, level_up, level_up_gold_cost, max_xp_for_level, trigger_chance,
    unlock,
};

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::{BASIC_ATTACK, SkillKind};

/// Experience-granting events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum XpEvent {
    Cast,
    Kill,
    /// Kill landed with an element the monster is weak to.
    KillWeak,
    /// Perfect minigame result.
    Perfect,
    Custom(u32),
}

/// Progress of one owned skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillInstance {
    pub skill_id: String,
    pub kind: SkillKind,
    pub level: u32,
    pub current_xp: u32,
    pub max_xp: u32,
    /// Percent.
    pub trigger_chance: f64,
}

impl SkillInstance {
    /// Level-up requires a full XP bar.
    pub fn is_level_up_ready(&self) -> bool {
        self.current_xp >= self.max_xp
    }
}

pub type EquippedSkills = ArrayVec<String, { GameConfig::MAX_EQUIPPED_SKILLS }>;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillBook {
    pub owned: BTreeMap<String, SkillInstance>,
    /// Active skills rolled on the player's turn, in equip order.
    pub equipped: EquippedSkills,
    /// Pages collected per skill id, consumed by unlocking.
    pub pages: BTreeMap<String, u32>,
}

impl SkillBook {
    /// A book holding only the basic attack.
    pub fn starter(config: &GameConfig) -> Self {
        let mut book = Self::default();
        book.owned.insert(
            BASIC_ATTACK.to_string(),
            SkillInstance {
                skill_id: BASIC_ATTACK.to_string(),
                kind: SkillKind::Active,
                level: 1,
                current_xp: 0,
                max_xp: config.skills.base_max_xp,
                trigger_chance: 100.0,
            },
        );
        book
    }

    pub fn get(&self, skill_id: &str) -> Option<&SkillInstance> {
        self.owned.get(skill_id)
    }

    pub fn get_mut(&mut self, skill_id: &str) -> Option<&mut SkillInstance> {
        self.owned.get_mut(skill_id)
    }

    pub fn pages(&self, skill_id: &str) -> u32 {
        self.pages.get(skill_id).copied().unwrap_or(0)
    }

    pub fn add_pages(&mut self, skill_id: &str, count: u32) {
        let pages = self.pages.entry(skill_id.to_string()).or_default();
        *pages = pages.saturating_add(count);
    }

    pub fn is_equipped(&self, skill_id: &str) -> bool {
        self.equipped.iter().any(|id| id == skill_id)
    }

    pub fn active(&self) -> impl Iterator<Item = &SkillInstance> {
        self.owned.values().filter(|s| s.kind == SkillKind::Active)
    }

    pub fn passive(&self) -> impl Iterator<Item = &SkillInstance> {
        self.owned.values().filter(|s| s.kind == SkillKind::Passive)
    }

    /// Adds an owned active skill to the equipped set.
    pub fn equip(&mut self, skill_id: &str) -> Result<(), SkillError> {
        let skill = self
            .owned
            .get(skill_id)
            .ok_or_else(|| SkillError::NotOwned(skill_id.to_string()))?;
        if skill_id == BASIC_ATTACK {
            return Err(SkillError::AlwaysActive);
        }
        if skill.kind == SkillKind::Passive {
            return Err(SkillError::Passive(skill_id.to_string()));
        }
        if self.is_equipped(skill_id) {
            return Err(SkillError::AlreadyEquipped(skill_id.to_string()));
        }
        self.equipped
            .try_push(skill_id.to_string())
            .map_err(|_| SkillError::LoadoutFull {
                max: GameConfig::MAX_EQUIPPED_SKILLS,
            })
    }

    pub fn unequip(&mut self, skill_id: &str) -> Result<(), SkillError> {
        let index = self
            .equipped
            .iter()
            .position(|id| id == skill_id)
            .ok_or_else(|| SkillError::NotEquipped(skill_id.to_string()))?;
        self.equipped.remove(index);
        Ok(())
    }
}
