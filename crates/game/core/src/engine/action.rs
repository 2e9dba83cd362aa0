use crate::drops::Reward;
use crate::equipment::EquipmentSlot;
use crate::skills::XpEvent;

/// Every way the game state can change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    /// Advances the clock and resolves at most one combat step.
    Tick { elapsed_ms: u64 },
    StartAutoCombat { speed: u32 },
    StopAutoCombat,
    UnlockSkill { skill_id: String },
    LevelUpSkill { skill_id: String },
    EquipSkill { skill_id: String },
    UnequipSkill { skill_id: String },
    Equip { unique_id: u64 },
    Unequip { slot: EquipmentSlot },
    Enhance { unique_id: u64 },
    UseConsumable { item_id: String },
    SellEquipment { unique_id: u64 },
    ClaimRewards(RewardRequest),
    Rebirth,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Tick { .. } => ActionKind::Tick,
            Action::StartAutoCombat { .. } => ActionKind::StartAutoCombat,
            Action::StopAutoCombat => ActionKind::StopAutoCombat,
            Action::UnlockSkill { .. } => ActionKind::UnlockSkill,
            Action::LevelUpSkill { .. } => ActionKind::LevelUpSkill,
            Action::EquipSkill { .. } => ActionKind::EquipSkill,
            Action::UnequipSkill { .. } => ActionKind::UnequipSkill,
            Action::Equip { .. } => ActionKind::Equip,
            Action::Unequip { .. } => ActionKind::Unequip,
            Action::Enhance { .. } => ActionKind::Enhance,
            Action::UseConsumable { .. } => ActionKind::UseConsumable,
            Action::SellEquipment { .. } => ActionKind::SellEquipment,
            Action::ClaimRewards(_) => ActionKind::ClaimRewards,
            Action::Rebirth => ActionKind::Rebirth,
        }
    }
}

/// Discriminant of [`Action`], used for busy tracking and logging.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionKind {
    Tick,
    StartAutoCombat,
    StopAutoCombat,
    UnlockSkill,
    LevelUpSkill,
    EquipSkill,
    UnequipSkill,
    Equip,
    Unequip,
    Enhance,
    UseConsumable,
    SellEquipment,
    ClaimRewards,
    Rebirth,
}

/// Rewards produced outside combat (fishing, mining, farming, herbalism),
/// credited through the same inventory path as combat drops.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardRequest {
    /// Where the rewards came from, shown in the log.
    pub source: String,
    pub rewards: Vec<Reward>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skill_xp: Option<SkillXpGrant>,
}

/// XP granted to one owned skill alongside a reward request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillXpGrant {
    pub skill_id: String,
    pub event: XpEvent,
}
