//! Error types for action execution.

use super::ActionKind;
use crate::equipment::EquipmentSlot;
use crate::error::{ErrorSeverity, GameError};
use crate::skills::SkillError;

/// Reasons an action is rejected. A rejected action never mutates state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientGold { needed: u64, available: u64 },

    #[error("no {0} left in the inventory")]
    NoConsumable(String),

    #[error("no equipment with id {0}")]
    UnknownEquipment(u64),

    #[error("equipment {0} must be unequipped first")]
    EquipmentInUse(u64),

    #[error("unknown item {0}")]
    UnknownItem(String),

    #[error("{0} cannot be equipped")]
    NotEquippable(String),

    #[error("{0} cannot be consumed")]
    NotConsumable(String),

    #[error("nothing equipped in the {0} slot")]
    EmptySlot(EquipmentSlot),

    #[error("already at the enhancement limit (+{limit})")]
    EnhancementCapped { limit: u32 },

    #[error("rebirth requires a floor above {required}, currently on {floor}")]
    RebirthLocked { floor: u32, required: u32 },

    #[error("auto combat speed must be between 1 and {max}, got {speed}")]
    InvalidSpeed { speed: u32, max: u32 },

    /// Raised by hosts that resolve content asynchronously while an identical
    /// action is still waiting.
    #[error("{0} already in progress")]
    InProgress(ActionKind),

    /// The stored state breaks an invariant the rules maintain, e.g. an item
    /// enhanced past its quality ceiling.
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Skill(err) => err.severity(),
            Self::InsufficientGold { .. }
            | Self::NoConsumable(_)
            | Self::RebirthLocked { .. }
            | Self::InProgress(_) => ErrorSeverity::Recoverable,
            Self::EnhancementCapped { .. }
            | Self::UnknownEquipment(_)
            | Self::EquipmentInUse(_)
            | Self::UnknownItem(_)
            | Self::NotEquippable(_)
            | Self::NotConsumable(_)
            | Self::EmptySlot(_)
            | Self::InvalidSpeed { .. } => ErrorSeverity::Validation,
            Self::IntegrityViolation(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Skill(err) => err.error_code(),
            Self::InsufficientGold { .. } => "ACTION_INSUFFICIENT_GOLD",
            Self::NoConsumable(_) => "ACTION_NO_CONSUMABLE",
            Self::UnknownEquipment(_) => "ACTION_UNKNOWN_EQUIPMENT",
            Self::EquipmentInUse(_) => "ACTION_EQUIPMENT_IN_USE",
            Self::UnknownItem(_) => "ACTION_UNKNOWN_ITEM",
            Self::NotEquippable(_) => "ACTION_NOT_EQUIPPABLE",
            Self::NotConsumable(_) => "ACTION_NOT_CONSUMABLE",
            Self::EmptySlot(_) => "ACTION_EMPTY_SLOT",
            Self::EnhancementCapped { .. } => "ACTION_ENHANCEMENT_CAPPED",
            Self::RebirthLocked { .. } => "ACTION_REBIRTH_LOCKED",
            Self::InvalidSpeed { .. } => "ACTION_INVALID_SPEED",
            Self::InProgress(_) => "ACTION_IN_PROGRESS",
            Self::IntegrityViolation(_) => "ACTION_INTEGRITY_VIOLATION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_errors_keep_their_classification() {
        let err = ActionError::from(SkillError::NotEnoughAp {
            needed: 1,
            available: 0,
        });
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
        assert!(err.severity().is_recoverable());
        assert!(!err.severity().is_internal());
        assert_eq!(err.error_code(), "SKILL_NOT_ENOUGH_AP");
        assert_eq!(err.to_string(), "level up needs 1 AP, have 0");
    }

    #[test]
    fn integrity_violations_are_internal() {
        let err = ActionError::IntegrityViolation("equipment 3 is at +9, above its +5 ceiling".into());
        assert!(err.severity().is_internal());
        assert_eq!(err.error_code(), "ACTION_INTEGRITY_VIOLATION");
        assert_eq!(
            err.to_string(),
            "integrity violation: equipment 3 is at +9, above its +5 ceiling"
        );
    }
}
