//! Error classification shared by the simulation's error enums.
//!
//! [`crate::engine::ActionError`] and [`crate::skills::SkillError`] sit next
//! to the rules that raise them. Both implement [`GameError`], so callers can
//! decide how to surface a failure without matching every variant.

/// How a failed action should be treated by whoever submitted it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The player is short of something (gold, AP, pages, floors climbed).
    /// The same action can succeed later.
    Recoverable,

    /// The request itself is wrong: unknown id, skill already owned,
    /// speed out of range.
    Validation,

    /// The state contradicts itself, e.g. an enhancement level above the
    /// quality ceiling.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Implemented by every error enum in this crate.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier, safe to match on in tests and tooling.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
