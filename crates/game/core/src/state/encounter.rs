use crate::combat::CombatState;
use crate::element::Element;
use crate::floor::FloorTier;

/// The monster currently being fought.
///
/// Only current HP is stored; the monster's effective stats are resolved
/// from its definition and `floor` whenever needed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub monster_id: String,
    pub name: String,
    pub theme: Element,
    pub floor: u32,
    pub tier: FloorTier,
    pub hp: u32,
    pub combat: CombatState,
}
