//! Turn state machine for one encounter.
//!
//! ```text
//! Waiting ──speed check──▶ PlayerTurn ⇄ MonsterTurn ──defender at 0 HP──▶ Complete
//! ```
//!
//! A turn is taken in two steps: [`CombatState::claim`] marks the active
//! side's turn complete, [`CombatState::finish`] moves to the next phase once
//! the attack is applied. Between the two, further claims return `None`, so a
//! tick that arrives while a turn is waiting on content is a no-op.

/// Which combatant acts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Side {
    Player,
    Monster,
}

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Monster,
            Side::Monster => Side::Player,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatPhase {
    #[default]
    Waiting,
    PlayerTurn,
    MonsterTurn,
    Complete,
}

impl CombatPhase {
    const fn turn_of(side: Side) -> CombatPhase {
        match side {
            Side::Player => CombatPhase::PlayerTurn,
            Side::Monster => CombatPhase::MonsterTurn,
        }
    }

    pub const fn active_side(self) -> Option<Side> {
        match self {
            CombatPhase::PlayerTurn => Some(Side::Player),
            CombatPhase::MonsterTurn => Some(Side::Monster),
            CombatPhase::Waiting | CombatPhase::Complete => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    pub phase: CombatPhase,
    pub current_turn: u32,
    pub player_turn_complete: bool,
    pub monster_turn_complete: bool,
    pub turn_delay_ms: u64,
    /// Side that lost, once `phase == Complete`.
    pub defeated: Option<Side>,
}

impl CombatState {
    pub fn new(turn_delay_ms: u64) -> Self {
        Self {
            turn_delay_ms,
            ..Self::default()
        }
    }

    /// Leaves `Waiting` for the faster side's turn. Ties go to the player.
    ///
    /// No-op outside `Waiting`.
    pub fn begin(&mut self, player_speed: u32, monster_speed: u32) {
        if self.phase != CombatPhase::Waiting {
            return;
        }
        let first = if player_speed >= monster_speed {
            Side::Player
        } else {
            Side::Monster
        };
        self.enter(first);
        self.current_turn = 1;
    }

    fn enter(&mut self, side: Side) {
        self.phase = CombatPhase::turn_of(side);
        *self.flag_mut(side) = false;
    }

    fn flag_mut(&mut self, side: Side) -> &mut bool {
        match side {
            Side::Player => &mut self.player_turn_complete,
            Side::Monster => &mut self.monster_turn_complete,
        }
    }

    pub fn turn_complete(&self, side: Side) -> bool {
        match side {
            Side::Player => self.player_turn_complete,
            Side::Monster => self.monster_turn_complete,
        }
    }

    /// Claims the active side's turn.
    ///
    /// Returns `None` when no turn phase is active or the active turn was
    /// already claimed.
    pub fn claim(&mut self) -> Option<Side> {
        let side = self.phase.active_side()?;
        if self.turn_complete(side) {
            return None;
        }
        *self.flag_mut(side) = true;
        Some(side)
    }

    /// The side whose claimed turn has not been finished yet, if any.
    pub fn in_flight(&self) -> Option<Side> {
        self.phase
            .active_side()
            .filter(|side| self.turn_complete(*side))
    }

    /// Ends the claimed turn of `side`.
    ///
    /// Moves to `Complete` when the defender died, otherwise hands the turn
    /// to the opponent and increments the turn counter.
    pub fn finish(&mut self, side: Side, defender_defeated: bool) {
        if self.in_flight() != Some(side) {
            return;
        }
        if defender_defeated {
            self.phase = CombatPhase::Complete;
            self.defeated = Some(side.opponent());
        } else {
            self.enter(side.opponent());
            self.current_turn += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == CombatPhase::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faster_side_goes_first_and_ties_favor_player() {
        let mut combat = CombatState::new(2000);
        combat.begin(10, 10);
        assert_eq!(combat.phase, CombatPhase::PlayerTurn);

        let mut combat = CombatState::new(2000);
        combat.begin(9, 10);
        assert_eq!(combat.phase, CombatPhase::MonsterTurn);
    }

    #[test]
    fn claimed_turn_cannot_be_claimed_again() {
        let mut combat = CombatState::new(2000);
        combat.begin(10, 1);
        assert_eq!(combat.claim(), Some(Side::Player));
        assert_eq!(combat.claim(), None);
        assert_eq!(combat.in_flight(), Some(Side::Player));
    }

    #[test]
    fn turns_alternate_until_defeat() {
        let mut combat = CombatState::new(2000);
        combat.begin(10, 1);

        let side = combat.claim().unwrap();
        combat.finish(side, false);
        assert_eq!(combat.phase, CombatPhase::MonsterTurn);
        assert_eq!(combat.current_turn, 2);

        let side = combat.claim().unwrap();
        combat.finish(side, true);
        assert!(combat.is_complete());
        assert_eq!(combat.defeated, Some(Side::Player));
        assert_eq!(combat.claim(), None);
    }

    #[test]
    fn finish_without_claim_is_ignored() {
        let mut combat = CombatState::new(2000);
        combat.begin(10, 1);
        combat.finish(Side::Player, true);
        assert_eq!(combat.phase, CombatPhase::PlayerTurn);
        combat.finish(Side::Monster, false);
        assert_eq!(combat.phase, CombatPhase::PlayerTurn);
    }
}
