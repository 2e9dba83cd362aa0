use crate::equipment::Loadout;
use crate::stats::StatBlock;

/// Persistent player data. Effective stats come from
/// [`crate::stats::resolve_player`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    /// Stats before any bonus.
    pub base: StatBlock,
    /// Permanent additive bonuses from consumables.
    pub consumable_bonus: StatBlock,
    pub equipment: Loadout,
    pub rebirth_level: u32,
    pub gold: u64,
    pub gems: u64,
    /// Ascension points earned through rebirth.
    pub ap: u32,
    pub hp: u32,
    pub mp: u32,
}

impl PlayerState {
    pub fn new() -> Self {
        let base = StatBlock::starting();
        Self {
            base,
            consumable_bonus: StatBlock::default(),
            equipment: Loadout::default(),
            rebirth_level: 0,
            gold: 0,
            gems: 0,
            ap: 0,
            hp: base.max_hp,
            mp: base.max_mp,
        }
    }

    /// Clamps current HP/MP into `[0, max]`.
    pub fn clamp_resources(&mut self, max_hp: u32, max_mp: u32) {
        self.hp = self.hp.min(max_hp);
        self.mp = self.mp.min(max_mp);
    }

    pub fn restore(&mut self, max_hp: u32, max_mp: u32) {
        self.hp = max_hp;
        self.mp = max_mp;
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}
