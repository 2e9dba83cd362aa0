//! Floor cycle: theme, tier, kill quota and drop level from a floor number.
//!
//! ```text
//! theme(floor) = CYCLE[⌊(floor - 1) / 10⌋ mod 6]
//! floor mod 10:  1..=5 normal (3 kills) | 6..=8 elite (2) | 9 boss (1) | 0 rest (0)
//! ```

use crate::element::Element;
use crate::env::Dice;

/// Monster category of a floor.
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
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FloorTier {
    Normal,
    Elite,
    Boss,
    Rest,
}

impl FloorTier {
    /// Kills needed on this tier to advance.
    pub const fn required_kills(self) -> u32 {
        match self {
            FloorTier::Normal => 3,
            FloorTier::Elite => 2,
            FloorTier::Boss => 1,
            FloorTier::Rest => 0,
        }
    }

    /// Flat bonus added to the drop level.
    pub const fn drop_level_bonus(self) -> u32 {
        match self {
            FloorTier::Normal | FloorTier::Rest => 0,
            FloorTier::Elite => 3,
            FloorTier::Boss => 7,
        }
    }

    /// Row of the quality weight table used for this tier.
    pub const fn quality_row(self) -> usize {
        match self {
            FloorTier::Normal | FloorTier::Rest => 0,
            FloorTier::Elite => 1,
            FloorTier::Boss => 2,
        }
    }
}

pub fn theme(floor: u32) -> Element {
    let block = floor.max(1).saturating_sub(1) / 10;
    Element::CYCLE[block as usize % Element::COUNT]
}

pub fn tier(floor: u32) -> FloorTier {
    match floor % 10 {
        1..=5 => FloorTier::Normal,
        6..=8 => FloorTier::Elite,
        9 => FloorTier::Boss,
        _ => FloorTier::Rest,
    }
}

pub fn required_kills(floor: u32) -> u32 {
    tier(floor).required_kills()
}

/// `max(1, ⌊floor / 2⌋ + tier_bonus + jitter)` with jitter uniform in
/// `[-level_jitter, level_jitter]`.
pub fn drop_level(floor: u32, dice: &mut Dice<'_>, level_jitter: i32) -> u32 {
    let base = i64::from(floor / 2 + tier(floor).drop_level_bonus());
    let jitter = i64::from(dice.jitter(level_jitter));
    (base + jitter).max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, RollStream};

    #[test]
    fn themes_rotate_every_ten_floors() {
        assert_eq!(theme(1), Element::Flame);
        assert_eq!(theme(10), Element::Flame);
        assert_eq!(theme(11), Element::Frost);
        assert_eq!(theme(51), Element::Shadow);
        assert_eq!(theme(61), Element::Flame);
    }

    #[test]
    fn tiers_follow_floor_digit() {
        assert_eq!(tier(3), FloorTier::Normal);
        assert_eq!(tier(17), FloorTier::Elite);
        assert_eq!(required_kills(17), 2);
        assert_eq!(tier(29), FloorTier::Boss);
        assert_eq!(tier(20), FloorTier::Rest);
        assert_eq!(required_kills(20), 0);
    }

    #[test]
    fn drop_level_stays_near_floor_half() {
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 5, 5, RollStream::Drops);
        for _ in 0..100 {
            let level = drop_level(39, &mut dice, 3);
            // 19 + 7 ± 3
            assert!((23..=29).contains(&level));
            assert!(drop_level(1, &mut dice, 3) >= 1);
        }
    }
}
