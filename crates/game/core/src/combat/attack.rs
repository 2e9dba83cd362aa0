use super::affinity::elemental_multiplier;
use crate::config::CombatTuning;
use crate::element::{AttackElement, Element};
use crate::env::Dice;
use crate::stats::CombatStats;

/// One attack to resolve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    pub element: AttackElement,
    pub base_damage: u32,
    pub is_physical: bool,
}

impl Strike {
    pub const fn basic(element: AttackElement) -> Self {
        Self {
            element,
            base_damage: 0,
            is_physical: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackResult {
    pub damage: u32,
    pub is_critical: bool,
    pub multiplier: f64,
}

/// Crit chance in percent for an attacker with `speed`.
pub fn crit_chance(speed: u32, tuning: &CombatTuning) -> f64 {
    (f64::from(speed) * tuning.crit_chance_per_speed).min(tuning.crit_chance_cap)
}

/// Computes damage for a single strike. Does not touch HP.
///
/// ```text
/// raw    = max(1, base_damage + attack - defense × defense_factor)
/// damage = ⌊raw × elemental × (crit ? crit_multiplier : 1)⌋, at least 1
/// ```
///
/// `defender_theme` is the monster's theme when the player attacks, and the
/// floor theme when a monster attacks the player. Exactly one roll (crit) is
/// consumed from `dice`.
pub fn resolve_attack(
    attacker: &CombatStats,
    defender: &CombatStats,
    defender_theme: Option<Element>,
    strike: Strike,
    dice: &mut Dice<'_>,
    tuning: &CombatTuning,
) -> AttackResult {
    let attack = f64::from(strike.base_damage) + f64::from(attacker.attack_power(strike.is_physical));
    let defense = f64::from(defender.defense_power(strike.is_physical)) * tuning.defense_factor;
    let raw = (attack - defense).max(1.0);

    let resistance = strike
        .element
        .element()
        .map(|element| defender.elements.resistance(element))
        .unwrap_or(0);
    let multiplier = elemental_multiplier(strike.element, defender_theme, resistance, tuning);

    let is_critical = dice.percent(crit_chance(attacker.stats.speed, tuning));
    let crit = if is_critical {
        tuning.crit_multiplier
    } else {
        1.0
    };

    let damage = ((raw * multiplier * crit).floor() as u32).max(1);
    AttackResult {
        damage,
        is_critical,
        multiplier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, RollStream};
    use crate::stats::StatBlock;

    fn combatant(attack: u32, defense: u32, speed: u32) -> CombatStats {
        CombatStats {
            stats: StatBlock {
                max_hp: 100,
                physical_attack: attack,
                magical_attack: attack / 2,
                physical_defense: defense,
                magical_defense: defense / 2,
                speed,
                ..StatBlock::default()
            },
            ..CombatStats::default()
        }
    }

    #[test]
    fn crit_chance_caps_at_fifty_percent() {
        let tuning = CombatTuning::default();
        assert!((crit_chance(100, &tuning) - 10.0).abs() < 1e-9);
        assert_eq!(crit_chance(10_000, &tuning), 50.0);
        assert_eq!(crit_chance(0, &tuning), 0.0);
    }

    #[test]
    fn zero_speed_never_crits_and_uses_base_formula() {
        let tuning = CombatTuning::default();
        let rng = PcgRng;
        let attacker = combatant(20, 0, 0);
        let defender = combatant(0, 10, 0);
        for nonce in 0..50 {
            let mut dice = Dice::new(&rng, 1, nonce, RollStream::PlayerTurn);
            let result = resolve_attack(
                &attacker,
                &defender,
                None,
                Strike::basic(AttackElement::Physical),
                &mut dice,
                &tuning,
            );
            // 0 + 20 - 10 × 0.5
            assert_eq!(result.damage, 15);
            assert!(!result.is_critical);
        }
    }

    #[test]
    fn overwhelming_defense_still_deals_one() {
        let tuning = CombatTuning::default();
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 1, 1, RollStream::MonsterTurn);
        let result = resolve_attack(
            &combatant(1, 0, 0),
            &combatant(0, 1_000, 0),
            None,
            Strike::basic(AttackElement::Physical),
            &mut dice,
            &tuning,
        );
        assert_eq!(result.damage, 1);
    }

    #[test]
    fn elemental_strike_applies_affinity() {
        let tuning = CombatTuning::default();
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 1, 1, RollStream::PlayerTurn);
        let strike = Strike {
            element: Element::Frost.into(),
            base_damage: 10,
            is_physical: false,
        };
        // magical: 10 + 10 - 0 = 20, × 1.5 against a flame defender
        let result = resolve_attack(
            &combatant(20, 0, 0),
            &combatant(0, 0, 0),
            Some(Element::Flame),
            strike,
            &mut dice,
            &tuning,
        );
        assert_eq!(result.damage, 30);
        assert_eq!(result.multiplier, 1.5);
    }

    #[test]
    fn crits_multiply_damage() {
        let tuning = CombatTuning {
            crit_chance_cap: 100.0,
            crit_chance_per_speed: 1.0,
            ..CombatTuning::default()
        };
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 1, 1, RollStream::PlayerTurn);
        let result = resolve_attack(
            &combatant(20, 0, 100),
            &combatant(0, 0, 0),
            None,
            Strike::basic(AttackElement::Physical),
            &mut dice,
            &tuning,
        );
        assert!(result.is_critical);
        assert_eq!(result.damage, 30);
    }
}
