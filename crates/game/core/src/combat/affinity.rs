//! Elemental damage multiplier.
//!
//! ```text
//! attack == weakness(theme)  -> weakness_multiplier      (1.5)
//! theme  == weakness(attack) -> disadvantage_multiplier  (0.7)
//! otherwise                  -> 1.0
//! final = max(min_multiplier, m × (1 - min(cap, resistance × per_point)))
//! ```
//!
//! Physical, magical and neutral attacks always get 1.0.

use crate::config::CombatTuning;
use crate::element::{AttackElement, Element};

/// Multiplier before resistance is applied.
pub fn affinity(attack: Element, defender_theme: Option<Element>, tuning: &CombatTuning) -> f64 {
    match defender_theme {
        Some(theme) if attack == theme.weakness() => tuning.weakness_multiplier,
        Some(theme) if theme == attack.weakness() => tuning.disadvantage_multiplier,
        _ => 1.0,
    }
}

/// Final elemental multiplier for one hit.
pub fn elemental_multiplier(
    attack: AttackElement,
    defender_theme: Option<Element>,
    defender_resistance: u32,
    tuning: &CombatTuning,
) -> f64 {
    let Some(element) = attack.element() else {
        return 1.0;
    };

    let base = affinity(element, defender_theme, tuning);
    let reduction = (f64::from(defender_resistance) * tuning.resistance_reduction_per_point)
        .min(tuning.resistance_reduction_cap);
    (base * (1.0 - reduction)).max(tuning.min_elemental_multiplier)
}
