//! The six tower elements and the fixed weakness cycle.
//!
//! Elements form a directed cycle:
//!
//! ```text
//! Flame → Frost → Thunder → Toxic → Verdant → Shadow → Flame
//! ```
//!
//! `X` is weak to its successor: attacking with `successor(X)` against a
//! defender themed `X` deals bonus damage. The same order is used as the
//! floor theme cycle (one element per block of ten floors).

use std::collections::BTreeMap;

/// One of the six named elements.
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
pub enum Element {
    Flame,
    Frost,
    Thunder,
    Toxic,
    Verdant,
    Shadow,
}

impl Element {
    /// Number of named elements.
    pub const COUNT: usize = 6;

    /// Theme cycle in floor order. Also the weakness cycle order.
    pub const CYCLE: [Element; Self::COUNT] = [
        Element::Flame,
        Element::Frost,
        Element::Thunder,
        Element::Toxic,
        Element::Verdant,
        Element::Shadow,
    ];

    /// Position of this element in [`Element::CYCLE`].
    pub const fn index(self) -> usize {
        match self {
            Element::Flame => 0,
            Element::Frost => 1,
            Element::Thunder => 2,
            Element::Toxic => 3,
            Element::Verdant => 4,
            Element::Shadow => 5,
        }
    }

    /// The element this one is weak to (its successor in the cycle).
    pub const fn weakness(self) -> Element {
        Self::CYCLE[(self.index() + 1) % Self::COUNT]
    }
}

/// Element carried by a single attack.
///
/// Physical, magical and neutral attacks bypass the affinity model entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AttackElement {
    Physical,
    Magical,
    Neutral,
    Elemental(Element),
}

impl AttackElement {
    /// Returns the named element, if this attack carries one.
    pub const fn element(self) -> Option<Element> {
        match self {
            AttackElement::Elemental(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for AttackElement {
    fn from(element: Element) -> Self {
        AttackElement::Elemental(element)
    }
}

/// Attack power and resistance for a single element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ElementStats {
    pub attack: u32,
    pub resistance: u32,
}

/// Per-element `{attack, resistance}` map indexed by [`Element`].
///
/// Serialized as a map keyed by element name; zero entries are omitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        from = "BTreeMap<Element, ElementStats>",
        into = "BTreeMap<Element, ElementStats>"
    )
)]
pub struct ElementTable([ElementStats; Element::COUNT]);

impl From<BTreeMap<Element, ElementStats>> for ElementTable {
    fn from(map: BTreeMap<Element, ElementStats>) -> Self {
        let mut table = ElementTable::default();
        for (element, stats) in map {
            *table.get_mut(element) = stats;
        }
        table
    }
}

impl From<ElementTable> for BTreeMap<Element, ElementStats> {
    fn from(table: ElementTable) -> Self {
        table
            .iter()
            .filter(|(_, stats)| *stats != ElementStats::default())
            .collect()
    }
}

impl ElementTable {
    pub fn get(&self, element: Element) -> ElementStats {
        self.0[element.index()]
    }

    pub fn get_mut(&mut self, element: Element) -> &mut ElementStats {
        &mut self.0[element.index()]
    }

    pub fn resistance(&self, element: Element) -> u32 {
        self.get(element).resistance
    }

    pub fn attack(&self, element: Element) -> u32 {
        self.get(element).attack
    }

    /// Adds every entry of `other` into this table.
    pub fn accumulate(&mut self, other: &ElementTable) {
        for (mine, theirs) in self.0.iter_mut().zip(other.0.iter()) {
            mine.attack = mine.attack.saturating_add(theirs.attack);
            mine.resistance = mine.resistance.saturating_add(theirs.resistance);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, ElementStats)> + '_ {
        Element::CYCLE.iter().map(move |&element| (element, self.get(element)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn weakness_follows_cycle() {
        assert_eq!(Element::Flame.weakness(), Element::Frost);
        assert_eq!(Element::Frost.weakness(), Element::Thunder);
        assert_eq!(Element::Thunder.weakness(), Element::Toxic);
        assert_eq!(Element::Toxic.weakness(), Element::Verdant);
        assert_eq!(Element::Verdant.weakness(), Element::Shadow);
        assert_eq!(Element::Shadow.weakness(), Element::Flame);
    }

    #[test]
    fn cycle_matches_enum_order() {
        for (i, element) in Element::iter().enumerate() {
            assert_eq!(element.index(), i);
            assert_eq!(Element::CYCLE[i], element);
        }
    }

    #[test]
    fn parses_case_insensitive_names() {
        assert_eq!("Thunder".parse::<Element>().unwrap(), Element::Thunder);
        assert_eq!("verdant".parse::<Element>().unwrap(), Element::Verdant);
        assert_eq!(Element::Shadow.to_string(), "shadow");
    }

    #[test]
    fn table_accumulates_per_element() {
        let mut a = ElementTable::default();
        a.get_mut(Element::Flame).attack = 5;
        let mut b = ElementTable::default();
        b.get_mut(Element::Flame).attack = 3;
        b.get_mut(Element::Frost).resistance = 10;

        a.accumulate(&b);
        assert_eq!(a.attack(Element::Flame), 8);
        assert_eq!(a.resistance(Element::Frost), 10);
    }
}
