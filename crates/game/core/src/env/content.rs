use crate::element::{AttackElement, Element, ElementTable};
use crate::equipment::{EquipmentSlot, Quality};
use crate::floor::FloorTier;
use crate::stats::StatBlock;

/// Skill id that every player owns and that always fires.
pub const BASIC_ATTACK: &str = "basic_attack";

/// Id-keyed read access to content definitions.
///
/// Lookups are synchronous; anything asynchronous happens before the engine
/// runs (see [`ContentKey`]). `contains` reports whether a key has been
/// resolved at all, including keys known to be missing.
pub trait ContentOracle: Send + Sync {
    fn monster(&self, id: &str) -> Option<&MonsterDefinition>;
    fn skill(&self, id: &str) -> Option<&SkillDefinition>;
    fn item(&self, id: &str) -> Option<&ItemDefinition>;
    fn drop_table(&self, id: &str) -> Option<&DropTable>;
    fn spawn_pool(&self, theme: Element, tier: FloorTier) -> Option<&[String]>;
    fn contains(&self, key: &ContentKey) -> bool;
}

/// Identifies one piece of content the engine may need.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentKey {
    Monster(String),
    Skill(String),
    Item(String),
    DropTable(String),
    SpawnPool(Element, FloorTier),
}

impl core::fmt::Display for ContentKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ContentKey::Monster(id) => write!(f, "monster:{id}"),
            ContentKey::Skill(id) => write!(f, "skill:{id}"),
            ContentKey::Item(id) => write!(f, "item:{id}"),
            ContentKey::DropTable(id) => write!(f, "drop_table:{id}"),
            ContentKey::SpawnPool(theme, tier) => write!(f, "spawn_pool:{theme}/{tier}"),
        }
    }
}

/// A resolved piece of content, ready to be cached.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentEntry {
    Monster(MonsterDefinition),
    Skill(SkillDefinition),
    Item(ItemDefinition),
    DropTable(DropTable),
    SpawnPool {
        theme: Element,
        tier: FloorTier,
        monsters: Vec<String>,
    },
}

impl ContentEntry {
    pub fn key(&self) -> ContentKey {
        match self {
            ContentEntry::Monster(def) => ContentKey::Monster(def.id.clone()),
            ContentEntry::Skill(def) => ContentKey::Skill(def.id.clone()),
            ContentEntry::Item(def) => ContentKey::Item(def.id.clone()),
            ContentEntry::DropTable(table) => ContentKey::DropTable(table.id.clone()),
            ContentEntry::SpawnPool { theme, tier, .. } => ContentKey::SpawnPool(*theme, *tier),
        }
    }
}

// ============================================================================
// Monsters
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterDefinition {
    pub id: String,
    pub name: String,
    pub theme: Element,
    pub stats: StatBlock,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weaknesses: Vec<Element>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: Vec<Element>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub drop_table_id: Option<String>,
    /// Skill ids whose pages this monster may drop.
    #[cfg_attr(feature = "serde", serde(default))]
    pub skill_page_drops: Vec<String>,
    pub gold_reward: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<MonsterSkill>,
}

impl MonsterDefinition {
    /// Stand-in used when a spawn pool is empty or a monster id is unknown.
    pub fn generic(id: impl Into<String>, theme: Element, tier: FloorTier) -> Self {
        let scale = match tier {
            FloorTier::Normal | FloorTier::Rest => 1,
            FloorTier::Elite => 2,
            FloorTier::Boss => 4,
        };
        Self {
            id: id.into(),
            name: format!("{theme} {tier}"),
            theme,
            stats: StatBlock {
                max_hp: 40 * scale,
                max_mp: 0,
                physical_attack: 8 * scale,
                magical_attack: 4 * scale,
                physical_defense: 4 * scale,
                magical_defense: 4 * scale,
                speed: 8,
            },
            weaknesses: Vec::new(),
            resistances: Vec::new(),
            drop_table_id: None,
            skill_page_drops: Vec::new(),
            gold_reward: 10 * u64::from(scale),
            skills: Vec::new(),
        }
    }

    /// True when `element` hits this monster's weakness, either through its
    /// theme or its listed weaknesses.
    pub fn is_weak_to(&self, element: Element) -> bool {
        self.theme.weakness() == element || self.weaknesses.contains(&element)
    }
}

/// A special attack a monster may use instead of its basic attack.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterSkill {
    pub name: String,
    pub element: AttackElement,
    pub base_damage: u32,
    /// Percent chance per monster turn.
    pub chance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_physical: bool,
}

// ============================================================================
// Skills
// ============================================================================

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkillKind {
    #[default]
    Active,
    Passive,
}

/// Content-defined trigger curve: `min(base + (level - 1) * per_level, max)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerCurve {
    pub base: f64,
    pub per_level: f64,
    pub max: f64,
}

/// Per-skill XP overrides. Unset fields use the configured defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrainingRules {
    pub cast: Option<u32>,
    pub kill: Option<u32>,
    pub kill_weak: Option<u32>,
    pub perfect: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: SkillKind,
    pub element: AttackElement,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger: Option<TriggerCurve>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_damage: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_per_level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_physical: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mp_cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_max_exp: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub training: TrainingRules,
}

impl SkillDefinition {
    /// Stand-in for an unknown skill id: a plain active skill on the
    /// checkpoint curve.
    pub fn generic(id: impl Into<String>) -> Self {
        let id = id.into();
        let is_basic = id == BASIC_ATTACK;
        Self {
            name: id.replace('_', " "),
            id,
            kind: SkillKind::Active,
            element: if is_basic {
                AttackElement::Physical
            } else {
                AttackElement::Neutral
            },
            trigger: None,
            base_damage: if is_basic { 0 } else { 5 },
            damage_per_level: if is_basic { 0 } else { 1 },
            is_physical: is_basic,
            mp_cost: 0,
            base_max_exp: None,
            training: TrainingRules::default(),
        }
    }

    /// Damage contributed at `level` before the attack formula.
    pub fn damage_at(&self, level: u32) -> u32 {
        self.base_damage
            .saturating_add(self.damage_per_level.saturating_mul(level.saturating_sub(1)))
    }
}

// ============================================================================
// Items
// ============================================================================

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemCategory {
    Equipment,
    Material,
    Consumable,
    Gem,
}

/// Permanent stat gain and immediate restore granted by eating a consumable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConsumableEffect {
    pub bonus: StatBlock,
    pub heal_hp: u32,
    pub heal_mp: u32,
}

/// A material quantity required by a crafting recipe.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialCost {
    pub item_id: String,
    pub quantity: u32,
}

/// Item definition. Category, slot and element bonuses are explicit fields;
/// nothing is inferred from the id.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub category: ItemCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub slot: Option<EquipmentSlot>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_stats: StatBlock,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elements: ElementTable,
    #[cfg_attr(feature = "serde", serde(default))]
    pub consumable: Option<ConsumableEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub crafting_materials: Vec<MaterialCost>,
}

// ============================================================================
// Drop tables
// ============================================================================

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DropKind {
    Material,
    Consumable,
    Equipment,
    Gem,
}

/// One independently rolled drop-table entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropEntry {
    pub item_id: String,
    /// Probability in `[0, 1]`.
    pub chance: f64,
    pub min: u32,
    pub max: u32,
    pub kind: DropKind,
    /// Fixed quality for equipment entries; rolled by tier when unset.
    #[cfg_attr(feature = "serde", serde(default))]
    pub quality: Option<Quality>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropTable {
    pub id: String,
    pub drops: Vec<DropEntry>,
}
