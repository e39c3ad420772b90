//! Reference tables for 5e content
//!
//! Hardcoded lookup data used while cleaning: rarity base scores, coin
//! multipliers, monster trait prerequisites, and the default category and
//! clean target tables. Everything here is immutable; the pipeline only
//! reads it through the lookup functions below or through `PipelineConfig`.

use serde::{Deserialize, Serialize};

// ============================================================================
// Rarity
// ============================================================================

/// Base strength score per rarity (lower-case keys)
pub static RARITY_SCORES: phf::Map<&'static str, i64> = phf::phf_map! {
    "common" => 5,
    "uncommon" => 15,
    "rare" => 30,
    "very rare" => 50,
    "legendary" => 75,
    "artifact" => 90,
};

/// Base score for a rarity string, case-insensitive. Unknown rarities score 0.
pub fn rarity_score(rarity: &str) -> i64 {
    RARITY_SCORES
        .get(rarity.to_lowercase().as_str())
        .copied()
        .unwrap_or(0)
}

// ============================================================================
// Currency
// ============================================================================

/// Coin code assumed when a value object carries no unit
pub const DEFAULT_COIN: &str = "gp";

/// Gold-piece multiplier per coin code
pub static COIN_MULTIPLIERS: phf::Map<&'static str, f64> = phf::phf_map! {
    "cp" => 0.01,
    "sp" => 0.1,
    "ep" => 0.5,
    "gp" => 1.0,
    "pp" => 10.0,
};

/// Multiplier for a coin code, case-insensitive. Unknown codes count as gold.
pub fn coin_multiplier(unit: &str) -> f64 {
    COIN_MULTIPLIERS
        .get(unit.to_lowercase().as_str())
        .copied()
        .unwrap_or(1.0)
}

// ============================================================================
// Monster traits
// ============================================================================

/// Trait name shown when a lair action has no name of its own
pub const LAIR_ACTION_NAME: &str = "Lair Action";

/// Prerequisite phrase per monster trait name (exact match)
pub static TRAIT_PREREQUISITES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "Wing Attack" => "Requires Flight/Wings trait",
    "Tail Sweep" => "Requires Tail trait",
    "Multiattack" => "Requires two natural weapon traits",
    "Breath Weapon" => "Requires Dragon ancestry or elemental affinity",
};

/// Prerequisite phrase for a trait name, if one is known
pub fn trait_prerequisite(trait_name: &str) -> Option<&'static str> {
    TRAIT_PREREQUISITES.get(trait_name).copied()
}

// ============================================================================
// Categories
// ============================================================================

/// Category key (file name prefix) -> merged output file, in merge order
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("item", "items.json"),
    ("spell", "spells.json"),
    ("race", "races.json"),
    ("background", "backgrounds.json"),
    ("feat", "feats.json"),
    ("optionalfeature", "optionalfeatures.json"),
    ("class", "classes.json"),
    ("subclass", "subclasses.json"),
    ("bestiary", "bestiary.json"),
    ("book", "books.json"),
    ("adventure", "adventures.json"),
];

/// Category whose records carry `classFeatures`
pub const CLASS_CATEGORY: &str = "class";
/// Category whose records carry `subclassFeatures`
pub const SUBCLASS_CATEGORY: &str = "subclass";
/// Category whose records carry traits, legendary and lair actions
pub const BESTIARY_CATEGORY: &str = "bestiary";

/// Merged file holding extracted class and subclass features
pub const FEATURES_OUTPUT: &str = "classfeatures.json";
/// Merged file holding extracted monster traits
pub const TRAITS_OUTPUT: &str = "monstertraits.json";

/// Suffix appended to a merged file stem to name its cleaned output
pub const CLEAN_SUFFIX: &str = "_clean";

// ============================================================================
// Content kinds
// ============================================================================

/// Kind of content a merged list holds, selecting the requirement rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    Gear,
    Spell,
    Feat,
    Background,
    Race,
    OptionalFeature,
    ClassFeature,
    MonsterTrait,
}

impl ContentKind {
    /// Label used as the default `type` of cleaned records
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Gear => "Gear",
            ContentKind::Spell => "Spell",
            ContentKind::Feat => "Feat",
            ContentKind::Background => "Background",
            ContentKind::Race => "Race",
            ContentKind::OptionalFeature => "OptionalFeature",
            ContentKind::ClassFeature => "ClassFeature",
            ContentKind::MonsterTrait => "MonsterTrait",
        }
    }

    /// Parse a label, case-insensitive
    pub fn from_label(label: &str) -> Option<Self> {
        ALL_KINDS
            .iter()
            .copied()
            .find(|k| k.label().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

const ALL_KINDS: &[ContentKind] = &[
    ContentKind::Gear,
    ContentKind::Spell,
    ContentKind::Feat,
    ContentKind::Background,
    ContentKind::Race,
    ContentKind::OptionalFeature,
    ContentKind::ClassFeature,
    ContentKind::MonsterTrait,
];

/// Merged file stem -> content kind, in clean order
pub const DEFAULT_CLEAN_TARGETS: &[(&str, ContentKind)] = &[
    ("items", ContentKind::Gear),
    ("spells", ContentKind::Spell),
    ("feats", ContentKind::Feat),
    ("backgrounds", ContentKind::Background),
    ("races", ContentKind::Race),
    ("classfeatures", ContentKind::ClassFeature),
    ("monstertraits", ContentKind::MonsterTrait),
];
