//! Requirement summaries
//!
//! Each content kind turns its own prerequisite fields into an ordered list
//! of phrases, joined with `"; "`. An empty list means "no requirements" and
//! is reported as `None`.
//!
//! Prerequisite shapes vary across the corpus (a race may be an object, a
//! list, or a bare string), so they are parsed into the typed variants below
//! before any text is produced.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::corpus::{display_value, field_str, truthy_field, RawRecord};
use crate::reference::{trait_prerequisite, ContentKind};

const PHRASE_SEPARATOR: &str = "; ";

// ============================================================================
// Prerequisite model
// ============================================================================

/// One element of a feat's `prerequisite` list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatPrerequisite {
    /// Alternatives of `{ability: minimum}` pairs
    #[serde(default)]
    pub ability: Vec<Map<String, Value>>,
    #[serde(default)]
    pub feat: Option<FeatNames>,
    #[serde(default)]
    pub race: Option<RacePrerequisite>,
    #[serde(default)]
    pub class: Option<ClassPrerequisite>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeatNames {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RacePrerequisite {
    // Lists first: a struct would also accept a sequence of strings
    Many(Vec<RaceEntry>),
    One(RaceRef),
    Named(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RaceEntry {
    Ref(RaceRef),
    Named(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaceRef {
    pub name: String,
    #[serde(default)]
    pub subrace: Option<String>,
}

impl RaceRef {
    fn label(&self) -> String {
        match &self.subrace {
            Some(subrace) => format!("{} ({})", self.name, subrace),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassPrerequisite {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<Value>,
}

/// Spell `classes` field: a plain list, or grouped under `fromClassList`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpellClasses {
    List(Vec<ClassName>),
    Grouped {
        #[serde(rename = "fromClassList", default)]
        from_class_list: Vec<ClassName>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClassName {
    Named(String),
    Ref { name: String },
}

impl ClassName {
    fn as_str(&self) -> &str {
        match self {
            ClassName::Named(name) | ClassName::Ref { name } => name,
        }
    }
}

impl SpellClasses {
    fn names(&self) -> Vec<&str> {
        let list = match self {
            SpellClasses::List(list) => list,
            SpellClasses::Grouped { from_class_list } => from_class_list,
        };
        list.iter().map(ClassName::as_str).collect()
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Requirement summary for a record of the given kind
pub fn build_requirements(raw: &RawRecord, kind: ContentKind) -> Option<String> {
    let mut phrases = Vec::new();

    match kind {
        ContentKind::Feat => phrases.extend(feat_phrases(raw)),
        ContentKind::ClassFeature => phrases.extend(class_feature_phrases(raw)),
        ContentKind::Spell => phrases.extend(spell_phrases(raw)),
        ContentKind::MonsterTrait => return build_trait_requirements(raw),
        _ => {}
    }

    if let Some(attune) = truthy_field(raw, "reqAttune") {
        phrases.push(format!("Attunement: {}", attunement_text(attune)));
    }

    join_phrases(phrases)
}

/// Requirement summary for an extracted monster trait
pub fn build_trait_requirements(raw: &RawRecord) -> Option<String> {
    let mut phrases = Vec::new();

    if truthy_field(raw, "legendary").is_some() {
        phrases.push("Requires Legendary status".to_string());
    }
    if truthy_field(raw, "lair").is_some() {
        phrases.push("Requires Lair trait unlocked".to_string());
    }
    if let Some(phrase) = field_str(raw, "traitName").and_then(trait_prerequisite) {
        phrases.push(phrase.to_string());
    }

    join_phrases(phrases)
}

fn join_phrases(phrases: Vec<String>) -> Option<String> {
    if phrases.is_empty() {
        None
    } else {
        Some(phrases.join(PHRASE_SEPARATOR))
    }
}

fn attunement_text(value: &Value) -> String {
    match value {
        Value::Bool(true) => "required".to_string(),
        other => display_value(other),
    }
}

/// Level text, defaulting to 1 when absent or null
fn level_text(level: Option<&Value>) -> String {
    match level {
        None | Some(Value::Null) => "1".to_string(),
        Some(value) => display_value(value),
    }
}

fn feat_phrases(raw: &RawRecord) -> Vec<String> {
    let Some(Value::Array(prereqs)) = raw.get("prerequisite") else {
        return Vec::new();
    };

    let mut phrases = Vec::new();
    for value in prereqs {
        match FeatPrerequisite::deserialize(value) {
            Ok(prereq) => phrases.extend(prereq.phrases()),
            Err(e) => tracing::debug!(
                "Skipped prerequisite of {}: {}",
                field_str(raw, "name").unwrap_or("<unnamed>"),
                e
            ),
        }
    }
    phrases
}

impl FeatPrerequisite {
    /// Phrases in field order: ability scores, feat, race, class
    pub fn phrases(&self) -> Vec<String> {
        let mut out = Vec::new();

        for alternative in &self.ability {
            for (ability, score) in alternative {
                if matches!(score, Value::Number(_) | Value::String(_)) {
                    out.push(format!("{} {}+", ability.to_uppercase(), display_value(score)));
                }
            }
        }

        match &self.feat {
            Some(FeatNames::One(name)) => out.push(format!("Feat: {}", name)),
            Some(FeatNames::Many(names)) if !names.is_empty() => {
                out.push(format!("Feat: {}", names.join(", ")));
            }
            _ => {}
        }

        if let Some(race) = &self.race {
            let names: Vec<String> = match race {
                RacePrerequisite::Many(entries) => entries
                    .iter()
                    .map(|entry| match entry {
                        RaceEntry::Ref(r) => r.label(),
                        RaceEntry::Named(name) => name.clone(),
                    })
                    .collect(),
                RacePrerequisite::One(r) => vec![r.label()],
                RacePrerequisite::Named(name) => vec![name.clone()],
            };
            out.push(format!("Race: {}", names.join(", ")));
        }

        if let Some(ClassPrerequisite {
            name: Some(name),
            level,
        }) = &self.class
        {
            out.push(format!("{} level {}+", name, level_text(level.as_ref())));
        }

        out
    }
}

fn class_feature_phrases(raw: &RawRecord) -> Vec<String> {
    let mut out = Vec::new();
    let level = level_text(raw.get("level"));

    if let Some(class) = truthy_field(raw, "class") {
        out.push(format!("{} level {}+", display_value(class), level));
    }
    if let Some(subclass) = truthy_field(raw, "subclass") {
        out.push(format!("{} subclass, level {}+", display_value(subclass), level));
    }

    out
}

fn spell_phrases(raw: &RawRecord) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(level) = raw.get("level") {
        out.push(format!("Spell level {}", display_value(level)));
    }

    if let Some(classes) = raw.get("classes") {
        match SpellClasses::deserialize(classes) {
            Ok(classes) => {
                let names = classes.names();
                if !names.is_empty() {
                    out.push(format!("Available to: {}", names.join(", ")));
                }
            }
            Err(e) => tracing::debug!(
                "Skipped classes of {}: {}",
                field_str(raw, "name").unwrap_or("<unnamed>"),
                e
            ),
        }
    }

    out
}
