//! Cleaning merged lists into uniform records

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::config::{CleanTarget, PipelineConfig};
use crate::corpus::{display_value, load_records, truthy_field, write_json, RawRecord, RecordKey};
use crate::currency::{convert_value, round_cents};
use crate::entry::{describe, tree_from_field};
use crate::reference::ContentKind;
use crate::requirements::{build_requirements, build_trait_requirements};
use crate::scoring::{score, ScoreInput};
use crate::{Error, Result};

const UNKNOWN_SOURCE: &str = "Unknown";
const DEFAULT_RARITY: &str = "Common";

/// A cleaned item, spell, feat, background, race or class feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedEntry {
    pub name: Value,
    #[serde(rename = "type")]
    pub item_type: Value,
    pub rarity: Value,
    pub attunement: Option<Value>,
    pub weight: Value,
    pub source: Value,
    pub description: String,
    pub requirements: Option<String>,
    pub strength: u8,
    pub value: f64,
}

/// A cleaned monster trait
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedTrait {
    pub monster: Value,
    pub trait_name: Value,
    pub source: Value,
    pub description: String,
    pub requirements: Option<String>,
    pub strength: u8,
    pub value: f64,
}

fn field_or(raw: &RawRecord, key: &str, default: Value) -> Value {
    raw.get(key).cloned().unwrap_or(default)
}

/// Value derived from strength when a record has no price of its own
fn strength_value(strength: u8) -> f64 {
    round_cents(f64::from(strength) * 100.0)
}

/// Build the cleaned form of one record
pub fn clean_record(raw: &RawRecord, kind: ContentKind) -> CleanedEntry {
    let mut name = field_or(raw, "name", Value::Null);
    if name.is_null() && kind == ContentKind::ClassFeature {
        name = field_or(raw, "featureName", Value::Null);
    }

    let item_type = field_or(raw, "type", Value::String(kind.label().to_string()));
    let rarity = field_or(raw, "rarity", Value::String(DEFAULT_RARITY.to_string()));
    let attunement = truthy_field(raw, "reqAttune").cloned();
    let description = describe(&tree_from_field(raw.get("entries")));

    let strength = score(&ScoreInput {
        rarity: rarity.as_str(),
        attunement: attunement.is_some(),
        item_type: item_type.as_str(),
        description: &description,
    });

    let price = convert_value(raw.get("value"));
    let value = if price > 0.0 {
        price
    } else {
        strength_value(strength)
    };

    CleanedEntry {
        name,
        item_type,
        rarity,
        attunement,
        weight: field_or(raw, "weight", Value::from(0)),
        source: field_or(raw, "source", Value::String(UNKNOWN_SOURCE.to_string())),
        description,
        requirements: build_requirements(raw, kind),
        strength,
        value,
    }
}

/// Clean a merged list, keeping the first record per (name, source)
pub fn clean_generic(records: &[RawRecord], kind: ContentKind) -> Vec<CleanedEntry> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();

    for raw in records {
        let entry = clean_record(raw, kind);
        let text = |v: &Value| (!v.is_null()).then(|| display_value(v));
        if seen.insert(RecordKey::new(text(&entry.name), text(&entry.source))) {
            cleaned.push(entry);
        }
    }

    cleaned
}

/// Build the cleaned form of one extracted monster trait
pub fn clean_trait(raw: &RawRecord) -> CleanedTrait {
    let description = describe(&tree_from_field(raw.get("entries")));
    let strength = score(&ScoreInput {
        description: &description,
        ..Default::default()
    });

    CleanedTrait {
        monster: field_or(raw, "monster", Value::Null),
        trait_name: field_or(raw, "traitName", Value::Null),
        source: field_or(raw, "source", Value::String(UNKNOWN_SOURCE.to_string())),
        description,
        requirements: build_trait_requirements(raw),
        strength,
        value: strength_value(strength),
    }
}

/// Clean every extracted monster trait, in order
pub fn clean_monster_traits(records: &[RawRecord]) -> Vec<CleanedTrait> {
    records.iter().map(clean_trait).collect()
}

// ============================================================================
// Stage
// ============================================================================

/// One cleaned file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    pub target: String,
    pub kind: ContentKind,
    pub output: PathBuf,
    pub records: usize,
}

/// Outcome of the clean stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub written: Vec<CleanSummary>,
    /// Merged inputs that were missing or unreadable
    pub skipped: Vec<PathBuf>,
}

/// Clean one target, writing `<name>_clean.json`
pub fn clean_target(config: &PipelineConfig, target: &CleanTarget) -> Result<CleanSummary> {
    let input = config.merged_dir.join(target.input_file());
    let output = config.cleaned_dir.join(target.output_file());
    let records = load_records(&input)?;

    let count = if target.kind == ContentKind::MonsterTrait {
        let cleaned = clean_monster_traits(&records);
        write_json(&output, &cleaned)?;
        cleaned.len()
    } else {
        let cleaned = clean_generic(&records, target.kind);
        write_json(&output, &cleaned)?;
        cleaned.len()
    };

    tracing::info!("Wrote {} with {} entries", output.display(), count);

    Ok(CleanSummary {
        target: target.name.clone(),
        kind: target.kind,
        output,
        records: count,
    })
}

/// Run the clean stage over every configured target.
///
/// Missing or malformed merged inputs skip their target; write failures abort.
pub fn run_clean(config: &PipelineConfig) -> Result<CleanReport> {
    fs::create_dir_all(&config.cleaned_dir).map_err(|source| Error::Write {
        path: config.cleaned_dir.clone(),
        source,
    })?;

    let mut report = CleanReport::default();

    for target in &config.clean_targets {
        match clean_target(config, target) {
            Ok(summary) => report.written.push(summary),
            Err(e) if e.is_recoverable() => {
                tracing::warn!("Skipped {}: {}", target.name, e);
                report.skipped.push(config.merged_dir.join(target.input_file()));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
