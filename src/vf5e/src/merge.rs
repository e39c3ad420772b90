//! Corpus merging
//!
//! Folds every source file matching a category prefix into one list,
//! deduplicated by (name, source), and derives the class feature and monster
//! trait lists from the merged class, subclass and bestiary data.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::corpus::{
    dedup_records, list_json_files, matches_category, write_json, RawRecord, SourceDocument,
};
use crate::reference::{BESTIARY_CATEGORY, CLASS_CATEGORY, LAIR_ACTION_NAME, SUBCLASS_CATEGORY};
use crate::{Error, Result};

// ============================================================================
// Synthetic records
// ============================================================================

/// Which record a feature belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureOwner {
    Class(Value),
    Subclass(Value),
}

/// A class or subclass feature lifted out of its level group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    #[serde(flatten)]
    pub owner: FeatureOwner,
    pub feature_name: Value,
    pub entries: Value,
    pub level: Value,
    pub source: Value,
}

/// A monster trait, legendary action or lair action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterTraitRecord {
    pub monster: Value,
    pub trait_name: Value,
    pub entries: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legendary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lair: Option<bool>,
    pub source: Value,
}

fn field(record: &RawRecord, key: &str) -> Value {
    record.get(key).cloned().unwrap_or(Value::Null)
}

/// Object elements of a list field; anything else yields nothing
fn objects<'a>(record: &'a RawRecord, key: &str) -> impl Iterator<Item = &'a RawRecord> {
    record
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn features_of(
    record: &RawRecord,
    groups_key: &str,
    owner: fn(Value) -> FeatureOwner,
) -> Vec<FeatureRecord> {
    let mut out = Vec::new();

    for group in objects(record, groups_key) {
        for feature in objects(group, "entries") {
            out.push(FeatureRecord {
                owner: owner(field(record, "name")),
                feature_name: field(feature, "name"),
                entries: field(feature, "entries"),
                level: field(group, "level"),
                source: field(record, "source"),
            });
        }
    }

    out
}

/// Features of every class (`classFeatures`) then every subclass (`subclassFeatures`)
pub fn extract_class_features(
    classes: &[RawRecord],
    subclasses: &[RawRecord],
) -> Vec<FeatureRecord> {
    let class_features = classes
        .iter()
        .flat_map(|cls| features_of(cls, "classFeatures", FeatureOwner::Class));
    let subclass_features = subclasses
        .iter()
        .flat_map(|sc| features_of(sc, "subclassFeatures", FeatureOwner::Subclass));

    class_features.chain(subclass_features).collect()
}

/// Traits, legendary actions and lair actions of every monster, monster by monster
pub fn extract_monster_traits(bestiary: &[RawRecord]) -> Vec<MonsterTraitRecord> {
    let mut out = Vec::new();

    for monster in bestiary {
        let record = |entry: &RawRecord, trait_name: Value| MonsterTraitRecord {
            monster: field(monster, "name"),
            trait_name,
            entries: field(entry, "entries"),
            legendary: None,
            lair: None,
            source: field(monster, "source"),
        };

        for t in objects(monster, "trait") {
            out.push(record(t, field(t, "name")));
        }

        for action in objects(monster, "legendary") {
            out.push(MonsterTraitRecord {
                legendary: Some(true),
                ..record(action, field(action, "name"))
            });
        }

        for action in objects(monster, "lairActions") {
            let name = action
                .get("name")
                .cloned()
                .unwrap_or_else(|| Value::String(LAIR_ACTION_NAME.to_string()));
            out.push(MonsterTraitRecord {
                lair: Some(true),
                ..record(action, name)
            });
        }
    }

    out
}

// ============================================================================
// Category merge
// ============================================================================

/// Outcome of merging one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: String,
    pub output: PathBuf,
    /// Files that contributed records
    pub files: usize,
    /// Files skipped as unreadable or malformed
    pub skipped: usize,
    /// Records written, after deduplication
    pub records: usize,
    /// Records dropped as (name, source) duplicates
    pub duplicates: usize,
}

/// Outcome of the whole merge stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub categories: Vec<CategorySummary>,
    pub features_output: PathBuf,
    pub features: usize,
    pub traits_output: PathBuf,
    pub traits: usize,
}

impl MergeReport {
    /// Total malformed files skipped across all categories
    pub fn skipped_files(&self) -> usize {
        self.categories.iter().map(|c| c.skipped).sum()
    }
}

/// Merged records of one category plus counters for its summary
#[derive(Debug, Clone, Default)]
pub struct MergedCategory {
    pub records: Vec<RawRecord>,
    pub files: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

/// Merge every file of `files` whose name starts with `key`.
///
/// Unreadable or malformed files are logged and skipped.
pub fn merge_category(files: &[PathBuf], key: &str) -> MergedCategory {
    let mut merged = MergedCategory::default();
    let mut records = Vec::new();

    for path in files.iter().filter(|p| matches_category(p, key)) {
        match SourceDocument::load(path) {
            Ok(doc) => {
                let (file_records, dropped) = doc.into_records();
                if dropped > 0 {
                    tracing::debug!("{}: dropped {} non-object entries", path.display(), dropped);
                }
                tracing::debug!("{}: {} records", path.display(), file_records.len());
                records.extend(file_records);
                merged.files += 1;
            }
            Err(e) => {
                tracing::warn!("Skipped {}", e);
                merged.skipped += 1;
            }
        }
    }

    let (records, duplicates) = dedup_records(records);
    merged.records = records;
    merged.duplicates = duplicates;
    merged
}

/// Run the merge stage: one merged file per category plus the derived lists
pub fn run_merge(config: &PipelineConfig) -> Result<MergeReport> {
    create_dir(&config.merged_dir)?;

    let files = list_json_files(&config.input_dir, &config.output_dirs());
    tracing::debug!("Found {} JSON files under {}", files.len(), config.input_dir.display());

    let mut report = MergeReport::default();
    let mut derived_inputs: HashMap<&str, Vec<RawRecord>> = HashMap::new();

    for spec in &config.categories {
        let merged = merge_category(&files, &spec.key);
        let output = config.merged_dir.join(&spec.output);
        write_json(&output, &merged.records)?;
        tracing::info!("Wrote {} with {} entries", output.display(), merged.records.len());

        report.categories.push(CategorySummary {
            category: spec.key.clone(),
            output,
            files: merged.files,
            skipped: merged.skipped,
            records: merged.records.len(),
            duplicates: merged.duplicates,
        });

        let key = spec.key.as_str();
        if [CLASS_CATEGORY, SUBCLASS_CATEGORY, BESTIARY_CATEGORY].contains(&key) {
            derived_inputs.entry(key).or_default().extend(merged.records);
        }
    }

    let derived = |key: &str| derived_inputs.get(key).map(Vec::as_slice).unwrap_or_default();

    let features = extract_class_features(derived(CLASS_CATEGORY), derived(SUBCLASS_CATEGORY));
    report.features_output = config.merged_dir.join(&config.features_output);
    report.features = features.len();
    write_json(&report.features_output, &features)?;
    tracing::info!(
        "Wrote {} with {} features",
        report.features_output.display(),
        features.len()
    );

    let traits = extract_monster_traits(derived(BESTIARY_CATEGORY));
    report.traits_output = config.merged_dir.join(&config.traits_output);
    report.traits = traits.len();
    write_json(&report.traits_output, &traits)?;
    tracing::info!(
        "Wrote {} with {} traits",
        report.traits_output.display(),
        traits.len()
    );

    Ok(report)
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::Write {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn write(path: &Path, value: Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string(&value).unwrap()).unwrap();
    }

    fn read(path: &Path) -> Vec<Value> {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_class_features() {
        let classes = vec![record(json!({
            "name": "Fighter",
            "source": "PHB",
            "classFeatures": [
                {"level": 1, "entries": [{"name": "Second Wind", "entries": ["Regain HP."]}, "loose text"]},
                "Fighting Style|Fighter||1",
                {"level": 2, "entries": [{"name": "Action Surge", "entries": ["Take another action."]}]}
            ]
        }))];
        let subclasses = vec![record(json!({
            "name": "Champion",
            "source": "PHB",
            "subclassFeatures": [
                {"level": 3, "entries": [{"name": "Improved Critical"}]}
            ]
        }))];

        let features = extract_class_features(&classes, &subclasses);
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].owner, FeatureOwner::Class(json!("Fighter")));
        assert_eq!(features[1].level, json!(2));
        assert_eq!(features[2].owner, FeatureOwner::Subclass(json!("Champion")));
        assert_eq!(features[2].entries, Value::Null);

        let serialized = serde_json::to_value(&features[2]).unwrap();
        assert_eq!(
            serialized,
            json!({
                "subclass": "Champion",
                "featureName": "Improved Critical",
                "entries": null,
                "level": 3,
                "source": "PHB"
            })
        );
    }

    #[test]
    fn test_monster_traits() {
        let bestiary = vec![record(json!({
            "name": "Adult Red Dragon",
            "source": "MM",
            "trait": [{"name": "Legendary Resistance (3/Day)", "entries": ["Succeeds instead."]}],
            "legendary": [{"name": "Wing Attack", "entries": ["Beats its wings."]}, "junk"],
            "lairActions": [{"entries": ["Magma erupts."]}]
        }))];

        let traits = extract_monster_traits(&bestiary);
        assert_eq!(traits.len(), 3);
        assert_eq!(traits[0].legendary, None);
        assert_eq!(traits[1].trait_name, json!("Wing Attack"));
        assert_eq!(traits[1].legendary, Some(true));
        assert_eq!(traits[2].trait_name, json!("Lair Action"));
        assert_eq!(traits[2].lair, Some(true));

        let serialized = serde_json::to_value(&traits[2]).unwrap();
        assert_eq!(
            serialized,
            json!({
                "monster": "Adult Red Dragon",
                "traitName": "Lair Action",
                "entries": ["Magma erupts."],
                "lair": true,
                "source": "MM"
            })
        );
    }

    #[test]
    fn test_merge_dedups_across_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(
            &root.join("data/items.json"),
            json!({"item": [{"name": "Longsword", "source": "PHB", "weight": 3}]}),
        );
        write(
            &root.join("data/items-base.json"),
            json!([{"name": "Longsword", "source": "PHB", "weight": 4}, {"name": "Dagger", "source": "PHB"}]),
        );

        let files = list_json_files(root, &[]);
        let merged = merge_category(&files, "item");
        assert_eq!(merged.files, 2);
        assert_eq!(merged.duplicates, 1);

        let longswords: Vec<_> = merged
            .records
            .iter()
            .filter(|r| r["name"] == json!("Longsword"))
            .collect();
        assert_eq!(longswords.len(), 1);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(&root.join("a/spells-phb.json"), json!({"spell": [{"name": "Fireball", "source": "PHB"}]}));
        write(&root.join("b/spells-xge.json"), json!({"spell": [{"name": "Fireball", "source": "PHB"}, {"name": "Catnap", "source": "XGE"}]}));

        let files = list_json_files(root, &[]);
        let first = merge_category(&files, "spell");
        let second = merge_category(&files, "spell");
        assert_eq!(first.records, second.records);
        assert_eq!(first.records.len(), 2);
    }

    #[test]
    fn test_run_merge_skips_malformed_and_writes_derived() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let input = root.join("data");
        write(&input.join("items.json"), json!({"item": [{"name": "Rope", "source": "PHB"}]}));
        fs::write(input.join("items-broken.json"), "{ not json").unwrap();
        write(
            &input.join("class/class-wizard.json"),
            json!({"class": [{"name": "Wizard", "source": "PHB", "classFeatures": [
                {"level": 2, "entries": [{"name": "Arcane Tradition", "entries": ["Choose."]}]}
            ]}]}),
        );
        write(
            &input.join("bestiary/bestiary-mm.json"),
            json!({"monster": [{"name": "Wyvern", "source": "MM", "trait": [{"name": "Flyby"}]}]}),
        );

        let config = PipelineConfig::default()
            .with_input_dir(&input)
            .with_merged_dir(root.join("merged"))
            .with_cleaned_dir(root.join("cleaned"));
        let report = run_merge(&config).unwrap();

        let items = report.categories.iter().find(|c| c.category == "item").unwrap();
        assert_eq!(items.records, 1);
        assert_eq!(items.skipped, 1);
        assert_eq!(report.skipped_files(), 1);

        let feats = report.categories.iter().find(|c| c.category == "feat").unwrap();
        assert_eq!(feats.records, 0);
        assert_eq!(read(&feats.output), Vec::<Value>::new());

        assert_eq!(report.features, 1);
        assert_eq!(report.traits, 1);
        let traits = read(&report.traits_output);
        assert_eq!(traits[0]["monster"], json!("Wyvern"));
    }

    #[test]
    fn test_run_merge_unwritable_output_is_fatal() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(&root.join("data/items.json"), json!([{"name": "Rope", "source": "PHB"}]));
        fs::write(root.join("blocker"), "not a directory").unwrap();

        let config = PipelineConfig::default()
            .with_input_dir(root.join("data"))
            .with_merged_dir(root.join("blocker/merged"))
            .with_cleaned_dir(root.join("cleaned"));

        let err = run_merge(&config).unwrap_err();
        assert!(!err.is_recoverable());
        match err {
            Error::Write { path, .. } => assert_eq!(path, root.join("blocker/merged")),
            other => panic!("expected a write error, got {other:?}"),
        }
    }

    #[test]
    fn test_run_merge_ignores_its_own_output() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(&root.join("items.json"), json!([{"name": "Rope", "source": "PHB"}]));

        let config = PipelineConfig::default()
            .with_input_dir(root)
            .with_merged_dir(root.join("merged"))
            .with_cleaned_dir(root.join("cleaned"));

        let first = run_merge(&config).unwrap();
        let second = run_merge(&config).unwrap();
        assert_eq!(first.categories, second.categories);

        let items = second.categories.iter().find(|c| c.category == "item").unwrap();
        assert_eq!(items.files, 1);
    }
}
