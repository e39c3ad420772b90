//! Pipeline configuration
//!
//! Every directory and table the pipeline uses lives in [`PipelineConfig`],
//! which is handed to each stage explicitly. Values can be loaded from TOML;
//! anything the file leaves out keeps its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::reference::{
    ContentKind, CLEAN_SUFFIX, DEFAULT_CATEGORIES, DEFAULT_CLEAN_TARGETS, FEATURES_OUTPUT,
    TRAITS_OUTPUT,
};
use crate::{Error, Result};

/// A category key (file name prefix) and its merged output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub key: String,
    pub output: String,
}

/// A merged file stem and the kind of content it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanTarget {
    pub name: String,
    pub kind: ContentKind,
}

impl CleanTarget {
    /// Merged input file name (`items.json`)
    pub fn input_file(&self) -> String {
        format!("{}.json", self.name)
    }

    /// Cleaned output file name (`items_clean.json`)
    pub fn output_file(&self) -> String {
        format!("{}{}.json", self.name, CLEAN_SUFFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root of the raw corpus
    pub input_dir: PathBuf,
    /// Where merged lists are written (and read back by the clean stage)
    pub merged_dir: PathBuf,
    /// Where cleaned lists are written
    pub cleaned_dir: PathBuf,
    /// Merged file for extracted class and subclass features
    pub features_output: String,
    /// Merged file for extracted monster traits
    pub traits_output: String,
    pub categories: Vec<CategorySpec>,
    pub clean_targets: Vec<CleanTarget>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            merged_dir: PathBuf::from("./merged"),
            cleaned_dir: PathBuf::from("./cleaned"),
            features_output: FEATURES_OUTPUT.to_string(),
            traits_output: TRAITS_OUTPUT.to_string(),
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(key, output)| CategorySpec {
                    key: key.to_string(),
                    output: output.to_string(),
                })
                .collect(),
            clean_targets: DEFAULT_CLEAN_TARGETS
                .iter()
                .map(|(name, kind)| CleanTarget {
                    name: name.to_string(),
                    kind: *kind,
                })
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Parse TOML text
    pub fn from_toml_str(path: &Path, text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(path, &text)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config {
            path: PathBuf::new(),
            reason: e.to_string(),
        })
    }

    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    pub fn with_merged_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.merged_dir = dir.into();
        self
    }

    pub fn with_cleaned_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cleaned_dir = dir.into();
        self
    }

    /// Directories the corpus walk must not descend into
    pub fn output_dirs(&self) -> Vec<PathBuf> {
        vec![self.merged_dir.clone(), self.cleaned_dir.clone()]
    }
}
