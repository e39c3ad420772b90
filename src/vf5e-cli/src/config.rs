//! Configuration loading for the vf5e CLI

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use vf5e::PipelineConfig;

use crate::cli::DirArgs;

/// Get the path to the default config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vf5e").join("config.toml"))
}

/// Load the pipeline config.
///
/// An explicit path must exist. Without one, the default config file is used
/// when present, otherwise built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<PipelineConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => path,
            None => return Ok(PipelineConfig::default()),
        },
    };

    tracing::debug!("Loading config from {}", path.display());
    PipelineConfig::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Apply command-line directory overrides
pub fn apply_overrides(mut config: PipelineConfig, dirs: &DirArgs) -> PipelineConfig {
    if let Some(input) = &dirs.input {
        config.input_dir = input.clone();
    }
    if let Some(merged) = &dirs.merged {
        config.merged_dir = merged.clone();
    }
    if let Some(cleaned) = &dirs.cleaned {
        config.cleaned_dir = cleaned.clone();
    }
    config
}
