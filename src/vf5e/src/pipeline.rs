//! Merge-then-clean orchestration

use crate::clean::{run_clean, CleanReport};
use crate::config::PipelineConfig;
use crate::merge::{run_merge, MergeReport};
use crate::Result;

/// Outcome of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub merge: MergeReport,
    pub clean: CleanReport,
}

/// The two pipeline stages bound to one configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Merge the raw corpus into the merged directory
    pub fn merge(&self) -> Result<MergeReport> {
        tracing::info!(
            "Merging {} into {}",
            self.config.input_dir.display(),
            self.config.merged_dir.display()
        );
        run_merge(&self.config)
    }

    /// Clean merged lists into the cleaned directory
    pub fn clean(&self) -> Result<CleanReport> {
        tracing::info!(
            "Cleaning {} into {}",
            self.config.merged_dir.display(),
            self.config.cleaned_dir.display()
        );
        run_clean(&self.config)
    }

    /// Merge, then clean
    pub fn run(&self) -> Result<RunReport> {
        let merge = self.merge()?;
        let clean = self.clean()?;
        Ok(RunReport { merge, clean })
    }
}
