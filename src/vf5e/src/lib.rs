//! # vf5e
//!
//! Merge-and-normalize pipeline for 5e reference data.
//!
//! The raw corpus is a tree of JSON files whose shapes vary from file to file.
//! This library:
//! - Merges every file matching a category prefix into one deduplicated list
//! - Derives class/subclass feature and monster trait lists
//! - Cleans each list into uniform records with a flattened description,
//!   a requirement summary, a gold-piece value and a 1-100 strength score
//!
//! ## Example
//!
//! ```no_run
//! use vf5e::{Pipeline, PipelineConfig};
//!
//! # fn main() -> vf5e::Result<()> {
//! let config = PipelineConfig::default().with_input_dir("data");
//! let report = Pipeline::new(config).run()?;
//!
//! for summary in &report.clean.written {
//!     println!("{} -> {} entries", summary.output.display(), summary.records);
//! }
//! # Ok(())
//! # }
//! ```

pub mod clean;
pub mod config;
pub mod corpus;
pub mod currency;
pub mod entry;
pub mod merge;
pub mod pipeline;
pub mod reference;
pub mod requirements;
pub mod scoring;

use std::path::PathBuf;

#[doc(inline)]
pub use clean::{
    clean_generic, clean_monster_traits, CleanReport, CleanSummary, CleanedEntry, CleanedTrait,
};
#[doc(inline)]
pub use config::{CategorySpec, CleanTarget, PipelineConfig};
#[doc(inline)]
pub use corpus::{RecordKey, RawRecord};
#[doc(inline)]
pub use currency::{convert_value, Coinage};
#[doc(inline)]
pub use entry::{flatten_entries, strip_tags, EntryNode};
#[doc(inline)]
pub use merge::{extract_class_features, extract_monster_traits, CategorySummary, MergeReport};
#[doc(inline)]
pub use pipeline::{Pipeline, RunReport};
#[doc(inline)]
pub use reference::ContentKind;
#[doc(inline)]
pub use scoring::{score, ScoreInput};

/// Errors from the merge/clean pipeline
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Missing input file: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl Error {
    /// Whether the run can continue past this error
    ///
    /// Missing and malformed inputs only affect a single file or category.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::MissingInput { .. } | Error::MalformedInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        let missing = Error::MissingInput {
            path: PathBuf::from("merged/items.json"),
        };
        assert!(missing.is_recoverable());

        let write = Error::Write {
            path: PathBuf::from("cleaned/items_clean.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!write.is_recoverable());
        assert!(write.to_string().contains("cleaned/items_clean.json"));
    }
}
