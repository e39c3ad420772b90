//! Merge, clean and run handlers

use anyhow::{bail, Result};
use std::io::{self, Write};
use vf5e::{CleanReport, MergeReport, Pipeline, PipelineConfig};

/// Handle the merge command
pub fn merge(config: PipelineConfig) -> Result<()> {
    let report = Pipeline::new(config).merge()?;
    print_merge(&mut io::stdout().lock(), &report)?;
    Ok(())
}

/// Handle the clean command
///
/// Fails when none of the merged inputs exist, since nothing was produced.
pub fn clean(config: PipelineConfig) -> Result<()> {
    let report = Pipeline::new(config).clean()?;
    print_clean(&mut io::stdout().lock(), &report)?;
    if report.written.is_empty() && !report.skipped.is_empty() {
        bail!("No merged lists found; run `vf5e merge` first");
    }
    Ok(())
}

/// Handle the run command
pub fn run(config: PipelineConfig) -> Result<()> {
    let report = Pipeline::new(config).run()?;
    let mut out = io::stdout().lock();
    print_merge(&mut out, &report.merge)?;
    print_clean(&mut out, &report.clean)?;
    Ok(())
}

fn print_merge(out: &mut impl Write, report: &MergeReport) -> io::Result<()> {
    for summary in &report.categories {
        write!(
            out,
            "Merged {} from {} files into {} ({} entries",
            summary.category,
            summary.files,
            summary.output.display(),
            summary.records
        )?;
        if summary.duplicates > 0 {
            write!(out, ", {} duplicates dropped", summary.duplicates)?;
        }
        writeln!(out, ")")?;
    }
    writeln!(
        out,
        "Wrote {} with {} entries",
        report.features_output.display(),
        report.features
    )?;
    writeln!(
        out,
        "Wrote {} with {} entries",
        report.traits_output.display(),
        report.traits
    )?;

    let skipped = report.skipped_files();
    if skipped > 0 {
        writeln!(out, "Skipped {} unreadable files", skipped)?;
    }
    Ok(())
}

fn print_clean(out: &mut impl Write, report: &CleanReport) -> io::Result<()> {
    for summary in &report.written {
        writeln!(
            out,
            "Wrote {} with {} entries",
            summary.output.display(),
            summary.records
        )?;
    }
    for path in &report.skipped {
        writeln!(out, "Skipped {} (missing or unreadable)", path.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> PipelineConfig {
        PipelineConfig::default()
            .with_input_dir(dir.path().join("data"))
            .with_merged_dir(dir.path().join("merged"))
            .with_cleaned_dir(dir.path().join("cleaned"))
    }

    #[test]
    fn test_merge_output() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(
            dir.path().join("data/spells.json"),
            r#"{"spell": [{"name": "Shield", "source": "PHB"}, {"name": "Shield", "source": "PHB"}]}"#,
        )
        .unwrap();

        let report = Pipeline::new(config(&dir)).merge().unwrap();
        let mut out = Vec::new();
        print_merge(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Merged spell from 1 files"));
        assert!(text.contains("(1 entries, 1 duplicates dropped)"));
        assert!(text.contains("classfeatures.json with 0 entries"));
        assert!(!text.contains("Skipped"));
    }

    #[test]
    fn test_clean_without_merged_lists_fails() {
        let dir = TempDir::new().unwrap();
        let err = clean(config(&dir)).unwrap_err();
        assert!(err.to_string().contains("vf5e merge"));
    }

    #[test]
    fn test_clean_output_lists_skipped() {
        let dir = TempDir::new().unwrap();
        let report = Pipeline::new(config(&dir)).clean().unwrap();
        let mut out = Vec::new();
        print_clean(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), report.skipped.len());
        assert!(text.contains("items.json (missing or unreadable)"));
    }
}
