//! Show the effective configuration

use anyhow::Result;
use std::io::{self, Write};
use vf5e::PipelineConfig;

/// Handle the categories command
pub fn handle(config: &PipelineConfig, toml: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if toml {
        write!(out, "{}", config.to_toml()?)?;
    } else {
        print_table(&mut out, config)?;
    }
    Ok(())
}

fn print_table(out: &mut impl Write, config: &PipelineConfig) -> io::Result<()> {
    writeln!(out, "Input:   {}", config.input_dir.display())?;
    writeln!(out, "Merged:  {}", config.merged_dir.display())?;
    writeln!(out, "Cleaned: {}", config.cleaned_dir.display())?;
    writeln!(out)?;

    writeln!(out, "{:<20} Output", "Category")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for spec in &config.categories {
        writeln!(out, "{:<20} {}", spec.key, spec.output)?;
    }
    writeln!(out, "{:<20} {}", "(class features)", config.features_output)?;
    writeln!(out, "{:<20} {}", "(monster traits)", config.traits_output)?;
    writeln!(out)?;

    writeln!(out, "{:<20} {:<18} Output", "Clean target", "Kind")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for target in &config.clean_targets {
        writeln!(
            out,
            "{:<20} {:<18} {}",
            target.input_file(),
            target.kind.label(),
            target.output_file()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_defaults() {
        let mut out = Vec::new();
        print_table(&mut out, &PipelineConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("optionalfeature"));
        assert!(text.contains("monstertraits.json"));
        assert!(text.contains("items_clean.json"));
    }
}
