//! CLI argument definitions for vf5e

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vf5e")]
#[command(about = "Merge and clean 5e reference data", long_about = None)]
pub struct Cli {
    /// Config file (defaults to <config dir>/vf5e/config.toml when present)
    #[arg(short, long, global = true, env = "VF5E_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Directory overrides shared by the pipeline commands
#[derive(Args, Debug, Default, Clone)]
pub struct DirArgs {
    /// Root of the raw corpus
    #[arg(short, long, env = "VF5E_INPUT")]
    pub input: Option<PathBuf>,

    /// Directory for merged lists
    #[arg(short, long, env = "VF5E_MERGED")]
    pub merged: Option<PathBuf>,

    /// Directory for cleaned lists
    #[arg(short = 'o', long, env = "VF5E_CLEANED")]
    pub cleaned: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge raw corpus files into one deduplicated list per category
    #[command(visible_alias = "m")]
    Merge {
        #[command(flatten)]
        dirs: DirArgs,
    },

    /// Clean merged lists into uniform records
    #[command(visible_alias = "c")]
    Clean {
        #[command(flatten)]
        dirs: DirArgs,
    },

    /// Merge, then clean
    #[command(visible_alias = "all")]
    Run {
        #[command(flatten)]
        dirs: DirArgs,
    },

    /// Print the effective configuration (directories, categories, clean targets)
    Categories {
        #[command(flatten)]
        dirs: DirArgs,

        /// Print as TOML, suitable for a config file
        #[arg(long)]
        toml: bool,
    },
}
