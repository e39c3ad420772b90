mod cli;
mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let base = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Merge { dirs } => {
            commands::pipeline::merge(config::apply_overrides(base, &dirs))?;
        }

        Commands::Clean { dirs } => {
            commands::pipeline::clean(config::apply_overrides(base, &dirs))?;
        }

        Commands::Run { dirs } => {
            commands::pipeline::run(config::apply_overrides(base, &dirs))?;
        }

        Commands::Categories { dirs, toml } => {
            commands::categories::handle(&config::apply_overrides(base, &dirs), toml)?;
        }
    }

    Ok(())
}
