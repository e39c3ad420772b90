//! Tracing setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a verbosity level; `RUST_LOG` takes precedence
fn default_filter(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "vf5e=warn,vf5e_cli=warn";
    }
    match verbose {
        0 => "vf5e=info,vf5e_cli=info",
        1 => "vf5e=debug,vf5e_cli=debug",
        _ => "vf5e=trace,vf5e_cli=trace",
    }
}

/// Install the global subscriber, logging to stderr
pub fn init(verbose: u8, quiet: bool) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(verbose, quiet).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
