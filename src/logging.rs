//! Diagnostic logging to stderr
//!
//! stdout carries command output (including `list --json`), so all tracing
//! goes to stderr.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a filter directive for this tool only
pub const ENV_LOG: &str = "VIBE_CHECK_LOG";

/// Default filter directive for a verbosity flag
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "vibe_check=debug"
    } else {
        "vibe_check=warn"
    }
}

/// Install the global subscriber.
///
/// `VIBE_CHECK_LOG` wins over `RUST_LOG`; without either the level follows
/// `verbose`.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
