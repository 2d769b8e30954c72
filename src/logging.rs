//! Tracing subscriber setup
//!
//! Log lines go to stderr so stdout stays free for command output. The
//! filter comes from `LICENSE_COLLECT_LOG` (EnvFilter syntax) when set,
//! otherwise from the verbosity flag.

use std::env;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "LICENSE_COLLECT_LOG";

fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Filter directive from the environment, falling back to the verbosity flag
fn filter_directive(verbose: bool) -> String {
    env::var(LOG_ENV)
        .ok()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| default_filter(verbose).to_string())
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logger(verbose: bool) {
    let filter = filter_directive(verbose);
    let filter_layer = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .with_ansi(console::Term::stderr().is_term()),
        )
        .with(filter_layer)
        .try_init();
}
