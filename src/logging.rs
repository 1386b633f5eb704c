//! Logging initialization for `issue_tracker`.
//!
//! Verbosity is driven by the CLI (`-v` counts up, `-q` wins) with
//! `RUST_LOG` taking precedence over both when set.

use crate::error::{Result, TrackerError};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Filter resolution: `RUST_LOG` if set, otherwise `error` under `--quiet`,
/// otherwise `info`/`debug`/`trace` for 0/1/2+ `-v` flags.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| TrackerError::Config(format!("failed to install subscriber: {err}")))
}

/// Install a test-friendly subscriber.
///
/// Captures output per test and never panics if a subscriber is already
/// installed, so call sites don't have to coordinate.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
