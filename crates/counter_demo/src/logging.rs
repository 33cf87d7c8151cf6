//! Tracing subscriber setup.
//!
//! The interactive UI owns the terminal, so logs go to a file when one is
//! configured and are otherwise dropped. Headless runs log to stderr, keeping
//! stdout for the rendered frame.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Where log records end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// The configured log file.
    File,
    /// Standard error.
    Stderr,
    /// Nowhere.
    Disabled,
}

/// Pick the log target for a configuration.
#[must_use]
pub fn target_for(config: &Config) -> LogTarget {
    if config.log_file.is_some() {
        LogTarget::File
    } else if config.is_headless() {
        LogTarget::Stderr
    } else {
        LogTarget::Disabled
    }
}

/// Build the filter: `RUST_LOG` wins, otherwise the verbosity level.
#[must_use]
pub fn filter_for(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_directive()))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init(config: &Config) -> anyhow::Result<LogTarget> {
    let target = target_for(config);
    let builder = tracing_subscriber::fmt().with_env_filter(filter_for(config));

    match (target, &config.log_file) {
        (LogTarget::File, Some(path)) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;
        }
        (LogTarget::Stderr, _) => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;
        }
        _ => {}
    }

    tracing::debug!(?target, "logging initialized");
    Ok(target)
}
