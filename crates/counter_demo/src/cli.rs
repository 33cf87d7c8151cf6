//! Command-line interface for `counter_demo`.
//!
//! # Examples
//!
//! ```bash
//! # Fetch the initial count from the default service
//! counter_demo
//!
//! # Work offline with a fixed initial count
//! counter_demo --offline-count 42
//!
//! # Print one frame without a terminal (for CI)
//! counter_demo --self-check --offline-count 42 --no-color
//!
//! # Show the resolved configuration
//! counter_demo diagnostics
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Counter demo - a counter widget with a remote initial value.
///
/// Press `+`/`-` or click the buttons to change the count, `f` to break the
/// fault probe, `q` to quit.
#[derive(Parser, Debug, Clone)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "CLI flags are naturally bools"
)]
#[command(
    name = "counter_demo",
    author,
    version,
    about = "Counter widget with a remote initial value",
    long_about = "Hosts a counter widget in the terminal. The initial count is fetched \
                  from a random-number service; keys and mouse clicks change it."
)]
pub struct Cli {
    /// Label shown under the title
    #[arg(long, short = 'n', env = "COUNTER_NAME")]
    pub name: Option<String>,

    /// Endpoint answering with a JSON array holding one integer
    #[arg(long, env = "COUNTER_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, env = "COUNTER_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Skip the network and start from this count
    #[arg(long, env = "COUNTER_OFFLINE_COUNT", allow_negative_numbers = true)]
    pub offline_count: Option<i64>,

    /// Arm the fault probe so the first render fails
    #[arg(long)]
    pub inject_fault: bool,

    /// Force color output off
    ///
    /// Respects `NO_COLOR` environment variable
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Disable mouse support
    ///
    /// Clicks and hover hints will be ignored
    #[arg(long, env = "COUNTER_NO_MOUSE")]
    pub no_mouse: bool,

    /// Disable alternate screen mode
    #[arg(long, env = "COUNTER_NO_ALT_SCREEN")]
    pub no_alt_screen: bool,

    /// JSON config file; flags given on the command line win
    #[arg(long, short = 'c', env = "COUNTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, env = "COUNTER_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Render one frame without a terminal and exit
    #[arg(long)]
    pub self_check: bool,

    /// Optional subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the resolved configuration and exit
    Diagnostics,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Check if running in headless mode.
    #[must_use]
    pub const fn is_headless(&self) -> bool {
        self.self_check || matches!(self.command, Some(Command::Diagnostics))
    }
}
