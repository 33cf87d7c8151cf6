#![forbid(unsafe_code)]

//! # Counter Demo
//!
//! A counter widget in the terminal: the initial count comes from a
//! random-number service, `+`/`-` and the buttons change it.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p counter_demo -- --offline-count 5
//! ```

use counter_demo::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    counter_demo::run(&cli)
}
