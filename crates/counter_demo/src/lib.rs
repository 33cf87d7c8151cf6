#![forbid(unsafe_code)]

//! # Counter Demo Library
//!
//! Terminal demo hosting a [`widgets::CounterWidget`]. The binary and the
//! integration tests share the code exposed here.
//!
//! - [`app`] - the [`lifecycle::Model`] driving the counter host
//! - [`cli`] - command-line contract
//! - [`config`] - resolved runtime options
//! - [`logging`] - tracing subscriber setup

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;

use lifecycle::Program;

use app::App;
use cli::{Cli, Command};
use config::Config;

/// Run the demo for parsed arguments.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the terminal cannot be
/// driven, or the counter fails outside its error capture.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(cli)?;
    config.validate()?;

    if cli.command == Some(Command::Diagnostics) {
        println!("{}", config.to_diagnostic_string());
        return Ok(());
    }

    logging::init(&config)?;

    if config.is_headless() {
        let mut app = App::from_config(&config)?;
        println!("{}", app.render_once()?);
        return Ok(());
    }

    let app = App::from_config(&config)?;
    let mut program = Program::new(app);
    if config.alt_screen {
        program = program.with_alt_screen();
    }
    if config.mouse {
        program = program.with_mouse_all_motion();
    }

    let mut app = program.run()?;
    app.shutdown();
    if let Some(err) = app.failure() {
        anyhow::bail!("counter stopped: {err}");
    }
    tracing::info!(count = app.host().state().count, "exited");
    Ok(())
}
