//! Program lifecycle and event loop.
//!
//! The Program struct owns the terminal: it sets it up, reads input events,
//! feeds them to a [`Model`] as messages, runs the commands the model returns
//! on worker threads, and redraws whenever the view changes.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};

use crate::command::{Cmd, flatten};
use crate::key::{KeyType, from_crossterm_key};
use crate::message::{InterruptMsg, Message, QuitMsg, WindowSizeMsg};
use crate::mouse::from_crossterm_mouse;

/// Errors that can occur when running a program.
///
/// | Error Variant | Recovery Strategy |
/// |--------------|-------------------|
/// | [`Io`](Error::Io) | Check terminal availability, or run headless |
/// | [`RawModeFailure`](Error::RawModeFailure) | Check terminal compatibility |
/// | [`AltScreenFailure`](Error::AltScreenFailure) | Disable alt screen option |
/// | [`EventPoll`](Error::EventPoll) | Terminal may be disconnected |
/// | [`Render`](Error::Render) | Check output stream |
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O error during terminal operations.
    #[error("terminal io error: {0}")]
    Io(#[from] io::Error),

    /// Failed to enable or disable raw mode.
    #[error("failed to {action} raw mode: {source}")]
    RawModeFailure {
        /// Whether we were trying to enable or disable raw mode.
        action: &'static str,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to enter or exit alternate screen.
    #[error("failed to {action} alternate screen: {source}")]
    AltScreenFailure {
        /// Whether we were trying to enter or exit alt screen.
        action: &'static str,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to poll for terminal events.
    #[error("failed to poll terminal events: {0}")]
    EventPoll(io::Error),

    /// Failed to write the view to the terminal.
    #[error("failed to render view: {0}")]
    Render(io::Error),
}

/// A specialized [`Result`] type for program operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The top-level application driven by a [`Program`].
///
/// # Example
///
/// ```rust
/// use lifecycle::{Cmd, Message, Model};
///
/// struct Ticker { ticks: u32 }
///
/// impl Model for Ticker {
///     fn init(&mut self) -> Option<Cmd> { None }
///
///     fn update(&mut self, msg: Message) -> Option<Cmd> {
///         if msg.is::<u32>() {
///             self.ticks += 1;
///         }
///         None
///     }
///
///     fn view(&self) -> String {
///         format!("ticks: {}", self.ticks)
///     }
/// }
/// ```
pub trait Model: Send + 'static {
    /// Start the model and return an optional startup command.
    ///
    /// Called once, before the first view is drawn. Mounting a component
    /// host happens here, which is why the receiver is mutable.
    fn init(&mut self) -> Option<Cmd>;

    /// Process a message and return a new command.
    fn update(&mut self, msg: Message) -> Option<Cmd>;

    /// Render the model as a string for display.
    fn view(&self) -> String;
}

/// Program options.
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Use alternate screen buffer.
    pub alt_screen: bool,
    /// Enable mouse tracking, including motion without buttons pressed.
    pub mouse_all_motion: bool,
    /// Use custom I/O (skip terminal setup and event polling).
    pub custom_io: bool,
    /// Target frames per second for rendering.
    pub fps: u32,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            alt_screen: false,
            mouse_all_motion: false,
            custom_io: false,
            fps: 60,
        }
    }
}

/// A terminal program running a [`Model`].
///
/// # Example
///
/// ```rust,ignore
/// use lifecycle::Program;
///
/// let final_model = Program::new(app)
///     .with_alt_screen()
///     .with_mouse_all_motion()
///     .run()?;
/// ```
pub struct Program<M: Model> {
    model: M,
    options: ProgramOptions,
    output: Option<Box<dyn Write + Send>>,
}

impl<M: Model> Program<M> {
    /// Create a new program with the given model.
    pub fn new(model: M) -> Self {
        Self {
            model,
            options: ProgramOptions::default(),
            output: None,
        }
    }

    /// Provide a custom output writer.
    ///
    /// This enables custom I/O mode and writes render output to the given writer.
    pub fn with_output<W: Write + Send + 'static>(mut self, output: W) -> Self {
        self.output = Some(Box::new(output));
        self.options.custom_io = true;
        self
    }

    /// Use alternate screen buffer (full-screen mode).
    pub fn with_alt_screen(mut self) -> Self {
        self.options.alt_screen = true;
        self
    }

    /// Enable mouse tracking.
    ///
    /// Reports clicks and all pointer movement, which hover hints rely on.
    pub fn with_mouse_all_motion(mut self) -> Self {
        self.options.mouse_all_motion = true;
        self
    }

    /// Set the target frames per second.
    ///
    /// Default is 60 FPS. Valid range is 1-120 FPS.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.options.fps = fps.clamp(1, 120);
        self
    }

    /// Enable custom I/O mode (skip terminal setup and crossterm polling).
    pub fn with_custom_io(mut self) -> Self {
        self.options.custom_io = true;
        self
    }

    /// The options this program will run with.
    pub fn options(&self) -> &ProgramOptions {
        &self.options
    }

    /// Run the program with a custom writer.
    pub fn run_with_writer<W: Write + Send + 'static>(self, mut writer: W) -> Result<M> {
        let options = self.options.clone();

        if !options.custom_io {
            enable_raw_mode().map_err(|source| Error::RawModeFailure {
                action: "enable",
                source,
            })?;
        }
        if options.alt_screen {
            execute!(writer, EnterAlternateScreen).map_err(|source| Error::AltScreenFailure {
                action: "enter",
                source,
            })?;
        }
        execute!(writer, Hide)?;
        if options.mouse_all_motion {
            execute!(writer, EnableMouseCapture)?;
        }

        let result = self.event_loop(&mut writer);

        if options.mouse_all_motion {
            let _ = execute!(writer, DisableMouseCapture);
        }
        let _ = execute!(writer, Show);
        if options.alt_screen {
            let _ = execute!(writer, LeaveAlternateScreen);
        }
        if !options.custom_io {
            let _ = disable_raw_mode();
        }

        result
    }

    /// Run the program and return the final model state.
    pub fn run(mut self) -> Result<M> {
        if let Some(output) = self.output.take() {
            return self.run_with_writer(output);
        }
        self.run_with_writer(io::stdout())
    }

    fn event_loop<W: Write>(mut self, writer: &mut W) -> Result<M> {
        let (tx, rx): (Sender<Message>, Receiver<Message>) = mpsc::channel();

        if !self.options.custom_io {
            if let Ok((width, height)) = terminal::size() {
                let _ = tx.send(Message::new(WindowSizeMsg { width, height }));
            }
        }

        if let Some(cmd) = self.model.init() {
            handle_command(cmd, tx.clone());
        }

        let mut last_view = String::new();
        self.render(writer, &mut last_view)?;

        let frame_duration = Duration::from_secs_f64(1.0 / f64::from(self.options.fps));

        loop {
            if !self.options.custom_io
                && event::poll(frame_duration).map_err(Error::EventPoll)?
            {
                match event::read().map_err(Error::EventPoll)? {
                    Event::Key(key_event) => {
                        if key_event.kind == KeyEventKind::Press {
                            let key_msg = from_crossterm_key(key_event.code, key_event.modifiers);
                            if key_msg.key_type == KeyType::CtrlC {
                                let _ = tx.send(Message::new(InterruptMsg));
                            } else {
                                let _ = tx.send(Message::new(key_msg));
                            }
                        }
                    }
                    Event::Mouse(mouse_event) => {
                        let _ = tx.send(Message::new(from_crossterm_mouse(mouse_event)));
                    }
                    Event::Resize(width, height) => {
                        let _ = tx.send(Message::new(WindowSizeMsg { width, height }));
                    }
                    _ => {}
                }
            }

            let mut needs_render = false;
            while let Ok(msg) = rx.try_recv() {
                if msg.is::<QuitMsg>() || msg.is::<InterruptMsg>() {
                    tracing::debug!("quit requested");
                    return Ok(self.model);
                }
                if let Some(cmd) = self.model.update(msg) {
                    handle_command(cmd, tx.clone());
                }
                needs_render = true;
            }

            if needs_render {
                self.render(writer, &mut last_view)?;
            }

            if self.options.custom_io {
                thread::sleep(frame_duration);
            }
        }
    }

    fn render<W: Write>(&self, writer: &mut W, last_view: &mut String) -> Result<()> {
        let view = self.model.view();
        if view == *last_view {
            return Ok(());
        }

        // Raw mode does not translate LF into CRLF.
        let frame = view.replace('\n', "\r\n");
        execute!(writer, MoveTo(0, 0), Clear(ClearType::All)).map_err(Error::Render)?;
        write!(writer, "{frame}").map_err(Error::Render)?;
        writer.flush().map_err(Error::Render)?;

        *last_view = view;
        Ok(())
    }
}

/// Run a command on a worker thread and post what it produces.
///
/// Commands in a batch run on the same worker, one after the other.
fn handle_command(cmd: Cmd, tx: Sender<Message>) {
    thread::spawn(move || {
        if let Some(msg) = cmd.execute() {
            for msg in flatten(msg) {
                if tx.send(msg).is_err() {
                    break;
                }
            }
        }
    });
}
