//! Commands for side effects.
//!
//! Commands represent IO operations that produce messages. A component never
//! performs IO inside a lifecycle hook; it hands a [`Cmd`] to its
//! [`Context`](crate::Context) and the driver decides where the command runs
//! (a worker thread in [`Program`](crate::Program), inline in the
//! [`simulator`](crate::simulator)).

use crate::message::{BatchMsg, Message, QuitMsg};

/// A command that produces a message when executed.
///
/// Commands are lazy - they don't execute until the driver runs them.
/// This keeps lifecycle hooks free of side effects.
///
/// # Example
///
/// ```rust
/// use lifecycle::{Cmd, Message};
///
/// fn fetch_count() -> Cmd {
///     Cmd::new(|| Message::new(42i64))
/// }
///
/// let msg = fetch_count().execute().unwrap();
/// assert_eq!(msg.downcast::<i64>(), Some(42));
/// ```
pub struct Cmd(Box<dyn FnOnce() -> Option<Message> + Send + 'static>);

impl Cmd {
    /// Create a new command from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Message + Send + 'static,
    {
        Self(Box::new(move || Some(f())))
    }

    /// Create a command that may not produce a message.
    pub fn new_optional<F>(f: F) -> Self
    where
        F: FnOnce() -> Option<Message> + Send + 'static,
    {
        Self(Box::new(f))
    }

    /// Create an empty command that does nothing.
    pub fn none() -> Option<Self> {
        None
    }

    /// Execute the command and return the resulting message.
    pub fn execute(self) -> Option<Message> {
        (self.0)()
    }
}

impl std::fmt::Debug for Cmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cmd").finish_non_exhaustive()
    }
}

/// Batch multiple commands into one.
///
/// The batched commands run one after another, in the order given, on the
/// thread that executes the batch. Their messages keep that order.
///
/// # Example
///
/// ```rust
/// use lifecycle::{Cmd, Message, batch};
///
/// let cmd = batch(vec![
///     Some(Cmd::new(|| Message::new("first"))),
///     Some(Cmd::new(|| Message::new("second"))),
/// ]);
/// assert!(cmd.is_some());
/// ```
pub fn batch(cmds: Vec<Option<Cmd>>) -> Option<Cmd> {
    let valid_cmds: Vec<Cmd> = cmds.into_iter().flatten().collect();

    match valid_cmds.len() {
        0 => None,
        1 => valid_cmds.into_iter().next(),
        _ => Some(Cmd::new_optional(move || {
            Some(Message::new(BatchMsg(valid_cmds)))
        })),
    }
}

/// Expand a message produced by a command into the messages it stands for.
///
/// Batched commands are executed in order on the calling thread; any other
/// message is returned as-is.
pub(crate) fn flatten(msg: Message) -> Vec<Message> {
    if !msg.is::<BatchMsg>() {
        return vec![msg];
    }
    match msg.downcast::<BatchMsg>() {
        Some(BatchMsg(cmds)) => cmds.into_iter().flat_map(run_inline).collect(),
        None => Vec::new(),
    }
}

/// Run a command to completion on the calling thread, expanding batches.
///
/// Headless drivers and tests use this instead of spawning worker threads.
pub fn run_inline(cmd: Cmd) -> Vec<Message> {
    cmd.execute().map(flatten).unwrap_or_default()
}

/// Command that signals the program to quit.
pub fn quit() -> Cmd {
    Cmd::new(|| Message::new(QuitMsg))
}
