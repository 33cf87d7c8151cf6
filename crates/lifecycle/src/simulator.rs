//! Headless driver for exercising a [`Model`] without a terminal.
//!
//! The simulator plays the role of [`Program`](crate::Program) in tests and in
//! non-interactive runs: messages are queued explicitly, commands run inline on
//! the calling thread (batches included), and every view is captured.

use std::collections::VecDeque;

use crate::Model;
use crate::command::{Cmd, run_inline};
use crate::message::{InterruptMsg, Message, QuitMsg};

/// Statistics tracked during simulation.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    /// Number of times init() was called.
    pub init_calls: usize,
    /// Number of times update() was called.
    pub update_calls: usize,
    /// Number of views captured.
    pub view_calls: usize,
    /// Commands that were returned from init/update.
    pub commands_returned: usize,
    /// Whether quit was requested.
    pub quit_requested: bool,
}

/// A simulator for driving a Model without a terminal.
///
/// # Example
///
/// ```rust
/// use lifecycle::{Cmd, Message, Model, simulator::ProgramSimulator};
///
/// struct Total { sum: i64 }
///
/// impl Model for Total {
///     fn init(&mut self) -> Option<Cmd> {
///         Some(Cmd::new(|| Message::new(10i64)))
///     }
///     fn update(&mut self, msg: Message) -> Option<Cmd> {
///         if let Some(n) = msg.downcast::<i64>() {
///             self.sum += n;
///         }
///         None
///     }
///     fn view(&self) -> String {
///         format!("Sum: {}", self.sum)
///     }
/// }
///
/// let mut sim = ProgramSimulator::new(Total { sum: 0 });
/// sim.init();
/// sim.send(Message::new(5i64));
/// sim.run_until_empty();
///
/// assert_eq!(sim.last_view(), Some("Sum: 15"));
/// ```
pub struct ProgramSimulator<M: Model> {
    model: M,
    input_queue: VecDeque<Message>,
    output_views: Vec<String>,
    stats: SimulationStats,
    initialized: bool,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a new simulator with the given model.
    pub fn new(model: M) -> Self {
        Self {
            model,
            input_queue: VecDeque::new(),
            output_views: Vec::new(),
            stats: SimulationStats::default(),
            initialized: false,
        }
    }

    /// Initialize the model and capture the first view.
    ///
    /// The startup command is run inline and whatever it produces is queued.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.stats.init_calls += 1;

        let cmd = self.model.init();
        self.capture_view();
        self.enqueue(cmd);
    }

    /// Queue a message for processing.
    pub fn send(&mut self, msg: Message) {
        self.input_queue.push_back(msg);
    }

    /// Process one message from the queue, calling update and view.
    ///
    /// Returns the command returned by update, if any, without running it.
    pub fn step(&mut self) -> Option<Cmd> {
        if !self.initialized {
            self.init();
        }

        let msg = self.input_queue.pop_front()?;
        if msg.is::<QuitMsg>() || msg.is::<InterruptMsg>() {
            self.stats.quit_requested = true;
            return None;
        }

        self.stats.update_calls += 1;
        let cmd = self.model.update(msg);
        if cmd.is_some() {
            self.stats.commands_returned += 1;
        }
        self.capture_view();
        cmd
    }

    /// Process messages until the queue is empty or quit is requested,
    /// running commands inline.
    ///
    /// Returns the number of messages processed.
    pub fn run_until_empty(&mut self) -> usize {
        let mut steps = 0;
        while !self.stats.quit_requested && !self.input_queue.is_empty() {
            let cmd = self.step();
            self.run_command(cmd);
            steps += 1;
        }
        steps
    }

    /// Get a reference to the current model state.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Consume the simulator and return the final model.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Get the simulation statistics.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Get all captured view outputs.
    pub fn views(&self) -> &[String] {
        &self.output_views
    }

    /// Get the most recent view output.
    pub fn last_view(&self) -> Option<&str> {
        self.output_views.last().map(String::as_str)
    }

    /// Check if quit has been requested.
    pub fn is_quit(&self) -> bool {
        self.stats.quit_requested
    }

    /// Get the number of pending messages.
    pub fn pending_count(&self) -> usize {
        self.input_queue.len()
    }

    fn capture_view(&mut self) {
        self.stats.view_calls += 1;
        self.output_views.push(self.model.view());
    }

    fn enqueue(&mut self, cmd: Option<Cmd>) {
        if cmd.is_some() {
            self.stats.commands_returned += 1;
        }
        self.run_command(cmd);
    }

    fn run_command(&mut self, cmd: Option<Cmd>) {
        if let Some(cmd) = cmd {
            self.input_queue.extend(run_inline(cmd));
        }
    }
}
