//! The component lifecycle contract.
//!
//! A [`Component`] is a widget with props, state, and a fixed set of lifecycle
//! hooks. The hooks never run on their own; a [`Host`](crate::Host) invokes them
//! in this order:
//!
//! | transition | hooks |
//! |---|---|
//! | construct | [`initial_state`](Component::initial_state) |
//! | mount | `derive_state_from_props`, `render`, commit, [`did_mount`](Component::did_mount) |
//! | update | `derive_state_from_props`, [`should_update`](Component::should_update), `render`, [`snapshot_before_update`](Component::snapshot_before_update), commit, [`did_update`](Component::did_update) |
//! | error capture | [`derive_state_from_error`](Component::derive_state_from_error), `render`, commit, [`did_catch`](Component::did_catch) |
//! | unmount | [`will_unmount`](Component::will_unmount) |
//!
//! Hooks that may cause effects receive a [`Context`], through which they queue
//! state updates, spawn commands, and register keyboard listeners.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use crate::command::Cmd;
use crate::key::KeyMsg;
use crate::keyboard::{KeySubscription, KeyboardHub};
use crate::message::Message;
use crate::tree::Node;

/// An error raised while rendering a component or one of its descendants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{component} failed to render: {message}")]
pub struct RenderError {
    component: &'static str,
    message: String,
}

impl RenderError {
    /// Create an error raised by the named component.
    pub fn new(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            component,
            message: message.into(),
        }
    }

    /// Name of the component that raised the error.
    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Diagnostic information handed to [`Component::did_catch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Components from the one that failed up to the one that caught it.
    pub component_stack: Vec<&'static str>,
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, name) in self.component_stack.iter().enumerate() {
            if depth > 0 {
                writeln!(f)?;
            }
            write!(f, "{:indent$}in {name}", "", indent = depth * 2)?;
        }
        Ok(())
    }
}

/// Shared flag telling deferred work whether its component is still mounted.
///
/// The host clears the flag when the component unmounts (or the host is
/// dropped). Commands that outlive a hook capture a clone and check it before
/// producing a message.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Whether the component is still mounted.
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn end(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A queued state transformation: reads the latest state, returns the next.
pub(crate) type StateUpdate<S> = Box<dyn FnOnce(&S) -> S + Send>;

/// Effects queued by hooks during one host transition.
pub(crate) struct Effects<S> {
    pub(crate) updates: Vec<StateUpdate<S>>,
    pub(crate) commands: Vec<Cmd>,
}

impl<S> Default for Effects<S> {
    fn default() -> Self {
        Self {
            updates: Vec::new(),
            commands: Vec::new(),
        }
    }
}

/// Wiring from a host to the world outside the component.
pub(crate) struct Wiring {
    pub(crate) keyboard: KeyboardHub,
    pub(crate) mailbox: Sender<Message>,
    pub(crate) liveness: Liveness,
}

/// What a lifecycle hook may do besides mutating the component itself.
pub struct Context<'a, S> {
    effects: &'a mut Effects<S>,
    wiring: &'a Wiring,
}

impl<'a, S> Context<'a, S> {
    pub(crate) fn new(effects: &'a mut Effects<S>, wiring: &'a Wiring) -> Self {
        Self { effects, wiring }
    }

    /// Queue a state update.
    ///
    /// Updates queued during one event are applied in order, each one reading
    /// the state produced by the previous one, before the next render.
    pub fn set_state<F>(&mut self, update: F)
    where
        F: FnOnce(&S) -> S + Send + 'static,
    {
        self.effects.updates.push(Box::new(update));
    }

    /// Hand a command to the driver.
    pub fn spawn(&mut self, cmd: Cmd) {
        self.effects.commands.push(cmd);
    }

    /// Register a keyboard listener whose messages come back to this component.
    pub fn subscribe_keys<F>(&self, listener: F) -> KeySubscription
    where
        F: Fn(&KeyMsg) -> Option<Message> + Send + 'static,
    {
        self.wiring
            .keyboard
            .subscribe(self.wiring.mailbox.clone(), listener)
    }

    /// The liveness flag of this component.
    pub fn liveness(&self) -> Liveness {
        self.wiring.liveness.clone()
    }
}

/// A widget with a lifecycle.
///
/// Props are owned by the parent and only read here; state is owned by the
/// host and only changed through [`Context::set_state`] or the static
/// derivation hooks. Fields of the implementing type hold everything else the
/// instance needs (subscriptions, collaborators).
pub trait Component: Send + 'static {
    /// Externally supplied, read-only inputs.
    type Props: Clone + PartialEq + fmt::Debug + Send + 'static;
    /// Internal mutable state.
    type State: Clone + fmt::Debug + Send + 'static;
    /// Value captured just before a commit and handed to `did_update`.
    type Snapshot: Send + 'static;

    /// Name used in logs and component stacks.
    const NAME: &'static str;

    /// State at construction.
    fn initial_state(props: &Self::Props) -> Self::State;

    /// Adjust state from props before every render. `None` keeps it as is.
    fn derive_state_from_props(_props: &Self::Props, _state: &Self::State) -> Option<Self::State> {
        None
    }

    /// State to render after a render error. `None` leaves the error unhandled.
    fn derive_state_from_error(_state: &Self::State, _error: &RenderError) -> Option<Self::State> {
        None
    }

    /// Describe the component for the given props and state.
    fn render(&self, props: &Self::Props, state: &Self::State) -> Result<Node, RenderError>;

    /// Whether a pending change warrants a re-render.
    fn should_update(
        &self,
        _props: &Self::Props,
        _state: &Self::State,
        _next_props: &Self::Props,
        _next_state: &Self::State,
    ) -> bool {
        true
    }

    /// Capture a value from the outgoing props and state, after render and
    /// before commit.
    fn snapshot_before_update(
        &self,
        prev_props: &Self::Props,
        prev_state: &Self::State,
    ) -> Self::Snapshot;

    /// Called once, after the first render is committed.
    fn did_mount(
        &mut self,
        _props: &Self::Props,
        _state: &Self::State,
        _cx: &mut Context<'_, Self::State>,
    ) {
    }

    /// Handle a message addressed to this component.
    fn update(&mut self, _msg: Message, _cx: &mut Context<'_, Self::State>) {}

    /// Called after every committed re-render.
    fn did_update(
        &mut self,
        _prev_props: &Self::Props,
        _prev_state: &Self::State,
        _snapshot: Self::Snapshot,
        _cx: &mut Context<'_, Self::State>,
    ) {
    }

    /// Called after a render error has been captured and the recovered tree
    /// committed.
    fn did_catch(
        &mut self,
        _error: &RenderError,
        _info: &ErrorInfo,
        _cx: &mut Context<'_, Self::State>,
    ) {
    }

    /// Called once, before the component leaves the display tree.
    fn will_unmount(&mut self) {}
}
