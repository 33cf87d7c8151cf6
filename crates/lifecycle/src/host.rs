//! The lifecycle state machine.
//!
//! A [`Host`] owns one [`Component`] together with its props, its state and the
//! last committed display tree, and moves it through its phases:
//!
//! ```text
//! Constructed --mount--> Mounted <--update/set_props--> (Updating)
//!                           |
//!                           +--unmount--> Unmounted
//! ```
//!
//! `Errored` is orthogonal: it is set the first time a render error is captured
//! and never cleared for the life of the mounted instance.
//!
//! Every transition is invoked by the caller. A transition runs the hooks of
//! the component in a fixed order, applies queued state updates, and returns the
//! commands the hooks spawned, already batched, for the driver to run.

use std::fmt;
use std::sync::mpsc::{self, Receiver};

use crate::command::{Cmd, batch};
use crate::component::{Component, Context, Effects, ErrorInfo, Liveness, RenderError, Wiring};
use crate::keyboard::KeyboardHub;
use crate::message::Message;
use crate::mouse::MouseMsg;
use crate::tree::Node;

/// Upper bound on consecutive update passes triggered by one transition.
///
/// A `did_update` that unconditionally queues another state update would
/// otherwise loop forever.
pub const MAX_UPDATE_DEPTH: usize = 32;

/// Lifecycle phase of a hosted component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created; never rendered.
    Constructed,
    /// First render committed; accepting events.
    Mounted,
    /// Inside an update pass, between the should-update gate and commit.
    Updating,
    /// Removed from the display tree. Terminal.
    Unmounted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Constructed => "constructed",
            Phase::Mounted => "mounted",
            Phase::Updating => "updating",
            Phase::Unmounted => "unmounted",
        };
        f.write_str(name)
    }
}

/// Counters describing the rendering work a host has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Calls to `render`, including ones that failed.
    pub renders: u64,
    /// Display trees committed.
    pub commits: u64,
    /// Update passes suppressed by `should_update`.
    pub skipped: u64,
    /// Render errors captured and recovered from.
    pub errors_captured: u64,
}

/// Errors returned by host transitions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The transition is not allowed in the current phase.
    #[error("cannot {operation} a component that is {phase}")]
    InvalidTransition {
        /// Requested transition.
        operation: &'static str,
        /// Phase the host was in.
        phase: Phase,
    },

    /// A render failed and the component does not capture errors.
    #[error("unhandled render error: {0}")]
    Unhandled(RenderError),

    /// Rendering failed again with the state derived from a captured error.
    #[error("render failed after error recovery: {0}")]
    RecoveryFailed(RenderError),

    /// State updates kept scheduling further updates.
    #[error("maximum update depth of {0} exceeded")]
    UpdateDepthExceeded(usize),
}

/// Result of a render attempt, after error recovery.
struct Rendered<S> {
    tree: Node,
    state: S,
    caught: Option<RenderError>,
}

/// Drives one component through its lifecycle.
pub struct Host<C: Component> {
    component: C,
    props: C::Props,
    state: C::State,
    committed: Node,
    phase: Phase,
    errored: bool,
    pending_props: Option<C::Props>,
    effects: Effects<C::State>,
    wiring: Wiring,
    mailbox: Receiver<Message>,
    stats: RenderStats,
}

impl<C: Component> Host<C> {
    /// Construct a component host. The component's initial state is computed
    /// here; nothing is rendered until [`mount`](Self::mount).
    pub fn new(component: C, props: C::Props, keyboard: KeyboardHub) -> Self {
        let state = C::initial_state(&props);
        let (tx, rx) = mpsc::channel();
        tracing::debug!(component = C::NAME, ?props, ?state, "constructed");
        Self {
            component,
            props,
            state,
            committed: Node::Empty,
            phase: Phase::Constructed,
            errored: false,
            pending_props: None,
            effects: Effects::default(),
            wiring: Wiring {
                keyboard,
                mailbox: tx,
                liveness: Liveness::new(),
            },
            mailbox: rx,
            stats: RenderStats::default(),
        }
    }

    /// Render and commit for the first time, then run `did_mount`.
    pub fn mount(&mut self) -> Result<Option<Cmd>, LifecycleError> {
        self.expect_phase("mount", Phase::Constructed)?;

        let state = C::derive_state_from_props(&self.props, &self.state)
            .unwrap_or_else(|| self.state.clone());
        let rendered = render_pass(&self.component, &self.props, state, &mut self.stats)?;

        self.state = rendered.state;
        self.commit(rendered.tree);
        self.phase = Phase::Mounted;
        tracing::debug!(component = C::NAME, state = ?self.state, "mounted");

        {
            let mut cx = Context::new(&mut self.effects, &self.wiring);
            self.component.did_mount(&self.props, &self.state, &mut cx);
        }
        if let Some(error) = rendered.caught {
            self.capture(&error);
        }
        self.flush()?;
        Ok(self.take_commands())
    }

    /// Deliver a message to the component.
    ///
    /// Messages arriving outside the mounted phase are dropped.
    pub fn update(&mut self, msg: Message) -> Result<Option<Cmd>, LifecycleError> {
        if self.phase != Phase::Mounted {
            tracing::debug!(component = C::NAME, phase = %self.phase, "message dropped");
            return Ok(None);
        }
        {
            let mut cx = Context::new(&mut self.effects, &self.wiring);
            self.component.update(msg, &mut cx);
        }
        self.flush()?;
        Ok(self.take_commands())
    }

    /// Deliver every message waiting in the component's mailbox.
    ///
    /// Keyboard listeners registered through [`Context::subscribe_keys`] post
    /// here.
    pub fn drain(&mut self) -> Result<Option<Cmd>, LifecycleError> {
        let mut cmds = Vec::new();
        while let Ok(msg) = self.mailbox.try_recv() {
            cmds.push(self.update(msg)?);
        }
        Ok(batch(cmds))
    }

    /// Replace the props and run an update pass.
    pub fn set_props(&mut self, props: C::Props) -> Result<Option<Cmd>, LifecycleError> {
        self.expect_phase("set props of", Phase::Mounted)?;
        self.pending_props = Some(props);
        self.flush()?;
        Ok(self.take_commands())
    }

    /// Route a click to the committed element with the given key.
    ///
    /// Elements without a click handler ignore the event.
    pub fn click(&mut self, key: &str, event: &MouseMsg) -> Result<Option<Cmd>, LifecycleError> {
        let msg = self
            .committed
            .find(key)
            .and_then(|el| el.on_click.as_ref())
            .map(|handler| handler.call(event));
        match msg {
            Some(msg) => self.update(msg),
            None => {
                tracing::trace!(component = C::NAME, key, "click without handler");
                Ok(None)
            }
        }
    }

    /// Run `will_unmount` and leave the display tree.
    ///
    /// Pending messages are discarded and the liveness flag is cleared, so
    /// deferred work still in flight resolves to nothing.
    pub fn unmount(&mut self) -> Result<(), LifecycleError> {
        self.expect_phase("unmount", Phase::Mounted)?;
        self.component.will_unmount();
        self.wiring.liveness.end();
        self.phase = Phase::Unmounted;
        self.committed = Node::Empty;
        self.effects = Effects::default();
        let discarded = self.mailbox.try_iter().count();
        tracing::debug!(component = C::NAME, discarded, "unmounted");
        Ok(())
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a render error has been captured.
    pub fn is_errored(&self) -> bool {
        self.errored
    }

    /// Current props.
    pub fn props(&self) -> &C::Props {
        &self.props
    }

    /// Current state.
    pub fn state(&self) -> &C::State {
        &self.state
    }

    /// The last committed display tree.
    pub fn committed(&self) -> &Node {
        &self.committed
    }

    /// Rendering counters.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// The hosted component.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Mutable access to the hosted component.
    ///
    /// Props and state stay under the host's control.
    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// The liveness flag handed to deferred work.
    pub fn liveness(&self) -> Liveness {
        self.wiring.liveness.clone()
    }

    fn expect_phase(&self, operation: &'static str, expected: Phase) -> Result<(), LifecycleError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                operation,
                phase: self.phase,
            })
        }
    }

    fn commit(&mut self, tree: Node) {
        self.committed = tree;
        self.stats.commits += 1;
    }

    fn capture(&mut self, error: &RenderError) {
        self.errored = true;
        self.stats.errors_captured += 1;

        let mut component_stack = vec![error.component()];
        if error.component() != C::NAME {
            component_stack.push(C::NAME);
        }
        let info = ErrorInfo { component_stack };
        tracing::debug!(component = C::NAME, %error, "render error captured");

        let mut cx = Context::new(&mut self.effects, &self.wiring);
        self.component.did_catch(error, &info, &mut cx);
    }

    /// Apply queued updates until none are left.
    fn flush(&mut self) -> Result<(), LifecycleError> {
        for _ in 0..MAX_UPDATE_DEPTH {
            if self.effects.updates.is_empty() && self.pending_props.is_none() {
                return Ok(());
            }
            self.update_pass()?;
        }
        Err(LifecycleError::UpdateDepthExceeded(MAX_UPDATE_DEPTH))
    }

    fn update_pass(&mut self) -> Result<(), LifecycleError> {
        let next_props = self
            .pending_props
            .take()
            .unwrap_or_else(|| self.props.clone());
        let updates = std::mem::take(&mut self.effects.updates);
        let folded = updates
            .into_iter()
            .fold(self.state.clone(), |state, update| update(&state));
        let next_state = C::derive_state_from_props(&next_props, &folded).unwrap_or(folded);

        if !self
            .component
            .should_update(&self.props, &self.state, &next_props, &next_state)
        {
            tracing::trace!(component = C::NAME, state = ?next_state, "render skipped");
            self.props = next_props;
            self.state = next_state;
            self.stats.skipped += 1;
            return Ok(());
        }

        self.phase = Phase::Updating;
        let rendered = match render_pass(&self.component, &next_props, next_state, &mut self.stats)
        {
            Ok(rendered) => rendered,
            Err(err) => {
                self.phase = Phase::Mounted;
                return Err(err);
            }
        };
        let snapshot = self
            .component
            .snapshot_before_update(&self.props, &self.state);

        let prev_props = std::mem::replace(&mut self.props, next_props);
        let prev_state = std::mem::replace(&mut self.state, rendered.state);
        self.commit(rendered.tree);
        self.phase = Phase::Mounted;
        tracing::trace!(component = C::NAME, state = ?self.state, "committed");

        {
            let mut cx = Context::new(&mut self.effects, &self.wiring);
            self.component
                .did_update(&prev_props, &prev_state, snapshot, &mut cx);
        }
        if let Some(error) = rendered.caught {
            self.capture(&error);
        }
        Ok(())
    }

    fn take_commands(&mut self) -> Option<Cmd> {
        let cmds = std::mem::take(&mut self.effects.commands);
        batch(cmds.into_iter().map(Some).collect())
    }
}

impl<C: Component> Drop for Host<C> {
    fn drop(&mut self) {
        self.wiring.liveness.end();
    }
}

impl<C: Component> fmt::Debug for Host<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("component", &C::NAME)
            .field("phase", &self.phase)
            .field("errored", &self.errored)
            .field("props", &self.props)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Render, and on failure derive an error state once and render again.
fn render_pass<C: Component>(
    component: &C,
    props: &C::Props,
    state: C::State,
    stats: &mut RenderStats,
) -> Result<Rendered<C::State>, LifecycleError> {
    stats.renders += 1;
    let error = match component.render(props, &state) {
        Ok(tree) => {
            return Ok(Rendered {
                tree,
                state,
                caught: None,
            });
        }
        Err(error) => error,
    };

    let Some(recovered) = C::derive_state_from_error(&state, &error) else {
        return Err(LifecycleError::Unhandled(error));
    };
    let recovered = C::derive_state_from_props(props, &recovered).unwrap_or(recovered);

    stats.renders += 1;
    match component.render(props, &recovered) {
        Ok(tree) => Ok(Rendered {
            tree,
            state: recovered,
            caught: Some(error),
        }),
        Err(again) => Err(LifecycleError::RecoveryFailed(again)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Callback, Element, ElementKind};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Renders its value; fails while `fail` is set and the state is not
    /// marked as broken.
    struct Gauge {
        fail: Arc<AtomicBool>,
        hooks: Vec<&'static str>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct GaugeState {
        value: i32,
        broken: bool,
    }

    impl Component for Gauge {
        type Props = String;
        type State = GaugeState;
        type Snapshot = i32;

        const NAME: &'static str = "Gauge";

        fn initial_state(_props: &String) -> GaugeState {
            GaugeState {
                value: 0,
                broken: false,
            }
        }

        fn derive_state_from_error(state: &GaugeState, _error: &RenderError) -> Option<GaugeState> {
            Some(GaugeState {
                value: state.value,
                broken: true,
            })
        }

        fn render(&self, props: &String, state: &GaugeState) -> Result<Node, RenderError> {
            if self.fail.load(Ordering::SeqCst) && !state.broken {
                return Err(RenderError::new("Gauge", "gauge exploded"));
            }
            Ok(Element::new(ElementKind::Button)
                .key("bump")
                .on_click(Callback::new(|_| Message::new(1i32)))
                .child(format!("{props}={}", state.value))
                .into())
        }

        fn should_update(&self, p: &String, s: &GaugeState, np: &String, ns: &GaugeState) -> bool {
            p != np || s != ns
        }

        fn snapshot_before_update(&self, _props: &String, state: &GaugeState) -> i32 {
            state.value
        }

        fn did_mount(&mut self, _: &String, _: &GaugeState, _: &mut Context<'_, GaugeState>) {
            self.hooks.push("did_mount");
        }

        fn update(&mut self, msg: Message, cx: &mut Context<'_, GaugeState>) {
            if let Some(delta) = msg.downcast::<i32>() {
                cx.set_state(move |s| GaugeState {
                    value: s.value + delta,
                    ..s.clone()
                });
            }
        }

        fn did_update(
            &mut self,
            _: &String,
            _: &GaugeState,
            _: i32,
            _: &mut Context<'_, GaugeState>,
        ) {
            self.hooks.push("did_update");
        }

        fn did_catch(&mut self, _: &RenderError, _: &ErrorInfo, _: &mut Context<'_, GaugeState>) {
            self.hooks.push("did_catch");
        }

        fn will_unmount(&mut self) {
            self.hooks.push("will_unmount");
        }
    }

    fn gauge() -> (Host<Gauge>, Arc<AtomicBool>) {
        let fail = Arc::new(AtomicBool::new(false));
        let component = Gauge {
            fail: Arc::clone(&fail),
            hooks: Vec::new(),
        };
        (
            Host::new(component, "g".to_string(), KeyboardHub::new()),
            fail,
        )
    }

    #[test]
    fn test_mount_commits_first_render() {
        let (mut host, _) = gauge();
        assert_eq!(host.phase(), Phase::Constructed);
        assert!(host.mount().unwrap().is_none());
        assert_eq!(host.phase(), Phase::Mounted);
        assert_eq!(host.committed().text_content(), "g=0");
        assert_eq!(host.component().hooks, vec!["did_mount"]);
        assert_eq!(host.stats().commits, 1);
    }

    #[test]
    fn test_mount_twice_is_rejected() {
        let (mut host, _) = gauge();
        host.mount().unwrap();
        let err = host.mount().unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                operation: "mount",
                phase: Phase::Mounted
            }
        );
        assert_eq!(err.to_string(), "cannot mount a component that is mounted");
    }

    #[test]
    fn test_click_routes_to_handler() {
        let (mut host, _) = gauge();
        host.mount().unwrap();
        host.click("bump", &MouseMsg::left_click(0, 0)).unwrap();
        host.click("bump", &MouseMsg::left_click(0, 0)).unwrap();
        assert_eq!(host.state().value, 2);
        assert_eq!(host.committed().text_content(), "g=2");
        assert!(host.click("missing", &MouseMsg::left_click(0, 0)).unwrap().is_none());
    }

    #[test]
    fn test_unchanged_state_skips_render() {
        let (mut host, _) = gauge();
        host.mount().unwrap();
        host.update(Message::new(0i32)).unwrap();
        let stats = host.stats();
        assert_eq!(stats.renders, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(host.component().hooks, vec!["did_mount"]);
    }

    #[test]
    fn test_set_props_rerenders() {
        let (mut host, _) = gauge();
        host.mount().unwrap();
        host.set_props("h".to_string()).unwrap();
        assert_eq!(host.committed().text_content(), "h=0");
        assert_eq!(host.component().hooks, vec!["did_mount", "did_update"]);
    }

    #[test]
    fn test_error_captured_during_update() {
        let (mut host, fail) = gauge();
        host.mount().unwrap();
        fail.store(true, Ordering::SeqCst);
        host.update(Message::new(5i32)).unwrap();

        assert!(host.is_errored());
        assert!(host.state().broken);
        assert_eq!(host.committed().text_content(), "g=5");
        assert_eq!(
            host.component().hooks,
            vec!["did_mount", "did_update", "did_catch"]
        );
        let stats = host.stats();
        assert_eq!(stats.errors_captured, 1);
        assert_eq!(stats.renders, 3);
    }

    #[test]
    fn test_error_captured_during_mount() {
        let (mut host, fail) = gauge();
        fail.store(true, Ordering::SeqCst);
        host.mount().unwrap();
        assert!(host.is_errored());
        assert_eq!(host.phase(), Phase::Mounted);
        assert_eq!(host.component().hooks, vec!["did_mount", "did_catch"]);
    }

    #[test]
    fn test_unmount_drops_later_messages() {
        let (mut host, _) = gauge();
        host.mount().unwrap();
        let live = host.liveness();
        host.unmount().unwrap();

        assert!(!live.is_alive());
        assert_eq!(host.phase(), Phase::Unmounted);
        assert!(host.update(Message::new(1i32)).unwrap().is_none());
        assert_eq!(host.state().value, 0);
        assert!(host.unmount().is_err());
        assert_eq!(host.component().hooks, vec!["did_mount", "will_unmount"]);
    }

    #[test]
    fn test_drop_ends_liveness() {
        let (host, _) = gauge();
        let live = host.liveness();
        drop(host);
        assert!(!live.is_alive());
    }
}
