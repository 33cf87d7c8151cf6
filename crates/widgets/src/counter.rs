//! Counter widget.
//!
//! [`CounterWidget`] owns an integer count and an error flag. When mounted it
//! fetches its initial count from a [`CountSource`] (falling back to
//! [`FALLBACK_COUNT`]) and starts listening for `+`/`-` key presses. It renders
//! a title, its name, the current count, an increment and a decrement
//! [`ButtonWidget`], and a [`FaultProbe`] child for as long as no render error
//! has been captured.
//!
//! Hosting the widget:
//!
//! ```rust
//! use std::sync::Arc;
//! use lifecycle::{Host, KeyMsg, KeyboardHub, MouseMsg, run_inline};
//! use widgets::{CounterProps, CounterWidget, FixedCountSource};
//! use widgets::counter::INCREMENT_KEY;
//!
//! let hub = KeyboardHub::new();
//! let counter = CounterWidget::new(Arc::new(FixedCountSource::ok(5)));
//! let mut host = Host::new(counter, CounterProps::new("demo"), hub.clone());
//!
//! for msg in host.mount().unwrap().map(run_inline).unwrap_or_default() {
//!     host.update(msg).unwrap();
//! }
//! host.click(INCREMENT_KEY, &MouseMsg::left_click(0, 0)).unwrap();
//! hub.dispatch(&KeyMsg::from_char('+'));
//! host.drain().unwrap();
//!
//! assert_eq!(host.state().count, 7);
//! ```

use std::sync::Arc;

use lifecycle::{
    Callback, Cmd, Component, Context, Element, ElementKind, ErrorInfo, KeySubscription, Message,
    Node, RenderError,
};

use crate::button::{ButtonProps, ButtonVariant, ButtonWidget, Icon};
use crate::count_source::{CountSource, FALLBACK_COUNT, FetchError};
use crate::fault::FaultProbe;
use crate::key::CounterKeyMap;

/// Key of the increment button.
pub const INCREMENT_KEY: &str = "increment";
/// Key of the decrement button.
pub const DECREMENT_KEY: &str = "decrement";
/// Key of the heading showing the current count.
pub const CURRENT_KEY: &str = "current";

/// Props of the counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterProps {
    /// Label shown under the title.
    pub name: String,
}

impl CounterProps {
    /// Props with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// State of the counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterState {
    /// Current count, never rendered below zero.
    pub count: i64,
    /// Set once a render error has been captured. Never cleared.
    pub has_error: bool,
}

/// Messages the counter reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMsg {
    /// Add one.
    Increment,
    /// Subtract one.
    Decrement,
}

impl CounterMsg {
    /// The change this message applies to the count.
    pub fn delta(self) -> i64 {
        match self {
            CounterMsg::Increment => 1,
            CounterMsg::Decrement => -1,
        }
    }
}

/// Completion of the initial count fetch.
#[derive(Debug)]
pub struct CountFetched(pub Result<i64, FetchError>);

/// The counter widget.
pub struct CounterWidget {
    source: Arc<dyn CountSource>,
    probe: FaultProbe,
    keymap: CounterKeyMap,
    keys: Option<KeySubscription>,
}

impl CounterWidget {
    /// A counter fetching its initial value from `source`, with a disarmed
    /// fault probe.
    pub fn new(source: Arc<dyn CountSource>) -> Self {
        Self {
            source,
            probe: FaultProbe::new(),
            keymap: CounterKeyMap::default(),
            keys: None,
        }
    }

    /// Use the given fault probe as the error-prone child.
    pub fn with_probe(mut self, probe: FaultProbe) -> Self {
        self.probe = probe;
        self
    }

    /// The fault probe child.
    pub fn probe(&self) -> &FaultProbe {
        &self.probe
    }

    /// The key map.
    pub fn keymap(&self) -> &CounterKeyMap {
        &self.keymap
    }

    /// Whether the keyboard listener is registered.
    pub fn is_listening(&self) -> bool {
        self.keys.as_ref().is_some_and(KeySubscription::is_active)
    }

    fn fetch_cmd(&self, cx: &Context<'_, CounterState>) -> Cmd {
        let source = Arc::clone(&self.source);
        let live = cx.liveness();
        Cmd::new_optional(move || {
            if !live.is_alive() {
                return None;
            }
            let outcome = source.fetch();
            if live.is_alive() {
                Some(Message::new(CountFetched(outcome)))
            } else {
                tracing::debug!("count fetched after unmount; discarded");
                None
            }
        })
    }
}

fn adjust(cx: &mut Context<'_, CounterState>, delta: i64) {
    cx.set_state(move |state| CounterState {
        count: state.count.saturating_add(delta),
        ..*state
    });
}

fn button(key: &str, variant: ButtonVariant, icon: Icon, tooltip: &str, msg: CounterMsg) -> Node {
    let props = ButtonProps::new(variant)
        .icon(icon)
        .tooltip(tooltip)
        .on_click(Callback::new(move |_| Message::new(msg)));
    ButtonWidget::render(key, &props, Vec::<Node>::new())
}

impl Component for CounterWidget {
    type Props = CounterProps;
    type State = CounterState;
    type Snapshot = i64;

    const NAME: &'static str = "CounterWidget";

    fn initial_state(_props: &CounterProps) -> CounterState {
        CounterState::default()
    }

    fn derive_state_from_props(_props: &CounterProps, state: &CounterState) -> Option<CounterState> {
        (state.count < 0).then_some(CounterState { count: 0, ..*state })
    }

    fn derive_state_from_error(_state: &CounterState, _error: &RenderError) -> Option<CounterState> {
        Some(CounterState {
            count: 0,
            has_error: true,
        })
    }

    fn render(&self, props: &CounterProps, state: &CounterState) -> Result<Node, RenderError> {
        let probe = if state.has_error {
            Node::Empty
        } else {
            self.probe.render()?
        };

        Ok(Element::new(ElementKind::Block)
            .key("counter")
            .child(Element::heading(1).child("Counter"))
            .child(Element::heading(2).child(format!("Count: {}", props.name)))
            .child(
                Element::heading(3)
                    .key(CURRENT_KEY)
                    .child(format!("Current: {}", state.count)),
            )
            .child(button(
                INCREMENT_KEY,
                ButtonVariant::Primary,
                Icon::PLUS,
                "Increment",
                CounterMsg::Increment,
            ))
            .child(button(
                DECREMENT_KEY,
                ButtonVariant::Default,
                Icon::MINUS,
                "Decrement",
                CounterMsg::Decrement,
            ))
            .child(probe)
            .into())
    }

    fn should_update(
        &self,
        props: &CounterProps,
        state: &CounterState,
        next_props: &CounterProps,
        next_state: &CounterState,
    ) -> bool {
        props.name != next_props.name || state.count != next_state.count
    }

    fn snapshot_before_update(&self, _prev_props: &CounterProps, prev_state: &CounterState) -> i64 {
        tracing::debug!(count = prev_state.count, "before update");
        prev_state.count
    }

    fn did_mount(
        &mut self,
        _props: &CounterProps,
        _state: &CounterState,
        cx: &mut Context<'_, CounterState>,
    ) {
        let fetch = self.fetch_cmd(cx);
        cx.spawn(fetch);

        let keymap = self.keymap.clone();
        self.keys = Some(cx.subscribe_keys(move |key| keymap.listen(key)));
        tracing::debug!(source = %self.source.describe(), "counter mounted");
    }

    fn update(&mut self, msg: Message, cx: &mut Context<'_, CounterState>) {
        if let Some(action) = msg.downcast_ref::<CounterMsg>() {
            adjust(cx, action.delta());
            return;
        }
        if let Some(CountFetched(outcome)) = msg.downcast::<CountFetched>() {
            let count = match outcome {
                Ok(count) => {
                    tracing::info!(count, "initial count fetched");
                    count
                }
                Err(error) => {
                    tracing::warn!(%error, fallback = FALLBACK_COUNT, "count fetch failed");
                    FALLBACK_COUNT
                }
            };
            cx.set_state(move |state| CounterState { count, ..*state });
        }
    }

    fn did_update(
        &mut self,
        _prev_props: &CounterProps,
        _prev_state: &CounterState,
        snapshot: i64,
        _cx: &mut Context<'_, CounterState>,
    ) {
        tracing::debug!(previous = snapshot, "did update");
    }

    fn did_catch(
        &mut self,
        error: &RenderError,
        info: &ErrorInfo,
        _cx: &mut Context<'_, CounterState>,
    ) {
        tracing::error!(%error, stack = ?info.component_stack, "render error captured");
    }

    fn will_unmount(&mut self) {
        if let Some(keys) = self.keys.take() {
            keys.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count_source::FixedCountSource;
    use lifecycle::{Host, KeyboardHub, run_inline};

    fn host_with(source: FixedCountSource, probe: FaultProbe) -> Host<CounterWidget> {
        let widget = CounterWidget::new(Arc::new(source)).with_probe(probe);
        Host::new(widget, CounterProps::new("test"), KeyboardHub::new())
    }

    #[test]
    fn test_initial_render_before_fetch() {
        let mut host = host_with(FixedCountSource::ok(3), FaultProbe::new());
        let fetch = host.mount().unwrap();
        assert!(fetch.is_some());

        let tree = host.committed();
        assert_eq!(tree.find(CURRENT_KEY).unwrap().text_content(), "Current: 0");
        assert!(tree.contains_key(INCREMENT_KEY));
        assert!(tree.contains_key(DECREMENT_KEY));
        assert!(tree.contains_key(FaultProbe::KEY));
        assert!(host.component().is_listening());
    }

    #[test]
    fn test_buttons_carry_tooltips_and_icons() {
        let mut host = host_with(FixedCountSource::ok(3), FaultProbe::new());
        host.mount().unwrap();
        let inc = host.committed().find(INCREMENT_KEY).unwrap();
        assert_eq!(inc.tooltip(), Some("Increment"));
        assert_eq!(inc.get_attr("type"), Some("primary"));
        let dec = host.committed().find(DECREMENT_KEY).unwrap();
        assert_eq!(dec.tooltip(), Some("Decrement"));
        assert_eq!(dec.get_attr("type"), Some("default"));
    }

    #[test]
    fn test_fetched_count_replaces_state() {
        let mut host = host_with(FixedCountSource::ok(42), FaultProbe::new());
        let fetch = host.mount().unwrap().unwrap();
        for msg in run_inline(fetch) {
            host.update(msg).unwrap();
        }
        assert_eq!(host.state().count, 42);
    }

    #[test]
    fn test_negative_fetched_count_is_floored() {
        let mut host = host_with(FixedCountSource::ok(-8), FaultProbe::new());
        let fetch = host.mount().unwrap().unwrap();
        for msg in run_inline(fetch) {
            host.update(msg).unwrap();
        }
        assert_eq!(host.state().count, 0);
    }

    #[test]
    fn test_fetch_skipped_after_unmount() {
        let mut host = host_with(FixedCountSource::ok(42), FaultProbe::new());
        let fetch = host.mount().unwrap().unwrap();
        host.unmount().unwrap();
        assert!(run_inline(fetch).is_empty());
        assert!(!host.component().is_listening());
    }

    #[test]
    fn test_name_change_rerenders() {
        let mut host = host_with(FixedCountSource::ok(1), FaultProbe::new());
        host.mount().unwrap();
        host.set_props(CounterProps::new("renamed")).unwrap();
        assert!(host.committed().text_content().contains("Count: renamed"));
        host.set_props(CounterProps::new("renamed")).unwrap();
        assert_eq!(host.stats().skipped, 1);
    }

    #[test]
    fn test_msg_delta() {
        assert_eq!(CounterMsg::Increment.delta(), 1);
        assert_eq!(CounterMsg::Decrement.delta(), -1);
    }
}
