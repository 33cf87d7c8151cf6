//! End-to-end behavior of the counter widget under a host.

use std::sync::Arc;

use lifecycle::{
    Cmd, Frame, FrameOptions, Host, KeyMsg, KeyType, KeyboardHub, MouseMsg, Phase, run_inline,
};
use proptest::prelude::*;
use widgets::counter::{CURRENT_KEY, DECREMENT_KEY, INCREMENT_KEY};
use widgets::{
    CountFetched, CounterMsg, CounterProps, CounterWidget, FALLBACK_COUNT, FaultProbe, FetchError,
    FixedCountSource,
};

struct Harness {
    hub: KeyboardHub,
    host: Host<CounterWidget>,
    probe: FaultProbe,
}

impl Harness {
    fn new(source: FixedCountSource) -> Self {
        Self::with_probe(source, FaultProbe::new())
    }

    fn with_probe(source: FixedCountSource, probe: FaultProbe) -> Self {
        let hub = KeyboardHub::new();
        let widget = CounterWidget::new(Arc::new(source)).with_probe(probe.clone());
        let host = Host::new(widget, CounterProps::new("demo"), hub.clone());
        Self { hub, host, probe }
    }

    /// Mount and hold on to the fetch command without running it.
    fn mount_deferred(&mut self) -> Cmd {
        self.host
            .mount()
            .unwrap()
            .expect("mount should start the fetch")
    }

    /// Mount and deliver the fetched count.
    fn mount(&mut self) {
        let fetch = self.mount_deferred();
        self.deliver(fetch);
    }

    fn deliver(&mut self, cmd: Cmd) {
        for msg in run_inline(cmd) {
            if let Some(next) = self.host.update(msg).unwrap() {
                self.deliver(next);
            }
        }
    }

    fn press(&mut self, c: char) {
        self.hub.dispatch(&KeyMsg::from_char(c));
        self.host.drain().unwrap();
    }

    fn click(&mut self, key: &str) {
        self.host.click(key, &MouseMsg::left_click(0, 0)).unwrap();
    }

    fn count(&self) -> i64 {
        self.host.state().count
    }

    fn shown(&self) -> String {
        self.host
            .committed()
            .find(CURRENT_KEY)
            .map(|el| el.text_content())
            .unwrap_or_default()
    }
}

#[test]
fn fetched_count_is_shown() {
    let mut h = Harness::new(FixedCountSource::ok(42));
    h.mount();
    assert_eq!(h.count(), 42);
    assert_eq!(h.shown(), "Current: 42");
}

#[test]
fn failed_fetch_falls_back() {
    let mut h = Harness::new(FixedCountSource::failing("connection refused"));
    h.mount();
    assert_eq!(h.count(), FALLBACK_COUNT);
    assert_eq!(h.shown(), "Current: 99");
}

#[test]
fn fetch_error_message_falls_back_too() {
    let mut h = Harness::new(FixedCountSource::ok(1));
    let _fetch = h.mount_deferred();
    h.host
        .update(lifecycle::Message::new(CountFetched(Err(FetchError::WrongLength(
            2,
        )))))
        .unwrap();
    assert_eq!(h.count(), 99);
}

#[test]
fn first_frame_shows_zero_before_fetch() {
    let mut h = Harness::new(FixedCountSource::ok(42));
    let _fetch = h.mount_deferred();
    let frame = Frame::render(h.host.committed(), &FrameOptions::plain());
    assert_eq!(
        frame.plain_text(),
        "Counter\nCount: demo\nCurrent: 0\n[ + ] [ - ]\nprobe: healthy"
    );
}

#[test]
fn plus_key_matches_increment_click() {
    let mut keyed = Harness::new(FixedCountSource::ok(5));
    keyed.mount();
    keyed.press('+');

    let mut clicked = Harness::new(FixedCountSource::ok(5));
    clicked.mount();
    clicked.click(INCREMENT_KEY);

    assert_eq!(keyed.count(), 6);
    assert_eq!(keyed.count(), clicked.count());
    assert_eq!(keyed.shown(), clicked.shown());
}

#[test]
fn minus_key_and_decrement_click() {
    let mut h = Harness::new(FixedCountSource::ok(5));
    h.mount();
    h.press('-');
    h.click(DECREMENT_KEY);
    assert_eq!(h.count(), 3);
}

#[test]
fn other_keys_are_ignored() {
    let mut h = Harness::new(FixedCountSource::ok(5));
    h.mount();
    let renders = h.host.stats().renders;

    for key in [
        KeyMsg::from_char('='),
        KeyMsg::from_char('a'),
        KeyMsg::from_type(KeyType::Enter),
        KeyMsg::from_char('+').with_alt(),
    ] {
        h.hub.dispatch(&key);
    }
    h.host.drain().unwrap();

    assert_eq!(h.count(), 5);
    assert_eq!(h.host.stats().renders, renders);
}

#[test]
fn decrement_at_zero_is_floored_without_rerender() {
    let mut h = Harness::new(FixedCountSource::ok(0));
    h.mount();
    let before = h.host.stats();

    h.click(DECREMENT_KEY);

    assert_eq!(h.count(), 0);
    assert_eq!(h.shown(), "Current: 0");
    let after = h.host.stats();
    assert_eq!(after.renders, before.renders);
    assert_eq!(after.skipped, before.skipped + 1);
}

#[test]
fn unchanged_fetch_result_skips_render() {
    let mut h = Harness::new(FixedCountSource::ok(0));
    h.mount();
    // Only the mount render: the fetched 0 equals the initial count.
    assert_eq!(h.host.stats().renders, 1);
    assert_eq!(h.host.stats().skipped, 1);
}

#[test]
fn render_error_at_mount_is_captured() {
    let mut h = Harness::with_probe(FixedCountSource::ok(42), FaultProbe::armed());
    let fetch = h.mount_deferred();

    assert!(h.host.is_errored());
    assert!(h.host.state().has_error);
    assert_eq!(h.count(), 0);
    assert!(!h.host.committed().contains_key(FaultProbe::KEY));
    assert_eq!(h.host.stats().errors_captured, 1);

    // The counter keeps working without the failing child.
    h.deliver(fetch);
    h.press('+');
    assert_eq!(h.count(), 43);
    assert!(!h.host.committed().contains_key(FaultProbe::KEY));
    assert_eq!(h.host.stats().errors_captured, 1);
}

#[test]
fn render_error_after_mount_resets_count() {
    let mut h = Harness::new(FixedCountSource::ok(7));
    h.mount();
    assert!(h.host.committed().contains_key(FaultProbe::KEY));

    h.probe.arm();
    h.press('+');

    assert!(h.host.state().has_error);
    assert_eq!(h.count(), 0);
    assert_eq!(h.shown(), "Current: 0");
    assert!(!h.host.committed().contains_key(FaultProbe::KEY));
    assert_eq!(h.host.phase(), Phase::Mounted);
}

#[test]
fn armed_probe_waits_for_a_rendering_update() {
    let mut h = Harness::new(FixedCountSource::ok(0));
    h.mount();
    h.probe.arm();

    // Floored to the same count: no render, so no failure yet.
    h.click(DECREMENT_KEY);
    assert!(!h.host.state().has_error);

    h.click(INCREMENT_KEY);
    assert!(h.host.state().has_error);
}

#[test]
fn unmount_removes_keyboard_listener() {
    let mut h = Harness::new(FixedCountSource::ok(5));
    h.mount();
    assert_eq!(h.hub.listener_count(), 1);
    assert!(h.host.component().is_listening());

    h.host.unmount().unwrap();

    assert_eq!(h.hub.listener_count(), 0);
    assert!(!h.host.component().is_listening());
    assert_eq!(h.hub.dispatch(&KeyMsg::from_char('+')), 0);
    h.host.drain().unwrap();
    assert_eq!(h.count(), 5);
    assert!(h.host.committed().text_content().is_empty());
}

#[test]
fn late_fetch_after_unmount_is_ignored() {
    let mut h = Harness::new(FixedCountSource::ok(42));
    let fetch = h.mount_deferred();
    h.host.unmount().unwrap();

    let delivered = run_inline(fetch);
    assert!(delivered.is_empty());
    assert_eq!(h.count(), 0);
}

#[test]
fn fetch_message_after_unmount_is_dropped() {
    let mut h = Harness::new(FixedCountSource::ok(1));
    h.mount();
    h.host.unmount().unwrap();
    let next = h
        .host
        .update(lifecycle::Message::new(CountFetched(Ok(50))))
        .unwrap();
    assert!(next.is_none());
    assert_eq!(h.count(), 1);
}

#[test]
fn drop_also_silences_deferred_work() {
    let mut h = Harness::new(FixedCountSource::ok(42));
    let fetch = h.mount_deferred();
    let Harness { host, .. } = h;
    drop(host);
    assert!(run_inline(fetch).is_empty());
}

#[test]
fn renaming_rerenders_the_label() {
    let mut h = Harness::new(FixedCountSource::ok(3));
    h.mount();
    h.host.set_props(CounterProps::new("renamed")).unwrap();
    let text = h.host.committed().text_content();
    assert!(text.contains("Count: renamed"));
    assert!(text.contains("Current: 3"));
}

proptest! {
    #[test]
    fn count_follows_running_floor(start in 0i64..20, steps in prop::collection::vec(any::<bool>(), 0..60)) {
        let mut h = Harness::new(FixedCountSource::ok(start));
        h.mount();

        let mut expected = start;
        for up in steps {
            let msg = if up { CounterMsg::Increment } else { CounterMsg::Decrement };
            if up {
                h.press('+');
            } else {
                h.click(DECREMENT_KEY);
            }
            expected = (expected + msg.delta()).max(0);
            prop_assert_eq!(h.count(), expected);
        }
        prop_assert_eq!(h.shown(), format!("Current: {expected}"));
    }
}
