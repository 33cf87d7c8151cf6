//! The terminal application hosting the counter.
//!
//! [`App`] is a [`Model`]: the event loop hands it key and mouse messages plus
//! whatever the counter's commands produce. Keys are offered to the shared
//! [`KeyboardHub`], where the counter's listener picks up `+` and `-`. Clicks are
//! hit-tested against the last drawn [`Frame`] and routed to the button under
//! the pointer. Pointer motion selects the element whose hover hint is drawn.

use lifecycle::{
    Cmd, Frame, FrameOptions, Host, KeyMsg, KeyboardHub, LifecycleError, Message, Model,
    MouseAction, MouseMsg, Phase, quit, run_inline,
};
use widgets::key::{Binding, matches_one};
use widgets::{CounterProps, CounterWidget, FaultProbe};

use crate::config::Config;

/// Keys handled by the application itself.
#[derive(Debug, Clone)]
pub struct AppKeyMap {
    /// Unmount the counter and exit.
    pub quit: Binding,
    /// Arm the fault probe.
    pub fault: Binding,
}

impl Default for AppKeyMap {
    fn default() -> Self {
        Self {
            quit: Binding::new()
                .keys(&["q", "esc", "ctrl+c"])
                .help("q", "quit"),
            fault: Binding::new().keys(&["f"]).help("f", "break probe"),
        }
    }
}

/// Application state.
pub struct App {
    config: Config,
    keys: AppKeyMap,
    hub: KeyboardHub,
    host: Host<CounterWidget>,
    probe: FaultProbe,
    frame: Frame,
    hovered: Option<String>,
    failure: Option<LifecycleError>,
}

impl App {
    /// Build the application for a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the count source cannot be created.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let source = config.count_source()?;
        tracing::info!(source = %source.describe(), name = %config.name, "starting counter");

        let probe = if config.inject_fault {
            FaultProbe::armed()
        } else {
            FaultProbe::new()
        };
        let hub = KeyboardHub::new();
        let counter = CounterWidget::new(source).with_probe(probe.clone());
        let host = Host::new(counter, CounterProps::new(config.name.clone()), hub.clone());

        Ok(Self {
            config: config.clone(),
            keys: AppKeyMap::default(),
            hub,
            host,
            probe,
            frame: Frame::default(),
            hovered: None,
            failure: None,
        })
    }

    /// The counter host.
    pub fn host(&self) -> &Host<CounterWidget> {
        &self.host
    }

    /// The keyboard hub the counter listens on.
    pub fn hub(&self) -> &KeyboardHub {
        &self.hub
    }

    /// The last drawn frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Key of the element under the pointer.
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// The lifecycle error that stopped the application, if any.
    pub fn failure(&self) -> Option<&LifecycleError> {
        self.failure.as_ref()
    }

    /// Unmount the counter if it is still mounted.
    pub fn shutdown(&mut self) {
        if self.host.phase() == Phase::Mounted {
            if let Err(err) = self.host.unmount() {
                tracing::warn!(error = %err, "unmount failed");
            }
        }
        self.redraw();
    }

    /// Help line shown below the counter.
    pub fn help(&self) -> String {
        let mut parts = vec![self.host.component().keymap().short_help()];
        if self.config.mouse {
            parts.push("click buttons".to_string());
        }
        for binding in [&self.keys.fault, &self.keys.quit] {
            let help = binding.get_help();
            parts.push(format!("{} {}", help.key, help.desc));
        }
        parts.join(" • ")
    }

    fn redraw(&mut self) {
        let options = FrameOptions {
            color: self.config.color,
            hovered: self.hovered.clone(),
        };
        self.frame = Frame::render(self.host.committed(), &options);
    }

    /// Turn a host result into the next command, stopping on failure.
    fn settle(&mut self, result: Result<Option<Cmd>, LifecycleError>) -> Option<Cmd> {
        let cmd = match result {
            Ok(cmd) => cmd,
            Err(err) => {
                tracing::error!(error = %err, "counter failed");
                self.failure = Some(err);
                self.shutdown();
                return Some(quit());
            }
        };
        self.redraw();
        cmd
    }

    fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        if matches_one(key, &self.keys.quit) {
            self.shutdown();
            return Some(quit());
        }
        if matches_one(key, &self.keys.fault) {
            self.probe.arm();
            return None;
        }
        let posted = self.hub.dispatch(key);
        tracing::trace!(%key, posted, "key dispatched");
        let result = self.host.drain();
        self.settle(result)
    }

    fn handle_mouse(&mut self, mouse: &MouseMsg) -> Option<Cmd> {
        if !self.config.mouse {
            return None;
        }
        let target = self
            .frame
            .hit(mouse.x, mouse.y)
            .map(|region| region.key.clone());

        if mouse.is_click() {
            let key = target?;
            let result = self.host.click(&key, mouse);
            return self.settle(result);
        }
        if mouse.action == MouseAction::Motion && target != self.hovered {
            self.hovered = target;
            self.redraw();
        }
        None
    }

    /// Mount, run the startup fetch inline and return the plain or styled
    /// frame, for headless use.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter fails outside its error capture.
    pub fn render_once(&mut self) -> Result<String, LifecycleError> {
        let mut pending: Vec<Message> = self
            .host
            .mount()?
            .map(run_inline)
            .unwrap_or_default();
        while let Some(msg) = pending.pop() {
            if let Some(cmd) = self.host.update(msg)? {
                pending.extend(run_inline(cmd));
            }
        }
        self.redraw();
        let text = self.frame.text();
        self.shutdown();
        Ok(text)
    }
}

impl Model for App {
    fn init(&mut self) -> Option<Cmd> {
        let result = self.host.mount();
        self.settle(result)
    }

    fn update(&mut self, msg: Message) -> Option<Cmd> {
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key);
        }
        if let Some(mouse) = msg.downcast_ref::<MouseMsg>() {
            return self.handle_mouse(mouse);
        }
        let result = self.host.update(msg);
        self.settle(result)
    }

    fn view(&self) -> String {
        let mut out = self.frame.text();
        if self.host.is_errored() {
            out.push_str("\n\n(a render error was captured; the probe is gone)");
        }
        out.push_str("\n\n");
        out.push_str(&self.help());
        out
    }
}
