//! A child that fails to render on demand.
//!
//! The counter renders a [`FaultProbe`] as its error-prone descendant. While
//! disarmed the probe renders a status line; once armed, its next render fails
//! with a [`RenderError`], which exercises the counter's error capture.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lifecycle::{Element, ElementKind, Node, RenderError, Style};

/// Armable failing child. Clones share the trigger.
#[derive(Debug, Clone, Default)]
pub struct FaultProbe {
    armed: Arc<AtomicBool>,
}

impl FaultProbe {
    /// Name used in component stacks.
    pub const NAME: &'static str = "FaultProbe";
    /// Key of the element the probe renders.
    pub const KEY: &'static str = "fault-probe";

    /// A disarmed probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// A probe that fails on its first render.
    pub fn armed() -> Self {
        let probe = Self::new();
        probe.arm();
        probe
    }

    /// Make the next render fail.
    pub fn arm(&self) {
        if !self.armed.swap(true, Ordering::AcqRel) {
            tracing::info!("fault probe armed");
        }
    }

    /// Whether the next render will fail.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Describe the probe, or fail if armed.
    pub fn render(&self) -> Result<Node, RenderError> {
        if self.is_armed() {
            return Err(RenderError::new(Self::NAME, "probe tripped while rendering"));
        }
        Ok(Element::new(ElementKind::Block)
            .key(Self::KEY)
            .style(Style::new().foreground("#5f875f"))
            .child("probe: healthy")
            .into())
    }
}
