//! Stateless clickable control.
//!
//! A button is fully described by its [`ButtonProps`]: a styling variant, an
//! optional icon, an optional hover hint and an optional click handler.
//! [`ButtonWidget::render`] turns them into a display-tree element.
//!
//! # Example
//!
//! ```rust
//! use lifecycle::{Callback, Message, Node};
//! use widgets::button::{ButtonProps, ButtonVariant, ButtonWidget, Icon};
//!
//! let props = ButtonProps::new(ButtonVariant::Primary)
//!     .icon(Icon::PLUS)
//!     .tooltip("Increment")
//!     .on_click(Callback::new(|_| Message::new(1i64)));
//!
//! let node = ButtonWidget::render("increment", &props, Vec::<Node>::new());
//! let el = node.find("increment").unwrap();
//! assert_eq!(el.tooltip(), Some("Increment"));
//! ```

use std::fmt;

use lifecycle::{Callback, Color, Element, ElementKind, Node, Style};
use lifecycle::tree::TOOLTIP_ATTR;

/// Background of [`ButtonVariant::Primary`].
pub const PRIMARY_BACKGROUND: &str = "#9999bb";
/// Background of [`ButtonVariant::Default`].
pub const DEFAULT_BACKGROUND: &str = "#aaaaaa";

/// The two styling profiles a button can take.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ButtonVariant {
    /// Emphasized action.
    Primary,
    /// Regular action.
    #[default]
    Default,
}

impl ButtonVariant {
    /// Background color of the variant.
    pub fn background(self) -> Color {
        match self {
            ButtonVariant::Primary => Color::new(PRIMARY_BACKGROUND),
            ButtonVariant::Default => Color::new(DEFAULT_BACKGROUND),
        }
    }

    /// Full style of the variant, padding included.
    pub fn style(self) -> Style {
        Style::new()
            .background(self.background())
            .foreground("#000000")
            .padding_x(1)
    }
}

impl fmt::Display for ButtonVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonVariant::Primary => f.write_str("primary"),
            ButtonVariant::Default => f.write_str("default"),
        }
    }
}

/// A static image reference plus the glyph drawn for it in a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    /// Resource path, used as `src` and `alt`.
    pub path: &'static str,
    /// Single-cell stand-in for the image.
    pub glyph: &'static str,
}

impl Icon {
    /// Plus sign.
    pub const PLUS: Icon = Icon {
        path: "icons/plus.svg",
        glyph: "+",
    };
    /// Minus sign.
    pub const MINUS: Icon = Icon {
        path: "icons/minus.svg",
        glyph: "-",
    };

    fn element(self) -> Element {
        Element::new(ElementKind::Image)
            .attr("src", self.path)
            .attr("alt", self.path)
            .attr("glyph", self.glyph)
    }
}

/// Inputs of a button.
#[derive(Debug, Clone, Default)]
pub struct ButtonProps {
    /// Styling profile.
    pub variant: ButtonVariant,
    /// Hover hint text.
    pub tooltip: Option<String>,
    /// Icon drawn before the children.
    pub icon: Option<Icon>,
    /// Click handler.
    pub on_click: Option<Callback>,
}

impl ButtonProps {
    /// Props with the given variant and nothing else.
    pub fn new(variant: ButtonVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Set the hover hint.
    pub fn tooltip(mut self, text: impl Into<String>) -> Self {
        self.tooltip = Some(text.into());
        self
    }

    /// Set the icon.
    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the click handler.
    pub fn on_click(mut self, handler: Callback) -> Self {
        self.on_click = Some(handler);
        self
    }
}

/// Stateless button.
pub struct ButtonWidget;

impl ButtonWidget {
    /// Name used in component stacks.
    pub const NAME: &'static str = "ButtonWidget";

    /// Describe a button with the given key, props and child content.
    pub fn render<I, N>(key: &str, props: &ButtonProps, children: I) -> Node
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        let mut el = Element::new(ElementKind::Button)
            .key(key)
            .style(props.variant.style())
            .attr("type", props.variant.to_string());
        if let Some(tip) = &props.tooltip {
            el = el.attr(TOOLTIP_ATTR, tip.clone());
        }
        if let Some(handler) = &props.on_click {
            el = el.on_click(handler.clone());
        }
        if let Some(icon) = props.icon {
            el = el.child(icon.element());
        }
        el.children(children).into()
    }
}
