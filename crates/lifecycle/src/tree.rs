//! Display-tree description.
//!
//! A widget renders by returning a [`Node`]: a declarative description of what
//! should be on screen. The tree is plain data; turning it into terminal output
//! is the job of [`Frame`](crate::Frame).
//!
//! # Example
//!
//! ```rust
//! use lifecycle::tree::{Element, ElementKind, Node};
//!
//! let tree = Node::from(
//!     Element::new(ElementKind::Block)
//!         .child(Element::heading(1).child(Node::text("Counter")))
//!         .child(Element::heading(3).key("current").child(Node::text("Current: 3"))),
//! );
//!
//! assert_eq!(tree.find("current").unwrap().text_content(), "Current: 3");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::message::Message;
use crate::mouse::MouseMsg;

/// Attribute carrying the hover hint text of an element.
pub const TOOLTIP_ATTR: &str = "data-tip";

/// A color specified by hex string (`#rgb` or `#rrggbb`).
///
/// ```rust
/// use lifecycle::Color;
///
/// assert_eq!(Color::new("#9999bb").as_rgb(), Some((0x99, 0x99, 0xbb)));
/// assert_eq!(Color::new("#AAA").as_rgb(), Some((0xaa, 0xaa, 0xaa)));
/// assert_eq!(Color::new("teal").as_rgb(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color(pub String);

impl Color {
    /// Create a new color from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Parse as RGB if this is a hex color.
    pub fn as_rgb(&self) -> Option<(u8, u8, u8)> {
        let s = self.0.trim().strip_prefix('#')?;
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match s.len() {
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16).ok()?;
                let g = u8::from_str_radix(&s[2..4], 16).ok()?;
                let b = u8::from_str_radix(&s[4..6], 16).ok()?;
                Some((r, g, b))
            }
            3 => {
                let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
                Some((r, g, b))
            }
            _ => None,
        }
    }

    /// The crossterm color for this value, if it parses.
    pub fn to_crossterm(&self) -> Option<crossterm::style::Color> {
        self.as_rgb()
            .map(|(r, g, b)| crossterm::style::Color::Rgb { r, g, b })
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Visual style of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    /// Background color.
    pub background: Option<Color>,
    /// Foreground color.
    pub foreground: Option<Color>,
    /// Bold text.
    pub bold: bool,
    /// Horizontal padding in cells, applied on both sides.
    pub padding_x: u16,
}

impl Style {
    /// An empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the background color.
    pub fn background(mut self, color: impl Into<Color>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Set the foreground color.
    pub fn foreground(mut self, color: impl Into<Color>) -> Self {
        self.foreground = Some(color.into());
        self
    }

    /// Enable bold text.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set horizontal padding.
    pub fn padding_x(mut self, cells: u16) -> Self {
        self.padding_x = cells;
        self
    }

    /// Whether this style changes nothing about the text.
    pub fn is_plain(&self) -> bool {
        self.background.is_none() && self.foreground.is_none() && !self.bold
    }
}

/// A click handler attached to an element.
///
/// The handler receives the originating pointer event and returns the message
/// that is delivered to the owning widget.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn(&MouseMsg) -> Message + Send + Sync>);

impl Callback {
    /// Wrap a handler.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&MouseMsg) -> Message + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, event: &MouseMsg) -> Message {
        (self.0)(event)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// The kind of an element, which decides how it is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A container; starts and ends its own lines.
    Block,
    /// A heading of the given level; always on its own line.
    Heading(u8),
    /// An inline clickable control.
    Button,
    /// An inline image reference (`src`, `alt`, optional `glyph`).
    Image,
}

/// An element of the display tree.
#[derive(Debug, Clone)]
pub struct Element {
    /// Layout kind.
    pub kind: ElementKind,
    /// Stable identity used for hit-testing and lookups.
    pub key: Option<String>,
    /// Visual style.
    pub style: Style,
    /// Free-form attributes (`src`, `alt`, `data-tip`, ...).
    pub attrs: BTreeMap<String, String>,
    /// Click handler.
    pub on_click: Option<Callback>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element of the given kind.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            key: None,
            style: Style::default(),
            attrs: BTreeMap::new(),
            on_click: None,
            children: Vec::new(),
        }
    }

    /// Create a heading element.
    pub fn heading(level: u8) -> Self {
        Self::new(ElementKind::Heading(level))
    }

    /// Set the key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the style.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set the click handler.
    pub fn on_click(mut self, callback: Callback) -> Self {
        self.on_click = Some(callback);
        self
    }

    /// Append a child.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append several children.
    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Look up an attribute.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The hover hint of this element, if any.
    pub fn tooltip(&self) -> Option<&str> {
        self.get_attr(TOOLTIP_ATTR)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

/// A node of the display tree.
#[derive(Debug, Clone, Default)]
pub enum Node {
    /// Nothing.
    #[default]
    Empty,
    /// Literal text.
    Text(String),
    /// An element.
    Element(Element),
    /// A list of siblings without a wrapper.
    Fragment(Vec<Node>),
}

impl Node {
    /// A text node.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Find the first element with the given key (depth-first).
    pub fn find(&self, key: &str) -> Option<&Element> {
        match self {
            Node::Element(el) => {
                if el.key.as_deref() == Some(key) {
                    return Some(el);
                }
                el.children.iter().find_map(|c| c.find(key))
            }
            Node::Fragment(nodes) => nodes.iter().find_map(|c| c.find(key)),
            Node::Empty | Node::Text(_) => None,
        }
    }

    /// Whether an element with the given key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Concatenated text of all text nodes in this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(s) => out.push_str(s),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Node::Fragment(nodes) => {
                for child in nodes {
                    child.collect_text(out);
                }
            }
            Node::Empty => {}
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::text(s)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

impl<N: Into<Node>> From<Option<N>> for Node {
    fn from(node: Option<N>) -> Self {
        node.map_or(Node::Empty, Into::into)
    }
}
