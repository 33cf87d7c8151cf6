//! Terminal rendering of a display tree.
//!
//! [`Frame::render`] lays a [`Node`] out line by line: blocks and headings
//! occupy their own lines, buttons, images and text flow inline. While laying
//! out, every keyed button is recorded as a [`HitRegion`] so pointer events can
//! be routed back to the element that was drawn under the cursor.
//!
//! The hover-hint collaborator lives here too: when
//! [`FrameOptions::hovered`] names an element carrying a `data-tip`
//! attribute, the hint text is drawn on the line below that element.

use crossterm::style::{Attribute, ContentStyle};
use unicode_width::UnicodeWidthStr;

use crate::tree::{Element, ElementKind, Node, Style};

/// Options controlling how a frame is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOptions {
    /// Emit ANSI styling. When off, buttons are drawn with brackets instead of
    /// a background fill.
    pub color: bool,
    /// Key of the element under the pointer, if any.
    pub hovered: Option<String>,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            color: true,
            hovered: None,
        }
    }
}

impl FrameOptions {
    /// Options for uncolored output.
    pub fn plain() -> Self {
        Self {
            color: false,
            hovered: None,
        }
    }

    /// Set the hovered element.
    pub fn with_hovered(mut self, key: Option<String>) -> Self {
        self.hovered = key;
        self
    }
}

/// A rectangle of one row that belongs to a keyed element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRegion {
    /// Key of the element.
    pub key: String,
    /// Row, 0-indexed.
    pub row: u16,
    /// First column, inclusive.
    pub start: u16,
    /// Last column, exclusive.
    pub end: u16,
}

impl HitRegion {
    /// Whether the cell `(x, y)` lies inside this region.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        y == self.row && x >= self.start && x < self.end
    }
}

#[derive(Debug, Default)]
struct Line {
    styled: String,
    plain: String,
    width: u16,
}

impl Line {
    fn push(&mut self, text: &str, style: &Style, color: bool) {
        self.plain.push_str(text);
        self.styled.push_str(&paint(text, style, color));
        self.width = self
            .width
            .saturating_add(u16::try_from(text.width()).unwrap_or(u16::MAX));
    }

    fn is_empty(&self) -> bool {
        self.plain.is_empty()
    }
}

/// A rendered frame: terminal lines plus the regions needed for hit-testing.
#[derive(Debug, Default)]
pub struct Frame {
    styled: Vec<String>,
    plain: Vec<String>,
    regions: Vec<HitRegion>,
}

impl Frame {
    /// Lay out and draw a display tree.
    pub fn render(node: &Node, options: &FrameOptions) -> Self {
        let mut layout = Layout {
            options,
            lines: Vec::new(),
            current: Line::default(),
            regions: Vec::new(),
            hint: None,
        };
        layout.walk(node, &Style::default());
        layout.break_line();
        layout.finish()
    }

    /// The drawn lines, styled according to the options.
    pub fn lines(&self) -> &[String] {
        &self.styled
    }

    /// The frame as one string, styled according to the options.
    pub fn text(&self) -> String {
        self.styled.join("\n")
    }

    /// The frame as one string without any ANSI styling.
    pub fn plain_text(&self) -> String {
        self.plain.join("\n")
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.plain.len()
    }

    /// All hit regions, in layout order.
    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    /// The region under the cell `(x, y)`.
    pub fn hit(&self, x: u16, y: u16) -> Option<&HitRegion> {
        self.regions.iter().find(|r| r.contains(x, y))
    }

    /// The region recorded for the given key.
    pub fn region(&self, key: &str) -> Option<&HitRegion> {
        self.regions.iter().find(|r| r.key == key)
    }
}

struct Layout<'a> {
    options: &'a FrameOptions,
    lines: Vec<Line>,
    current: Line,
    regions: Vec<HitRegion>,
    // (row, column, text) of the hover hint to draw.
    hint: Option<(u16, u16, String)>,
}

impl Layout<'_> {
    fn row(&self) -> u16 {
        u16::try_from(self.lines.len()).unwrap_or(u16::MAX)
    }

    fn break_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    fn walk(&mut self, node: &Node, inherited: &Style) {
        match node {
            Node::Empty => {}
            Node::Text(text) => self.current.push(text, inherited, self.options.color),
            Node::Fragment(nodes) => {
                for child in nodes {
                    self.walk(child, inherited);
                }
            }
            Node::Element(el) => self.walk_element(el, inherited),
        }
    }

    fn walk_element(&mut self, el: &Element, inherited: &Style) {
        match el.kind {
            ElementKind::Block => {
                self.break_line();
                let style = merge(inherited, &el.style);
                for child in &el.children {
                    self.walk(child, &style);
                }
                self.break_line();
            }
            ElementKind::Heading(level) => {
                self.break_line();
                let mut style = merge(inherited, &el.style);
                if level <= 2 {
                    style.bold = true;
                }
                for child in &el.children {
                    self.walk(child, &style);
                }
                self.break_line();
            }
            ElementKind::Button => self.draw_button(el),
            ElementKind::Image => {
                let glyph = image_glyph(el);
                self.current.push(&glyph, &el.style, self.options.color);
            }
        }
    }

    fn draw_button(&mut self, el: &Element) {
        if !self.current.is_empty() {
            self.current.push(" ", &Style::default(), false);
        }

        let pad = " ".repeat(usize::from(el.style.padding_x));
        let label = button_label(el);
        let body = if self.options.color {
            format!("{pad}{label}{pad}")
        } else {
            format!("[{pad}{label}{pad}]")
        };

        let row = self.row();
        let start = self.current.width;
        self.current.push(&body, &el.style, self.options.color);
        let end = self.current.width;

        if let Some(key) = &el.key {
            self.regions.push(HitRegion {
                key: key.clone(),
                row,
                start,
                end,
            });
            if self.options.hovered.as_deref() == Some(key.as_str()) {
                if let Some(tip) = el.tooltip() {
                    self.hint = Some((row, start, tip.to_string()));
                }
            }
        }
    }

    fn finish(mut self) -> Frame {
        if let Some((row, column, tip)) = self.hint.take() {
            let mut line = Line::default();
            line.push(&" ".repeat(usize::from(column)), &Style::default(), false);
            let hint_style = Style::new().foreground("#888888");
            line.push(&format!("^ {tip}"), &hint_style, self.options.color);

            let at = (usize::from(row) + 1).min(self.lines.len());
            self.lines.insert(at, line);
            for region in &mut self.regions {
                if region.row > row {
                    region.row += 1;
                }
            }
        }

        let (styled, plain) = self
            .lines
            .into_iter()
            .map(|line| (line.styled, line.plain))
            .unzip();
        Frame {
            styled,
            plain,
            regions: self.regions,
        }
    }
}

fn merge(parent: &Style, own: &Style) -> Style {
    Style {
        background: own.background.clone().or_else(|| parent.background.clone()),
        foreground: own.foreground.clone().or_else(|| parent.foreground.clone()),
        bold: own.bold || parent.bold,
        padding_x: own.padding_x,
    }
}

fn image_glyph(el: &Element) -> String {
    el.get_attr("glyph")
        .or_else(|| el.get_attr("alt"))
        .unwrap_or("?")
        .to_string()
}

fn button_label(el: &Element) -> String {
    el.children
        .iter()
        .map(|child| match child {
            Node::Element(img) if img.kind == ElementKind::Image => image_glyph(img),
            other => other.text_content(),
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn paint(text: &str, style: &Style, color: bool) -> String {
    if !color || style.is_plain() || text.is_empty() {
        return text.to_string();
    }
    let mut content = ContentStyle::new();
    content.background_color = style.background.as_ref().and_then(|c| c.to_crossterm());
    content.foreground_color = style.foreground.as_ref().and_then(|c| c.to_crossterm());
    if style.bold {
        content.attributes.set(Attribute::Bold);
    }
    content.apply(text).to_string()
}
