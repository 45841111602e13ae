//! Text rendering definitions for pin labels.
//!
//! - [`TextDefinition`] - Reusable text style configuration
//! - [`Text`] - A renderable text element combining content with a [`TextDefinition`]
//!
//! # Quick Start
//!
//! ```
//! # use pinlabel_core::draw::{TextDefinition, Text};
//! let mut style = TextDefinition::new();
//! style.set_font_family("Courier New");
//! style.set_font_size(6.0);
//!
//! let text = Text::new(&style, "GPIO5");
//! let size = text.calculate_size();
//! assert!(size.width() > 0.0);
//! ```
//!
//! Label fonts are monospace, so text is measured from its character count
//! rather than from font metrics.

use std::sync::OnceLock;

use svg::{self, node::element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Point, Size},
};

/// Advance width of one monospace glyph relative to the font size.
const MONOSPACE_ADVANCE: f32 = 0.6;
/// Line height relative to the font size.
const LINE_HEIGHT: f32 = 1.15;

static DEFAULT_TEXT: OnceLock<TextDefinition> = OnceLock::new();

/// Horizontal alignment of text relative to its position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    /// Returns the SVG `text-anchor` value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Defines the visual style for label text.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"Courier New"` |
/// | Font size | `6` |
/// | Text color | `None` (SVG default, black) |
/// | Font weight | `None` |
/// | Anchor | middle |
/// | Baseline adjust | `0` |
#[derive(Debug, Clone)]
pub struct TextDefinition {
    font_family: String,
    font_size: f32,
    color: Option<Color>,
    font_weight: Option<String>,
    anchor: TextAnchor,
    baseline_adjust: f32,
}

impl TextDefinition {
    /// Returns a reference to the default text definition (borrowed from static).
    pub fn default_borrowed() -> &'static Self {
        DEFAULT_TEXT.get_or_init(TextDefinition::default)
    }

    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font size in user units.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    /// Sets the font family for the text.
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Sets the text color. `None` leaves the `fill` attribute out.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// Sets the `font-weight` attribute, e.g. `bold`.
    pub fn set_font_weight(&mut self, weight: Option<&str>) {
        self.font_weight = weight.map(str::to_string);
    }

    pub fn set_anchor(&mut self, anchor: TextAnchor) {
        self.anchor = anchor;
    }

    /// Sets the offset added to `y` so the glyphs sit visually centered on
    /// the position instead of on the baseline.
    pub fn set_baseline_adjust(&mut self, adjust: f32) {
        self.baseline_adjust = adjust;
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn font_weight(&self) -> Option<&str> {
        self.font_weight.as_deref()
    }

    pub fn anchor(&self) -> TextAnchor {
        self.anchor
    }

    pub fn baseline_adjust(&self) -> f32 {
        self.baseline_adjust
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "Courier New".to_string(),
            font_size: 6.0,
            color: None,
            font_weight: None,
            anchor: TextAnchor::default(),
            baseline_adjust: 0.0,
        }
    }
}

/// A single line of label text.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    /// Creates a new text element with the given definition and content.
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    /// Returns the text content of this element.
    pub fn content(&self) -> &str {
        self.content
    }

    /// Estimated rendered size of the text.
    pub fn calculate_size(&self) -> Size {
        if self.content.is_empty() {
            return Size::default();
        }
        let font_size = self.definition.font_size();
        let chars = self.content.chars().count() as f32;
        Size::new(chars * font_size * MONOSPACE_ADVANCE, font_size * LINE_HEIGHT)
    }

    /// Builds the `<text>` element anchored at `position`.
    pub fn to_svg_element(&self, position: Point) -> svg_element::Text {
        let def = self.definition;
        let mut rendered = svg_element::Text::new(self.content)
            .set("x", position.x())
            .set("y", position.y() + def.baseline_adjust())
            .set("text-anchor", def.anchor().to_svg_value())
            .set("font-family", def.font_family())
            .set("font-size", def.font_size());

        if let Some(color) = def.color() {
            rendered = rendered.set("fill", color);
        }
        if let Some(weight) = def.font_weight() {
            rendered = rendered.set("font-weight", weight);
        }

        rendered
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Text, Box::new(self.to_svg_element(position)));
        output
    }

    fn size(&self) -> Size {
        self.calculate_size()
    }
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_text_definition_default_borrowed_returns_static() {
        let borrowed1 = TextDefinition::default_borrowed();
        let borrowed2 = TextDefinition::default_borrowed();
        assert!(ptr::eq(borrowed1, borrowed2));
        assert_eq!(borrowed1.font_family(), "Courier New");
    }

    #[test]
    fn test_text_definition_setters() {
        let mut def = TextDefinition::new();
        def.set_font_size(8.0);
        def.set_font_family("monospace");
        def.set_font_weight(Some("bold"));
        def.set_anchor(TextAnchor::Start);
        def.set_color(Some(Color::new("white").unwrap()));

        assert_approx_eq!(f32, def.font_size(), 8.0);
        assert_eq!(def.font_family(), "monospace");
        assert_eq!(def.font_weight(), Some("bold"));
        assert_eq!(def.anchor(), TextAnchor::Start);
        assert!(def.color().is_some());
    }

    #[test]
    fn test_text_calculate_size_empty() {
        let def = TextDefinition::new();
        let size = Text::new(&def, "").calculate_size();
        assert_approx_eq!(f32, size.width(), 0.0);
        assert_approx_eq!(f32, size.height(), 0.0);
    }

    #[test]
    fn test_text_calculate_size_counts_chars() {
        let mut def = TextDefinition::new();
        def.set_font_size(10.0);
        let size = Text::new(&def, "GPIO5").calculate_size();
        assert_approx_eq!(f32, size.width(), 30.0);
        assert_approx_eq!(f32, size.height(), 11.5);
    }

    #[test]
    fn test_text_svg_minimal_attributes() {
        let def = TextDefinition::new();
        let rendered = Text::new(&def, "D3")
            .to_svg_element(Point::new(10.0, 20.0))
            .to_string();
        assert!(rendered.contains("x=\"10\""));
        assert!(rendered.contains("y=\"20\""));
        assert!(rendered.contains("text-anchor=\"middle\""));
        assert!(rendered.contains("\nD3\n</text>"));
        assert!(!rendered.contains("fill="));
        assert!(!rendered.contains("font-weight="));
    }

    #[test]
    fn test_text_render_to_layers_uses_text_layer() {
        let def = TextDefinition::new();
        let output = Text::new(&def, "SCL").render_to_layers(Point::new(1.0, 1.0));
        assert_eq!(output.len_of(RenderLayer::Text), 1);
    }
}
